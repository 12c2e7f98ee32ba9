use anyhow::Result;

use crate::commands::CommandReport;
use aoc_relay::relay::browser;
use aoc_relay::relay::config::load_config;
use aoc_relay::relay::paths::resolve_paths;
use aoc_relay::relay::puzzle::PuzzleKey;
use aoc_relay::relay::session::Session;
use aoc_relay::relay::views;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum InputView {
    #[default]
    Raw,
    Lines,
    Tokens,
    Ints,
    Grid,
    Blocks,
}

#[derive(Debug, Clone)]
pub struct InputOptions {
    pub key: PuzzleKey,
    pub refresh: bool,
    pub view: InputView,
    pub browser: bool,
}

fn render(view: InputView, text: &str) -> Result<String> {
    let rendered = match view {
        InputView::Raw => return Ok(text.to_string()),
        InputView::Lines => serde_json::to_string(&views::lines(text))?,
        InputView::Tokens => serde_json::to_string(&views::token_rows(text))?,
        InputView::Ints => serde_json::to_string(&views::ints(text)?)?,
        InputView::Grid => serde_json::to_string(&views::char_grid(text))?,
        InputView::Blocks => serde_json::to_string(&views::blocks(text))?,
    };
    Ok(format!("{rendered}\n"))
}

pub fn run(opts: &InputOptions) -> Result<CommandReport> {
    let paths = resolve_paths()?;
    let mut report = CommandReport::new("input");

    if opts.browser {
        let config = load_config(&paths)?;
        if let Err(err) = browser::open_url(&opts.key.page_url(&config.site.base_url)) {
            tracing::warn!("could not open browser: {err:#}");
        }
    }

    let mut session = Session::connect(opts.key, &paths)?;
    let input = if opts.refresh {
        session.refresh_input()?
    } else {
        session.input()?
    };
    report.detail(format!("path={}", input.path.display()));
    report.detail(format!("fingerprint={}", input.fingerprint));
    report.detail(format!("from_cache={}", input.from_cache));
    report.payload(render(opts.view, &input.text)?);
    session.close()?;

    Ok(report)
}
