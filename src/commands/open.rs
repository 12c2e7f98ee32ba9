use anyhow::Result;

use crate::commands::CommandReport;
use aoc_relay::relay::browser;
use aoc_relay::relay::config::load_config;
use aoc_relay::relay::paths::resolve_paths;
use aoc_relay::relay::puzzle::PuzzleKey;

pub fn run(key: PuzzleKey) -> Result<CommandReport> {
    let paths = resolve_paths()?;
    let config = load_config(&paths)?;
    let mut report = CommandReport::new("open");

    let url = key.page_url(&config.site.base_url);
    report.detail(format!("url={url}"));
    if let Err(err) = browser::open_url(&url) {
        report.issue(format!("browser launch failed: {err:#}"));
    }
    Ok(report)
}
