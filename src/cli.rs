use anyhow::Result;
use chrono::{Datelike, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::input::{InputOptions, InputView};
use crate::commands::scaffold::ScaffoldOptions;
use crate::commands::submit::SubmitOptions;
use crate::commands::{self, CommandReport};
use aoc_relay::relay::puzzle::{Part, PuzzleKey};

#[derive(Debug, Parser)]
#[command(
    name = "aoc-relay",
    version,
    about = "Fetch Advent of Code inputs and submit answers without tripping the rate limit"
)]
struct Cli {
    /// Puzzle year (defaults to the current year)
    #[arg(short, long, global = true)]
    year: Option<i32>,
    /// Puzzle day (defaults to today)
    #[arg(short, long, global = true)]
    day: Option<u32>,
    /// Infer year and day from a solution file path such as 2023/day07.rs
    #[arg(long, global = true, conflicts_with_all = ["year", "day"])]
    file: Option<PathBuf>,
    /// Print the command report as JSON
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the puzzle input, downloading it on first use
    Input {
        /// Download again even if a cached copy exists
        #[arg(long)]
        refresh: bool,
        #[arg(long, value_enum, default_value_t = InputView::Raw)]
        view: InputView,
        /// Also open the puzzle page in the browser
        #[arg(short, long)]
        browser: bool,
    },
    /// Submit an answer for part 1 or 2
    Submit {
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=2))]
        part: u8,
        answer: String,
    },
    /// Show paths, cooldown and recorded answers for the puzzle
    Status,
    /// Open the puzzle page in the browser
    Open,
    /// Create day01.rs..day25.rs solution stubs
    Scaffold {
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
}

fn resolve_key(cli: &Cli) -> Result<PuzzleKey> {
    let today = Utc::now().date_naive();
    if let Some(file) = &cli.file {
        return PuzzleKey::infer_from_path(file, today.year());
    }
    PuzzleKey::new(
        cli.year.unwrap_or(today.year()),
        cli.day.unwrap_or(today.day()),
        today.year(),
    )
}

fn print_report(report: &CommandReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", report.render_text());
    }
    Ok(())
}

/// Returns whether the command succeeded; hard failures come back as `Err`.
pub fn run() -> Result<bool> {
    let cli = Cli::parse();

    let report = match &cli.command {
        Command::Scaffold { dir } => commands::scaffold::run(&ScaffoldOptions { dir: dir.clone() })?,
        Command::Input {
            refresh,
            view,
            browser,
        } => commands::input::run(&InputOptions {
            key: resolve_key(&cli)?,
            refresh: *refresh,
            view: *view,
            browser: *browser,
        })?,
        Command::Submit { part, answer } => commands::submit::run(&SubmitOptions {
            key: resolve_key(&cli)?,
            part: Part::try_from(*part)?,
            answer: answer.clone(),
        })?,
        Command::Status => commands::status::run(resolve_key(&cli)?)?,
        Command::Open => commands::open::run(resolve_key(&cli)?)?,
    };

    print_report(&report, cli.json)?;
    Ok(report.ok)
}
