use anyhow::Result;

use crate::commands::CommandReport;
use aoc_relay::relay::answer::Answer;
use aoc_relay::relay::paths::resolve_paths;
use aoc_relay::relay::puzzle::{Part, PuzzleKey};
use aoc_relay::relay::session::Session;

#[derive(Debug, Clone)]
pub struct SubmitOptions {
    pub key: PuzzleKey,
    pub part: Part,
    pub answer: String,
}

pub fn run(opts: &SubmitOptions) -> Result<CommandReport> {
    let paths = resolve_paths()?;
    let mut report = CommandReport::new("submit");
    let answer = Answer::parse(&opts.answer);

    report.detail(format!("puzzle={}", opts.key));
    report.detail(format!("part={}", opts.part));
    report.detail(format!("answer={answer}"));

    let mut session = Session::connect(opts.key, &paths)?;
    let correct = session.submit(opts.part, answer)?;
    session.close()?;

    if correct {
        report.detail("outcome=correct");
    } else {
        report.detail("outcome=incorrect");
        report.issue("the site did not accept this answer");
    }
    Ok(report)
}
