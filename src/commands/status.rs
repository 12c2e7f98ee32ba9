use anyhow::Result;

use crate::commands::CommandReport;
use aoc_relay::env_loader;
use aoc_relay::relay::clock::SystemClock;
use aoc_relay::relay::config::{load_config, load_session_token};
use aoc_relay::relay::cooldown::{CooldownGate, GateState, TIMESTAMP_FORMAT, format_remaining};
use aoc_relay::relay::input_cache::InputCache;
use aoc_relay::relay::journal;
use aoc_relay::relay::ledger::Ledger;
use aoc_relay::relay::paths::{RelayPaths, resolve_paths};
use aoc_relay::relay::puzzle::{Part, PuzzleKey};

fn cooldown_report(paths: &RelayPaths) -> Result<CommandReport> {
    let mut report = CommandReport::new("cooldown");
    let gate = CooldownGate::new(&paths.cooldown_file);
    match gate.check(&SystemClock)? {
        GateState::Clear => report.detail("cooldown=none"),
        GateState::Expired => report.detail("cooldown=expired (cleared on next submit)"),
        GateState::Active {
            deadline,
            remaining,
        } => {
            report.detail(format!(
                "cooldown=active until {} ({} left)",
                deadline.format(TIMESTAMP_FORMAT),
                format_remaining(remaining)
            ));
            report.issue("submissions are blocked until the cooldown passes");
        }
    }
    Ok(report)
}

fn ledger_report(paths: &RelayPaths, key: &PuzzleKey) -> Result<CommandReport> {
    let mut report = CommandReport::new("ledger");
    let ledger = Ledger::inspect(&paths.ledger_file)?;
    report.detail(format!("ledger.entries={}", ledger.len()));

    let Some(input) = InputCache::new(&paths.inputs_dir).cached(key)? else {
        report.detail("input=not cached");
        return Ok(report);
    };
    report.detail(format!("input.path={}", input.path.display()));
    report.detail(format!("input.fingerprint={}", input.fingerprint));
    for part in [Part::One, Part::Two] {
        match ledger.lookup(&input.fingerprint, part) {
            Some(stored) => report.detail(format!("part{part}.answer={}", stored.answer)),
            None => report.detail(format!("part{part}.answer=none")),
        }
    }
    Ok(report)
}

pub fn run(key: PuzzleKey) -> Result<CommandReport> {
    let paths = resolve_paths()?;
    let mut report = CommandReport::new("status");

    report.detail(format!("puzzle={key}"));
    report.detail(format!("root={}", paths.root.display()));
    report.detail(format!("inputs_dir={}", paths.inputs_dir.display()));
    report.detail(format!("ledger_file={}", paths.ledger_file.display()));
    report.detail(format!("cooldown_file={}", paths.cooldown_file.display()));

    match load_config(&paths) {
        Ok(config) => report.detail(format!("site={}", config.site.base_url)),
        Err(err) => report.issue(format!("config: {err:#}")),
    }
    if let Err(err) = load_session_token(&paths) {
        report.issue(format!("credential: {err:#}"));
    }
    for (key, value) in env_loader::active_overrides() {
        report.detail(format!("env.{key}={value}"));
    }

    report.merge(cooldown_report(&paths)?);
    report.merge(ledger_report(&paths, &key)?);
    report.detail(format!(
        "journal.submissions={}",
        journal::read_events(&paths.journal_file)?.len()
    ));

    Ok(report)
}
