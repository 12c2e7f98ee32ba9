use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const TEMPLATE_FILE: &str = "TEMPLATE_DAY.rs";
const DAY_PLACEHOLDER: &str = "{{day}}";

const BUILTIN_TEMPLATE: &str = r#"use aoc_relay::relay::paths::resolve_paths;
use aoc_relay::relay::puzzle::PuzzleKey;
use aoc_relay::relay::session::Session;

const YEAR: i32 = 2024;

fn part1(_input: &str) -> Option<i64> {
    None
}

fn part2(_input: &str) -> Option<i64> {
    None
}

fn main() -> anyhow::Result<()> {
    let key = PuzzleKey::new(YEAR, {{day}}, YEAR)?;
    let mut session = Session::connect(key, &resolve_paths()?)?;
    let input = session.input()?.text.clone();

    if let Some(answer) = part1(&input) {
        println!("part 1: {answer}");
        // session.submit(aoc_relay::relay::puzzle::Part::One, answer)?;
    }
    if let Some(answer) = part2(&input) {
        println!("part 2: {answer}");
        // session.submit(aoc_relay::relay::puzzle::Part::Two, answer)?;
    }
    session.close()
}
"#;

#[derive(Debug, Clone, Default)]
pub struct ScaffoldOutcome {
    pub created: Vec<PathBuf>,
    pub skipped: usize,
    pub used_custom_template: bool,
}

pub fn day_file(dir: &Path, day: u32) -> PathBuf {
    dir.join(format!("day{day:02}.rs"))
}

/// Create `day01.rs`..`day25.rs` in `dir`. A `TEMPLATE_DAY.rs` placed in
/// `dir` is used instead of the built-in stub and removed afterwards.
/// Existing day files are left alone.
pub fn generate(dir: &Path) -> Result<ScaffoldOutcome> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let custom = dir.join(TEMPLATE_FILE);
    let (template, used_custom_template) = if custom.is_file() {
        let raw = fs::read_to_string(&custom)
            .with_context(|| format!("failed to read {}", custom.display()))?;
        (raw, true)
    } else {
        (BUILTIN_TEMPLATE.to_string(), false)
    };

    let mut outcome = ScaffoldOutcome {
        used_custom_template,
        ..ScaffoldOutcome::default()
    };
    for day in 1..=crate::relay::puzzle::LAST_DAY {
        let path = day_file(dir, day);
        if path.exists() {
            outcome.skipped += 1;
            continue;
        }
        let body = template.replace(DAY_PLACEHOLDER, &day.to_string());
        fs::write(&path, body).with_context(|| format!("failed to write {}", path.display()))?;
        outcome.created.push(path);
    }

    if used_custom_template {
        fs::remove_file(&custom)
            .with_context(|| format!("failed to remove {}", custom.display()))?;
    }
    Ok(outcome)
}
