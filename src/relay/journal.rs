use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionEvent {
    pub at: String,
    pub year: i32,
    pub day: u32,
    pub part: u8,
    pub answer: String,
    pub outcome: String,
    pub detail: Option<String>,
}

/// Append one JSON line per answer actually sent to the site.
pub fn append_event(path: &Path, event: &SubmissionEvent) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let line = format!("{}\n", serde_json::to_string(event)?);
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    file.write_all(line.as_bytes())?;
    Ok(())
}

pub fn read_events(path: &Path) -> Result<Vec<SubmissionEvent>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let raw =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let mut out = Vec::new();
    for line in raw.lines().filter(|l| !l.trim().is_empty()) {
        match serde_json::from_str::<SubmissionEvent>(line) {
            Ok(event) => out.push(event),
            Err(err) => tracing::warn!("skipping malformed journal line in {}: {err}", path.display()),
        }
    }
    Ok(out)
}
