use anyhow::{Context, Result};
use std::path::PathBuf;
use std::process::{Command, Stdio};

const OPENERS: [&str; 3] = ["xdg-open", "open", "wslview"];

fn resolve_opener() -> Result<PathBuf> {
    if let Ok(custom) = std::env::var("AOC_BROWSER") {
        let trimmed = custom.trim();
        if !trimmed.is_empty() {
            return which::which(trimmed)
                .with_context(|| format!("AOC_BROWSER `{trimmed}` not found on PATH"));
        }
    }
    OPENERS
        .iter()
        .find_map(|name| which::which(name).ok())
        .context("no browser opener found (tried xdg-open, open, wslview; set AOC_BROWSER)")
}

/// Launch the system browser on `url` without waiting for it.
pub fn open_url(url: &str) -> Result<()> {
    let opener = resolve_opener()?;
    Command::new(&opener)
        .arg(url)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("failed to run `{} {url}`", opener.display()))?;
    tracing::info!("opened {url}");
    Ok(())
}
