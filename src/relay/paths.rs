use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct RelayPaths {
    pub root: PathBuf,
    pub inputs_dir: PathBuf,
    pub data_dir: PathBuf,
    pub session_file: PathBuf,
    pub ledger_file: PathBuf,
    pub cooldown_file: PathBuf,
    pub journal_file: PathBuf,
    pub config_file: PathBuf,
}

fn env_or_default_path(var: &str, fallback: PathBuf) -> PathBuf {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => PathBuf::from(v.trim()),
        _ => fallback,
    }
}

impl RelayPaths {
    /// Default layout under `root`, ignoring the environment.
    pub fn under(root: &Path) -> Self {
        let data_dir = root.join("data");
        Self {
            root: root.to_path_buf(),
            inputs_dir: root.join("inputs"),
            session_file: data_dir.join(".secret_session_cookie"),
            ledger_file: data_dir.join("answers.json"),
            cooldown_file: data_dir.join("spam_blocker"),
            journal_file: data_dir.join("audit.log"),
            config_file: root.join("aoc.toml"),
            data_dir,
        }
    }
}

pub fn resolve_paths() -> Result<RelayPaths> {
    let cwd = env::current_dir().context("current directory could not be resolved")?;
    let root = env_or_default_path("AOC_HOME", cwd);

    let inputs_dir = env_or_default_path("AOC_INPUTS_DIR", root.join("inputs"));
    let data_dir = env_or_default_path("AOC_DATA_DIR", root.join("data"));
    let session_file = env_or_default_path(
        "AOC_SESSION_FILE",
        data_dir.join(".secret_session_cookie"),
    );
    let config_file = env_or_default_path("AOC_CONFIG_PATH", root.join("aoc.toml"));

    Ok(RelayPaths {
        ledger_file: data_dir.join("answers.json"),
        cooldown_file: data_dir.join("spam_blocker"),
        journal_file: data_dir.join("audit.log"),
        root,
        inputs_dir,
        data_dir,
        session_file,
        config_file,
    })
}
