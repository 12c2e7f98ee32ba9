use std::env;
use std::path::PathBuf;

include!(concat!(env!("OUT_DIR"), "/aoc_env_allowlist.rs"));

fn fallback_dotenv_path(aoc_home: Option<PathBuf>, home_dir: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(root) = aoc_home {
        return Some(root.join(".env"));
    }
    Some(home_dir?.join(".config/aoc-relay/.env"))
}

/// Load `.env` from the working directory, falling back to the relay root
/// (`AOC_HOME`) or the per-user config directory.
pub fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    let fallback = fallback_dotenv_path(
        env::var_os("AOC_HOME").map(PathBuf::from),
        dirs::home_dir(),
    );

    let Some(path) = fallback else {
        return;
    };
    if path.is_file() {
        let _ = dotenvy::from_path(&path);
    }
}

/// Recognised `AOC_*` variables currently set, for diagnostics. Values of
/// credential variables are masked.
pub fn active_overrides() -> Vec<(String, String)> {
    GENERATED_ENV_ALLOWLIST
        .iter()
        .filter_map(|key| {
            let value = env::var(key).ok()?;
            let shown = if key.contains("SESSION") && !key.ends_with("_FILE") {
                "<set>".to_string()
            } else {
                value
            };
            Some((key.to_string(), shown))
        })
        .collect()
}
