use crate::error::RelayError;
use crate::relay::paths::RelayPaths;
use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;

pub const DEFAULT_BASE_URL: &str = "https://adventofcode.com";
pub const DEFAULT_USER_AGENT: &str = "aoc-relay (+https://crates.io/crates/aoc-relay)";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub base_url: String,
    pub user_agent: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RelayConfig {
    pub site: SiteConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PartialRelayConfig {
    site: Option<SiteConfig>,
}

fn env_or_u64(var: &str, fallback: u64) -> u64 {
    match env::var(var) {
        Ok(v) => v.trim().parse::<u64>().ok().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn env_or_string(var: &str, fallback: &str) -> String {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => fallback.to_string(),
    }
}

fn validate(cfg: &RelayConfig) -> Result<()> {
    let url = cfg.site.base_url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(RelayError::Configuration(format!(
            "invalid site base url `{url}`: must start with http:// or https://"
        ))
        .into());
    }
    if cfg.site.user_agent.trim().is_empty() {
        return Err(RelayError::Configuration("site user agent cannot be empty".into()).into());
    }
    if cfg.site.request_timeout_secs == 0 {
        return Err(RelayError::Configuration(
            "invalid request timeout: must be >= 1 second".into(),
        )
        .into());
    }
    Ok(())
}

fn merge_file_config(base: &mut RelayConfig, paths: &RelayPaths) -> Result<()> {
    let path = &paths.config_file;
    if !path.exists() {
        return Ok(());
    }

    let raw = fs::read_to_string(path)?;
    let parsed: PartialRelayConfig = toml::from_str(&raw)
        .map_err(|err| anyhow!("failed to parse relay config {}: {err}", path.display()))?;
    if let Some(site) = parsed.site {
        base.site = site;
    }
    Ok(())
}

pub fn load_config(paths: &RelayPaths) -> Result<RelayConfig> {
    let mut cfg = RelayConfig::default();
    merge_file_config(&mut cfg, paths)?;

    cfg.site.base_url = env_or_string("AOC_BASE_URL", &cfg.site.base_url)
        .trim_end_matches('/')
        .to_string();
    cfg.site.user_agent = env_or_string("AOC_USER_AGENT", &cfg.site.user_agent);
    cfg.site.request_timeout_secs =
        env_or_u64("AOC_TIMEOUT_SECS", cfg.site.request_timeout_secs);

    validate(&cfg)?;
    Ok(cfg)
}

/// Session token: `AOC_SESSION` wins over the session file. Missing or blank
/// is a configuration error, raised before any request is made.
pub fn load_session_token(paths: &RelayPaths) -> Result<String> {
    if let Ok(v) = env::var("AOC_SESSION") {
        let trimmed = v.trim();
        if !trimmed.is_empty() {
            return Ok(trimmed.to_string());
        }
    }

    let file = &paths.session_file;
    if !file.exists() {
        return Err(RelayError::Configuration(format!(
            "{} does not exist, log in to the site and save your session cookie to this file",
            file.display()
        ))
        .into());
    }
    let raw = fs::read_to_string(file)
        .map_err(|err| anyhow!("failed to read {}: {err}", file.display()))?;
    let token = raw.trim();
    if token.is_empty() {
        return Err(
            RelayError::Configuration(format!("{} is empty", file.display())).into(),
        );
    }
    Ok(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_config_replaces_site_section() {
        let tmp = tempdir().expect("tempdir");
        let paths = RelayPaths::under(tmp.path());
        fs::write(
            &paths.config_file,
            "[site]\nbase_url = \"http://127.0.0.1:9\"\nuser_agent = \"me@example.com\"\n",
        )
        .expect("write config");

        let mut cfg = RelayConfig::default();
        merge_file_config(&mut cfg, &paths).expect("merge");
        assert_eq!(cfg.site.base_url, "http://127.0.0.1:9");
        assert_eq!(cfg.site.user_agent, "me@example.com");
        assert_eq!(cfg.site.request_timeout_secs, 30);
    }

    #[test]
    fn validate_rejects_bad_url_and_zero_timeout() {
        let mut cfg = RelayConfig::default();
        cfg.site.base_url = "ftp://example.com".into();
        let err = validate(&cfg).expect_err("bad url");
        assert!(matches!(
            err.downcast_ref::<RelayError>(),
            Some(RelayError::Configuration(_))
        ));

        let mut cfg = RelayConfig::default();
        cfg.site.request_timeout_secs = 0;
        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn session_file_is_trimmed_and_blank_file_rejected() {
        let tmp = tempdir().expect("tempdir");
        let paths = RelayPaths::under(tmp.path());
        fs::create_dir_all(&paths.data_dir).expect("mkdir data");

        fs::write(&paths.session_file, "  \n").expect("write blank");
        if std::env::var("AOC_SESSION").is_err() {
            assert!(load_session_token(&paths).is_err());
            fs::write(&paths.session_file, "abc123\n").expect("write token");
            assert_eq!(load_session_token(&paths).expect("token"), "abc123");
        }
    }
}
