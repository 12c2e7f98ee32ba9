use crate::relay::clock::Clock;
use anyhow::{Context, Result};
use chrono::{Duration, NaiveDateTime};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DEFAULT_COOLDOWN_SECS: i64 = 30;

/// What the gate saw on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// No record on disk.
    Clear,
    /// A record exists but its deadline has passed (or it is unreadable).
    Expired,
    Active {
        deadline: NaiveDateTime,
        remaining: Duration,
    },
}

/// Parse `<m>m <s>s` or `<s>s`. Anything else yields the 30 second default.
pub fn parse_wait(text: &str) -> Duration {
    static WAIT_RE: OnceLock<Regex> = OnceLock::new();
    let re = WAIT_RE
        .get_or_init(|| Regex::new(r"^(?:(\d+)m\s*)?(\d+)s$").expect("valid regex"));

    let Some(caps) = re.captures(text.trim()) else {
        return Duration::seconds(DEFAULT_COOLDOWN_SECS);
    };
    let mins = caps
        .get(1)
        .and_then(|m| m.as_str().parse::<i64>().ok())
        .unwrap_or(0);
    let Some(secs) = caps.get(2).and_then(|m| m.as_str().parse::<i64>().ok()) else {
        return Duration::seconds(DEFAULT_COOLDOWN_SECS);
    };
    Duration::seconds(mins.saturating_mul(60).saturating_add(secs))
}

/// Render a remaining wait the way the site phrases it.
pub fn format_remaining(remaining: Duration) -> String {
    let total = remaining.num_seconds().max(0);
    let (mins, secs) = (total / 60, total % 60);
    if mins > 0 {
        format!("{mins}m {secs}s")
    } else {
        format!("{secs}s")
    }
}

/// File-backed, process-wide submission lock. The file holds one local
/// timestamp; no file means no cooldown. Expiry is lazy: a stale record is
/// only removed when someone looks at it.
#[derive(Debug, Clone)]
pub struct CooldownGate {
    path: PathBuf,
}

impl CooldownGate {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn check(&self, clock: &dyn Clock) -> Result<GateState> {
        if !self.path.exists() {
            return Ok(GateState::Clear);
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let deadline = match NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT) {
            Ok(deadline) => deadline,
            Err(err) => {
                tracing::warn!(
                    "cooldown record {} is unreadable ({err}), treating it as expired",
                    self.path.display()
                );
                return Ok(GateState::Expired);
            }
        };

        let now = clock.now();
        if now > deadline {
            return Ok(GateState::Expired);
        }
        Ok(GateState::Active {
            deadline,
            remaining: deadline - now,
        })
    }

    pub fn is_released(&self, clock: &dyn Clock) -> Result<bool> {
        Ok(!matches!(self.check(clock)?, GateState::Active { .. }))
    }

    /// Start a cooldown from the site's wait text and persist its deadline.
    pub fn arm(&self, wait_text: &str, clock: &dyn Clock) -> Result<NaiveDateTime> {
        let deadline = clock.now() + parse_wait(wait_text);
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&self.path, deadline.format(TIMESTAMP_FORMAT).to_string())
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        tracing::debug!(deadline = %deadline, "cooldown armed");
        Ok(deadline)
    }

    pub fn release(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => {
                Err(err).with_context(|| format!("failed to remove {}", self.path.display()))
            }
        }
    }

    /// `check` plus cleanup: an expired record is deleted before returning.
    pub fn observe(&self, clock: &dyn Clock) -> Result<GateState> {
        let state = self.check(clock)?;
        if state == GateState::Expired {
            tracing::warn!("cooldown released, deleting {}", self.path.display());
            self.release()?;
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::clock::FixedClock;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 12, 5)
            .and_then(|d| d.and_hms_opt(h, m, s))
            .expect("valid time")
    }

    #[test]
    fn parse_wait_accepts_minutes_and_seconds() {
        assert_eq!(parse_wait("2m 5s"), Duration::seconds(125));
        assert_eq!(parse_wait("45s"), Duration::seconds(45));
        assert_eq!(parse_wait(" 1m 30s "), Duration::seconds(90));
        assert_eq!(parse_wait("soon"), Duration::seconds(30));
        assert_eq!(parse_wait(""), Duration::seconds(30));
    }

    #[test]
    fn arm_persists_deadline_in_local_format() {
        let tmp = tempdir().expect("tempdir");
        let gate = CooldownGate::new(&tmp.path().join("data/spam_blocker"));
        let clock = FixedClock(at(6, 0, 0));

        let deadline = gate.arm("2m 5s", &clock).expect("arm");
        assert_eq!(deadline, at(6, 2, 5));
        assert_eq!(
            fs::read_to_string(gate.path()).expect("read"),
            "2023-12-05 06:02:05"
        );

        gate.arm("garbled", &clock).expect("arm default");
        assert_eq!(
            fs::read_to_string(gate.path()).expect("read"),
            "2023-12-05 06:00:30"
        );
    }

    #[test]
    fn future_record_blocks_past_record_is_removed() {
        let tmp = tempdir().expect("tempdir");
        let gate = CooldownGate::new(&tmp.path().join("spam_blocker"));
        assert_eq!(
            gate.check(&FixedClock(at(6, 0, 0))).expect("check"),
            GateState::Clear
        );

        gate.arm("1m 0s", &FixedClock(at(6, 0, 0))).expect("arm");
        let before = FixedClock(at(6, 0, 20));
        assert!(!gate.is_released(&before).expect("released?"));
        assert_eq!(
            gate.check(&before).expect("check"),
            GateState::Active {
                deadline: at(6, 1, 0),
                remaining: Duration::seconds(40),
            }
        );

        let after = FixedClock(at(6, 1, 1));
        assert!(gate.is_released(&after).expect("released?"));
        assert!(gate.path().exists());
        assert_eq!(gate.observe(&after).expect("observe"), GateState::Expired);
        assert!(!gate.path().exists());
    }

    #[test]
    fn unreadable_record_counts_as_expired() {
        let tmp = tempdir().expect("tempdir");
        let gate = CooldownGate::new(&tmp.path().join("spam_blocker"));
        fs::write(gate.path(), "tomorrow-ish").expect("write");
        assert_eq!(
            gate.observe(&FixedClock(at(0, 0, 0))).expect("observe"),
            GateState::Expired
        );
        assert!(!gate.path().exists());
    }

    #[test]
    fn remaining_is_rendered_like_the_site() {
        assert_eq!(format_remaining(Duration::seconds(90)), "1m 30s");
        assert_eq!(format_remaining(Duration::seconds(9)), "9s");
    }
}
