use crate::relay::answer::StoredAnswer;
use crate::relay::input_cache::Fingerprint;
use crate::relay::puzzle::Part;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum LedgerValue {
    Typed(StoredAnswer),
    Legacy(String),
}

impl From<LedgerValue> for StoredAnswer {
    fn from(value: LedgerValue) -> Self {
        match value {
            LedgerValue::Typed(stored) => stored,
            LedgerValue::Legacy(text) => StoredAnswer::from_legacy(&text),
        }
    }
}

pub fn entry_key(fingerprint: &Fingerprint, part: Part) -> String {
    format!("{fingerprint}_{}", part.level())
}

fn read_entries(path: &Path) -> Result<BTreeMap<String, StoredAnswer>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let raw =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    if raw.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    let parsed: BTreeMap<String, LedgerValue> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(parsed
        .into_iter()
        .map(|(key, value)| (key, StoredAnswer::from(value)))
        .collect())
}

/// Previously accepted answers keyed by `{fingerprint}_{part}`.
///
/// Loaded once, mutated in memory, written back once. If the owner never
/// calls [`Ledger::flush`], dropping the ledger writes it instead, so error
/// paths keep what was recorded before they bailed out.
#[derive(Debug)]
pub struct Ledger {
    path: PathBuf,
    entries: BTreeMap<String, StoredAnswer>,
    flushed: bool,
}

impl Ledger {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            fs::write(path, "{}\n")
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        Ok(Self {
            path: path.to_path_buf(),
            entries: read_entries(path)?,
            flushed: false,
        })
    }

    /// Read-only view: never creates the file and never writes it back.
    pub fn inspect(path: &Path) -> Result<Self> {
        Ok(Self {
            path: path.to_path_buf(),
            entries: read_entries(path)?,
            flushed: true,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(&self, fingerprint: &Fingerprint, part: Part) -> Option<&StoredAnswer> {
        self.entries.get(&entry_key(fingerprint, part))
    }

    pub fn record(&mut self, fingerprint: &Fingerprint, part: Part, answer: StoredAnswer) {
        self.entries.insert(entry_key(fingerprint, part), answer);
    }

    /// Serialize the whole mapping, replacing the file atomically.
    pub fn flush(&mut self) -> Result<()> {
        self.write_to_disk()?;
        self.flushed = true;
        Ok(())
    }

    fn write_to_disk(&self) -> Result<()> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;

        let data = serde_json::to_string_pretty(&self.entries)?;
        let mut tmp = tempfile::NamedTempFile::new_in(parent)
            .with_context(|| format!("failed to stage ledger in {}", parent.display()))?;
        tmp.write_all(format!("{data}\n").as_bytes())?;
        tmp.persist(&self.path)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }
}

impl Drop for Ledger {
    fn drop(&mut self) {
        if self.flushed {
            return;
        }
        match self.write_to_disk() {
            Ok(()) => tracing::debug!(path = %self.path.display(), "ledger flushed on drop"),
            Err(err) => tracing::error!("failed to flush answer ledger: {err:#}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::answer::{Answer, AnswerKind};
    use tempfile::tempdir;

    fn fp(s: &str) -> Fingerprint {
        Fingerprint::of(s.as_bytes())
    }

    #[test]
    fn load_creates_empty_mapping_file() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("data/answers.json");
        let ledger = Ledger::load(&path).expect("load");
        assert!(ledger.is_empty());
        assert_eq!(fs::read_to_string(&path).expect("read"), "{}\n");
    }

    #[test]
    fn record_then_flush_persists_pretty_json() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("answers.json");
        let input = fp("1\n2\n3\n");

        let mut ledger = Ledger::load(&path).expect("load");
        ledger.record(&input, Part::One, StoredAnswer::from(&Answer::from(6)));
        ledger.flush().expect("flush");

        let raw = fs::read_to_string(&path).expect("read");
        assert!(raw.ends_with("}\n"));
        let value: serde_json::Value = serde_json::from_str(&raw).expect("json");
        let key = entry_key(&input, Part::One);
        assert_eq!(value[&key]["answer"], "6");
        assert_eq!(value[&key]["kind"], "integer");

        let reloaded = Ledger::load(&path).expect("reload");
        assert_eq!(
            reloaded.lookup(&input, Part::One).map(|s| s.answer.as_str()),
            Some("6")
        );
        assert!(reloaded.lookup(&input, Part::Two).is_none());
    }

    #[test]
    fn drop_without_flush_still_writes() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("answers.json");
        let input = fp("abc");
        {
            let mut ledger = Ledger::load(&path).expect("load");
            ledger.record(&input, Part::Two, StoredAnswer::from(&Answer::from("XYZ")));
        }
        let reloaded = Ledger::load(&path).expect("reload");
        let stored = reloaded.lookup(&input, Part::Two).expect("entry");
        assert_eq!(stored.kind, AnswerKind::Text);
    }

    #[test]
    fn legacy_plain_string_values_are_read() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("answers.json");
        let input = fp("legacy");
        let key = entry_key(&input, Part::One);
        fs::write(&path, format!("{{\n    \"{key}\": \"1337\"\n}}\n")).expect("write");

        let ledger = Ledger::load(&path).expect("load");
        let stored = ledger.lookup(&input, Part::One).expect("entry");
        assert_eq!(stored.answer, "1337");
        assert_eq!(stored.kind, AnswerKind::Integer);
    }

    #[test]
    fn inspect_does_not_create_or_write() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("answers.json");
        {
            let ledger = Ledger::inspect(&path).expect("inspect");
            assert!(ledger.is_empty());
        }
        assert!(!path.exists());
    }

    #[test]
    fn other_fingerprint_misses() {
        let tmp = tempdir().expect("tempdir");
        let mut ledger = Ledger::load(&tmp.path().join("answers.json")).expect("load");
        ledger.record(&fp("old"), Part::One, StoredAnswer::from(&Answer::from(1)));
        assert!(ledger.lookup(&fp("new"), Part::One).is_none());
    }
}
