use crate::relay::client::Transport;
use crate::relay::puzzle::PuzzleKey;
use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Content hash of a cached input. Namespaces ledger entries, so a changed
/// input can never be answered from records made against the old one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Input text together with the fingerprint of exactly these bytes.
#[derive(Debug, Clone)]
pub struct PuzzleInput {
    pub text: String,
    pub fingerprint: Fingerprint,
    pub path: PathBuf,
    pub from_cache: bool,
}

impl PuzzleInput {
    fn from_bytes(path: PathBuf, bytes: Vec<u8>, from_cache: bool) -> Self {
        let fingerprint = Fingerprint::of(&bytes);
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        };
        Self {
            text,
            fingerprint,
            path,
            from_cache,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InputCache {
    dir: PathBuf,
}

impl InputCache {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    pub fn path_for(&self, key: &PuzzleKey) -> PathBuf {
        self.dir.join(key.cache_file_name())
    }

    /// Read the cached input if present, without touching the network.
    pub fn cached(&self, key: &PuzzleKey) -> Result<Option<PuzzleInput>> {
        let path = self.path_for(key);
        if !path.is_file() {
            return Ok(None);
        }
        let bytes = fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
        Ok(Some(PuzzleInput::from_bytes(path, bytes, true)))
    }

    /// Cached input, or download it and store the raw bytes verbatim.
    pub fn fetch(&self, key: &PuzzleKey, transport: &dyn Transport) -> Result<PuzzleInput> {
        if let Some(input) = self.cached(key)? {
            tracing::warn!("using cached input data for {key}");
            return Ok(input);
        }
        self.download(key, transport)
    }

    /// Download even when a cached copy exists.
    pub fn refresh(&self, key: &PuzzleKey, transport: &dyn Transport) -> Result<PuzzleInput> {
        self.download(key, transport)
    }

    fn download(&self, key: &PuzzleKey, transport: &dyn Transport) -> Result<PuzzleInput> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create {}", self.dir.display()))?;
        let bytes = transport.fetch_input(key)?;
        let path = self.path_for(key);
        fs::write(&path, &bytes).with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!("input data for {key} saved to {}", path.display());
        Ok(PuzzleInput::from_bytes(path, bytes, false))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::relay::puzzle::Part;
    use std::cell::{Cell, RefCell};
    use tempfile::tempdir;

    /// Scripted transport: serves `input`, answers posts from `responses`
    /// in order, and counts calls.
    #[derive(Default)]
    pub(crate) struct FakeTransport {
        pub input: RefCell<Vec<u8>>,
        pub responses: RefCell<Vec<String>>,
        pub fetches: Cell<usize>,
        pub posts: RefCell<Vec<(u8, String)>>,
    }

    impl FakeTransport {
        pub fn with_input(input: &str) -> Self {
            let fake = Self::default();
            *fake.input.borrow_mut() = input.as_bytes().to_vec();
            fake
        }

        pub fn respond(&self, body: &str) {
            self.responses.borrow_mut().push(body.to_string());
        }
    }

    impl Transport for FakeTransport {
        fn fetch_input(&self, _key: &PuzzleKey) -> Result<Vec<u8>> {
            self.fetches.set(self.fetches.get() + 1);
            Ok(self.input.borrow().clone())
        }

        fn post_answer(&self, _key: &PuzzleKey, part: Part, answer: &str) -> Result<String> {
            self.posts
                .borrow_mut()
                .push((part.level(), answer.to_string()));
            let mut responses = self.responses.borrow_mut();
            if responses.is_empty() {
                anyhow::bail!("no scripted response left");
            }
            Ok(responses.remove(0))
        }
    }

    fn key() -> PuzzleKey {
        PuzzleKey::new(2023, 1, 2024).expect("key")
    }

    #[test]
    fn first_fetch_downloads_then_cache_is_used() {
        let tmp = tempdir().expect("tempdir");
        let cache = InputCache::new(&tmp.path().join("inputs"));
        let transport = FakeTransport::with_input("1abc2\npqr3stu8vwx\n");

        let first = cache.fetch(&key(), &transport).expect("fetch");
        assert!(!first.from_cache);
        assert_eq!(
            fs::read(tmp.path().join("inputs/2023_01.txt")).expect("cached bytes"),
            b"1abc2\npqr3stu8vwx\n"
        );

        let second = cache.fetch(&key(), &transport).expect("fetch again");
        assert!(second.from_cache);
        assert_eq!(transport.fetches.get(), 1);
        assert_eq!(first.fingerprint, second.fingerprint);
        assert_eq!(second.text, "1abc2\npqr3stu8vwx\n");
    }

    #[test]
    fn changed_bytes_change_fingerprint() {
        let tmp = tempdir().expect("tempdir");
        let cache = InputCache::new(tmp.path());
        let transport = FakeTransport::with_input("old");
        let old = cache.fetch(&key(), &transport).expect("fetch");

        *transport.input.borrow_mut() = b"new".to_vec();
        let new = cache.refresh(&key(), &transport).expect("refresh");
        assert_ne!(old.fingerprint, new.fingerprint);
        assert_eq!(new.fingerprint, Fingerprint::of(b"new"));
    }

    #[test]
    fn fingerprint_is_hex_sha256() {
        assert_eq!(
            Fingerprint::of(b"").as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
