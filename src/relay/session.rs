use crate::error::RelayError;
use crate::relay::answer::{Answer, StoredAnswer};
use crate::relay::classify::{SubmissionOutcome, classify};
use crate::relay::client::{SiteClient, Transport};
use crate::relay::clock::{Clock, SystemClock};
use crate::relay::config::{RelayConfig, load_config, load_session_token};
use crate::relay::cooldown::{CooldownGate, GateState, TIMESTAMP_FORMAT, format_remaining};
use crate::relay::input_cache::{Fingerprint, InputCache, PuzzleInput};
use crate::relay::journal::{self, SubmissionEvent};
use crate::relay::ledger::Ledger;
use crate::relay::paths::RelayPaths;
use crate::relay::puzzle::{Part, PuzzleKey};
use anyhow::Result;
use std::path::PathBuf;

/// Everything one run needs, built once at startup and passed around
/// explicitly. Owns the ledger, so it is written back exactly once: by
/// [`Session::close`], or on drop when a fatal error cut the run short.
pub struct Session<T: Transport, C: Clock> {
    key: PuzzleKey,
    transport: T,
    clock: C,
    cache: InputCache,
    ledger: Ledger,
    gate: CooldownGate,
    journal_file: PathBuf,
    input: Option<PuzzleInput>,
}

impl Session<SiteClient, SystemClock> {
    /// Session against the real site using the configured paths and
    /// credential. Fails before any request if the credential is missing.
    pub fn connect(key: PuzzleKey, paths: &RelayPaths) -> Result<Self> {
        let config: RelayConfig = load_config(paths)?;
        let token = load_session_token(paths)?;
        let client = SiteClient::new(&config.site, &token)?;
        Self::open(key, paths, client, SystemClock)
    }
}

impl<T: Transport, C: Clock> Session<T, C> {
    pub fn open(key: PuzzleKey, paths: &RelayPaths, transport: T, clock: C) -> Result<Self> {
        let ledger = Ledger::load(&paths.ledger_file)?;
        Ok(Self {
            key,
            transport,
            clock,
            cache: InputCache::new(&paths.inputs_dir),
            ledger,
            gate: CooldownGate::new(&paths.cooldown_file),
            journal_file: paths.journal_file.clone(),
            input: None,
        })
    }

    pub fn key(&self) -> PuzzleKey {
        self.key
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn gate(&self) -> &CooldownGate {
        &self.gate
    }

    /// Input for this puzzle, fetched or read from cache on first use.
    pub fn input(&mut self) -> Result<&PuzzleInput> {
        if self.input.is_none() {
            let loaded = self.cache.fetch(&self.key, &self.transport)?;
            self.input = Some(loaded);
        }
        self.loaded_input()
    }

    /// Re-download the input; the fingerprint follows the new bytes.
    pub fn refresh_input(&mut self) -> Result<&PuzzleInput> {
        let loaded = self.cache.refresh(&self.key, &self.transport)?;
        self.input = Some(loaded);
        self.loaded_input()
    }

    fn loaded_input(&self) -> Result<&PuzzleInput> {
        self.input
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("input for {} not loaded", self.key))
    }

    pub fn fingerprint(&mut self) -> Result<Fingerprint> {
        Ok(self.input()?.fingerprint.clone())
    }

    /// Submit `answer` for `part`. Returns whether the site (or the ledger)
    /// says it is correct. Rate limits and unrecognised responses are
    /// errors; the caller is expected to stop and rerun later.
    pub fn submit(&mut self, part: Part, answer: impl Into<Answer>) -> Result<bool> {
        let answer = answer.into();

        match self.gate.observe(&self.clock)? {
            GateState::Active { remaining, .. } => {
                let wait = format_remaining(remaining);
                tracing::warn!("spam blocker is active for {wait}, not posting answer");
                return Err(RelayError::RateLimited { wait }.into());
            }
            GateState::Expired | GateState::Clear => {}
        }

        let fingerprint = self.fingerprint()?;
        if let Some(stored) = self.ledger.lookup(&fingerprint, part) {
            let matches = answer.matches(stored);
            tracing::warn!(
                "answer already posted, checking against ledger: {}",
                if matches { "correct" } else { "incorrect" }
            );
            return Ok(matches);
        }

        let body = self
            .transport
            .post_answer(&self.key, part, &answer.to_string())?;
        let outcome = classify(&body);
        self.journal(part, &answer, &outcome);

        match outcome {
            SubmissionOutcome::Correct => {
                tracing::info!("posted the correct answer for {} part {part}", self.key);
                self.ledger
                    .record(&fingerprint, part, StoredAnswer::from(&answer));
                Ok(true)
            }
            SubmissionOutcome::AlreadyCompleted => {
                tracing::info!("{} part {part} was already completed", self.key);
                Ok(true)
            }
            SubmissionOutcome::Incorrect => {
                tracing::info!(
                    "posted a wrong answer for {} part {part}, wait a while and try again",
                    self.key
                );
                Ok(false)
            }
            SubmissionOutcome::RateLimited { wait } => {
                let deadline = self.gate.arm(&wait, &self.clock)?;
                tracing::warn!(
                    "answer given too recently, blocked until {}",
                    deadline.format(TIMESTAMP_FORMAT)
                );
                Err(RelayError::RateLimited { wait }.into())
            }
            SubmissionOutcome::Unknown { raw } => Err(RelayError::UnknownResponse(raw).into()),
        }
    }

    fn journal(&self, part: Part, answer: &Answer, outcome: &SubmissionOutcome) {
        let detail = match outcome {
            SubmissionOutcome::RateLimited { wait } => Some(wait.clone()),
            _ => None,
        };
        let event = SubmissionEvent {
            at: self.clock.now().format(TIMESTAMP_FORMAT).to_string(),
            year: self.key.year(),
            day: self.key.day(),
            part: part.level(),
            answer: answer.to_string(),
            outcome: outcome.label().to_string(),
            detail,
        };
        if let Err(err) = journal::append_event(&self.journal_file, &event) {
            tracing::warn!("failed to journal submission: {err:#}");
        }
    }

    /// Orderly shutdown: write the ledger back.
    pub fn close(mut self) -> Result<()> {
        self.ledger.flush()
    }
}
