//! Advent of Code input cache and answer relay.
//!
//! [`relay::session::Session`] is the entry point: it fetches (or reuses)
//! the puzzle input, and submits answers while deduplicating against the
//! answer ledger and honouring the site's rate-limit cooldown.

pub mod env_loader;
pub mod error;
pub mod logging;
pub mod relay;

pub use error::RelayError;
