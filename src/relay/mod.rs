pub mod answer;
pub mod browser;
pub mod classify;
pub mod client;
pub mod clock;
pub mod config;
pub mod cooldown;
pub mod input_cache;
pub mod journal;
pub mod ledger;
pub mod paths;
pub mod puzzle;
pub mod scaffold;
pub mod session;
pub mod views;
