//! Signal extraction and suspicion scoring for parsed CS2 matches.
//!
//! Indexes one match into a read-only tick store, runs the per-player
//! metric passes in parallel, and produces a `MatchReport`.

pub mod engagement;
pub mod engine;
pub mod stats;
pub mod store;
pub mod systems;

pub use engine::MatchAnalyzer;
pub use sightline_core as core;

#[cfg(test)]
mod tests;
