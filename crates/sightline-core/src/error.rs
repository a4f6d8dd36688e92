use thiserror::Error;

use crate::types::PlayerId;

/// Failures surfaced by the analysis.
///
/// Insufficient samples are never errors; they show up as `None` metrics.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    // --- Store-level inconsistencies (fatal for the whole match) ---
    #[error("tick {current} does not follow tick {previous}")]
    NonIncreasingTick { previous: u32, current: u32 },

    #[error("game time goes backwards at tick {tick}: {previous} -> {current}")]
    DecreasingGameTime {
        tick: u32,
        previous: f64,
        current: f64,
    },

    #[error("tick {tick} has non-finite game time {value}")]
    NonFiniteGameTime { tick: u32, value: f64 },

    #[error("round {round} starts at tick {start_tick} after it ends at {end_tick}")]
    InvertedRound {
        round: u32,
        start_tick: u32,
        end_tick: u32,
    },

    #[error("rounds {first} and {second} overlap")]
    OverlappingRounds { first: u32, second: u32 },

    #[error("match has events but no ticks")]
    EmptyTickTable,

    // --- Per-player malformed input ---
    #[error("player {player} is referenced by events but has no snapshots")]
    UnknownPlayer { player: PlayerId },

    #[error("player {player} references tick {tick} which is not in the tick table")]
    UnknownTick { player: PlayerId, tick: u32 },

    #[error("player {player} has more than one snapshot at tick {tick}")]
    DuplicateSnapshot { player: PlayerId, tick: u32 },

    #[error("player {player} has negative health {health} at tick {tick}")]
    NegativeHealth {
        player: PlayerId,
        tick: u32,
        health: i32,
    },

    // --- Configuration ---
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// How far an error reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The whole analysis is aborted.
    Fatal,
    /// Only the named player's computation fails.
    Player(PlayerId),
}

impl AnalysisError {
    pub fn severity(&self) -> Severity {
        match self {
            AnalysisError::UnknownPlayer { player }
            | AnalysisError::UnknownTick { player, .. }
            | AnalysisError::DuplicateSnapshot { player, .. }
            | AnalysisError::NegativeHealth { player, .. } => Severity::Player(*player),
            _ => Severity::Fatal,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
