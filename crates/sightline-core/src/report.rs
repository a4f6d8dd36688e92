//! Per-player metric records, the final artifact of an analysis.
//!
//! Every optional metric serializes as `null` when its sample was too small,
//! so consumers can tell "no data" from a clean zero.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::enums::SuspicionLevel;
use crate::types::PlayerId;

/// All computed metrics for one player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerReport {
    pub player_id: PlayerId,
    pub kills: u32,
    pub deaths: u32,
    /// Firearm shots fired.
    pub shots: u32,
    pub engagements: EngagementCounts,

    // --- Field-of-view timing ---
    pub fov_sight_to_fire_avg_ms: Option<f64>,
    pub fov_sight_to_fire_min_ms: Option<f64>,
    pub fov_sight_to_damage_avg_ms: Option<f64>,
    pub fov_fire_to_damage_avg_ms: Option<f64>,
    /// Sight-to-fire samples, capped for display.
    pub sight_to_fire_samples_ms: Vec<f64>,

    // --- Retaliation ---
    pub reaction_avg_ms: Option<f64>,
    pub reaction_min_ms: Option<f64>,
    pub reaction_samples_ms: Vec<f64>,

    /// Mean time from round start to first damage dealt.
    pub ttd_avg_ms: Option<f64>,

    // --- Consistency & accuracy ---
    pub hs_rate: Option<f64>,
    pub hs_round_variance: Option<f64>,
    pub accuracy: Option<f64>,
    pub smoke_kill_ratio: Option<f64>,
    pub smoke_kills: u32,

    // --- Aim snaps ---
    pub max_snap_velocity_deg_s: Option<f64>,
    pub avg_snap_velocity_deg_s: Option<f64>,
    pub snap_count: Option<u32>,
    /// Per-kill peak angular velocity, for histogramming.
    pub snap_velocities_deg_s: Vec<f64>,

    // --- Verdict ---
    pub suspicion_score: u8,
    pub suspicion_level: SuspicionLevel,
    pub flags: Vec<Flag>,
    pub diagnostics: Diagnostics,
}

/// How the field-of-view search classified a player's engagements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementCounts {
    pub total: u32,
    pub tracked: u32,
    pub pre_aim: u32,
    pub untracked: u32,
    pub invalid: u32,
}

/// Data points dropped by internal consistency checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Durations that came out negative and were discarded.
    pub discarded_negative_durations: u32,
    /// Retaliations below the plausibility floor.
    pub discarded_implausible_retaliations: u32,
    /// View samples not paired because of a gap in the tick stream.
    pub skipped_snap_gaps: u32,
}

/// A strongly anomalous sub-signal, for display next to the score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Flag {
    FastSightToFire { avg_ms: f64 },
    FastMinimumSightToFire { min_ms: f64 },
    FastRetaliation { avg_ms: f64 },
    AimSnap { max_deg_s: f64, count: u32 },
    HeadshotRate { rate: f64 },
    HeadshotConsistency { variance: f64 },
    Accuracy { accuracy: f64 },
    SmokeKills { ratio: f64, count: u32 },
}

/// Result for one player: a report, or the reason their data was rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PlayerOutcome {
    Analyzed(Box<PlayerReport>),
    Failed { error: String },
}

/// Analysis output for a whole match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub tick_rate: f64,
    pub total_rounds: u32,
    pub players: BTreeMap<PlayerId, PlayerOutcome>,
}

impl PlayerOutcome {
    pub fn report(&self) -> Option<&PlayerReport> {
        match self {
            PlayerOutcome::Analyzed(report) => Some(report),
            PlayerOutcome::Failed { .. } => None,
        }
    }
}

impl MatchReport {
    pub fn report(&self, player: PlayerId) -> Option<&PlayerReport> {
        self.players.get(&player).and_then(PlayerOutcome::report)
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Flag::FastSightToFire { avg_ms } => {
                write!(f, "Inhuman avg sight-to-fire: {avg_ms:.0}ms")
            }
            Flag::FastMinimumSightToFire { min_ms } => {
                write!(f, "Suspicious min sight-to-fire: {min_ms:.0}ms")
            }
            Flag::FastRetaliation { avg_ms } => {
                write!(f, "Very fast avg retaliation: {avg_ms:.0}ms")
            }
            Flag::AimSnap { max_deg_s, count } => {
                write!(f, "Aim snap detected: {count} kills, peak {max_deg_s:.0}\u{b0}/s")
            }
            Flag::HeadshotRate { rate } => {
                write!(f, "Abnormal HS rate: {:.0}%", rate * 100.0)
            }
            Flag::HeadshotConsistency { variance } => {
                write!(f, "Unnatural HS consistency (variance: {variance:.3})")
            }
            Flag::Accuracy { accuracy } => {
                write!(f, "Abnormal accuracy: {:.0}%", accuracy * 100.0)
            }
            Flag::SmokeKills { ratio, count } => {
                write!(f, "Suspicious smoke kills: {count} ({:.0}%)", ratio * 100.0)
            }
        }
    }
}
