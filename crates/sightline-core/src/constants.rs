//! Default policy constants. Every value here is overridable through
//! [`AnalysisConfig`](crate::config::AnalysisConfig).

// --- Timing ---

/// Matchmaking server tick rate (Hz).
pub const TICK_RATE_MATCHMAKING: f64 = 64.0;

/// Third-party league server tick rate (Hz).
pub const TICK_RATE_HIGH: f64 = 128.0;

/// Measured rates at or above this are treated as high tick rate.
pub const TICK_RATE_HIGH_THRESHOLD: f64 = 100.0;

/// A pair of ticks further apart than this many nominal tick durations is a gap.
pub const GAP_TOLERANCE: f64 = 1.5;

// --- Field of view ---

/// Full aperture of the "actually saw the enemy" cone (degrees).
pub const FOV_CONE_DEG: f64 = 80.0;

/// Standing eye offset above the player origin (engine units).
pub const EYE_HEIGHT: f64 = 64.0;

/// How far back to search for the moment the target became visible (seconds).
pub const LOOKBACK_SECS: f64 = 3.0;

// --- Retaliation ---

/// Follow-up window in which damage dealt back counts as retaliation (seconds).
pub const RETALIATION_WINDOW_SECS: f64 = 4.0;

/// Retaliations faster than this are implausible pairings (ms). Three ticks at 64 Hz.
pub const MIN_RETALIATION_MS: f64 = 3.0 / TICK_RATE_MATCHMAKING * 1000.0;

// --- Aim snaps ---

/// Ticks of view history examined before each kill.
pub const SNAP_WINDOW_TICKS: u32 = 8;

/// Angular velocity above which a pre-kill flick counts as a snap (deg/s).
pub const SNAP_THRESHOLD_DEG_S: f64 = 1000.0;

// --- Sample thresholds ---

/// Kills required before headshot and smoke ratios are defined.
pub const MIN_KILLS: u32 = 5;

/// Firearm shots required before accuracy is defined.
pub const MIN_SHOTS: u32 = 30;

/// Rounds with at least one kill required before HS variance is defined.
pub const MIN_ROUNDS_FOR_VARIANCE: u32 = 2;

// --- Score weights (sum to 1) ---

pub const WEIGHT_REACTION: f64 = 0.30;
pub const WEIGHT_SNAP: f64 = 0.20;
pub const WEIGHT_HS_CONSISTENCY: f64 = 0.20;
pub const WEIGHT_ACCURACY: f64 = 0.15;
pub const WEIGHT_SMOKE: f64 = 0.15;

// --- Normalization reference scales ---

/// Average sight-to-fire at or below this saturates the reaction sub-score (ms).
pub const SIGHT_TO_FIRE_AVG_FAST_MS: f64 = 100.0;
/// Average sight-to-fire at or above this contributes nothing (ms).
pub const SIGHT_TO_FIRE_AVG_SLOW_MS: f64 = 400.0;

pub const SIGHT_TO_FIRE_MIN_FAST_MS: f64 = 50.0;
pub const SIGHT_TO_FIRE_MIN_SLOW_MS: f64 = 250.0;

pub const RETALIATION_AVG_FAST_MS: f64 = 120.0;
pub const RETALIATION_AVG_SLOW_MS: f64 = 400.0;

/// Snap count at which the snap-count sub-score saturates.
pub const SNAP_COUNT_SATURATION: f64 = 3.0;

/// Headshot rate ramp (fraction of kills).
pub const HS_RATE_LOW: f64 = 0.35;
pub const HS_RATE_HIGH: f64 = 0.85;

/// Per-round HS variance ramp. Lower variance is more suspicious.
pub const HS_VARIANCE_HUMAN: f64 = 0.08;
pub const HS_VARIANCE_SCRIPTED: f64 = 0.005;

/// Share of the HS family carried by the raw rate vs. round-to-round consistency.
pub const HS_RATE_SHARE: f64 = 0.6;
pub const HS_CONSISTENCY_SHARE: f64 = 0.4;

pub const ACCURACY_LOW: f64 = 0.25;
pub const ACCURACY_HIGH: f64 = 0.60;

pub const SMOKE_RATIO_LOW: f64 = 0.05;
pub const SMOKE_RATIO_HIGH: f64 = 0.30;

// --- Flags ---

/// Sub-score at or above which a human-readable flag is raised.
pub const FLAG_SUBSCORE: f64 = 0.75;

/// Maximum per-engagement samples kept in a report list.
pub const MAX_REPORTED_SAMPLES: usize = 50;
