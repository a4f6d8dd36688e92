//! Analysis policy configuration.
//!
//! Look-back length, cone width and snap threshold are calibration choices,
//! so every one of them is exposed here rather than hard-coded.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::MetricFamily;
use crate::error::{AnalysisError, Result};

/// Weights of the scored signal families. Must sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub reaction: f64,
    pub snap: f64,
    pub hs_consistency: f64,
    pub accuracy: f64,
    pub smoke_kills: f64,
}

/// Tunables for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Server tick rate in Hz. `None` detects it from the tick table.
    pub tick_rate: Option<f64>,
    /// Full aperture of the sight cone in degrees.
    pub fov_cone_deg: f64,
    pub eye_height: f64,
    pub lookback_secs: f64,
    /// Track only the first damage per attacker/victim pair per round.
    pub first_contact_only: bool,
    pub retaliation_window_secs: f64,
    pub min_retaliation_ms: f64,
    pub snap_window_ticks: u32,
    pub snap_threshold_deg_s: f64,
    /// Consecutive samples further apart than this many nominal ticks are not paired.
    pub gap_tolerance: f64,
    pub min_kills: u32,
    pub min_shots: u32,
    pub min_rounds_for_variance: u32,
    pub weights: ScoreWeights,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            reaction: WEIGHT_REACTION,
            snap: WEIGHT_SNAP,
            hs_consistency: WEIGHT_HS_CONSISTENCY,
            accuracy: WEIGHT_ACCURACY,
            smoke_kills: WEIGHT_SMOKE,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            tick_rate: None,
            fov_cone_deg: FOV_CONE_DEG,
            eye_height: EYE_HEIGHT,
            lookback_secs: LOOKBACK_SECS,
            first_contact_only: true,
            retaliation_window_secs: RETALIATION_WINDOW_SECS,
            min_retaliation_ms: MIN_RETALIATION_MS,
            snap_window_ticks: SNAP_WINDOW_TICKS,
            snap_threshold_deg_s: SNAP_THRESHOLD_DEG_S,
            gap_tolerance: GAP_TOLERANCE,
            min_kills: MIN_KILLS,
            min_shots: MIN_SHOTS,
            min_rounds_for_variance: MIN_ROUNDS_FOR_VARIANCE,
            weights: ScoreWeights::default(),
        }
    }
}

impl ScoreWeights {
    pub fn get(&self, family: MetricFamily) -> f64 {
        match family {
            MetricFamily::Reaction => self.reaction,
            MetricFamily::Snap => self.snap,
            MetricFamily::HeadshotConsistency => self.hs_consistency,
            MetricFamily::Accuracy => self.accuracy,
            MetricFamily::SmokeKills => self.smoke_kills,
        }
    }

    pub fn total(&self) -> f64 {
        MetricFamily::ALL.iter().map(|&f| self.get(f)).sum()
    }
}

impl AnalysisConfig {
    /// Half-angle of the sight cone in degrees.
    pub fn fov_half_angle_deg(&self) -> f64 {
        self.fov_cone_deg / 2.0
    }

    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: AnalysisConfig = serde_json::from_str(json)
            .map_err(|e| AnalysisError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the analysis meaningless.
    pub fn validate(&self) -> Result<()> {
        if let Some(rate) = self.tick_rate {
            positive("tick_rate", rate)?;
        }
        positive("fov_cone_deg", self.fov_cone_deg)?;
        if self.fov_cone_deg > 360.0 {
            return Err(AnalysisError::InvalidConfig(format!(
                "fov_cone_deg must be at most 360, got {}",
                self.fov_cone_deg
            )));
        }
        if !self.eye_height.is_finite() {
            return Err(AnalysisError::InvalidConfig(
                "eye_height must be finite".into(),
            ));
        }
        positive("lookback_secs", self.lookback_secs)?;
        positive("retaliation_window_secs", self.retaliation_window_secs)?;
        non_negative("min_retaliation_ms", self.min_retaliation_ms)?;
        positive("snap_threshold_deg_s", self.snap_threshold_deg_s)?;
        if self.gap_tolerance < 1.0 || !self.gap_tolerance.is_finite() {
            return Err(AnalysisError::InvalidConfig(format!(
                "gap_tolerance must be at least 1, got {}",
                self.gap_tolerance
            )));
        }
        if self.snap_window_ticks == 0 {
            return Err(AnalysisError::InvalidConfig(
                "snap_window_ticks must be at least 1".into(),
            ));
        }

        for family in MetricFamily::ALL {
            non_negative("weight", self.weights.get(family))?;
        }
        let total = self.weights.total();
        if (total - 1.0).abs() > 1e-6 {
            return Err(AnalysisError::InvalidConfig(format!(
                "score weights must sum to 1, got {total}"
            )));
        }
        Ok(())
    }
}

fn positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(AnalysisError::InvalidConfig(format!(
            "{name} must be positive, got {value}"
        )))
    }
}

fn non_negative(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(AnalysisError::InvalidConfig(format!(
            "{name} must be non-negative, got {value}"
        )))
    }
}
