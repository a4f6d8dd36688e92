//! Suspicion scoring engine.
//!
//! Maps each metric family onto a bounded [0, 1] sub-score with a clamped
//! linear ramp, then takes the weighted mean of the families that are
//! defined. Undefined families drop out and the remaining weights are
//! renormalized, so a low-sample player is never scored on missing data.
//! Everything here is a pure function of the report and the config.

use sightline_core::config::{AnalysisConfig, ScoreWeights};
use sightline_core::constants::*;
use sightline_core::enums::{MetricFamily, SuspicionLevel};
use sightline_core::report::{Flag, PlayerReport};

use crate::stats;

/// Clamped linear ramp: 0 at `zero_at`, 1 at `one_at`.
///
/// Works in either direction: with `zero_at > one_at` smaller values score
/// higher, which is how latencies are scored.
pub fn ramp(value: f64, zero_at: f64, one_at: f64) -> f64 {
    if zero_at == one_at {
        return if value >= one_at { 1.0 } else { 0.0 };
    }
    ((value - zero_at) / (one_at - zero_at)).clamp(0.0, 1.0)
}

/// Normalized score of each family, `None` where the family is undefined.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SubScores {
    pub reaction: Option<f64>,
    pub snap: Option<f64>,
    pub hs_consistency: Option<f64>,
    pub accuracy: Option<f64>,
    pub smoke_kills: Option<f64>,
}

impl SubScores {
    pub fn get(&self, family: MetricFamily) -> Option<f64> {
        match family {
            MetricFamily::Reaction => self.reaction,
            MetricFamily::Snap => self.snap,
            MetricFamily::HeadshotConsistency => self.hs_consistency,
            MetricFamily::Accuracy => self.accuracy,
            MetricFamily::SmokeKills => self.smoke_kills,
        }
    }
}

fn sight_to_fire_avg_score(avg_ms: f64) -> f64 {
    ramp(avg_ms, SIGHT_TO_FIRE_AVG_SLOW_MS, SIGHT_TO_FIRE_AVG_FAST_MS)
}

fn sight_to_fire_min_score(min_ms: f64) -> f64 {
    ramp(min_ms, SIGHT_TO_FIRE_MIN_SLOW_MS, SIGHT_TO_FIRE_MIN_FAST_MS)
}

fn retaliation_score(avg_ms: f64) -> f64 {
    ramp(avg_ms, RETALIATION_AVG_SLOW_MS, RETALIATION_AVG_FAST_MS)
}

fn hs_rate_score(rate: f64) -> f64 {
    ramp(rate, HS_RATE_LOW, HS_RATE_HIGH)
}

fn hs_consistency_score(variance: f64) -> f64 {
    ramp(variance, HS_VARIANCE_HUMAN, HS_VARIANCE_SCRIPTED)
}

fn snap_velocity_score(max_deg_s: f64, threshold: f64) -> f64 {
    ramp(max_deg_s, 0.5 * threshold, 2.0 * threshold)
}

/// Normalize a report's metrics into per-family sub-scores.
pub fn family_subscores(report: &PlayerReport, config: &AnalysisConfig) -> SubScores {
    let reaction_parts: Vec<f64> = [
        report.fov_sight_to_fire_avg_ms.map(sight_to_fire_avg_score),
        report.fov_sight_to_fire_min_ms.map(sight_to_fire_min_score),
        report.reaction_avg_ms.map(retaliation_score),
    ]
    .into_iter()
    .flatten()
    .collect();

    let snap = match (report.snap_count, report.max_snap_velocity_deg_s) {
        (Some(count), Some(max)) => {
            let count_score = ramp(f64::from(count), 0.0, SNAP_COUNT_SATURATION);
            let velocity_score = snap_velocity_score(max, config.snap_threshold_deg_s);
            Some((count_score + velocity_score) / 2.0)
        }
        _ => None,
    };

    let hs_consistency = report.hs_rate.map(|rate| {
        let rate_score = hs_rate_score(rate);
        match report.hs_round_variance {
            Some(variance) => {
                rate_score
                    * (HS_RATE_SHARE + HS_CONSISTENCY_SHARE * hs_consistency_score(variance))
            }
            None => rate_score,
        }
    });

    SubScores {
        reaction: stats::mean(&reaction_parts),
        snap,
        hs_consistency,
        accuracy: report
            .accuracy
            .map(|a| ramp(a, ACCURACY_LOW, ACCURACY_HIGH)),
        smoke_kills: report
            .smoke_kill_ratio
            .map(|r| ramp(r, SMOKE_RATIO_LOW, SMOKE_RATIO_HIGH)),
    }
}

/// Weights of the defined families, rescaled to sum to 1.
///
/// Empty when no family is defined or every defined family has zero weight.
pub fn renormalized_weights(
    subscores: &SubScores,
    weights: &ScoreWeights,
) -> Vec<(MetricFamily, f64)> {
    let defined: Vec<(MetricFamily, f64)> = MetricFamily::ALL
        .into_iter()
        .filter(|&f| subscores.get(f).is_some())
        .map(|f| (f, weights.get(f)))
        .collect();
    let total: f64 = defined.iter().map(|(_, w)| w).sum();
    if total <= 0.0 {
        return Vec::new();
    }
    defined.into_iter().map(|(f, w)| (f, w / total)).collect()
}

/// Weighted composite in [0, 1].
pub fn composite(subscores: &SubScores, weights: &ScoreWeights) -> f64 {
    renormalized_weights(subscores, weights)
        .into_iter()
        .map(|(family, w)| w * subscores.get(family).unwrap_or(0.0))
        .sum::<f64>()
        .clamp(0.0, 1.0)
}

/// Integer score in [0, 100] and its band.
pub fn score(report: &PlayerReport, config: &AnalysisConfig) -> (u8, SuspicionLevel) {
    let subscores = family_subscores(report, config);
    let score = (composite(&subscores, &config.weights) * 100.0).round() as u8;
    (score, SuspicionLevel::from_score(score))
}

/// Human-readable flags for each strongly anomalous sub-signal.
pub fn flags(report: &PlayerReport) -> Vec<Flag> {
    let mut flags = Vec::new();

    if let Some(avg_ms) = report.fov_sight_to_fire_avg_ms {
        if sight_to_fire_avg_score(avg_ms) >= FLAG_SUBSCORE {
            flags.push(Flag::FastSightToFire { avg_ms });
        }
    }
    if let Some(min_ms) = report.fov_sight_to_fire_min_ms {
        if sight_to_fire_min_score(min_ms) >= FLAG_SUBSCORE {
            flags.push(Flag::FastMinimumSightToFire { min_ms });
        }
    }
    if let Some(avg_ms) = report.reaction_avg_ms {
        if retaliation_score(avg_ms) >= FLAG_SUBSCORE {
            flags.push(Flag::FastRetaliation { avg_ms });
        }
    }
    // Any kill over the snap threshold is worth showing.
    if let (Some(count), Some(max_deg_s)) = (report.snap_count, report.max_snap_velocity_deg_s) {
        if count > 0 {
            flags.push(Flag::AimSnap { max_deg_s, count });
        }
    }
    if let Some(rate) = report.hs_rate {
        if hs_rate_score(rate) >= FLAG_SUBSCORE {
            flags.push(Flag::HeadshotRate { rate });
        }
        // Flat round-to-round rates only matter when the rate itself is high.
        if let Some(variance) = report.hs_round_variance {
            if hs_rate_score(rate) > 0.0 && hs_consistency_score(variance) >= FLAG_SUBSCORE {
                flags.push(Flag::HeadshotConsistency { variance });
            }
        }
    }
    if let Some(accuracy) = report.accuracy {
        if ramp(accuracy, ACCURACY_LOW, ACCURACY_HIGH) >= FLAG_SUBSCORE {
            flags.push(Flag::Accuracy { accuracy });
        }
    }
    if let Some(ratio) = report.smoke_kill_ratio {
        if ramp(ratio, SMOKE_RATIO_LOW, SMOKE_RATIO_HIGH) >= FLAG_SUBSCORE {
            flags.push(Flag::SmokeKills {
                ratio,
                count: report.smoke_kills,
            });
        }
    }
    flags
}
