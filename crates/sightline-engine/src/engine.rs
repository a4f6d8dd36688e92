//! Match analyzer, the entry point of the engine.
//!
//! `MatchAnalyzer` builds the tick store once, then runs every metric pass
//! for each player in parallel over the shared read-only store. Completely
//! pure (no I/O, no clock, no RNG), so identical input gives identical output.

use std::collections::BTreeMap;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use sightline_core::config::AnalysisConfig;
use sightline_core::constants::MAX_REPORTED_SAMPLES;
use sightline_core::enums::EngagementStatus;
use sightline_core::error::Result;
use sightline_core::input::MatchData;
use sightline_core::report::{EngagementCounts, MatchReport, PlayerOutcome, PlayerReport};
use sightline_core::types::PlayerId;

use crate::engagement::EngagementWindow;
use crate::stats;
use crate::store::TickStore;
use crate::systems;

/// Runs the full signal-extraction and scoring pipeline on parsed matches.
#[derive(Debug, Clone, Default)]
pub struct MatchAnalyzer {
    config: AnalysisConfig,
}

impl MatchAnalyzer {
    /// Create an analyzer, rejecting configs that would make the metrics meaningless.
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze one match.
    ///
    /// Fails only when the tick store itself is inconsistent. Bad data for a
    /// single player yields `PlayerOutcome::Failed` for that player alone.
    pub fn analyze(&self, data: &MatchData) -> Result<MatchReport> {
        let store = TickStore::build(data, &self.config)?;
        let players: Vec<PlayerId> = store.player_ids().collect();

        let outcomes: BTreeMap<PlayerId, PlayerOutcome> = players
            .par_iter()
            .map(|&player| {
                let outcome = match self.analyze_player(&store, player) {
                    Ok(report) => PlayerOutcome::Analyzed(Box::new(report)),
                    Err(error) => {
                        warn!(player, %error, "player analysis failed");
                        PlayerOutcome::Failed {
                            error: error.to_string(),
                        }
                    }
                };
                (player, outcome)
            })
            .collect();

        let report = MatchReport {
            tick_rate: store.tick_rate(),
            total_rounds: store.rounds().len() as u32,
            players: outcomes,
        };
        info!(
            players = report.players.len(),
            rounds = report.total_rounds,
            tick_rate = report.tick_rate,
            "match analyzed"
        );
        Ok(report)
    }

    /// Run every metric pass for one player.
    pub fn analyze_player(&self, store: &TickStore, player: PlayerId) -> Result<PlayerReport> {
        if let Some(fault) = store.fault(player) {
            return Err(fault.clone());
        }
        let config = &self.config;

        // 1. Field-of-view engagement search
        let windows = systems::fov::engagements_for(store, config, player);
        // 2. Sight-anchored reaction times
        let timings = systems::reaction::sight_timings(store, &windows);
        // 3. Retaliation and time-to-damage
        let retaliation = systems::reaction::retaliation_times(store, config, player);
        let ttd = systems::reaction::time_to_damage(store, player);
        // 4. Aim snaps before kills
        let snaps = systems::snap::snaps_for(store, config, player);
        // 5. Headshot, accuracy and smoke ratios
        let counts = systems::consistency::consistency_for(store, config, player);

        let has_snaps = !snaps.velocities_deg_s.is_empty();
        let mut report = PlayerReport {
            player_id: player,
            kills: counts.kills,
            deaths: store.kills().iter().filter(|k| k.victim_id == player).count() as u32,
            shots: counts.shots,
            engagements: engagement_counts(&windows),

            fov_sight_to_fire_avg_ms: stats::mean(&timings.sight_to_fire_ms),
            fov_sight_to_fire_min_ms: stats::min(&timings.sight_to_fire_ms),
            fov_sight_to_damage_avg_ms: stats::mean(&timings.sight_to_damage_ms),
            fov_fire_to_damage_avg_ms: stats::mean(&timings.fire_to_damage_ms),
            sight_to_fire_samples_ms: capped(&timings.sight_to_fire_ms),

            reaction_avg_ms: stats::mean(&retaliation.samples_ms),
            reaction_min_ms: stats::min(&retaliation.samples_ms),
            reaction_samples_ms: capped(&retaliation.samples_ms),

            ttd_avg_ms: stats::mean(&ttd),

            hs_rate: counts.hs_rate,
            hs_round_variance: counts.hs_round_variance,
            accuracy: counts.accuracy,
            smoke_kill_ratio: counts.smoke_kill_ratio,
            smoke_kills: counts.smoke_kills,

            max_snap_velocity_deg_s: stats::max(&snaps.velocities_deg_s),
            avg_snap_velocity_deg_s: stats::mean(&snaps.velocities_deg_s),
            snap_count: has_snaps.then_some(snaps.snap_kills),
            snap_velocities_deg_s: snaps.velocities_deg_s,

            ..Default::default()
        };
        report.diagnostics.discarded_negative_durations =
            timings.discarded_negative + retaliation.discarded_negative;
        report.diagnostics.discarded_implausible_retaliations = retaliation.discarded_implausible;
        report.diagnostics.skipped_snap_gaps = snaps.skipped_gaps;

        // 6. Composite score
        let (score, level) = systems::scoring::score(&report, config);
        report.suspicion_score = score;
        report.suspicion_level = level;
        report.flags = systems::scoring::flags(&report);

        debug!(player, score, ?level, flags = report.flags.len(), "player scored");
        Ok(report)
    }
}

fn engagement_counts(windows: &[EngagementWindow]) -> EngagementCounts {
    let mut counts = EngagementCounts {
        total: windows.len() as u32,
        ..Default::default()
    };
    for window in windows {
        match window.status {
            EngagementStatus::Tracked => counts.tracked += 1,
            EngagementStatus::PreAim => counts.pre_aim += 1,
            EngagementStatus::Untracked => counts.untracked += 1,
            EngagementStatus::Invalid => counts.invalid += 1,
        }
    }
    counts
}

fn capped(samples: &[f64]) -> Vec<f64> {
    samples.iter().take(MAX_REPORTED_SAMPLES).copied().collect()
}
