//! Tests for the full analysis pipeline, plus the match fixture builder used
//! by the per-system tests.

use std::ops::Range;

use sightline_core::config::AnalysisConfig;
use sightline_core::enums::*;
use sightline_core::error::AnalysisError;
use sightline_core::events::{DamageEvent, FireEvent, KillEvent, Round};
use sightline_core::input::{MatchData, PlayerSnapshot};
use sightline_core::report::{Flag, PlayerOutcome};
use sightline_core::types::{PlayerId, Position, Tick, ViewAngles};

use crate::engine::MatchAnalyzer;
use crate::systems::scoring;

/// Fluent builder for synthetic matches on a 64 Hz clock.
pub(crate) struct MatchBuilder {
    data: MatchData,
}

impl MatchBuilder {
    /// Ticks `0..tick_count` with no gaps.
    pub(crate) fn new(tick_count: u32) -> Self {
        let ticks = (0..tick_count)
            .map(|i| Tick::new(i, f64::from(i) / 64.0))
            .collect();
        Self {
            data: MatchData {
                ticks,
                ..Default::default()
            },
        }
    }

    pub(crate) fn from_data(data: MatchData) -> Self {
        Self { data }
    }

    pub(crate) fn round(mut self, number: u32, start_tick: u32, end_tick: u32) -> Self {
        self.data.rounds.push(Round {
            number,
            start_tick,
            end_tick,
        });
        self
    }

    /// Player alive and motionless at `pos`, looking level along `yaw`.
    pub(crate) fn stand(
        mut self,
        player: PlayerId,
        ticks: Range<u32>,
        pos: (f64, f64, f64),
        yaw: f64,
    ) -> Self {
        for tick in ticks {
            self.data.snapshots.push(PlayerSnapshot {
                tick,
                player_id: player,
                position: Position::new(pos.0, pos.1, pos.2),
                view: ViewAngles::new(0.0, yaw),
                health: 100,
                is_alive: true,
                active_weapon: WeaponClass::Rifle,
            });
        }
        self
    }

    /// Add a lone snapshot at the origin.
    pub(crate) fn snapshot(self, player: PlayerId, tick: u32, pitch: f64, yaw: f64) -> Self {
        self.stand(player, tick..tick + 1, (0.0, 0.0, 0.0), 0.0)
            .look(player, tick, pitch, yaw)
    }

    /// Change the view of an existing snapshot.
    pub(crate) fn look(mut self, player: PlayerId, tick: u32, pitch: f64, yaw: f64) -> Self {
        if let Some(snap) = self
            .data
            .snapshots
            .iter_mut()
            .find(|s| s.player_id == player && s.tick == tick)
        {
            snap.view = ViewAngles::new(pitch, yaw);
        }
        self
    }

    pub(crate) fn fire(self, shooter: PlayerId, tick: u32, hit: bool) -> Self {
        self.fire_with(shooter, tick, WeaponClass::Rifle, hit)
    }

    pub(crate) fn fire_with(
        mut self,
        shooter: PlayerId,
        tick: u32,
        weapon: WeaponClass,
        hit: bool,
    ) -> Self {
        self.data.fires.push(FireEvent {
            tick,
            shooter_id: shooter,
            weapon,
            hit,
        });
        self
    }

    pub(crate) fn damage(
        mut self,
        attacker: PlayerId,
        victim: PlayerId,
        tick: u32,
        through_smoke: bool,
    ) -> Self {
        self.data.damages.push(DamageEvent {
            tick,
            attacker_id: attacker,
            victim_id: victim,
            amount: 27,
            hitgroup: HitGroup::Chest,
            weapon: WeaponClass::Rifle,
            through_smoke,
        });
        self
    }

    pub(crate) fn kill(
        mut self,
        attacker: PlayerId,
        victim: PlayerId,
        tick: u32,
        headshot: bool,
    ) -> Self {
        self.data.kills.push(KillEvent {
            tick,
            attacker_id: Some(attacker),
            victim_id: victim,
            headshot,
        });
        self
    }

    pub(crate) fn build(self) -> MatchData {
        self.data
    }
}

const ORIGIN: (f64, f64, f64) = (0.0, 0.0, 0.0);
const AHEAD: (f64, f64, f64) = (500.0, 0.0, 0.0);
const SIDE: (f64, f64, f64) = (0.0, 500.0, 0.0);

/// Player 1 peeks six victims over three rounds. Each victim steps into view
/// and is headshot three ticks later after a 30 degree flick, and player 1
/// barely misses a shot all match.
fn aimbot_match() -> MatchData {
    let mut b = MatchBuilder::new(2000)
        .round(1, 0, 399)
        .round(2, 400, 799)
        .round(3, 800, 1199)
        .stand(1, 0..2000, ORIGIN, 0.0);
    let appearances = [(2, 100), (3, 200), (4, 500), (5, 600), (6, 900), (7, 1000)];
    for (victim, t) in appearances {
        b = b
            .stand(victim, 0..t, SIDE, 180.0)
            .stand(victim, t..t + 4, AHEAD, 180.0)
            .look(1, t + 2, 0.0, 30.0)
            .fire(1, t + 3, true)
            .damage(1, victim, t + 3, false)
            .kill(1, victim, t + 3, true);
    }
    for i in 0..30 {
        b = b.fire(1, 1500 + i, i < 28);
    }
    b.build()
}

fn analyze(data: &MatchData) -> sightline_core::report::MatchReport {
    MatchAnalyzer::new(AnalysisConfig::default())
        .unwrap()
        .analyze(data)
        .unwrap()
}

// ---- Scenarios ----

#[test]
fn test_aimbot_profile_scores_high() {
    let report = analyze(&aimbot_match());
    let p = report.report(1).expect("player 1 analyzed");

    assert_eq!(p.kills, 6);
    assert_eq!(p.engagements.tracked, 6);
    assert_eq!(p.engagements.pre_aim, 0);
    let stf = p.fov_sight_to_fire_avg_ms.unwrap();
    assert!((stf - 3000.0 / 64.0).abs() < 1e-9, "stf {stf}");
    assert_eq!(p.hs_rate, Some(1.0));
    assert_eq!(p.hs_round_variance, Some(0.0));
    assert_eq!(p.snap_count, Some(6));
    assert!(p.accuracy.unwrap() > 0.9);

    assert!(p.suspicion_score >= 60, "score {}", p.suspicion_score);
    assert_eq!(p.suspicion_level, SuspicionLevel::High);
    assert!(p.flags.iter().any(|f| matches!(f, Flag::FastSightToFire { .. })));
    assert!(p.flags.iter().any(|f| matches!(f, Flag::AimSnap { .. })));
}

#[test]
fn test_victims_are_clean() {
    let report = analyze(&aimbot_match());
    for victim in 2..=7 {
        let p = report.report(victim).expect("victim analyzed");
        assert_eq!(p.deaths, 1);
        assert_eq!(p.kills, 0);
        assert_eq!(p.suspicion_score, 0);
        assert_eq!(p.suspicion_level, SuspicionLevel::Clean);
    }
    assert_eq!(report.total_rounds, 3);
    assert_eq!(report.tick_rate, 64.0);
}

#[test]
fn test_low_sample_player_scored_on_defined_metrics_only() {
    let data = MatchBuilder::new(400)
        .stand(1, 0..400, ORIGIN, 0.0)
        .stand(2, 0..100, SIDE, 180.0)
        .stand(2, 100..120, AHEAD, 180.0)
        .stand(3, 0..200, SIDE, 180.0)
        .stand(3, 200..220, AHEAD, 180.0)
        .fire(1, 110, true)
        .damage(1, 2, 112, false)
        .kill(1, 2, 112, true)
        .fire(1, 212, true)
        .damage(1, 3, 215, false)
        .kill(1, 3, 215, false)
        .build();
    let config = AnalysisConfig::default();
    let report = analyze(&data);
    let p = report.report(1).unwrap();

    assert_eq!(p.kills, 2);
    assert_eq!(p.hs_rate, None);
    assert_eq!(p.hs_round_variance, None);
    assert_eq!(p.accuracy, None);
    assert_eq!(p.smoke_kill_ratio, None);
    assert!(p.fov_sight_to_fire_avg_ms.is_some());

    let sub = scoring::family_subscores(p, &config);
    let families: Vec<MetricFamily> = scoring::renormalized_weights(&sub, &config.weights)
        .into_iter()
        .map(|(f, _)| f)
        .collect();
    assert_eq!(families, vec![MetricFamily::Reaction, MetricFamily::Snap]);
    let expected = (scoring::composite(&sub, &config.weights) * 100.0).round() as u8;
    assert_eq!(p.suspicion_score, expected);

    // Undefined stays distinguishable from zero on the wire.
    let json = serde_json::to_value(p).unwrap();
    assert!(json["accuracy"].is_null());
    assert!(json["hs_round_variance"].is_null());
}

#[test]
fn test_preaim_is_excluded_from_reaction_average() {
    let data = MatchBuilder::new(400)
        .stand(1, 0..400, ORIGIN, 0.0)
        // Steps into view at 100, shot 8 ticks later.
        .stand(2, 0..100, SIDE, 180.0)
        .stand(2, 100..400, AHEAD, 180.0)
        .fire(1, 108, true)
        .damage(1, 2, 110, false)
        // Stands in the crosshair for the whole look-back window.
        .stand(3, 0..400, AHEAD, 180.0)
        .fire(1, 290, true)
        .damage(1, 3, 300, false)
        .build();
    let report = analyze(&data);
    let p = report.report(1).unwrap();

    assert_eq!(p.engagements.total, 2);
    assert_eq!(p.engagements.tracked, 1);
    assert_eq!(p.engagements.pre_aim, 1);
    assert_eq!(p.sight_to_fire_samples_ms.len(), 1);
    assert!((p.fov_sight_to_fire_avg_ms.unwrap() - 125.0).abs() < 1e-9);
}

#[test]
fn test_pipeline_is_idempotent() {
    let data = aimbot_match();
    let a = serde_json::to_string(&analyze(&data)).unwrap();
    let b = serde_json::to_string(&analyze(&data)).unwrap();
    assert_eq!(a, b, "reports diverged on identical input");
}

// ---- Errors ----

#[test]
fn test_player_fault_does_not_fail_others() {
    let mut data = aimbot_match();
    data.snapshots
        .iter_mut()
        .find(|s| s.player_id == 4 && s.tick == 10)
        .unwrap()
        .health = -5;

    let report = analyze(&data);
    assert!(report.report(1).is_some());
    match &report.players[&4] {
        PlayerOutcome::Failed { error } => assert!(error.contains("negative health")),
        other => panic!("expected failure, got {other:?}"),
    }
}

#[test]
fn test_overlapping_rounds_fail_the_match() {
    let mut data = aimbot_match();
    data.rounds.push(Round {
        number: 9,
        start_tick: 350,
        end_tick: 450,
    });
    let err = MatchAnalyzer::default().analyze(&data).unwrap_err();
    assert!(err.is_fatal());
    assert!(matches!(err, AnalysisError::OverlappingRounds { .. }));
}

#[test]
fn test_invalid_config_rejected() {
    let config = AnalysisConfig {
        snap_threshold_deg_s: -1.0,
        ..AnalysisConfig::default()
    };
    assert!(matches!(
        MatchAnalyzer::new(config),
        Err(AnalysisError::InvalidConfig(_))
    ));
}

#[test]
fn test_empty_match_is_empty_report() {
    let report = analyze(&MatchData::default());
    assert!(report.players.is_empty());
    assert_eq!(report.total_rounds, 0);
}

#[test]
fn test_configured_tick_rate_overrides_detection() {
    let config = AnalysisConfig {
        tick_rate: Some(128.0),
        ..AnalysisConfig::default()
    };
    let report = MatchAnalyzer::new(config)
        .unwrap()
        .analyze(&aimbot_match())
        .unwrap();
    assert_eq!(report.tick_rate, 128.0);
}
