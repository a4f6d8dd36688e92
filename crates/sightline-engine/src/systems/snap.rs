//! Aim snap detection.
//!
//! Measures how fast the killer's crosshair was moving in the last few ticks
//! before each kill. Missing samples are skipped, never interpolated, and
//! pairs separated by a gap in the tick stream are not compared.

use sightline_core::config::AnalysisConfig;
use sightline_core::input::PlayerSnapshot;
use sightline_core::types::PlayerId;
use tracing::debug;

use crate::store::TickStore;

/// Snap measurements for one player's kills.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapSummary {
    /// Peak angular velocity per kill that had at least one usable pair.
    pub velocities_deg_s: Vec<f64>,
    /// Kills whose peak exceeded the snap threshold.
    pub snap_kills: u32,
    pub skipped_gaps: u32,
}

/// Peak view angular velocity (degrees per second) of `player` in the window
/// ending at `kill_tick`. Also returns the number of pairs dropped for gaps.
pub fn peak_velocity(
    store: &TickStore,
    config: &AnalysisConfig,
    player: PlayerId,
    kill_tick: u32,
) -> (Option<f64>, u32) {
    let Some(end) = store.position_of(kill_tick) else {
        return (None, 0);
    };
    let start = store.first_position_at_or_after(kill_tick.saturating_sub(config.snap_window_ticks));
    let max_dt = store.nominal_tick_secs() * config.gap_tolerance;

    let mut peak: Option<f64> = None;
    let mut skipped = 0;
    let mut prev: Option<(f64, &PlayerSnapshot)> = None;
    for pos in start..=end {
        let Some(cur) = store.snapshot_at(player, pos) else {
            continue;
        };
        let now = store.tick_at(pos).game_time;
        if let Some((then, before)) = prev {
            let dt = now - then;
            if dt > 0.0 && dt <= max_dt {
                let velocity = before.view.angular_distance(&cur.view) / dt;
                peak = Some(peak.map_or(velocity, |m: f64| m.max(velocity)));
            } else {
                skipped += 1;
            }
        }
        prev = Some((now, cur));
    }
    (peak, skipped)
}

/// Snap velocities for every kill credited to `player`.
pub fn snaps_for(store: &TickStore, config: &AnalysisConfig, player: PlayerId) -> SnapSummary {
    let mut summary = SnapSummary::default();
    for kill in store
        .kills()
        .iter()
        .filter(|k| k.credited_attacker() == Some(player))
    {
        let (peak, skipped) = peak_velocity(store, config, player, kill.tick);
        summary.skipped_gaps += skipped;
        let Some(peak) = peak else {
            continue;
        };
        if peak > config.snap_threshold_deg_s {
            debug!(player, tick = kill.tick, velocity = peak, "aim snap");
            summary.snap_kills += 1;
        }
        summary.velocities_deg_s.push(peak);
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::MatchBuilder;
    use sightline_core::types::Tick;

    fn config() -> AnalysisConfig {
        AnalysisConfig::default()
    }

    #[test]
    fn test_steady_aim_has_zero_velocity() {
        let data = MatchBuilder::new(100)
            .stand(1, 0..100, (0.0, 0.0, 0.0), 45.0)
            .stand(2, 0..100, (500.0, 0.0, 0.0), 180.0)
            .kill(1, 2, 50, false)
            .build();
        let store = TickStore::build(&data, &config()).unwrap();
        let s = snaps_for(&store, &config(), 1);
        assert_eq!(s.velocities_deg_s.len(), 1);
        assert!(s.velocities_deg_s[0] < 1e-6);
        assert_eq!(s.snap_kills, 0);
        assert_eq!(s.skipped_gaps, 0);
    }

    #[test]
    fn test_flick_before_kill_is_a_snap() {
        // 30 degrees in one 64 Hz tick is 1920 deg/s.
        let data = MatchBuilder::new(100)
            .stand(1, 0..100, (0.0, 0.0, 0.0), 0.0)
            .stand(2, 0..100, (500.0, 0.0, 0.0), 180.0)
            .look(1, 47, 0.0, 30.0)
            .look(1, 48, 0.0, 0.0)
            .kill(1, 2, 50, true)
            .build();
        let store = TickStore::build(&data, &config()).unwrap();
        let s = snaps_for(&store, &config(), 1);
        assert_eq!(s.snap_kills, 1);
        assert!((s.velocities_deg_s[0] - 1920.0).abs() < 1e-6);
    }

    #[test]
    fn test_flick_across_yaw_wrap_uses_shortest_arc() {
        let data = MatchBuilder::new(100)
            .stand(1, 0..100, (0.0, 0.0, 0.0), 179.0)
            .look(1, 48, 0.0, -179.0)
            .stand(2, 0..100, (500.0, 0.0, 0.0), 180.0)
            .kill(1, 2, 50, false)
            .build();
        let store = TickStore::build(&data, &config()).unwrap();
        let (peak, _) = peak_velocity(&store, &config(), 1, 50);
        // 2 degrees per tick, in and out.
        assert!((peak.unwrap() - 128.0).abs() < 1e-6);
    }

    #[test]
    fn test_flick_outside_window_is_ignored() {
        let data = MatchBuilder::new(100)
            .stand(1, 0..100, (0.0, 0.0, 0.0), 0.0)
            .stand(2, 0..100, (500.0, 0.0, 0.0), 180.0)
            .look(1, 30, 0.0, 90.0)
            .kill(1, 2, 50, false)
            .build();
        let store = TickStore::build(&data, &config()).unwrap();
        assert_eq!(snaps_for(&store, &config(), 1).snap_kills, 0);
    }

    #[test]
    fn test_gap_in_samples_is_not_bridged() {
        let mut data = MatchBuilder::new(100)
            .stand(1, 0..100, (0.0, 0.0, 0.0), 0.0)
            .stand(2, 0..100, (500.0, 0.0, 0.0), 180.0)
            .look(1, 50, 0.0, 90.0)
            .kill(1, 2, 50, false)
            .build();
        // Missing snapshot at 49: the 48 -> 50 pair spans two ticks.
        data.snapshots.retain(|s| !(s.player_id == 1 && s.tick == 49));
        let store = TickStore::build(&data, &config()).unwrap();
        let s = snaps_for(&store, &config(), 1);
        assert_eq!(s.snap_kills, 0);
        assert_eq!(s.skipped_gaps, 1);
    }

    #[test]
    fn test_dropped_ticks_are_not_bridged() {
        let mut data = MatchBuilder::new(0).build();
        data.ticks = vec![
            Tick::new(10, 10.0 / 64.0),
            Tick::new(11, 11.0 / 64.0),
            Tick::new(14, 14.0 / 64.0),
        ];
        let data = MatchBuilder::from_data(data)
            .snapshot(1, 10, 0.0, 0.0)
            .snapshot(1, 11, 0.0, 1.0)
            .snapshot(1, 14, 0.0, 90.0)
            .snapshot(2, 10, 0.0, 0.0)
            .snapshot(2, 11, 0.0, 0.0)
            .snapshot(2, 14, 0.0, 0.0)
            .kill(1, 2, 14, false)
            .build();
        let store = TickStore::build(&data, &config()).unwrap();
        let (peak, skipped) = peak_velocity(&store, &config(), 1, 14);
        assert!((peak.unwrap() - 64.0).abs() < 1e-6);
        assert_eq!(skipped, 1);
    }

    #[test]
    fn test_uncredited_kills_are_ignored() {
        let data = MatchBuilder::new(100)
            .stand(1, 0..100, (0.0, 0.0, 0.0), 0.0)
            .kill(1, 1, 50, false)
            .build();
        let store = TickStore::build(&data, &config()).unwrap();
        assert_eq!(snaps_for(&store, &config(), 1), SnapSummary::default());
    }
}
