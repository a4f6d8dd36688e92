//! Reaction and retaliation timing.
//!
//! All durations come from game-time differences, never tick counts, so
//! freezes and dropped ticks do not inflate them. A negative duration means
//! the pairing was wrong; it is dropped and counted, never clamped.

use std::collections::HashSet;

use sightline_core::config::AnalysisConfig;
use sightline_core::types::PlayerId;
use tracing::debug;

use crate::engagement::EngagementWindow;
use crate::store::TickStore;

/// Sight-anchored durations for one player's engagements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SightTimings {
    pub sight_to_fire_ms: Vec<f64>,
    pub sight_to_damage_ms: Vec<f64>,
    pub fire_to_damage_ms: Vec<f64>,
    pub discarded_negative: u32,
}

/// Damage-taken to damage-dealt-back latencies for one player.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Retaliation {
    pub samples_ms: Vec<f64>,
    pub discarded_negative: u32,
    pub discarded_implausible: u32,
}

/// Elapsed milliseconds between two recorded ticks.
pub fn elapsed_ms(store: &TickStore, from: u32, to: u32) -> Option<f64> {
    Some((store.game_time(to)? - store.game_time(from)?) * 1000.0)
}

fn push_duration(
    samples: &mut Vec<f64>,
    discarded: &mut u32,
    store: &TickStore,
    from: u32,
    to: u32,
) {
    let Some(ms) = elapsed_ms(store, from, to) else {
        return;
    };
    if ms < 0.0 || !ms.is_finite() {
        debug!(from, to, ms, "discarding negative duration");
        *discarded += 1;
        return;
    }
    samples.push(ms);
}

/// Sight-to-fire, sight-to-damage and fire-to-damage for tracked windows.
///
/// Pre-aim, untracked and invalid windows contribute nothing.
pub fn sight_timings(store: &TickStore, windows: &[EngagementWindow]) -> SightTimings {
    let mut timings = SightTimings::default();
    for window in windows.iter().filter(|w| w.is_timed()) {
        let Some(sight) = window.sight_tick else {
            continue;
        };
        push_duration(
            &mut timings.sight_to_damage_ms,
            &mut timings.discarded_negative,
            store,
            sight,
            window.event_tick,
        );
        if let Some(fire) = window.fire_tick {
            push_duration(
                &mut timings.sight_to_fire_ms,
                &mut timings.discarded_negative,
                store,
                sight,
                fire,
            );
            push_duration(
                &mut timings.fire_to_damage_ms,
                &mut timings.discarded_negative,
                store,
                fire,
                window.event_tick,
            );
        }
    }
    timings
}

/// Whether `player` was killed in `[from, to)`.
fn died_between(store: &TickStore, player: PlayerId, from: u32, to: u32) -> bool {
    let kills = store.kills();
    let start = kills.partition_point(|k| k.tick < from);
    kills[start..]
        .iter()
        .take_while(|k| k.tick < to)
        .any(|k| k.victim_id == player)
}

/// How quickly `player` hit back after being hit.
///
/// Considers each attacker once per round, counting the first damage dealt
/// back to that attacker within the retaliation window. Hits the player did
/// not survive until the reply never count.
pub fn retaliation_times(
    store: &TickStore,
    config: &AnalysisConfig,
    player: PlayerId,
) -> Retaliation {
    let window_secs = config.retaliation_window_secs;
    let damages = store.damages();
    let mut answered: HashSet<(PlayerId, Option<u32>)> = HashSet::new();
    let mut result = Retaliation::default();

    for (i, hurt) in damages.iter().enumerate() {
        if hurt.victim_id != player || hurt.attacker_id == player {
            continue;
        }
        let key = (hurt.attacker_id, store.round_of(hurt.tick).map(|r| r.number));
        if answered.contains(&key) {
            continue;
        }
        let Some(hurt_time) = store.game_time(hurt.tick) else {
            continue;
        };

        let mut reply = None;
        for dmg in &damages[i + 1..] {
            if dmg.tick <= hurt.tick {
                continue;
            }
            let Some(t) = store.game_time(dmg.tick) else {
                continue;
            };
            if t - hurt_time > window_secs {
                break;
            }
            if dmg.attacker_id == player && dmg.victim_id == hurt.attacker_id {
                reply = Some((dmg.tick, t));
                break;
            }
        }
        let Some((reply_tick, reply_time)) = reply else {
            continue;
        };
        if died_between(store, player, hurt.tick, reply_tick) {
            debug!(player, tick = hurt.tick, "victim died before replying");
            continue;
        }

        let ms = (reply_time - hurt_time) * 1000.0;
        if ms < 0.0 {
            result.discarded_negative += 1;
            continue;
        }
        if ms < config.min_retaliation_ms {
            result.discarded_implausible += 1;
            continue;
        }
        result.samples_ms.push(ms);
        answered.insert(key);
    }
    result
}

/// Per round, time from round start to the player's first damage dealt.
pub fn time_to_damage(store: &TickStore, player: PlayerId) -> Vec<f64> {
    let damages = store.damages();
    let mut samples = Vec::new();
    for round in store.rounds() {
        let start = damages.partition_point(|d| d.tick < round.start_tick);
        let first = damages[start..]
            .iter()
            .take_while(|d| d.tick <= round.end_tick)
            .find(|d| d.attacker_id == player && d.victim_id != player);
        let Some(first) = first else {
            continue;
        };
        let (Some(round_start), Some(hit)) = (
            store.game_time_at_or_after(round.start_tick),
            store.game_time(first.tick),
        ) else {
            continue;
        };
        let ms = (hit - round_start) * 1000.0;
        if ms >= 0.0 {
            samples.push(ms);
        }
    }
    samples
}
