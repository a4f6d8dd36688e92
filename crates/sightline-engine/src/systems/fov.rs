//! Field-of-view engagement tracker.
//!
//! For each damage event, walks the tick arena backward from the event to find
//! when the victim entered the attacker's sight cone. The walk is bounded by
//! the look-back window and the round start, and stops early at the first
//! tick either player is not alive.

use std::collections::HashSet;

use sightline_core::angles::off_axis_deg;
use sightline_core::config::AnalysisConfig;
use sightline_core::enums::EngagementStatus;
use sightline_core::input::PlayerSnapshot;
use sightline_core::types::PlayerId;

use crate::engagement::EngagementWindow;
use crate::store::TickStore;

/// Why the backward scan ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanStop {
    /// Reached the window floor (or the first recorded tick).
    WindowExhausted,
    /// The target left the cone going backward in time.
    ConeExit,
    /// One of the players was missing or dead.
    NotAlive,
}

/// Whether `target` is inside `actor`'s sight cone.
pub fn in_cone(
    actor: &PlayerSnapshot,
    target: &PlayerSnapshot,
    half_angle_deg: f64,
    eye_height: f64,
) -> bool {
    off_axis_deg(
        actor.view.direction(),
        actor.position.eye(eye_height),
        target.position.eye(eye_height),
    )
    .is_some_and(|angle| angle <= half_angle_deg)
}

/// Run the backward sight search for one `(actor, target, event_tick)` triple.
pub fn track(
    store: &TickStore,
    config: &AnalysisConfig,
    actor: PlayerId,
    target: PlayerId,
    event_tick: u32,
) -> EngagementWindow {
    let round = store.round_of(event_tick);
    let mut window = EngagementWindow {
        actor_id: actor,
        target_id: target,
        round: round.map(|r| r.number),
        event_tick,
        sight_tick: None,
        fire_tick: None,
        status: EngagementStatus::Invalid,
    };

    let Some(event_pos) = store.position_of(event_tick) else {
        return window;
    };
    if !store
        .snapshot_at(actor, event_pos)
        .is_some_and(PlayerSnapshot::is_active)
    {
        return window;
    }

    let mut floor = event_tick.saturating_sub(store.ticks_for_secs(config.lookback_secs));
    if let Some(round) = round {
        floor = floor.max(round.start_tick);
    }

    let half_angle = config.fov_half_angle_deg();
    let mut run_start: Option<usize> = None;
    let mut stop = ScanStop::WindowExhausted;
    let mut pos = event_pos;
    loop {
        if store.tick_at(pos).index < floor {
            break;
        }
        let actor_snap = store
            .snapshot_at(actor, pos)
            .filter(|s| s.is_active());
        // The victim may already read as dead on the tick of a lethal hit.
        let target_snap = store
            .snapshot_at(target, pos)
            .filter(|s| pos == event_pos || s.is_active());
        let (Some(a), Some(t)) = (actor_snap, target_snap) else {
            stop = ScanStop::NotAlive;
            break;
        };

        if in_cone(a, t, half_angle, config.eye_height) {
            run_start = Some(pos);
        } else if run_start.is_some() {
            stop = ScanStop::ConeExit;
            break;
        }

        if pos == 0 {
            break;
        }
        pos -= 1;
    }

    window.status = match (run_start, stop) {
        (None, _) => EngagementStatus::Untracked,
        (Some(_), ScanStop::WindowExhausted) => EngagementStatus::PreAim,
        // Visible only on the event tick itself: no measurable exposure.
        (Some(start), _) if start == event_pos => EngagementStatus::Untracked,
        (Some(_), _) => EngagementStatus::Tracked,
    };
    if window.status != EngagementStatus::Untracked {
        let sight_tick = run_start.map(|p| store.tick_at(p).index);
        window.sight_tick = sight_tick;
        window.fire_tick = sight_tick.and_then(|s| first_shot(store, actor, s, event_tick));
    }
    window
}

/// First firearm shot by `shooter` in `[from, to]`.
fn first_shot(store: &TickStore, shooter: PlayerId, from: u32, to: u32) -> Option<u32> {
    let fires = store.fires();
    let start = fires.partition_point(|f| f.tick < from);
    fires[start..]
        .iter()
        .take_while(|f| f.tick <= to)
        .find(|f| f.shooter_id == shooter && f.weapon.is_firearm())
        .map(|f| f.tick)
}

/// Track every engagement the actor initiated by damaging another player.
///
/// With `first_contact_only`, later hits on the same victim in the same round
/// are follow-up shots rather than new engagements and are skipped.
pub fn engagements_for(
    store: &TickStore,
    config: &AnalysisConfig,
    actor: PlayerId,
) -> Vec<EngagementWindow> {
    let mut seen: HashSet<(PlayerId, Option<u32>)> = HashSet::new();
    let mut windows = Vec::new();

    for dmg in store.damages() {
        if dmg.attacker_id != actor || dmg.victim_id == actor {
            continue;
        }
        if config.first_contact_only {
            let round = store.round_of(dmg.tick).map(|r| r.number);
            if !seen.insert((dmg.victim_id, round)) {
                continue;
            }
        }
        windows.push(track(store, config, actor, dmg.victim_id, dmg.tick));
    }
    windows
}
