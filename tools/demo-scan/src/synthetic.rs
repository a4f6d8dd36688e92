//! Deterministic synthetic matches for demos and smoke testing.
//!
//! Ten players in two teams of five. Each round pairs up a few players into
//! duels: the attacker holds an angle, the victim steps out from cover, and
//! the attacker corrects onto the target and fires. Human attackers react in
//! 200-400 ms and correct smoothly. The optional bot reacts in a few ticks,
//! snaps onto the target in a single tick and rarely misses the head.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use sightline_core::enums::{HitGroup, WeaponClass};
use sightline_core::events::{DamageEvent, FireEvent, KillEvent, Round};
use sightline_core::input::{MatchData, PlayerSnapshot};
use sightline_core::types::{PlayerId, Position, Tick, ViewAngles};

const TICK_RATE: f64 = 64.0;
const ROUND_TICKS: u32 = 1200;
const FREEZE_TICKS: u32 = 100;
const PLAYERS: PlayerId = 10;
const DAMAGE_PER_HIT: u32 = 27;

/// The scripted player when `bot` is set.
pub const BOT_ID: PlayerId = 1;

#[derive(Debug, Clone, Copy)]
struct Duel {
    /// Tick the victim leaves cover.
    exposed_at: u32,
    attacker_pos: Position,
    hidden_pos: Position,
    exposed_pos: Position,
    /// Bearing from attacker to the exposed victim, degrees.
    bearing: f64,
    hold_offset: f64,
    aim_error: f64,
    turn_start: u32,
    turn_len: u32,
    kill_tick: u32,
}

impl Duel {
    fn attacker_yaw(&self, tick: u32) -> f64 {
        let progress = if tick < self.turn_start {
            0.0
        } else {
            (f64::from(tick - self.turn_start + 1) / f64::from(self.turn_len)).min(1.0)
        };
        self.bearing + self.hold_offset + (self.aim_error - self.hold_offset) * progress
    }
}

#[derive(Debug, Clone, Copy)]
enum Role {
    Idle { pos: Position, yaw: f64 },
    Attacker(Duel),
    Victim(Duel),
}

/// Generate a match. Same seed, same match.
pub fn generate(seed: u64, rounds: u32, bot: bool) -> MatchData {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let round_span = ROUND_TICKS + FREEZE_TICKS;
    let mut data = MatchData {
        ticks: (0..rounds * round_span)
            .map(|i| Tick::new(i, f64::from(i) / TICK_RATE))
            .collect(),
        ..Default::default()
    };

    for r in 0..rounds {
        let start = r * round_span + FREEZE_TICKS;
        let end = start + ROUND_TICKS - 1;
        data.rounds.push(Round {
            number: r + 1,
            start_tick: start,
            end_tick: end,
        });

        let roles = plan_round(&mut rng, &mut data, start, bot);
        for (&player, role) in &roles {
            push_snapshots(&mut data, player, role, start, end);
        }
    }
    data
}

fn random_position(rng: &mut ChaCha8Rng) -> Position {
    Position::new(
        rng.gen_range(-1500.0..1500.0),
        rng.gen_range(-1500.0..1500.0),
        0.0,
    )
}

fn offset(from: Position, bearing_deg: f64, dist: f64) -> Position {
    let b = bearing_deg.to_radians();
    Position::new(from.x + dist * b.cos(), from.y + dist * b.sin(), from.z)
}

/// Decide who fights whom this round and emit the combat events.
fn plan_round(
    rng: &mut ChaCha8Rng,
    data: &mut MatchData,
    start: u32,
    bot: bool,
) -> BTreeMap<PlayerId, Role> {
    let mut team_a: Vec<PlayerId> = (1..=PLAYERS / 2).collect();
    let mut team_b: Vec<PlayerId> = (PLAYERS / 2 + 1..=PLAYERS).collect();
    team_a.shuffle(rng);
    team_b.shuffle(rng);
    if bot {
        team_a.retain(|&p| p != BOT_ID);
        team_a.insert(0, BOT_ID);
    }

    let mut roles = BTreeMap::new();
    let duels = rng.gen_range(3..=5usize);
    debug!(start, duels, "planning round");
    for (i, (&a, &b)) in team_a.iter().zip(&team_b).enumerate() {
        if i >= duels {
            for player in [a, b] {
                let role = Role::Idle {
                    pos: random_position(rng),
                    yaw: rng.gen_range(-180.0..180.0),
                };
                roles.insert(player, role);
            }
            continue;
        }
        let (attacker, victim) = if (bot && a == BOT_ID) || rng.gen_bool(0.5) {
            (a, b)
        } else {
            (b, a)
        };
        let scripted = bot && attacker == BOT_ID;
        let duel = fight(rng, data, attacker, victim, start + 100 + 200 * i as u32, scripted);
        roles.insert(attacker, Role::Attacker(duel));
        roles.insert(victim, Role::Victim(duel));
    }
    roles
}

/// Lay out one duel and push its fire, damage and kill events.
fn fight(
    rng: &mut ChaCha8Rng,
    data: &mut MatchData,
    attacker: PlayerId,
    victim: PlayerId,
    earliest: u32,
    scripted: bool,
) -> Duel {
    let exposed_at = earliest + rng.gen_range(0..50u32);
    let bearing: f64 = rng.gen_range(-180.0..180.0);
    let dist = rng.gen_range(600.0..1500.0);
    let attacker_pos = random_position(rng);
    let side = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };

    let (reaction, turn_len, shots, spacing) = if scripted {
        (rng.gen_range(2..=4u32), 1, rng.gen_range(2..=3u32), 3)
    } else {
        (rng.gen_range(14..=26u32), 6, rng.gen_range(3..=8u32), 6)
    };
    let hold_offset = side
        * if scripted {
            rng.gen_range(20.0..30.0)
        } else {
            rng.gen_range(10.0..30.0)
        };
    let first_shot = exposed_at + reaction;
    let kill_tick = first_shot + spacing * (shots - 1);

    let mut first_hit = None;
    for k in 0..shots {
        let tick = first_shot + spacing * k;
        let last = k + 1 == shots;
        let hit = last || scripted || rng.gen_bool(0.3);
        data.fires.push(FireEvent {
            tick,
            shooter_id: attacker,
            weapon: WeaponClass::Rifle,
            hit,
        });
        if !hit {
            continue;
        }
        first_hit.get_or_insert(tick);
        let headshot = last && rng.gen_bool(if scripted { 0.95 } else { 0.35 });
        data.damages.push(DamageEvent {
            tick,
            attacker_id: attacker,
            victim_id: victim,
            amount: if last { 100 } else { DAMAGE_PER_HIT },
            hitgroup: if headshot { HitGroup::Head } else { HitGroup::Chest },
            weapon: WeaponClass::Rifle,
            through_smoke: rng.gen_bool(if scripted { 0.25 } else { 0.03 }),
        });
        if last {
            data.kills.push(KillEvent {
                tick,
                attacker_id: Some(attacker),
                victim_id: victim,
                headshot,
            });
        }
    }

    // The victim shoots back if they live long enough.
    if let Some(hit_at) = first_hit {
        let reply = hit_at + rng.gen_range(16..=32u32);
        if reply < kill_tick {
            data.fires.push(FireEvent {
                tick: reply,
                shooter_id: victim,
                weapon: WeaponClass::Pistol,
                hit: true,
            });
            data.damages.push(DamageEvent {
                tick: reply,
                attacker_id: victim,
                victim_id: attacker,
                amount: 18,
                hitgroup: HitGroup::Stomach,
                weapon: WeaponClass::Pistol,
                through_smoke: false,
            });
        }
    }

    Duel {
        exposed_at,
        attacker_pos,
        hidden_pos: offset(attacker_pos, bearing + 90.0 * side, dist),
        exposed_pos: offset(attacker_pos, bearing, dist),
        bearing,
        hold_offset,
        aim_error: rng.gen_range(-1.0..1.0),
        turn_start: first_shot - turn_len,
        turn_len,
        kill_tick,
    }
}

fn push_snapshots(data: &mut MatchData, player: PlayerId, role: &Role, start: u32, end: u32) {
    for tick in start..=end {
        let (position, yaw, is_alive) = match role {
            Role::Idle { pos, yaw } => (*pos, *yaw, true),
            Role::Attacker(d) => (d.attacker_pos, d.attacker_yaw(tick), true),
            Role::Victim(d) => {
                if tick > d.kill_tick {
                    break;
                }
                let pos = if tick < d.exposed_at {
                    d.hidden_pos
                } else {
                    d.exposed_pos
                };
                (pos, d.bearing + 180.0, tick < d.kill_tick)
            }
        };
        data.snapshots.push(PlayerSnapshot {
            tick,
            player_id: player,
            position,
            view: ViewAngles::new(0.0, yaw),
            health: if is_alive { 100 } else { 0 },
            is_alive,
            active_weapon: WeaponClass::Rifle,
        });
    }
}
