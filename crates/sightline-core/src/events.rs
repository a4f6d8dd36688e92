//! Discrete combat events and round boundaries emitted by the demo parser.

use serde::{Deserialize, Serialize};

use crate::enums::{HitGroup, WeaponClass};
use crate::types::PlayerId;

/// One shot fired.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FireEvent {
    pub tick: u32,
    pub shooter_id: PlayerId,
    pub weapon: WeaponClass,
    /// Whether the shot damaged an enemy.
    pub hit: bool,
}

/// Damage dealt by one player to another.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageEvent {
    pub tick: u32,
    pub attacker_id: PlayerId,
    pub victim_id: PlayerId,
    pub amount: u32,
    pub hitgroup: HitGroup,
    #[serde(default)]
    pub weapon: WeaponClass,
    #[serde(default)]
    pub through_smoke: bool,
}

/// A player death.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KillEvent {
    pub tick: u32,
    /// `None` for world damage (falls, bomb) and disconnects.
    pub attacker_id: Option<PlayerId>,
    pub victim_id: PlayerId,
    pub headshot: bool,
}

/// Live-play bounds of one round, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    pub number: u32,
    pub start_tick: u32,
    pub end_tick: u32,
}

impl KillEvent {
    /// The credited killer, if this is not a self-kill or world death.
    pub fn credited_attacker(&self) -> Option<PlayerId> {
        self.attacker_id.filter(|&attacker| attacker != self.victim_id)
    }
}

impl Round {
    pub fn contains(&self, tick: u32) -> bool {
        (self.start_tick..=self.end_tick).contains(&tick)
    }

    pub fn overlaps(&self, other: &Round) -> bool {
        self.start_tick <= other.end_tick && other.start_tick <= self.end_tick
    }
}
