//! The immutable batch handed over by the demo parser.

use serde::{Deserialize, Serialize};

use crate::enums::WeaponClass;
use crate::events::{DamageEvent, FireEvent, KillEvent, Round};
use crate::types::{PlayerId, Position, Tick, ViewAngles};

/// State of one player at one tick. Present only while the player is spawned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub tick: u32,
    pub player_id: PlayerId,
    pub position: Position,
    pub view: ViewAngles,
    pub health: i32,
    pub is_alive: bool,
    #[serde(default)]
    pub active_weapon: WeaponClass,
}

/// Everything the parser extracted for one match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchData {
    pub ticks: Vec<Tick>,
    pub snapshots: Vec<PlayerSnapshot>,
    pub fires: Vec<FireEvent>,
    pub damages: Vec<DamageEvent>,
    pub kills: Vec<KillEvent>,
    pub rounds: Vec<Round>,
}

impl PlayerSnapshot {
    /// Alive and with a usable view. Absent snapshots are treated the same as dead.
    pub fn is_active(&self) -> bool {
        self.is_alive && self.health > 0
    }
}

impl MatchData {
    /// Whether the batch carries any combat events.
    pub fn has_events(&self) -> bool {
        !self.fires.is_empty() || !self.damages.is_empty() || !self.kills.is_empty()
    }
}
