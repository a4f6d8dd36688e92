//! Engagement data model: the output of the field-of-view search.
//!
//! Derived per analysis and never persisted.

use sightline_core::enums::EngagementStatus;
use sightline_core::types::PlayerId;

/// One attempt by an actor to engage a target, anchored on a damage event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngagementWindow {
    pub actor_id: PlayerId,
    pub target_id: PlayerId,
    /// Round the event fell in, if any.
    pub round: Option<u32>,
    /// Tick of the anchoring event.
    pub event_tick: u32,
    /// Tick the target entered the actor's cone. `None` unless the scan
    /// found the target in view.
    pub sight_tick: Option<u32>,
    /// First firearm shot by the actor in `[sight_tick, event_tick]`.
    pub fire_tick: Option<u32>,
    pub status: EngagementStatus,
}

impl EngagementWindow {
    pub fn is_preaim(&self) -> bool {
        self.status == EngagementStatus::PreAim
    }

    /// Whether this window contributes to reaction-time aggregates.
    pub fn is_timed(&self) -> bool {
        self.status == EngagementStatus::Tracked && self.sight_tick.is_some()
    }
}
