//! Headshot consistency, accuracy and smoke-kill ratios.

use std::collections::BTreeMap;

use sightline_core::config::AnalysisConfig;
use sightline_core::types::PlayerId;

use crate::stats;
use crate::store::TickStore;

/// Counting metrics for one player. Ratios are `None` below their sample
/// thresholds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Consistency {
    pub kills: u32,
    pub headshots: u32,
    pub shots: u32,
    pub hits: u32,
    pub smoke_kills: u32,
    pub hs_rate: Option<f64>,
    pub hs_round_variance: Option<f64>,
    pub accuracy: Option<f64>,
    pub smoke_kill_ratio: Option<f64>,
}

pub fn consistency_for(store: &TickStore, config: &AnalysisConfig, player: PlayerId) -> Consistency {
    let mut c = Consistency::default();
    // round number -> (kills, headshots)
    let mut per_round: BTreeMap<u32, (u32, u32)> = BTreeMap::new();

    for kill in store
        .kills()
        .iter()
        .filter(|k| k.credited_attacker() == Some(player))
    {
        c.kills += 1;
        if kill.headshot {
            c.headshots += 1;
        }
        if store.damage_through_smoke(kill.tick, player, kill.victim_id) {
            c.smoke_kills += 1;
        }
        if let Some(round) = store.round_of(kill.tick) {
            let entry = per_round.entry(round.number).or_default();
            entry.0 += 1;
            entry.1 += u32::from(kill.headshot);
        }
    }

    for fire in store
        .fires()
        .iter()
        .filter(|f| f.shooter_id == player && f.weapon.is_firearm())
    {
        c.shots += 1;
        if fire.hit {
            c.hits += 1;
        }
    }

    c.hs_rate = stats::ratio(c.headshots, c.kills, config.min_kills);
    c.smoke_kill_ratio = stats::ratio(c.smoke_kills, c.kills, config.min_kills);
    c.accuracy = stats::ratio(c.hits, c.shots, config.min_shots);

    // Rounds without kills contribute no data point.
    let round_rates: Vec<f64> = per_round
        .values()
        .map(|&(kills, hs)| f64::from(hs) / f64::from(kills))
        .collect();
    if c.hs_rate.is_some() && round_rates.len() >= config.min_rounds_for_variance as usize {
        c.hs_round_variance = stats::variance(&round_rates);
    }
    c
}
