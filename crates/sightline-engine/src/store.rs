//! Tick/Event Store: read-only, random-access view of one parsed match.
//!
//! Snapshots live in a per-player arena indexed by tick position, so looking
//! up `(player, tick)` is O(1) and backward scans are plain index arithmetic.
//! Built once per analysis and dropped with it.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use sightline_core::config::AnalysisConfig;
use sightline_core::constants::*;
use sightline_core::error::{AnalysisError, Result};
use sightline_core::events::{DamageEvent, FireEvent, KillEvent, Round};
use sightline_core::input::{MatchData, PlayerSnapshot};
use sightline_core::types::{PlayerId, Tick};
use tracing::{debug, warn};

/// Indexed match data shared read-only by every per-player computation.
#[derive(Debug)]
pub struct TickStore {
    ticks: Vec<Tick>,
    positions: HashMap<u32, usize>,
    rounds: Vec<Round>,
    arena: BTreeMap<PlayerId, Vec<Option<PlayerSnapshot>>>,
    participants: BTreeSet<PlayerId>,
    fires: Vec<FireEvent>,
    damages: Vec<DamageEvent>,
    kills: Vec<KillEvent>,
    smoke_damage: HashSet<(u32, PlayerId, PlayerId)>,
    faults: BTreeMap<PlayerId, AnalysisError>,
    tick_rate: f64,
}

impl TickStore {
    /// Index a parsed match.
    ///
    /// Store-level inconsistencies (tick order, round layout) fail the whole
    /// build. Bad data attributable to one player is recorded as that
    /// player's fault and surfaces only when they are analyzed.
    pub fn build(data: &MatchData, config: &AnalysisConfig) -> Result<Self> {
        if data.ticks.is_empty() && (data.has_events() || !data.snapshots.is_empty()) {
            return Err(AnalysisError::EmptyTickTable);
        }
        validate_ticks(&data.ticks)?;
        let rounds = validate_rounds(&data.rounds)?;

        let positions: HashMap<u32, usize> = data
            .ticks
            .iter()
            .enumerate()
            .map(|(pos, tick)| (tick.index, pos))
            .collect();

        let mut store = Self {
            ticks: data.ticks.clone(),
            positions,
            rounds,
            arena: BTreeMap::new(),
            participants: BTreeSet::new(),
            fires: sorted_by_tick(&data.fires, |e| e.tick),
            damages: sorted_by_tick(&data.damages, |e| e.tick),
            kills: sorted_by_tick(&data.kills, |e| e.tick),
            smoke_damage: HashSet::new(),
            faults: BTreeMap::new(),
            tick_rate: config.tick_rate.unwrap_or_else(|| detect_tick_rate(&data.ticks)),
        };

        store.index_snapshots(&data.snapshots);
        store.index_events();

        debug!(
            ticks = store.ticks.len(),
            players = store.participants.len(),
            rounds = store.rounds.len(),
            faults = store.faults.len(),
            tick_rate = store.tick_rate,
            "tick store built"
        );
        Ok(store)
    }

    fn index_snapshots(&mut self, snapshots: &[PlayerSnapshot]) {
        let tick_count = self.ticks.len();
        for snap in snapshots {
            self.participants.insert(snap.player_id);
            let Some(&pos) = self.positions.get(&snap.tick) else {
                self.record_fault(AnalysisError::UnknownTick {
                    player: snap.player_id,
                    tick: snap.tick,
                });
                continue;
            };
            if snap.health < 0 {
                self.record_fault(AnalysisError::NegativeHealth {
                    player: snap.player_id,
                    tick: snap.tick,
                    health: snap.health,
                });
                continue;
            }
            let occupied = self
                .arena
                .get(&snap.player_id)
                .is_some_and(|slots| slots[pos].is_some());
            if occupied {
                self.record_fault(AnalysisError::DuplicateSnapshot {
                    player: snap.player_id,
                    tick: snap.tick,
                });
                continue;
            }
            self.arena
                .entry(snap.player_id)
                .or_insert_with(|| vec![None; tick_count])[pos] = Some(*snap);
        }
    }

    fn index_events(&mut self) {
        let mut refs: Vec<(PlayerId, u32)> = Vec::new();
        let mut others: Vec<PlayerId> = Vec::new();

        for fire in &self.fires {
            refs.push((fire.shooter_id, fire.tick));
        }
        for dmg in &self.damages {
            refs.push((dmg.attacker_id, dmg.tick));
            others.push(dmg.victim_id);
        }
        for kill in &self.kills {
            match kill.attacker_id {
                Some(attacker) => {
                    refs.push((attacker, kill.tick));
                    others.push(kill.victim_id);
                }
                None => refs.push((kill.victim_id, kill.tick)),
            }
        }

        let smoke: HashSet<(u32, PlayerId, PlayerId)> = self
            .damages
            .iter()
            .filter(|d| d.through_smoke)
            .map(|d| (d.tick, d.attacker_id, d.victim_id))
            .collect();
        self.smoke_damage = smoke;

        for (player, tick) in refs {
            self.participants.insert(player);
            if !self.positions.contains_key(&tick) {
                self.record_fault(AnalysisError::UnknownTick { player, tick });
            }
        }
        self.participants.extend(others);

        let unknown: Vec<PlayerId> = self
            .participants
            .iter()
            .copied()
            .filter(|id| !self.arena.contains_key(id))
            .collect();
        for player in unknown {
            self.record_fault(AnalysisError::UnknownPlayer { player });
        }
    }

    fn record_fault(&mut self, error: AnalysisError) {
        if let sightline_core::error::Severity::Player(player) = error.severity() {
            warn!(player, %error, "malformed input");
            self.faults.entry(player).or_insert(error);
        }
    }

    // --- Ticks ---

    /// Server tick rate in Hz (configured or detected).
    pub fn tick_rate(&self) -> f64 {
        self.tick_rate
    }

    /// Nominal duration of one tick in seconds.
    pub fn nominal_tick_secs(&self) -> f64 {
        1.0 / self.tick_rate
    }

    /// Number of ticks covering `secs` at the store's tick rate.
    pub fn ticks_for_secs(&self, secs: f64) -> u32 {
        (secs * self.tick_rate).round().max(0.0) as u32
    }

    pub fn ticks(&self) -> &[Tick] {
        &self.ticks
    }

    pub fn tick_at(&self, pos: usize) -> Tick {
        self.ticks[pos]
    }

    /// Arena position of a tick index, if the tick was recorded.
    pub fn position_of(&self, tick: u32) -> Option<usize> {
        self.positions.get(&tick).copied()
    }

    /// First arena position whose tick index is `>= tick`.
    pub fn first_position_at_or_after(&self, tick: u32) -> usize {
        self.ticks.partition_point(|t| t.index < tick)
    }

    pub fn game_time(&self, tick: u32) -> Option<f64> {
        self.position_of(tick).map(|pos| self.ticks[pos].game_time)
    }

    /// Game time of the first recorded tick at or after `tick`.
    pub fn game_time_at_or_after(&self, tick: u32) -> Option<f64> {
        self.ticks
            .get(self.first_position_at_or_after(tick))
            .map(|t| t.game_time)
    }

    // --- Snapshots ---

    pub fn snapshot_at(&self, player: PlayerId, pos: usize) -> Option<&PlayerSnapshot> {
        self.arena.get(&player)?.get(pos)?.as_ref()
    }

    pub fn snapshot(&self, player: PlayerId, tick: u32) -> Option<&PlayerSnapshot> {
        self.snapshot_at(player, self.position_of(tick)?)
    }

    /// Every player seen in snapshots or events, in ascending id order.
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.participants.iter().copied()
    }

    /// First malformed-input error recorded against a player.
    pub fn fault(&self, player: PlayerId) -> Option<&AnalysisError> {
        self.faults.get(&player)
    }

    // --- Rounds ---

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn round_of(&self, tick: u32) -> Option<&Round> {
        let idx = self.rounds.partition_point(|r| r.end_tick < tick);
        self.rounds.get(idx).filter(|r| r.contains(tick))
    }

    // --- Events (sorted by tick) ---

    pub fn fires(&self) -> &[FireEvent] {
        &self.fires
    }

    pub fn damages(&self) -> &[DamageEvent] {
        &self.damages
    }

    pub fn kills(&self) -> &[KillEvent] {
        &self.kills
    }

    /// Whether the damage that went with a kill was dealt through smoke.
    pub fn damage_through_smoke(&self, tick: u32, attacker: PlayerId, victim: PlayerId) -> bool {
        self.smoke_damage.contains(&(tick, attacker, victim))
    }
}

fn sorted_by_tick<T: Copy>(events: &[T], tick: impl Fn(&T) -> u32) -> Vec<T> {
    let mut sorted = events.to_vec();
    sorted.sort_by_key(|e| tick(e));
    sorted
}

fn validate_ticks(ticks: &[Tick]) -> Result<()> {
    if let Some(bad) = ticks.iter().find(|t| !t.game_time.is_finite()) {
        return Err(AnalysisError::NonFiniteGameTime {
            tick: bad.index,
            value: bad.game_time,
        });
    }
    for pair in ticks.windows(2) {
        let (prev, cur) = (pair[0], pair[1]);
        if cur.index <= prev.index {
            return Err(AnalysisError::NonIncreasingTick {
                previous: prev.index,
                current: cur.index,
            });
        }
        if cur.game_time < prev.game_time {
            return Err(AnalysisError::DecreasingGameTime {
                tick: cur.index,
                previous: prev.game_time,
                current: cur.game_time,
            });
        }
    }
    Ok(())
}

fn validate_rounds(rounds: &[Round]) -> Result<Vec<Round>> {
    let mut sorted = rounds.to_vec();
    sorted.sort_by_key(|r| (r.start_tick, r.number));
    for round in &sorted {
        if round.start_tick > round.end_tick {
            return Err(AnalysisError::InvertedRound {
                round: round.number,
                start_tick: round.start_tick,
                end_tick: round.end_tick,
            });
        }
    }
    for pair in sorted.windows(2) {
        if pair[0].overlaps(&pair[1]) {
            return Err(AnalysisError::OverlappingRounds {
                first: pair[0].number,
                second: pair[1].number,
            });
        }
    }
    Ok(sorted)
}

/// Estimate the server tick rate from the tick table.
///
/// Uses the median of per-step rates so freezes and warmup gaps do not skew
/// it, then snaps to one of the two rates servers actually run at.
pub fn detect_tick_rate(ticks: &[Tick]) -> f64 {
    let mut rates: Vec<f64> = ticks
        .windows(2)
        .filter_map(|pair| {
            let dt = pair[1].game_time - pair[0].game_time;
            let di = pair[1].index.checked_sub(pair[0].index)?;
            (dt > 0.0).then(|| f64::from(di) / dt)
        })
        .collect();
    if rates.is_empty() {
        return TICK_RATE_MATCHMAKING;
    }
    rates.sort_by(|a, b| a.total_cmp(b));
    let median = rates[rates.len() / 2];
    if median >= TICK_RATE_HIGH_THRESHOLD {
        TICK_RATE_HIGH
    } else {
        TICK_RATE_MATCHMAKING
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::MatchBuilder;

    #[test]
    fn test_detect_tick_rate() {
        let ticks64: Vec<Tick> = (0..100).map(|i| Tick::new(i, f64::from(i) / 64.0)).collect();
        assert_eq!(detect_tick_rate(&ticks64), 64.0);
        let ticks128: Vec<Tick> = (0..100).map(|i| Tick::new(i, f64::from(i) / 128.0)).collect();
        assert_eq!(detect_tick_rate(&ticks128), 128.0);
        assert_eq!(detect_tick_rate(&[]), TICK_RATE_MATCHMAKING);
    }

    #[test]
    fn test_detect_tick_rate_skips_unordered_steps() {
        let mut ticks: Vec<Tick> = (0..10).map(|i| Tick::new(i, f64::from(i) / 128.0)).collect();
        ticks.push(Tick::new(3, 11.0 / 128.0));
        assert_eq!(detect_tick_rate(&ticks), 128.0);
        assert_eq!(
            detect_tick_rate(&[Tick::new(9, 0.0), Tick::new(2, 1.0)]),
            TICK_RATE_MATCHMAKING
        );
    }

    #[test]
    fn test_rejects_non_increasing_ticks() {
        let data = MatchData {
            ticks: vec![Tick::new(5, 0.0), Tick::new(5, 0.1)],
            ..Default::default()
        };
        let err = TickStore::build(&data, &AnalysisConfig::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::NonIncreasingTick { .. }));
    }

    #[test]
    fn test_rejects_backwards_game_time() {
        let data = MatchData {
            ticks: vec![Tick::new(1, 1.0), Tick::new(2, 0.5)],
            ..Default::default()
        };
        let err = TickStore::build(&data, &AnalysisConfig::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::DecreasingGameTime { .. }));
    }

    #[test]
    fn test_rejects_non_finite_game_time() {
        for first in [f64::NAN, f64::INFINITY] {
            let data = MatchData {
                ticks: vec![Tick::new(1, first), Tick::new(2, 0.5)],
                ..Default::default()
            };
            let err = TickStore::build(&data, &AnalysisConfig::default()).unwrap_err();
            assert!(err.is_fatal());
            assert!(matches!(err, AnalysisError::NonFiniteGameTime { tick: 1, .. }));
        }
        let data = MatchData {
            ticks: vec![Tick::new(1, 0.0), Tick::new(2, f64::NAN)],
            ..Default::default()
        };
        assert!(matches!(
            TickStore::build(&data, &AnalysisConfig::default()).unwrap_err(),
            AnalysisError::NonFiniteGameTime { tick: 2, .. }
        ));
    }

    #[test]
    fn test_rejects_overlapping_rounds() {
        let data = MatchBuilder::new(200)
            .round(1, 0, 120)
            .round(2, 100, 199)
            .build();
        let err = TickStore::build(&data, &AnalysisConfig::default()).unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(err, AnalysisError::OverlappingRounds { .. }));
    }

    #[test]
    fn test_rejects_events_without_ticks() {
        let mut data = MatchData::default();
        data.kills.push(KillEvent {
            tick: 1,
            attacker_id: Some(1),
            victim_id: 2,
            headshot: false,
        });
        assert_eq!(
            TickStore::build(&data, &AnalysisConfig::default()).unwrap_err(),
            AnalysisError::EmptyTickTable
        );
    }

    #[test]
    fn test_snapshot_lookup_is_indexed() {
        let data = MatchBuilder::new(50)
            .stand(1, 0..50, (0.0, 0.0, 0.0), 0.0)
            .build();
        let store = TickStore::build(&data, &AnalysisConfig::default()).unwrap();
        assert_eq!(store.snapshot(1, 20).map(|s| s.tick), Some(20));
        assert!(store.snapshot(1, 500).is_none());
        assert!(store.snapshot(2, 20).is_none());
        assert_eq!(store.tick_rate(), 64.0);
    }

    #[test]
    fn test_player_faults_are_isolated() {
        let mut data = MatchBuilder::new(50)
            .stand(1, 0..50, (0.0, 0.0, 0.0), 0.0)
            .stand(2, 0..50, (500.0, 0.0, 0.0), 180.0)
            .damage(3, 2, 10, false)
            .build();
        data.snapshots.iter_mut().find(|s| s.player_id == 2 && s.tick == 5).unwrap().health = -1;

        let store = TickStore::build(&data, &AnalysisConfig::default()).unwrap();
        assert!(store.fault(1).is_none());
        assert!(matches!(
            store.fault(2),
            Some(AnalysisError::NegativeHealth { tick: 5, .. })
        ));
        assert_eq!(
            store.fault(3),
            Some(&AnalysisError::UnknownPlayer { player: 3 })
        );
        assert_eq!(store.player_ids().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_duplicate_snapshot_is_fault() {
        let mut data = MatchBuilder::new(10)
            .stand(1, 0..10, (0.0, 0.0, 0.0), 0.0)
            .build();
        let dup = data.snapshots[3];
        data.snapshots.push(dup);
        let store = TickStore::build(&data, &AnalysisConfig::default()).unwrap();
        assert!(matches!(
            store.fault(1),
            Some(AnalysisError::DuplicateSnapshot { tick: 3, .. })
        ));
    }

    #[test]
    fn test_round_lookup() {
        let data = MatchBuilder::new(300)
            .round(1, 10, 100)
            .round(2, 150, 250)
            .build();
        let store = TickStore::build(&data, &AnalysisConfig::default()).unwrap();
        assert_eq!(store.round_of(10).map(|r| r.number), Some(1));
        assert_eq!(store.round_of(100).map(|r| r.number), Some(1));
        assert_eq!(store.round_of(120), None);
        assert_eq!(store.round_of(200).map(|r| r.number), Some(2));
        assert_eq!(store.round_of(5), None);
        assert_eq!(store.round_of(299), None);
    }
}
