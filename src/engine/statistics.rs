//! Aggregate statistics over a simulation run
//!
//! A [`Statistics`] value is a snapshot computed from the data store, the
//! player registry and the live queue, restricted to a set of players. It is
//! recomputed on every request and holds no state of its own.

use crate::engine::registry::PlayerRegistry;
use crate::engine::store::DataStore;
use crate::types::{PlayerId, Queuer, Replay};
use crate::utils::average_or_sentinel;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Snapshot of run statistics for a subset of players
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Rating spread of every relevant finished game
    pub mmr_diffs: Vec<f64>,
    /// Every recorded queue wait of the selected players
    pub wait_times: Vec<u32>,
    /// Duration of every relevant finished game
    pub game_lengths: Vec<u32>,
    /// Win rate of every selected player with at least one finished game
    pub win_rates: Vec<f64>,
    /// Number of finished games involving at least one selected player
    pub num_games: usize,
    pub avg_queue_time: f64,
    pub avg_max_mmr_diff: f64,
    pub avg_game_length: f64,
    /// Queue at the time the snapshot was taken
    pub queue: Vec<Queuer>,
}

impl Statistics {
    /// Compute statistics for `players` from the recorded history
    pub fn compute(
        store: &DataStore,
        registry: &PlayerRegistry,
        queue: &[Queuer],
        players: &[PlayerId],
    ) -> Self {
        let mut selected: HashSet<&str> = HashSet::new();
        let unique: Vec<&str> = players
            .iter()
            .map(String::as_str)
            .filter(|id| selected.insert(*id))
            .collect();

        let relevant: Vec<&Arc<Replay>> = store
            .replays()
            .iter()
            .filter(|replay| {
                replay
                    .team_1
                    .iter()
                    .chain(replay.team_2.iter())
                    .any(|p| selected.contains(p.id.as_str()))
            })
            .collect();

        let mmr_diffs: Vec<f64> = relevant.iter().map(|r| r.max_mmr_diff).collect();
        let game_lengths: Vec<u32> = relevant.iter().map(|r| r.game_length).collect();
        let wait_times: Vec<u32> = unique
            .iter()
            .flat_map(|id| store.wait_times_of(id).iter().copied())
            .collect();

        let mut win_rates = Vec::new();
        for id in &unique {
            if let Some(player) = registry.get(id) {
                if player.is_active() {
                    win_rates.push(player.victories() as f64 / player.replays.len() as f64);
                }
            }
        }

        Self {
            avg_queue_time: average_or_sentinel(&wait_times),
            avg_max_mmr_diff: average_or_sentinel(&mmr_diffs),
            avg_game_length: average_or_sentinel(&game_lengths),
            num_games: relevant.len(),
            mmr_diffs,
            wait_times,
            game_lengths,
            win_rates,
            queue: queue.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Participant, Player, Team};
    use crate::utils::EMPTY_AVERAGE;

    fn record_game(
        store: &mut DataStore,
        registry: &mut PlayerRegistry,
        id: u64,
        team_1: &[(&str, f64)],
        team_2: &[(&str, f64)],
        winner: Team,
        length: u32,
    ) {
        let to_team = |team: &[(&str, f64)]| -> Vec<Participant> {
            team.iter().map(|(id, mmr)| Participant::new(*id, *mmr)).collect()
        };
        let replay = Arc::new(Replay::new(id, to_team(team_1), to_team(team_2), winner, length));
        store.store_replay(replay.clone());
        for (player_id, mmr) in team_1.iter().chain(team_2.iter()) {
            if !registry.contains(player_id) {
                registry.register(Player::new(*player_id, *mmr)).unwrap();
            }
            registry.get_mut(player_id).unwrap().replays.push(replay.clone());
        }
    }

    #[test]
    fn test_empty_selection_yields_sentinels() {
        let mut store = DataStore::new();
        let mut registry = PlayerRegistry::new();
        record_game(
            &mut store,
            &mut registry,
            1,
            &[("a", 1000.0)],
            &[("b", 1200.0)],
            Team::First,
            20,
        );
        store.store_wait_time("a", 4);

        let stats = Statistics::compute(&store, &registry, &[], &[]);
        assert_eq!(stats.num_games, 0);
        assert_eq!(stats.avg_queue_time, EMPTY_AVERAGE);
        assert_eq!(stats.avg_max_mmr_diff, EMPTY_AVERAGE);
        assert_eq!(stats.avg_game_length, EMPTY_AVERAGE);
        assert!(stats.win_rates.is_empty());
    }

    #[test]
    fn test_statistics_filter_by_player() {
        let mut store = DataStore::new();
        let mut registry = PlayerRegistry::new();
        record_game(
            &mut store,
            &mut registry,
            1,
            &[("a", 1000.0)],
            &[("b", 1200.0)],
            Team::First,
            20,
        );
        record_game(
            &mut store,
            &mut registry,
            2,
            &[("c", 1000.0)],
            &[("d", 1600.0)],
            Team::Second,
            10,
        );
        record_game(
            &mut store,
            &mut registry,
            3,
            &[("a", 1100.0)],
            &[("c", 1000.0)],
            Team::Second,
            30,
        );
        store.store_wait_time("a", 2);
        store.store_wait_time("a", 6);
        store.store_wait_time("d", 9);

        let stats =
            Statistics::compute(&store, &registry, &[], &["a".to_string(), "e".to_string()]);

        assert_eq!(stats.num_games, 2);
        assert_eq!(stats.mmr_diffs, vec![200.0, 100.0]);
        assert_eq!(stats.game_lengths, vec![20, 30]);
        assert_eq!(stats.wait_times, vec![2, 6]);
        assert_eq!(stats.avg_queue_time, 4.0);
        assert_eq!(stats.avg_max_mmr_diff, 150.0);
        assert_eq!(stats.avg_game_length, 25.0);
        assert_eq!(stats.win_rates, vec![0.5]);
    }

    #[test]
    fn test_repeated_player_counted_once() {
        let mut store = DataStore::new();
        let mut registry = PlayerRegistry::new();
        record_game(
            &mut store,
            &mut registry,
            1,
            &[("a", 1000.0)],
            &[("b", 1200.0)],
            Team::First,
            20,
        );
        store.store_wait_time("a", 4);

        let once = Statistics::compute(&store, &registry, &[], &["a".to_string()]);
        let twice = Statistics::compute(
            &store,
            &registry,
            &[],
            &["a".to_string(), "a".to_string()],
        );

        assert_eq!(twice.wait_times, vec![4]);
        assert_eq!(twice.win_rates, vec![1.0]);
        assert_eq!(twice.num_games, 1);
        assert_eq!(twice, once);
    }

    #[test]
    fn test_statistics_include_queue_snapshot() {
        let store = DataStore::new();
        let registry = PlayerRegistry::new();
        let queue = vec![Queuer::new("z", 1500.0)];

        let stats = Statistics::compute(&store, &registry, &queue, &[]);
        assert_eq!(stats.queue, queue);
    }
}
