//! Append-only history of finished games and queue wait times

use crate::types::{PlayerId, Replay};
use std::collections::HashMap;
use std::sync::Arc;

/// Write-once record of a simulation run
#[derive(Debug, Clone, Default)]
pub struct DataStore {
    replays: Vec<Arc<Replay>>,
    wait_times: HashMap<PlayerId, Vec<u32>>,
}

impl DataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finished game
    pub fn store_replay(&mut self, replay: Arc<Replay>) {
        self.replays.push(replay);
    }

    /// Append a wait time sample for a player
    pub fn store_wait_time(&mut self, player_id: &str, waited: u32) {
        self.wait_times
            .entry(player_id.to_string())
            .or_default()
            .push(waited);
    }

    /// All finished games in the order they finished
    pub fn replays(&self) -> &[Arc<Replay>] {
        &self.replays
    }

    /// Wait time samples of one player, in the order they were recorded
    pub fn wait_times_of(&self, player_id: &str) -> &[u32] {
        self.wait_times
            .get(player_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn num_wait_samples(&self) -> usize {
        self.wait_times.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Participant, Team};

    #[test]
    fn test_wait_times_accumulate_per_player() {
        let mut store = DataStore::new();
        store.store_wait_time("alice", 3);
        store.store_wait_time("bob", 1);
        store.store_wait_time("alice", 7);

        assert_eq!(store.wait_times_of("alice"), &[3, 7]);
        assert_eq!(store.wait_times_of("bob"), &[1]);
        assert!(store.wait_times_of("carol").is_empty());
        assert_eq!(store.num_wait_samples(), 3);
    }

    #[test]
    fn test_replays_keep_insertion_order() {
        let mut store = DataStore::new();
        for id in 0..3 {
            store.store_replay(Arc::new(Replay::new(
                id,
                vec![Participant::new("a", 1000.0)],
                vec![Participant::new("b", 1000.0)],
                Team::First,
                10,
            )));
        }
        let ids: Vec<_> = store.replays().iter().map(|r| r.game_id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }
}
