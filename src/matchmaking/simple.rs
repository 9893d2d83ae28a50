//! Baseline strategies that ignore ratings
//!
//! These are useful as reference points when comparing how much a
//! rating-aware strategy actually improves lobby quality.

use crate::matchmaking::strategy::MatchMaker;
use crate::types::{LobbyProposal, Queuer, DEFAULT_TEAM_SIZE};
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::SeedableRng;

/// First `team_size` queuers against the next `team_size`, in arrival order
#[derive(Debug, Clone)]
pub struct SlicingMatchMaker {
    team_size: usize,
}

impl SlicingMatchMaker {
    pub fn new(team_size: usize) -> Self {
        Self { team_size }
    }
}

impl Default for SlicingMatchMaker {
    fn default() -> Self {
        Self::new(DEFAULT_TEAM_SIZE)
    }
}

impl MatchMaker for SlicingMatchMaker {
    fn find_lobby(&mut self, queue: &[Queuer]) -> Option<LobbyProposal> {
        if queue.len() < self.team_size * 2 {
            return None;
        }
        let picked: Vec<&Queuer> = queue.iter().take(self.team_size * 2).collect();
        let (team_1, team_2) = picked.split_at(self.team_size);
        Some(LobbyProposal::from_queuers(team_1, team_2))
    }

    fn name(&self) -> &str {
        "slicing"
    }
}

/// Uniformly random queuers split into two halves
#[derive(Debug)]
pub struct RandomMatchMaker {
    team_size: usize,
    rng: StdRng,
}

impl RandomMatchMaker {
    pub fn new(team_size: usize, seed: u64) -> Self {
        Self {
            team_size,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl MatchMaker for RandomMatchMaker {
    fn find_lobby(&mut self, queue: &[Queuer]) -> Option<LobbyProposal> {
        if queue.len() < self.team_size * 2 {
            return None;
        }
        let picked: Vec<&Queuer> = sample(&mut self.rng, queue.len(), self.team_size * 2)
            .into_iter()
            .map(|index| &queue[index])
            .collect();
        let (team_1, team_2) = picked.split_at(self.team_size);
        Some(LobbyProposal::from_queuers(team_1, team_2))
    }

    fn name(&self) -> &str {
        "random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn queue_of(size: usize) -> Vec<Queuer> {
        (0..size)
            .map(|i| Queuer::new(format!("p{}", i), 2000.0))
            .collect()
    }

    #[test]
    fn test_slicing_takes_arrival_order() {
        let mut matchmaker = SlicingMatchMaker::default();
        let proposal = matchmaker.find_lobby(&queue_of(12)).unwrap();
        assert_eq!(proposal.team_1, vec!["p0", "p1", "p2", "p3", "p4"]);
        assert_eq!(proposal.team_2, vec!["p5", "p6", "p7", "p8", "p9"]);
    }

    #[test]
    fn test_slicing_needs_full_lobby() {
        let mut matchmaker = SlicingMatchMaker::new(2);
        assert!(matchmaker.find_lobby(&queue_of(3)).is_none());
        assert!(matchmaker.find_lobby(&queue_of(4)).is_some());
    }

    #[test]
    fn test_random_picks_distinct_queuers() {
        let mut matchmaker = RandomMatchMaker::new(5, 11);
        let queue = queue_of(25);
        for _ in 0..20 {
            let proposal = matchmaker.find_lobby(&queue).unwrap();
            let unique: HashSet<_> = proposal.players().collect();
            assert_eq!(unique.len(), 10);
        }
    }
}
