//! Sorted-window strategies
//!
//! Both strategies sort the queue by rating, pick a random window of
//! `2 * team_size` neighbours and deal it alternately into two teams. The
//! filtered variant additionally rejects windows that fail a fairness
//! predicate and gives up for the round after a fixed number of attempts.

use crate::matchmaking::filters::LobbyFilter;
use crate::matchmaking::strategy::{sorted_by_mmr, MatchMaker};
use crate::types::{LobbyProposal, Queuer, DEFAULT_TEAM_SIZE};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Default number of windows a filtered strategy samples per lobby
pub const DEFAULT_MAX_ATTEMPTS: u32 = 50;

/// Sample a random rating-sorted window and split it into teams
fn sample_window<'a>(
    sorted: &[&'a Queuer],
    team_size: usize,
    rng: &mut StdRng,
) -> (Vec<&'a Queuer>, Vec<&'a Queuer>) {
    let len = sorted.len();
    let start = rng.gen_range(0..=len - team_size * 2);
    let mut team_1 = Vec::with_capacity(team_size);
    let mut team_2 = Vec::with_capacity(team_size);
    for i in 0..team_size {
        team_1.push(sorted[(start + 2 * i) % len]);
        team_2.push(sorted[(start + 2 * i + 1) % len]);
    }
    (team_1, team_2)
}

/// Random window over the rating-sorted queue, no fairness check
#[derive(Debug)]
pub struct SortedWindowMatchMaker {
    team_size: usize,
    rng: StdRng,
}

impl SortedWindowMatchMaker {
    pub fn new(team_size: usize, seed: u64) -> Self {
        Self {
            team_size,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for SortedWindowMatchMaker {
    fn default() -> Self {
        Self::new(DEFAULT_TEAM_SIZE, 0)
    }
}

impl MatchMaker for SortedWindowMatchMaker {
    fn find_lobby(&mut self, queue: &[Queuer]) -> Option<LobbyProposal> {
        if queue.len() < self.team_size * 2 {
            return None;
        }
        let sorted = sorted_by_mmr(queue);
        let (team_1, team_2) = sample_window(&sorted, self.team_size, &mut self.rng);
        Some(LobbyProposal::from_queuers(&team_1, &team_2))
    }

    fn name(&self) -> &str {
        "sorted-window"
    }
}

/// Random sorted window that must pass a fairness filter
pub struct FilteredMatchMaker {
    team_size: usize,
    max_attempts: u32,
    filter: Box<dyn LobbyFilter>,
    rng: StdRng,
}

impl FilteredMatchMaker {
    pub fn new(
        team_size: usize,
        max_attempts: u32,
        filter: impl LobbyFilter + 'static,
        seed: u64,
    ) -> Self {
        Self {
            team_size,
            max_attempts,
            filter: Box::new(filter),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl std::fmt::Debug for FilteredMatchMaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilteredMatchMaker")
            .field("team_size", &self.team_size)
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}

impl MatchMaker for FilteredMatchMaker {
    fn find_lobby(&mut self, queue: &[Queuer]) -> Option<LobbyProposal> {
        if queue.len() < self.team_size * 2 {
            return None;
        }
        let sorted = sorted_by_mmr(queue);
        for _ in 0..self.max_attempts {
            let (team_1, team_2) = sample_window(&sorted, self.team_size, &mut self.rng);
            if self.filter.accepts(&team_1, &team_2) {
                return Some(LobbyProposal::from_queuers(&team_1, &team_2));
            }
        }
        debug!(
            "No acceptable lobby after {} attempts - queue size: {}",
            self.max_attempts,
            queue.len()
        );
        None
    }

    fn name(&self) -> &str {
        "filtered-sorted-window"
    }
}
