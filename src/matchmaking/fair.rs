//! Greedy per-queuer matchmaking
//!
//! Queuers are visited in arrival order. For each one the strategy looks at
//! the `2 * team_size` rating-sorted neighbours starting at that queuer's
//! position (clamped to the top end of the queue) and accepts the first
//! window whose spread is within a bound that widens as the longest waiting
//! member of the window waits longer.

use crate::matchmaking::strategy::{
    max_wait, queuer_spread, sorted_by_mmr, split_alternating, MatchMaker,
};
use crate::types::{LobbyProposal, Mmr, Queuer, DEFAULT_TEAM_SIZE};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Tuning for [`FairMatchMaker`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FairMethodConfig {
    pub team_size: usize,
    /// Number of queuers (in arrival order) considered per lobby
    pub scan_limit: usize,
    /// Spread tolerated for a window nobody has waited in
    pub base_mmr_spread: Mmr,
    /// Wait after which the tolerated spread grows faster
    pub long_wait_threshold: u32,
    /// Spread added per round waited once past the threshold
    pub long_wait_multiplier: f64,
}

impl Default for FairMethodConfig {
    fn default() -> Self {
        Self {
            team_size: DEFAULT_TEAM_SIZE,
            scan_limit: 100,
            base_mmr_spread: 100.0,
            long_wait_threshold: 300,
            long_wait_multiplier: 2.0,
        }
    }
}

impl FairMethodConfig {
    /// Rating spread accepted for a window whose longest wait is `max_wait`
    pub fn allowed_spread(&self, max_wait: u32) -> Mmr {
        if max_wait < self.long_wait_threshold {
            self.base_mmr_spread + max_wait as f64
        } else {
            self.base_mmr_spread + max_wait as f64 * self.long_wait_multiplier
        }
    }
}

/// Greedy strategy scanning queuers in arrival order
#[derive(Debug, Clone, Default)]
pub struct FairMatchMaker {
    config: FairMethodConfig,
}

impl FairMatchMaker {
    pub fn new(config: FairMethodConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FairMethodConfig {
        &self.config
    }

    /// Window of neighbours starting at `position`, shifted left near the end
    fn window_at<'a>(&self, sorted: &[&'a Queuer], position: usize) -> Vec<&'a Queuer> {
        let size = self.config.team_size * 2;
        let start = if sorted.len() - position >= size {
            position
        } else {
            sorted.len() - size
        };
        sorted[start..start + size].to_vec()
    }

    fn lobby_for(&self, queuer: &Queuer, sorted: &[&Queuer]) -> Option<LobbyProposal> {
        let position = sorted
            .iter()
            .position(|q| q.player_id == queuer.player_id)?;
        let window = self.window_at(sorted, position);
        let (team_1, team_2) = split_alternating(&window, self.config.team_size);

        let allowed = self.config.allowed_spread(max_wait(&team_1, &team_2));
        if queuer_spread(&team_1, &team_2) < allowed {
            Some(LobbyProposal::from_queuers(&team_1, &team_2))
        } else {
            None
        }
    }
}

impl MatchMaker for FairMatchMaker {
    fn find_lobby(&mut self, queue: &[Queuer]) -> Option<LobbyProposal> {
        if queue.len() < self.config.team_size * 2 {
            return None;
        }
        let sorted = sorted_by_mmr(queue);
        let scan = self.config.scan_limit.min(queue.len());
        let found = queue
            .iter()
            .take(scan)
            .find_map(|queuer| self.lobby_for(queuer, &sorted));

        if found.is_none() {
            debug!("Fair method found no lobby after scanning {} queuers", scan);
        }
        found
    }

    fn name(&self) -> &str {
        "fair"
    }
}
