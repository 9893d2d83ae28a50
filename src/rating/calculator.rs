//! Rating engine trait and basic implementations
//!
//! An [`MmrEngine`] decides the starting rating of a newly seen player and
//! applies rating changes once a game has finished. The simulation engine
//! only talks to this trait and never assumes a particular update rule.

use crate::engine::registry::PlayerRegistry;
use crate::error::{MatchmakingError, Result};
use crate::types::{Game, Mmr};
use std::sync::Arc;

/// Rating assigned to new players by [`FixedMarginMmrEngine`]
pub const DEFAULT_INITIAL_MMR: Mmr = 2200.0;

/// Rating gained by each winner and lost by each loser
pub const DEFAULT_MMR_MARGIN: Mmr = 100.0;

/// Trait for computing and updating player ratings
#[cfg_attr(test, mockall::automock)]
pub trait MmrEngine: Send {
    /// Starting rating for a player seen for the first time
    fn initial_mmr(&mut self, player_id: &str) -> Result<Mmr>;

    /// Apply rating changes for a finished game
    ///
    /// # Arguments
    /// * `game` - The finished game, including its winner
    /// * `players` - Registry holding the participants' current ratings
    fn on_game_finished(&mut self, game: &Game, players: &mut PlayerRegistry) -> Result<()>;

    /// Current configuration as JSON, for run reports
    fn config(&self) -> serde_json::Value;
}

/// Source of a player's true skill, as known to the environment
pub trait SkillOracle: Send + Sync {
    fn player_skill(&self, player_id: &str) -> Option<Mmr>;
}

/// Winners gain and losers lose a fixed amount
#[derive(Debug, Clone)]
pub struct FixedMarginMmrEngine {
    initial_mmr: Mmr,
    margin: Mmr,
}

impl FixedMarginMmrEngine {
    pub fn new(initial_mmr: Mmr, margin: Mmr) -> Self {
        Self {
            initial_mmr,
            margin,
        }
    }
}

impl Default for FixedMarginMmrEngine {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_MMR, DEFAULT_MMR_MARGIN)
    }
}

impl MmrEngine for FixedMarginMmrEngine {
    fn initial_mmr(&mut self, _player_id: &str) -> Result<Mmr> {
        Ok(self.initial_mmr)
    }

    fn on_game_finished(&mut self, game: &Game, players: &mut PlayerRegistry) -> Result<()> {
        for winner in game.winners() {
            let mmr = players.mmr(&winner.id)?;
            players.set_mmr(&winner.id, mmr + self.margin)?;
        }
        for loser in game.losers() {
            let mmr = players.mmr(&loser.id)?;
            players.set_mmr(&loser.id, mmr - self.margin)?;
        }
        Ok(())
    }

    fn config(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "fixed_margin",
            "initial_mmr": self.initial_mmr,
            "margin": self.margin
        })
    }
}

/// Ratings are the environment's true skill and never change
///
/// Useful to judge a matchmaking strategy against ground truth, without
/// rating noise getting in the way.
#[derive(Clone)]
pub struct SkillPassthroughMmrEngine {
    oracle: Arc<dyn SkillOracle>,
}

impl SkillPassthroughMmrEngine {
    pub fn new(oracle: Arc<dyn SkillOracle>) -> Self {
        Self { oracle }
    }
}

impl std::fmt::Debug for SkillPassthroughMmrEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkillPassthroughMmrEngine").finish_non_exhaustive()
    }
}

impl MmrEngine for SkillPassthroughMmrEngine {
    fn initial_mmr(&mut self, player_id: &str) -> Result<Mmr> {
        self.oracle.player_skill(player_id).ok_or_else(|| {
            MatchmakingError::PlayerNotFound {
                player_id: player_id.to_string(),
            }
            .into()
        })
    }

    fn on_game_finished(&mut self, _game: &Game, _players: &mut PlayerRegistry) -> Result<()> {
        Ok(())
    }

    fn config(&self) -> serde_json::Value {
        serde_json::json!({ "type": "skill_passthrough" })
    }
}
