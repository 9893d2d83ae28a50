//! Weng-Lin (OpenSkill) rating engine
//!
//! Team ratings are updated with the two-team Weng-Lin model from the
//! skillratings crate. The simulator only stores a single rating per player,
//! so the per-player uncertainty is tracked inside the engine.

use crate::engine::registry::PlayerRegistry;
use crate::error::{MatchmakingError, Result};
use crate::rating::calculator::MmrEngine;
use crate::types::{Game, Mmr, Participant, PlayerId, Team};
use serde::{Deserialize, Serialize};
use skillratings::weng_lin::{weng_lin_two_teams, WengLinConfig, WengLinRating};
use skillratings::Outcomes;
use std::collections::HashMap;
use tracing::debug;

/// Extended configuration for the Weng-Lin rating system
/// This wraps the skillratings WengLinConfig with additional parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtendedWengLinConfig {
    /// Core Weng-Lin parameters
    pub weng_lin_config: WengLinConfig,
    /// Initial rating for new players
    pub initial_rating: f64,
    /// Initial uncertainty for new players
    pub initial_uncertainty: f64,
}

impl Default for ExtendedWengLinConfig {
    fn default() -> Self {
        Self {
            weng_lin_config: WengLinConfig {
                beta: 200.0,
                uncertainty_tolerance: 0.0001,
            },
            initial_rating: 2200.0,
            initial_uncertainty: 200.0,
        }
    }
}

impl ExtendedWengLinConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.weng_lin_config.beta <= 0.0 {
            return Err(MatchmakingError::ConfigurationError {
                message: "Beta must be positive".to_string(),
            }
            .into());
        }

        if self.weng_lin_config.uncertainty_tolerance < 0.0 {
            return Err(MatchmakingError::ConfigurationError {
                message: "Uncertainty tolerance must be non-negative".to_string(),
            }
            .into());
        }

        if self.initial_uncertainty <= 0.0 {
            return Err(MatchmakingError::ConfigurationError {
                message: "Initial uncertainty must be positive".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Rating engine backed by the Weng-Lin two-team update
#[derive(Debug)]
pub struct WengLinMmrEngine {
    config: ExtendedWengLinConfig,
    uncertainties: HashMap<PlayerId, f64>,
}

impl WengLinMmrEngine {
    pub fn new(config: ExtendedWengLinConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            uncertainties: HashMap::new(),
        })
    }

    /// Current uncertainty for a player, the initial one if never rated
    pub fn uncertainty(&self, player_id: &str) -> f64 {
        self.uncertainties
            .get(player_id)
            .copied()
            .unwrap_or(self.config.initial_uncertainty)
    }

    fn team_ratings(
        &self,
        team: &[Participant],
        players: &PlayerRegistry,
    ) -> Result<Vec<WengLinRating>> {
        team.iter()
            .map(|p| {
                Ok(WengLinRating {
                    rating: players.mmr(&p.id)?,
                    uncertainty: self.uncertainty(&p.id),
                })
            })
            .collect()
    }

    fn store_team(
        &mut self,
        team: &[Participant],
        ratings: Vec<WengLinRating>,
        players: &mut PlayerRegistry,
    ) -> Result<()> {
        if team.len() != ratings.len() {
            return Err(MatchmakingError::RatingCalculationFailed {
                reason: format!(
                    "expected {} ratings, got {}",
                    team.len(),
                    ratings.len()
                ),
            }
            .into());
        }
        for (participant, rating) in team.iter().zip(ratings) {
            players.set_mmr(&participant.id, rating.rating)?;
            self.uncertainties
                .insert(participant.id.clone(), rating.uncertainty);
        }
        Ok(())
    }
}

impl MmrEngine for WengLinMmrEngine {
    fn initial_mmr(&mut self, _player_id: &str) -> Result<Mmr> {
        Ok(self.config.initial_rating)
    }

    fn on_game_finished(&mut self, game: &Game, players: &mut PlayerRegistry) -> Result<()> {
        let team_one = self.team_ratings(&game.team_1, players)?;
        let team_two = self.team_ratings(&game.team_2, players)?;
        let outcome = match game.winner {
            Team::First => Outcomes::WIN,
            Team::Second => Outcomes::LOSS,
        };

        let (new_one, new_two) = weng_lin_two_teams(
            &team_one,
            &team_two,
            &outcome,
            &self.config.weng_lin_config,
        );

        debug!(
            "Weng-Lin update for game {} - winner: {}",
            game.id, game.winner
        );

        self.store_team(&game.team_1, new_one, players)?;
        self.store_team(&game.team_2, new_two, players)?;
        Ok(())
    }

    fn config(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "weng_lin",
            "beta": self.config.weng_lin_config.beta,
            "uncertainty_tolerance": self.config.weng_lin_config.uncertainty_tolerance,
            "initial_rating": self.config.initial_rating,
            "initial_uncertainty": self.config.initial_uncertainty
        })
    }
}
