//! Player registry keyed by identity
//!
//! Players are created lazily the first time they enter the queue and are
//! never removed during a run. Iteration follows identity order so queries
//! are reproducible between runs.

use crate::error::{MatchmakingError, Result};
use crate::types::{Mmr, Player, PlayerId};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct PlayerRegistry {
    players: BTreeMap<PlayerId, Player>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, player_id: &str) -> Option<&Player> {
        self.players.get(player_id)
    }

    pub fn get_mut(&mut self, player_id: &str) -> Option<&mut Player> {
        self.players.get_mut(player_id)
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.players.contains_key(player_id)
    }

    /// Register a new player; registering the same identity twice is an error
    pub fn register(&mut self, player: Player) -> Result<&mut Player> {
        if self.players.contains_key(&player.id) {
            return Err(MatchmakingError::InvalidQueueRequest {
                reason: format!("player '{}' is already registered", player.id),
            }
            .into());
        }
        let id = player.id.clone();
        Ok(self.players.entry(id).or_insert(player))
    }

    /// Current rating of a registered player
    pub fn mmr(&self, player_id: &str) -> Result<Mmr> {
        self.get(player_id).map(|p| p.mmr).ok_or_else(|| {
            MatchmakingError::PlayerNotFound {
                player_id: player_id.to_string(),
            }
            .into()
        })
    }

    /// Overwrite the rating of a registered player
    pub fn set_mmr(&mut self, player_id: &str, mmr: Mmr) -> Result<()> {
        let player = self
            .get_mut(player_id)
            .ok_or_else(|| MatchmakingError::PlayerNotFound {
                player_id: player_id.to_string(),
            })?;
        player.mmr = mmr;
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = PlayerRegistry::new();
        registry.register(Player::new("alice", 2200.0)).unwrap();

        assert!(registry.contains("alice"));
        assert_eq!(registry.mmr("alice").unwrap(), 2200.0);
        assert!(registry.mmr("bob").is_err());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut registry = PlayerRegistry::new();
        registry.register(Player::new("alice", 2200.0)).unwrap();
        assert!(registry.register(Player::new("alice", 1000.0)).is_err());
        assert_eq!(registry.mmr("alice").unwrap(), 2200.0);
    }

    #[test]
    fn test_set_mmr() {
        let mut registry = PlayerRegistry::new();
        registry.register(Player::new("alice", 2200.0)).unwrap();
        registry.set_mmr("alice", 2300.0).unwrap();
        assert_eq!(registry.mmr("alice").unwrap(), 2300.0);

        let err = registry.set_mmr("bob", 1.0).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<MatchmakingError>(),
            Some(MatchmakingError::PlayerNotFound { .. })
        ));
    }

    #[test]
    fn test_iteration_is_ordered_by_identity() {
        let mut registry = PlayerRegistry::new();
        for id in ["carol", "alice", "bob"] {
            registry.register(Player::new(id, 2200.0)).unwrap();
        }
        let ids: Vec<_> = registry.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["alice", "bob", "carol"]);
    }
}
