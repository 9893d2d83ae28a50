//! Round-based simulation engine
//!
//! The [`Engine`] owns the queue, the games in flight, the player registry
//! and the recorded history. Every call to [`Engine::one_round`] ages the
//! queue, drains it into lobbies through the configured strategy, advances
//! running games and finally lets the environment react.

use crate::engine::listener::{GameFinishedListener, LobbyFoundListener};
use crate::engine::registry::PlayerRegistry;
use crate::engine::statistics::Statistics;
use crate::engine::store::DataStore;
use crate::environment::{Environment, QueueControl};
use crate::error::{MatchmakingError, Result};
use crate::matchmaking::MatchMaker;
use crate::rating::MmrEngine;
use crate::types::{
    Game, Lobby, LobbyId, LobbyProposal, Mmr, Participant, Player, PlayerId, Queuer, Replay,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, trace};

/// What happened during one call to [`Engine::one_round`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round: u64,
    pub lobbies_formed: usize,
    pub games_finished: usize,
    /// Players the environment put into the queue
    pub players_admitted: usize,
    /// Players the environment pulled out of the queue
    pub players_removed: usize,
    pub queue_len: usize,
}

/// Queue handle given to the environment
///
/// Borrows only the parts of the engine that queue bookkeeping touches, so
/// the environment can be driven while the engine holds it.
struct QueueAccess<'a> {
    queue: &'a mut Vec<Queuer>,
    players: &'a mut PlayerRegistry,
    mmr_engine: &'a mut dyn MmrEngine,
    admitted: usize,
    removed: usize,
}

impl QueueControl for QueueAccess<'_> {
    fn add_to_queue(&mut self, player_id: &str) -> Result<()> {
        if player_id.is_empty() {
            return Err(MatchmakingError::InvalidQueueRequest {
                reason: "player id cannot be empty".to_string(),
            }
            .into());
        }
        if self.queue.iter().any(|q| q.player_id == player_id) {
            return Err(MatchmakingError::AlreadyQueued {
                player_id: player_id.to_string(),
            }
            .into());
        }

        let mmr = match self.players.get(player_id) {
            Some(player) => player.mmr,
            None => {
                let mmr = self.mmr_engine.initial_mmr(player_id)?;
                self.players.register(Player::new(player_id, mmr))?;
                debug!("Registered player '{}' with rating {:.1}", player_id, mmr);
                mmr
            }
        };

        self.queue.push(Queuer::new(player_id, mmr));
        self.admitted += 1;
        trace!("Player '{}' joined the queue", player_id);
        Ok(())
    }

    fn remove_from_queue(&mut self, player_id: &str) -> Result<Queuer> {
        let index = self
            .queue
            .iter()
            .position(|q| q.player_id == player_id)
            .ok_or_else(|| MatchmakingError::NotQueued {
                player_id: player_id.to_string(),
            })?;
        self.removed += 1;
        trace!("Player '{}' left the queue", player_id);
        Ok(self.queue.remove(index))
    }

    fn queue(&self) -> &[Queuer] {
        self.queue.as_slice()
    }
}

/// The matchmaking simulation engine
pub struct Engine {
    queue: Vec<Queuer>,
    games: Vec<Game>,
    players: PlayerRegistry,
    data_store: DataStore,
    matchmaker: Box<dyn MatchMaker>,
    mmr_engine: Box<dyn MmrEngine>,
    environment: Box<dyn Environment>,
    lobby_listeners: Vec<Box<dyn LobbyFoundListener>>,
    game_listeners: Vec<Box<dyn GameFinishedListener>>,
    round: u64,
    next_lobby_id: LobbyId,
}

impl Engine {
    /// Create an engine with an empty queue and no history
    pub fn new(
        matchmaker: Box<dyn MatchMaker>,
        mmr_engine: Box<dyn MmrEngine>,
        environment: Box<dyn Environment>,
    ) -> Self {
        info!(
            "Creating engine with matchmaker '{}' and rating engine {}",
            matchmaker.name(),
            mmr_engine.config()
        );
        Self {
            queue: Vec::new(),
            games: Vec::new(),
            players: PlayerRegistry::new(),
            data_store: DataStore::new(),
            matchmaker,
            mmr_engine,
            environment,
            lobby_listeners: Vec::new(),
            game_listeners: Vec::new(),
            round: 0,
            next_lobby_id: 1,
        }
    }

    pub fn add_lobby_found_listener(&mut self, listener: Box<dyn LobbyFoundListener>) {
        self.lobby_listeners.push(listener);
    }

    pub fn add_game_finished_listener(&mut self, listener: Box<dyn GameFinishedListener>) {
        self.game_listeners.push(listener);
    }

    /// Advance the simulation by one round
    pub fn one_round(&mut self) -> Result<RoundSummary> {
        self.round += 1;

        for queuer in &mut self.queue {
            queuer.waited += 1;
            if let Some(player) = self.players.get(&queuer.player_id) {
                queuer.mmr = player.mmr;
            }
        }

        let mut lobbies_formed = 0;
        while let Some(proposal) = self.matchmaker.find_lobby(&self.queue) {
            self.on_found_lobby(proposal)?;
            lobbies_formed += 1;
        }

        for game in &mut self.games {
            game.tick();
        }
        let mut games_finished = 0;
        while let Some(index) = self.games.iter().position(|g| g.time_left == 0) {
            self.finish_game(index)?;
            games_finished += 1;
        }

        let mut access = QueueAccess {
            queue: &mut self.queue,
            players: &mut self.players,
            mmr_engine: self.mmr_engine.as_mut(),
            admitted: 0,
            removed: 0,
        };
        self.environment.one_round(&mut access)?;
        let (players_admitted, players_removed) = (access.admitted, access.removed);

        let summary = RoundSummary {
            round: self.round,
            lobbies_formed,
            games_finished,
            players_admitted,
            players_removed,
            queue_len: self.queue.len(),
        };
        debug!(
            "Round {} done - lobbies: {}, finished games: {}, queue: {}, in flight: {}",
            summary.round,
            summary.lobbies_formed,
            summary.games_finished,
            summary.queue_len,
            self.games.len()
        );
        Ok(summary)
    }

    /// Admit a player to the queue
    pub fn add_to_queue(&mut self, player_id: &str) -> Result<()> {
        self.queue_access().add_to_queue(player_id)
    }

    /// Withdraw a player from the queue
    pub fn remove_from_queue(&mut self, player_id: &str) -> Result<Queuer> {
        self.queue_access().remove_from_queue(player_id)
    }

    fn queue_access(&mut self) -> QueueAccess<'_> {
        QueueAccess {
            queue: &mut self.queue,
            players: &mut self.players,
            mmr_engine: self.mmr_engine.as_mut(),
            admitted: 0,
            removed: 0,
        }
    }

    fn validate_proposal(&self, proposal: &LobbyProposal) -> Result<()> {
        if proposal.team_1.is_empty() || proposal.team_2.is_empty() {
            return Err(MatchmakingError::InvalidLobby {
                reason: "teams cannot be empty".to_string(),
            }
            .into());
        }
        if proposal.team_1.len() != proposal.team_2.len() {
            return Err(MatchmakingError::InvalidLobby {
                reason: format!(
                    "team sizes differ ({} vs {})",
                    proposal.team_1.len(),
                    proposal.team_2.len()
                ),
            }
            .into());
        }

        let mut seen = HashSet::new();
        for player_id in proposal.players() {
            if !seen.insert(player_id.as_str()) {
                return Err(MatchmakingError::InvalidLobby {
                    reason: format!("player '{}' appears twice", player_id),
                }
                .into());
            }
            if !self.is_queued(player_id) {
                return Err(MatchmakingError::InvalidLobby {
                    reason: format!("player '{}' is not queued", player_id),
                }
                .into());
            }
        }
        Ok(())
    }

    fn take_queuers(&self, ids: &[PlayerId]) -> Vec<Queuer> {
        ids.iter()
            .filter_map(|id| self.queue.iter().find(|q| &q.player_id == id).cloned())
            .collect()
    }

    fn on_found_lobby(&mut self, proposal: LobbyProposal) -> Result<()> {
        self.validate_proposal(&proposal)?;

        let team_1 = self.take_queuers(&proposal.team_1);
        let team_2 = self.take_queuers(&proposal.team_2);
        let lobby = Lobby {
            id: self.next_lobby_id,
            team_1: team_1.iter().map(Queuer::participant).collect(),
            team_2: team_2.iter().map(Queuer::participant).collect(),
        };

        // nothing is committed until the environment accepts the lobby
        let game = self.environment.new_game(&lobby)?;
        if game.id != lobby.id || game.team_1 != lobby.team_1 || game.team_2 != lobby.team_2 {
            return Err(MatchmakingError::InvalidGame {
                reason: format!("game {} does not match lobby {}", game.id, lobby.id),
            }
            .into());
        }
        self.next_lobby_id += 1;

        for queuer in team_1.iter().chain(team_2.iter()) {
            self.data_store
                .store_wait_time(&queuer.player_id, queuer.waited);
        }
        let members: HashSet<&str> = proposal.players().map(String::as_str).collect();
        self.queue.retain(|q| !members.contains(q.player_id.as_str()));

        for listener in &mut self.lobby_listeners {
            listener.on_lobby_found(&team_1, &team_2);
        }

        debug!(
            "{} (spread {:.1}, length {})",
            lobby,
            lobby.max_mmr_diff(),
            game.length
        );
        self.games.push(game);
        Ok(())
    }

    /// Rating snapshot of a team after the latest rating update
    fn rated_team(&self, team: &[Participant]) -> Result<Vec<Participant>> {
        team.iter()
            .map(|p| Ok(Participant::new(p.id.clone(), self.players.mmr(&p.id)?)))
            .collect()
    }

    fn finish_game(&mut self, index: usize) -> Result<()> {
        self.environment
            .on_game_finished(&self.games[index], &self.players)?;
        self.mmr_engine
            .on_game_finished(&self.games[index], &mut self.players)?;

        let game = self.games.remove(index);
        let replay = Arc::new(Replay::new(
            game.id,
            self.rated_team(&game.team_1)?,
            self.rated_team(&game.team_2)?,
            game.winner,
            game.length,
        ));
        self.data_store.store_replay(replay.clone());
        for participant in game.participants() {
            if let Some(player) = self.players.get_mut(&participant.id) {
                player.replays.push(replay.clone());
            }
        }

        for listener in &mut self.game_listeners {
            listener.on_game_finished(&game);
        }
        debug!("Game {} finished, {} won", game.id, game.winner);
        Ok(())
    }

    pub fn is_queued(&self, player_id: &str) -> bool {
        self.queue.iter().any(|q| q.player_id == player_id)
    }

    /// Current queue in arrival order
    pub fn queue(&self) -> &[Queuer] {
        &self.queue
    }

    /// Games in flight, in creation order
    pub fn games(&self) -> &[Game] {
        &self.games
    }

    pub fn players(&self) -> &PlayerRegistry {
        &self.players
    }

    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.players.get(player_id)
    }

    /// Players with at least one finished game
    pub fn active_players(&self) -> Vec<&Player> {
        self.players.iter().filter(|p| p.is_active()).collect()
    }

    /// Players whose current rating lies within `low..=high`
    pub fn players_with_rating_between(&self, low: Mmr, high: Mmr) -> Vec<&Player> {
        self.players
            .iter()
            .filter(|p| p.mmr >= low && p.mmr <= high)
            .collect()
    }

    /// Fraction of finished games the player won
    pub fn player_winrate(&self, player_id: &str) -> Result<f64> {
        let player = self
            .players
            .get(player_id)
            .ok_or_else(|| MatchmakingError::PlayerNotFound {
                player_id: player_id.to_string(),
            })?;
        if !player.is_active() {
            return Err(MatchmakingError::NoReplays {
                player_id: player_id.to_string(),
            }
            .into());
        }
        Ok(player.victories() as f64 / player.replays.len() as f64)
    }

    pub fn data_store(&self) -> &DataStore {
        &self.data_store
    }

    /// Statistics restricted to the given players
    pub fn statistics(&self, players: &[PlayerId]) -> Statistics {
        Statistics::compute(&self.data_store, &self.players, &self.queue, players)
    }

    /// Rounds played so far
    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn environment(&self) -> &dyn Environment {
        self.environment.as_ref()
    }

    pub fn matchmaker(&self) -> &dyn MatchMaker {
        self.matchmaker.as_ref()
    }

    pub fn mmr_engine(&self) -> &dyn MmrEngine {
        self.mmr_engine.as_ref()
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("round", &self.round)
            .field("matchmaker", &self.matchmaker.name())
            .field("queue", &self.queue.len())
            .field("games", &self.games.len())
            .field("players", &self.players.len())
            .finish_non_exhaustive()
    }
}
