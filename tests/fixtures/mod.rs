//! Test fixtures and stub implementations for integration testing

#![allow(dead_code)]

use matchmaking_sim::engine::{GameFinishedListener, LobbyFoundListener, PlayerRegistry};
use matchmaking_sim::environment::{Environment, QueueControl};
use matchmaking_sim::error::Result;
use matchmaking_sim::rating::SkillOracle;
use matchmaking_sim::types::{Game, GameId, Lobby, Mmr, Player, PlayerId, Queuer, Team};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Environment with scripted arrivals and fixed game outcomes
#[derive(Debug, Default)]
pub struct ScriptedEnvironment {
    /// Players to admit, one entry per round
    arrivals: VecDeque<Vec<PlayerId>>,
    length: u32,
    winner: Option<Team>,
    finished: Arc<Mutex<Vec<GameId>>>,
}

impl ScriptedEnvironment {
    pub fn new(length: u32, winner: Team) -> Self {
        Self {
            arrivals: VecDeque::new(),
            length,
            winner: Some(winner),
            finished: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Admit `players` during the next scripted round
    pub fn with_arrivals(mut self, players: &[&str]) -> Self {
        self.arrivals
            .push_back(players.iter().map(|p| p.to_string()).collect());
        self
    }

    /// Games the environment saw finish, shared with the test
    pub fn finished_games(&self) -> Arc<Mutex<Vec<GameId>>> {
        self.finished.clone()
    }
}

impl Environment for ScriptedEnvironment {
    fn one_round(&mut self, queue: &mut dyn QueueControl) -> Result<()> {
        if let Some(players) = self.arrivals.pop_front() {
            for player in players {
                queue.add_to_queue(&player)?;
            }
        }
        Ok(())
    }

    fn new_game(&mut self, lobby: &Lobby) -> Result<Game> {
        Ok(Game::from_lobby(
            lobby,
            self.length,
            self.winner.unwrap_or(Team::First),
        ))
    }

    fn on_game_finished(&mut self, game: &Game, _players: &PlayerRegistry) -> Result<()> {
        if let Ok(mut finished) = self.finished.lock() {
            finished.push(game.id);
        }
        Ok(())
    }

    fn player_skill(&self, _player_id: &str) -> Option<Mmr> {
        None
    }

    fn player_happiness(&self, _player: &Player) -> f64 {
        0.0
    }
}

/// Fixed table of true skills
#[derive(Debug, Default)]
pub struct FixedSkills(pub HashMap<PlayerId, Mmr>);

impl FixedSkills {
    pub fn from_pairs(pairs: &[(&str, Mmr)]) -> Self {
        Self(pairs.iter().map(|(id, mmr)| (id.to_string(), *mmr)).collect())
    }
}

impl SkillOracle for FixedSkills {
    fn player_skill(&self, player_id: &str) -> Option<Mmr> {
        self.0.get(player_id).copied()
    }
}

/// Lobby listener that captures every lobby for testing
#[derive(Debug, Default, Clone)]
pub struct LobbyRecorder {
    tag: &'static str,
    lobbies: Arc<Mutex<Vec<(Vec<Queuer>, Vec<Queuer>)>>>,
    log: Arc<Mutex<Vec<&'static str>>>,
}

impl LobbyRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorder writing `tag` into a log shared with other recorders
    pub fn tagged(tag: &'static str, log: Arc<Mutex<Vec<&'static str>>>) -> Self {
        Self {
            tag,
            lobbies: Arc::new(Mutex::new(Vec::new())),
            log,
        }
    }

    pub fn lobbies(&self) -> Vec<(Vec<Queuer>, Vec<Queuer>)> {
        self.lobbies
            .lock()
            .map(|lobbies| lobbies.clone())
            .unwrap_or_default()
    }
}

impl LobbyFoundListener for LobbyRecorder {
    fn on_lobby_found(&mut self, team_1: &[Queuer], team_2: &[Queuer]) {
        if let Ok(mut lobbies) = self.lobbies.lock() {
            lobbies.push((team_1.to_vec(), team_2.to_vec()));
        }
        if let Ok(mut log) = self.log.lock() {
            log.push(self.tag);
        }
    }
}

/// Game listener that captures every finished game for testing
#[derive(Debug, Default, Clone)]
pub struct GameRecorder {
    games: Arc<Mutex<Vec<Game>>>,
}

impl GameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn games(&self) -> Vec<Game> {
        self.games
            .lock()
            .map(|games| games.clone())
            .unwrap_or_default()
    }
}

impl GameFinishedListener for GameRecorder {
    fn on_game_finished(&mut self, game: &Game) {
        if let Ok(mut games) = self.games.lock() {
            games.push(game.clone());
        }
    }
}

/// Player ids `prefix0 .. prefix{count-1}`
pub fn player_ids(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{}{}", prefix, i)).collect()
}
