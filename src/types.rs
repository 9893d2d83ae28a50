//! Common types used throughout the matchmaking simulator

use crate::utils::{average_mmr, max_mmr_diff};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Unique identifier for players
pub type PlayerId = String;

/// Unique identifier for lobbies, carried over to the game they seed
pub type LobbyId = u64;

/// Unique identifier for games
pub type GameId = LobbyId;

/// Skill rating ("mmr") of a player
pub type Mmr = f64;

/// Number of players on each side of a lobby unless a strategy says otherwise
pub const DEFAULT_TEAM_SIZE: usize = 5;

/// One of the two sides of a lobby or game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    First,
    Second,
}

impl Team {
    /// Zero based index of the team (0 or 1)
    pub fn index(self) -> usize {
        match self {
            Team::First => 0,
            Team::Second => 1,
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Team::First => Team::Second,
            Team::Second => Team::First,
        }
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Team::First => write!(f, "team 1"),
            Team::Second => write!(f, "team 2"),
        }
    }
}

/// A player's identity together with a rating snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: PlayerId,
    pub mmr: Mmr,
}

impl Participant {
    pub fn new(id: impl Into<PlayerId>, mmr: Mmr) -> Self {
        Self { id: id.into(), mmr }
    }
}

/// A registered player with its rating and finished games
#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub mmr: Mmr,
    /// Finished games in chronological order
    pub replays: Vec<Arc<Replay>>,
}

impl Player {
    pub fn new(id: impl Into<PlayerId>, mmr: Mmr) -> Self {
        Self {
            id: id.into(),
            mmr,
            replays: Vec::new(),
        }
    }

    pub fn participant(&self) -> Participant {
        Participant::new(self.id.clone(), self.mmr)
    }

    /// Whether the player has finished at least one game
    pub fn is_active(&self) -> bool {
        !self.replays.is_empty()
    }

    /// Number of finished games this player won
    pub fn victories(&self) -> usize {
        self.replays
            .iter()
            .filter(|replay| replay.was_won_by(&self.id))
            .count()
    }
}

/// A player waiting in the queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Queuer {
    pub player_id: PlayerId,
    /// Rating at the start of the current round
    pub mmr: Mmr,
    /// Whole rounds spent in the queue
    pub waited: u32,
}

impl Queuer {
    pub fn new(player_id: impl Into<PlayerId>, mmr: Mmr) -> Self {
        Self {
            player_id: player_id.into(),
            mmr,
            waited: 0,
        }
    }

    pub fn participant(&self) -> Participant {
        Participant::new(self.player_id.clone(), self.mmr)
    }
}

impl std::fmt::Display for Queuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({:.0})[{}]", self.player_id, self.mmr, self.waited)
    }
}

/// Two teams proposed by a matchmaking strategy, by player identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbyProposal {
    pub team_1: Vec<PlayerId>,
    pub team_2: Vec<PlayerId>,
}

impl LobbyProposal {
    pub fn new(team_1: Vec<PlayerId>, team_2: Vec<PlayerId>) -> Self {
        Self { team_1, team_2 }
    }

    /// Build a proposal from queue entries
    pub fn from_queuers(team_1: &[&Queuer], team_2: &[&Queuer]) -> Self {
        Self {
            team_1: team_1.iter().map(|q| q.player_id.clone()).collect(),
            team_2: team_2.iter().map(|q| q.player_id.clone()).collect(),
        }
    }

    pub fn players(&self) -> impl Iterator<Item = &PlayerId> {
        self.team_1.iter().chain(self.team_2.iter())
    }
}

/// Two teams that are about to become a game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lobby {
    pub id: LobbyId,
    pub team_1: Vec<Participant>,
    pub team_2: Vec<Participant>,
}

impl Lobby {
    pub fn max_mmr_diff(&self) -> Mmr {
        max_mmr_diff(&self.team_1, &self.team_2)
    }
}

impl std::fmt::Display for Lobby {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = |team: &[Participant]| {
            team.iter()
                .map(|p| format!("{}({:.0})", p.id, p.mmr))
                .collect::<Vec<_>>()
                .join(", ")
        };
        write!(
            f,
            "Lobby {}: [{}] VS [{}]",
            self.id,
            names(&self.team_1),
            names(&self.team_2)
        )
    }
}

/// A game in progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub team_1: Vec<Participant>,
    pub team_2: Vec<Participant>,
    /// Total duration in rounds
    pub length: u32,
    /// Rounds left until the game is finished
    pub time_left: u32,
    pub winner: Team,
}

impl Game {
    /// Create a game from a lobby with a decided outcome
    pub fn from_lobby(lobby: &Lobby, length: u32, winner: Team) -> Self {
        Self {
            id: lobby.id,
            team_1: lobby.team_1.clone(),
            team_2: lobby.team_2.clone(),
            length,
            time_left: length,
            winner,
        }
    }

    pub fn team(&self, team: Team) -> &[Participant] {
        match team {
            Team::First => &self.team_1,
            Team::Second => &self.team_2,
        }
    }

    pub fn winners(&self) -> &[Participant] {
        self.team(self.winner)
    }

    pub fn losers(&self) -> &[Participant] {
        self.team(self.winner.opponent())
    }

    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.team_1.iter().chain(self.team_2.iter())
    }

    /// Advance the game by one round. Returns true once no time is left.
    pub fn tick(&mut self) -> bool {
        self.time_left = self.time_left.saturating_sub(1);
        self.time_left == 0
    }
}

/// Immutable record of a finished game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Replay {
    pub game_id: GameId,
    pub team_1: Vec<Participant>,
    pub team_2: Vec<Participant>,
    pub winner: Team,
    /// Average rating of team 2 minus average rating of team 1
    pub mmr_diff: Mmr,
    /// Spread between the highest and lowest rated participant
    pub max_mmr_diff: Mmr,
    pub game_length: u32,
}

impl Replay {
    pub fn new(
        game_id: GameId,
        team_1: Vec<Participant>,
        team_2: Vec<Participant>,
        winner: Team,
        game_length: u32,
    ) -> Self {
        let mmr_diff = average_mmr(&team_2) - average_mmr(&team_1);
        let max_mmr_diff = max_mmr_diff(&team_1, &team_2);
        Self {
            game_id,
            team_1,
            team_2,
            winner,
            mmr_diff,
            max_mmr_diff,
            game_length,
        }
    }

    pub fn winner_index(&self) -> usize {
        self.winner.index()
    }

    pub fn winner_team(&self) -> &[Participant] {
        match self.winner {
            Team::First => &self.team_1,
            Team::Second => &self.team_2,
        }
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.team_1
            .iter()
            .chain(self.team_2.iter())
            .any(|p| p.id == player_id)
    }

    pub fn was_won_by(&self, player_id: &str) -> bool {
        self.winner_team().iter().any(|p| p.id == player_id)
    }
}
