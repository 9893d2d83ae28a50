//! Environment interface: the world the matchmaking engine runs in
//!
//! An environment decides who enters and leaves the queue, how a lobby plays
//! out as a game and how players react to finished games. The engine hands
//! it a [`QueueControl`] handle each round instead of registering callbacks,
//! so queue mutations always go through the engine's own bookkeeping.

pub mod population;

use crate::engine::registry::PlayerRegistry;
use crate::error::Result;
use crate::types::{Game, Lobby, Mmr, Player, Queuer};

pub use population::{PopulationConfig, PopulationEnvironment, PopulationSkills};

/// Queue operations the engine exposes to its environment
pub trait QueueControl {
    /// Admit a player to the queue, registering it on first sight
    fn add_to_queue(&mut self, player_id: &str) -> Result<()>;

    /// Withdraw a queued player, returning its queue entry
    fn remove_from_queue(&mut self, player_id: &str) -> Result<Queuer>;

    /// Current queue in arrival order
    fn queue(&self) -> &[Queuer];
}

/// Trait for the simulated world around the engine
pub trait Environment: Send {
    /// Population level effects for one round (arrivals, breaks, departures)
    fn one_round(&mut self, queue: &mut dyn QueueControl) -> Result<()>;

    /// Turn a lobby into a game with a decided winner and duration
    fn new_game(&mut self, lobby: &Lobby) -> Result<Game>;

    /// React to a finished game, before ratings are updated
    fn on_game_finished(&mut self, game: &Game, players: &PlayerRegistry) -> Result<()>;

    /// Ground-truth skill of a player, if the environment knows it
    fn player_skill(&self, player_id: &str) -> Option<Mmr>;

    /// How content a player is with the games played so far
    fn player_happiness(&self, player: &Player) -> f64;
}
