//! Observer hooks fired by the engine
//!
//! Listeners are invoked synchronously, in registration order. The engine
//! never looks at anything a listener does.

use crate::types::{Game, Queuer};

/// Notified each time a lobby has been pulled out of the queue
pub trait LobbyFoundListener: Send {
    fn on_lobby_found(&mut self, team_1: &[Queuer], team_2: &[Queuer]);
}

/// Notified after a game has been finalized and recorded
pub trait GameFinishedListener: Send {
    fn on_game_finished(&mut self, game: &Game);
}
