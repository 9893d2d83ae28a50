//! Error types for the matchmaking simulator
//!
//! Contract violations (bad identities, malformed lobbies, unknown queuers) are
//! raised as [`MatchmakingError`] and surfaced through the `anyhow` based
//! [`Result`] alias, so a broken caller fails loudly instead of being recovered.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific matchmaking scenarios
#[derive(Debug, thiserror::Error)]
pub enum MatchmakingError {
    #[error("Invalid queue request: {reason}")]
    InvalidQueueRequest { reason: String },

    #[error("Player not found: {player_id}")]
    PlayerNotFound { player_id: String },

    #[error("Player is not in the queue: {player_id}")]
    NotQueued { player_id: String },

    #[error("Player is already queued: {player_id}")]
    AlreadyQueued { player_id: String },

    #[error("Invalid lobby: {reason}")]
    InvalidLobby { reason: String },

    #[error("Invalid game: {reason}")]
    InvalidGame { reason: String },

    #[error("Player has no finished games: {player_id}")]
    NoReplays { player_id: String },

    #[error("Rating calculation failed: {reason}")]
    RatingCalculationFailed { reason: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Internal simulation error: {message}")]
    InternalError { message: String },
}
