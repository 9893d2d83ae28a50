//! Matchmaking Sim - round-based simulator for skill-based matchmaking
//!
//! This crate provides a simulation engine that forms lobbies from a queue
//! of players, pluggable matchmaking strategies and rating engines, and a
//! simulated player population to evaluate them against.

pub mod config;
pub mod engine;
pub mod environment;
pub mod error;
pub mod matchmaking;
pub mod metrics;
pub mod rating;
pub mod runner;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{MatchmakingError, Result};
pub use types::*;

// Re-export key components
pub use engine::{Engine, RoundSummary, Statistics};
pub use environment::{Environment, QueueControl};
pub use matchmaking::MatchMaker;
pub use rating::MmrEngine;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
