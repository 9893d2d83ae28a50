//! Configuration management for the matchmaking simulator
//!
//! This module handles configuration loading from TOML files and environment
//! variables, validation, default values, and turning settings into the
//! strategy objects an engine runs with.

pub mod app;
pub mod matchmaking;
pub mod rating;

// Re-export commonly used types
pub use app::{validate_config, ServiceSettings, SimulationConfig, SimulationSettings};
pub use matchmaking::{MatchmakingSettings, StrategyKind};
pub use rating::{RatingEngineKind, RatingSettings};
