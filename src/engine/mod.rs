//! Simulation engine and its bookkeeping
//!
//! The engine drives rounds; the registry, data store and statistics modules
//! hold and summarise what happened.

pub mod core;
pub mod listener;
pub mod registry;
pub mod statistics;
pub mod store;

pub use self::core::{Engine, RoundSummary};
pub use listener::{GameFinishedListener, LobbyFoundListener};
pub use registry::PlayerRegistry;
pub use statistics::Statistics;
pub use store::DataStore;
