//! Metrics for simulation runs
//!
//! This module collects Prometheus metrics about lobbies, games and the
//! queue, labelled by matchmaking strategy.

pub mod collector;

pub use collector::{LobbyMetrics, MetricsCollector, MetricsTimer, RoundMetrics, StrategyMetrics};
