//! Metrics collection using Prometheus
//!
//! This module records what happens inside simulation runs as Prometheus
//! metrics. Every metric carries a `strategy` label so runs of different
//! matchmaking strategies can share one registry.

use crate::engine::{GameFinishedListener, LobbyFoundListener, RoundSummary};
use crate::types::{Game, Queuer};
use crate::utils::rating_spread;
use anyhow::Result;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGaugeVec, Opts, Registry,
    TextEncoder,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Main metrics collector for simulation runs
#[derive(Clone)]
pub struct MetricsCollector {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Round and queue metrics
    round_metrics: RoundMetrics,

    /// Lobby and game metrics
    lobby_metrics: LobbyMetrics,
}

/// Round and queue metrics
#[derive(Clone)]
pub struct RoundMetrics {
    /// Rounds simulated
    pub rounds_total: IntCounterVec,

    /// Queue length at the end of the latest round
    pub queue_size: IntGaugeVec,

    /// Players entering or leaving the queue through the environment
    pub queue_events_total: IntCounterVec,

    /// Wall clock time spent per round
    pub round_duration_seconds: HistogramVec,
}

/// Lobby and game metrics
#[derive(Clone)]
pub struct LobbyMetrics {
    /// Lobbies pulled out of the queue
    pub lobbies_formed_total: IntCounterVec,

    /// Games finalized
    pub games_finished_total: IntCounterVec,

    /// Rounds each matched player spent in the queue
    pub queue_wait_rounds: HistogramVec,

    /// Rating spread of formed lobbies
    pub lobby_mmr_spread: HistogramVec,

    /// Duration of finished games in rounds
    pub game_length_rounds: HistogramVec,
}

impl MetricsCollector {
    /// Create a new metrics collector with its own registry
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        Self::with_registry(registry)
    }

    /// Create a new metrics collector with custom registry
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let round_metrics = RoundMetrics::new(&registry)?;
        let lobby_metrics = LobbyMetrics::new(&registry)?;

        Ok(Self {
            registry,
            round_metrics,
            lobby_metrics,
        })
    }

    pub fn rounds(&self) -> &RoundMetrics {
        &self.round_metrics
    }

    pub fn lobby(&self) -> &LobbyMetrics {
        &self.lobby_metrics
    }

    /// Handle that records under the given strategy label
    ///
    /// The handle implements the engine listener traits, so it can be
    /// registered on an engine directly.
    pub fn for_strategy(&self, strategy: &str) -> StrategyMetrics {
        StrategyMetrics {
            collector: self.clone(),
            strategy: strategy.to_string(),
        }
    }

    /// Create a timer for measuring operation duration
    pub fn start_timer(&self) -> MetricsTimer {
        MetricsTimer::start()
    }

    /// Render every registered metric in the Prometheus text format
    pub fn gather_text(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

/// Metrics of a single strategy's run
#[derive(Clone)]
pub struct StrategyMetrics {
    collector: MetricsCollector,
    strategy: String,
}

impl StrategyMetrics {
    pub fn strategy(&self) -> &str {
        &self.strategy
    }

    /// Start timing a round for [`StrategyMetrics::record_round`]
    pub fn start_timer(&self) -> MetricsTimer {
        self.collector.start_timer()
    }

    /// Record the outcome of one engine round timed by `timer`
    pub fn record_round(&self, summary: &RoundSummary, timer: MetricsTimer) {
        let rounds = &self.collector.round_metrics;
        let label = self.strategy.as_str();

        rounds.rounds_total.with_label_values(&[label]).inc();
        rounds
            .queue_size
            .with_label_values(&[label])
            .set(summary.queue_len as i64);
        rounds
            .queue_events_total
            .with_label_values(&[label, "admitted"])
            .inc_by(summary.players_admitted as u64);
        rounds
            .queue_events_total
            .with_label_values(&[label, "removed"])
            .inc_by(summary.players_removed as u64);
        rounds
            .round_duration_seconds
            .with_label_values(&[label])
            .observe(timer.stop().as_secs_f64());
    }
}

impl LobbyFoundListener for StrategyMetrics {
    fn on_lobby_found(&mut self, team_1: &[Queuer], team_2: &[Queuer]) {
        let lobby = &self.collector.lobby_metrics;
        let label = self.strategy.as_str();

        lobby.lobbies_formed_total.with_label_values(&[label]).inc();
        for queuer in team_1.iter().chain(team_2.iter()) {
            lobby
                .queue_wait_rounds
                .with_label_values(&[label])
                .observe(queuer.waited as f64);
        }
        let spread = rating_spread(team_1.iter().chain(team_2.iter()).map(|q| q.mmr));
        lobby
            .lobby_mmr_spread
            .with_label_values(&[label])
            .observe(spread);
    }
}

impl GameFinishedListener for StrategyMetrics {
    fn on_game_finished(&mut self, game: &Game) {
        let lobby = &self.collector.lobby_metrics;
        let label = self.strategy.as_str();

        lobby.games_finished_total.with_label_values(&[label]).inc();
        lobby
            .game_length_rounds
            .with_label_values(&[label])
            .observe(game.length as f64);
    }
}

/// Timer for measuring operation durations
pub struct MetricsTimer {
    start: Instant,
}

impl MetricsTimer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get the elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop the timer and return the duration
    pub fn stop(self) -> Duration {
        self.elapsed()
    }
}

impl RoundMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let rounds_total = IntCounterVec::new(
            Opts::new("matchmaking_sim_rounds_total", "Rounds simulated"),
            &["strategy"],
        )?;
        registry.register(Box::new(rounds_total.clone()))?;

        let queue_size = IntGaugeVec::new(
            Opts::new("matchmaking_sim_queue_size", "Players waiting in queue"),
            &["strategy"],
        )?;
        registry.register(Box::new(queue_size.clone()))?;

        let queue_events_total = IntCounterVec::new(
            Opts::new(
                "matchmaking_sim_queue_events_total",
                "Players admitted to or removed from the queue",
            ),
            &["strategy", "event"],
        )?;
        registry.register(Box::new(queue_events_total.clone()))?;

        let round_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "matchmaking_sim_round_duration_seconds",
                "Time spent simulating one round",
            )
            .buckets(vec![0.00001, 0.0001, 0.001, 0.005, 0.01, 0.05, 0.1]),
            &["strategy"],
        )?;
        registry.register(Box::new(round_duration_seconds.clone()))?;

        Ok(Self {
            rounds_total,
            queue_size,
            queue_events_total,
            round_duration_seconds,
        })
    }
}

impl LobbyMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let lobbies_formed_total = IntCounterVec::new(
            Opts::new("matchmaking_sim_lobbies_formed_total", "Lobbies formed"),
            &["strategy"],
        )?;
        registry.register(Box::new(lobbies_formed_total.clone()))?;

        let games_finished_total = IntCounterVec::new(
            Opts::new("matchmaking_sim_games_finished_total", "Games finished"),
            &["strategy"],
        )?;
        registry.register(Box::new(games_finished_total.clone()))?;

        let queue_wait_rounds = HistogramVec::new(
            HistogramOpts::new(
                "matchmaking_sim_queue_wait_rounds",
                "Rounds a matched player spent in the queue",
            )
            .buckets(vec![1.0, 2.0, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0, 600.0]),
            &["strategy"],
        )?;
        registry.register(Box::new(queue_wait_rounds.clone()))?;

        let lobby_mmr_spread = HistogramVec::new(
            HistogramOpts::new(
                "matchmaking_sim_lobby_mmr_spread",
                "Rating spread between the best and worst player of a lobby",
            )
            .buckets(vec![25.0, 50.0, 100.0, 200.0, 300.0, 500.0, 1000.0, 2000.0]),
            &["strategy"],
        )?;
        registry.register(Box::new(lobby_mmr_spread.clone()))?;

        let game_length_rounds = HistogramVec::new(
            HistogramOpts::new(
                "matchmaking_sim_game_length_rounds",
                "Duration of finished games in rounds",
            )
            .buckets(vec![5.0, 10.0, 15.0, 20.0, 25.0, 30.0]),
            &["strategy"],
        )?;
        registry.register(Box::new(game_length_rounds.clone()))?;

        Ok(Self {
            lobbies_formed_total,
            games_finished_total,
            queue_wait_rounds,
            lobby_mmr_spread,
            game_length_rounds,
        })
    }
}
