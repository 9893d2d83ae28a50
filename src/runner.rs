//! Simulation runs and their reports
//!
//! A [`Runner`] drives one engine for a number of rounds and condenses the
//! outcome into a serializable [`RunReport`].

use crate::config::{SimulationConfig, StrategyKind};
use crate::engine::{Engine, Statistics};
use crate::environment::PopulationEnvironment;
use crate::error::Result;
use crate::metrics::{MetricsTimer, StrategyMetrics};
use crate::rating::SkillOracle;
use crate::types::{Mmr, PlayerId};
use crate::utils::EMPTY_AVERAGE;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Rounds between progress log lines
const PROGRESS_INTERVAL: u64 = 1000;

/// Distribution of current ratings over all registered players
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingSummary {
    pub players: usize,
    pub active_players: usize,
    pub min_mmr: Mmr,
    pub max_mmr: Mmr,
    pub mean_mmr: Mmr,
}

impl RatingSummary {
    fn from_engine(engine: &Engine) -> Self {
        let ratings: Vec<Mmr> = engine.players().iter().map(|p| p.mmr).collect();
        if ratings.is_empty() {
            return Self {
                players: 0,
                active_players: 0,
                min_mmr: EMPTY_AVERAGE,
                max_mmr: EMPTY_AVERAGE,
                mean_mmr: EMPTY_AVERAGE,
            };
        }
        Self {
            players: ratings.len(),
            active_players: engine.active_players().len(),
            min_mmr: ratings.iter().copied().fold(Mmr::INFINITY, Mmr::min),
            max_mmr: ratings.iter().copied().fold(Mmr::NEG_INFINITY, Mmr::max),
            mean_mmr: ratings.iter().sum::<Mmr>() / ratings.len() as f64,
        }
    }
}

/// Outcome of a finished simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub name: String,
    pub strategy: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub rounds: u64,
    /// Players whose rating ended inside this band make up the statistics
    pub rating_band: (Mmr, Mmr),
    pub statistics: Statistics,
    pub ratings: RatingSummary,
    /// Mean happiness of active players, or -1 without any
    pub average_happiness: f64,
    pub rating_engine: serde_json::Value,
}

impl std::fmt::Display for RunReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stats = &self.statistics;
        writeln!(f, "Run '{}' ({}) - strategy: {}", self.name, self.run_id, self.strategy)?;
        writeln!(f, "   Rounds: {}", self.rounds)?;
        writeln!(
            f,
            "   Players: {} ({} active)",
            self.ratings.players, self.ratings.active_players
        )?;
        writeln!(f, "   Games: {}", stats.num_games)?;
        writeln!(f, "   Avg queue time: {:.2} rounds", stats.avg_queue_time)?;
        writeln!(f, "   Avg lobby spread: {:.1}", stats.avg_max_mmr_diff)?;
        writeln!(f, "   Avg game length: {:.2} rounds", stats.avg_game_length)?;
        writeln!(
            f,
            "   Ratings: min {:.0}, mean {:.0}, max {:.0}",
            self.ratings.min_mmr, self.ratings.mean_mmr, self.ratings.max_mmr
        )?;
        write!(f, "   Avg happiness: {:.1}", self.average_happiness)
    }
}

/// Drives a single engine through a simulation run
pub struct Runner {
    name: String,
    engine: Engine,
    metrics: Option<StrategyMetrics>,
}

impl Runner {
    pub fn new(name: impl Into<String>, engine: Engine) -> Self {
        Self {
            name: name.into(),
            engine,
            metrics: None,
        }
    }

    /// Build an engine for `strategy` with the population environment
    pub fn from_config(config: &SimulationConfig, strategy: StrategyKind) -> Result<Self> {
        let seed = config.simulation.seed;
        let environment = PopulationEnvironment::new(config.environment.clone(), seed)?;
        let skills: Arc<dyn SkillOracle> = environment.skills();
        let mmr_engine = config.rating.build(skills)?;
        let matchmaker = config.matchmaking.build(strategy, seed);

        let engine = Engine::new(matchmaker, mmr_engine, Box::new(environment));
        Ok(Self::new(
            format!("{}-{}", config.service.name, strategy),
            engine,
        ))
    }

    /// Record lobbies, games and rounds into `metrics`
    pub fn with_metrics(mut self, metrics: StrategyMetrics) -> Self {
        self.engine
            .add_lobby_found_listener(Box::new(metrics.clone()));
        self.engine
            .add_game_finished_listener(Box::new(metrics.clone()));
        self.metrics = Some(metrics);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    /// Run `rounds` more rounds and report on players rated within `band`
    pub fn run(&mut self, rounds: u64, band: (Mmr, Mmr)) -> Result<RunReport> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let run_timer = MetricsTimer::start();
        info!(
            "Starting run '{}' ({}) with {} rounds",
            self.name, run_id, rounds
        );

        for _ in 0..rounds {
            let round_timer = self.metrics.as_ref().map(StrategyMetrics::start_timer);
            let summary = self.engine.one_round()?;
            if let (Some(metrics), Some(timer)) = (&self.metrics, round_timer) {
                metrics.record_round(&summary, timer);
            }
            if summary.round % PROGRESS_INTERVAL == 0 {
                debug!(
                    "Run '{}' at round {} - queue: {}, in flight: {}",
                    self.name,
                    summary.round,
                    summary.queue_len,
                    self.engine.games().len()
                );
            }
        }

        let report = self.report(run_id, started_at, band);
        info!(
            "Run '{}' finished in {:.2?} - games: {}, avg queue time: {:.2}, avg spread: {:.1}",
            self.name,
            run_timer.stop(),
            report.statistics.num_games,
            report.statistics.avg_queue_time,
            report.statistics.avg_max_mmr_diff
        );
        Ok(report)
    }

    fn report(&self, run_id: Uuid, started_at: DateTime<Utc>, band: (Mmr, Mmr)) -> RunReport {
        let (low, high) = band;
        let selected: Vec<PlayerId> = self
            .engine
            .players_with_rating_between(low, high)
            .into_iter()
            .map(|p| p.id.clone())
            .collect();

        let environment = self.engine.environment();
        let happiness: Vec<f64> = self
            .engine
            .active_players()
            .into_iter()
            .map(|p| environment.player_happiness(p))
            .collect();

        RunReport {
            run_id,
            name: self.name.clone(),
            strategy: self.engine.matchmaker().name().to_string(),
            started_at,
            finished_at: Utc::now(),
            rounds: self.engine.round(),
            rating_band: band,
            statistics: self.engine.statistics(&selected),
            ratings: RatingSummary::from_engine(&self.engine),
            average_happiness: crate::utils::average_or_sentinel(&happiness),
            rating_engine: self.engine.mmr_engine().config(),
        }
    }
}
