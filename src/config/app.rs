//! Main simulation configuration
//!
//! This module defines the top-level configuration of a simulation run,
//! including environment variable loading, TOML files and validation.

use crate::config::matchmaking::{MatchmakingSettings, StrategyKind};
use crate::config::rating::RatingSettings;
use crate::environment::PopulationConfig;
use crate::types::Mmr;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Main simulation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub service: ServiceSettings,
    pub simulation: SimulationSettings,
    pub matchmaking: MatchmakingSettings,
    pub rating: RatingSettings,
    pub environment: PopulationConfig,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Name used in logs and run reports
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Run length and reporting settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Rounds to simulate per strategy
    pub rounds: u64,
    /// Seed shared by the strategy and the environment
    pub seed: u64,
    /// Players rated below this are left out of the report statistics
    pub min_report_mmr: Mmr,
    /// Players rated above this are left out of the report statistics
    pub max_report_mmr: Mmr,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "matchmaking-sim".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            rounds: 10_000,
            seed: 42,
            min_report_mmr: 0.0,
            max_report_mmr: 5000.0,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| anyhow!("Invalid {} value: {}", name, value))
}

impl SimulationConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config = Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }

        // Simulation settings
        if let Ok(rounds) = env::var("SIM_ROUNDS") {
            self.simulation.rounds = parse_var("SIM_ROUNDS", &rounds)?;
        }
        if let Ok(seed) = env::var("SIM_SEED") {
            self.simulation.seed = parse_var("SIM_SEED", &seed)?;
        }

        // Matchmaking settings
        if let Ok(strategies) = env::var("SIM_STRATEGIES") {
            self.matchmaking.strategies = strategies
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(str::parse::<StrategyKind>)
                .collect::<Result<_>>()?;
        }
        if let Ok(team_size) = env::var("SIM_TEAM_SIZE") {
            self.matchmaking.team_size = parse_var("SIM_TEAM_SIZE", &team_size)?;
        }
        if let Ok(diff) = env::var("SIM_MAX_MMR_DIFF") {
            self.matchmaking.max_mmr_diff = parse_var("SIM_MAX_MMR_DIFF", &diff)?;
        }

        // Rating settings
        if let Ok(engine) = env::var("SIM_RATING_ENGINE") {
            self.rating.engine = engine.parse()?;
        }
        Ok(())
    }
}

/// Validate configuration values
pub fn validate_config(config: &SimulationConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.simulation.rounds == 0 {
        return Err(anyhow!("Rounds must be greater than 0"));
    }
    if config.simulation.min_report_mmr > config.simulation.max_report_mmr {
        return Err(anyhow!(
            "Report rating band is empty: {} > {}",
            config.simulation.min_report_mmr,
            config.simulation.max_report_mmr
        ));
    }

    // Validate matchmaking settings
    if config.matchmaking.strategies.is_empty() {
        return Err(anyhow!("At least one matchmaking strategy is required"));
    }
    if config.matchmaking.team_size == 0 {
        return Err(anyhow!("Team size must be greater than 0"));
    }
    if config.matchmaking.max_attempts == 0 {
        return Err(anyhow!("Max attempts must be greater than 0"));
    }
    if config.matchmaking.max_mmr_diff <= 0.0 {
        return Err(anyhow!("Max rating difference must be positive"));
    }
    if config.matchmaking.fair.scan_limit == 0 {
        return Err(anyhow!("Fair scan limit must be greater than 0"));
    }

    config.rating.weng_lin.validate()?;
    config.environment.validate()?;

    Ok(())
}
