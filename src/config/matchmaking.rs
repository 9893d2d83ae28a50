//! Matchmaking strategy configuration

use crate::matchmaking::{
    max_mmr_diff, max_mmr_diff_or_long_wait, FairMatchMaker, FairMethodConfig,
    FilteredMatchMaker, MatchMaker, RandomMatchMaker, SlicingMatchMaker, SortedWindowMatchMaker,
    DEFAULT_MAX_ATTEMPTS,
};
use crate::types::{Mmr, DEFAULT_TEAM_SIZE};
use serde::{Deserialize, Serialize};

/// Available matchmaking strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    Slicing,
    Random,
    SortedWindow,
    Filtered,
    Fair,
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StrategyKind::Slicing => "slicing",
            StrategyKind::Random => "random",
            StrategyKind::SortedWindow => "sorted-window",
            StrategyKind::Filtered => "filtered",
            StrategyKind::Fair => "fair",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for StrategyKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "slicing" => Ok(StrategyKind::Slicing),
            "random" => Ok(StrategyKind::Random),
            "sorted-window" | "sorted_window" => Ok(StrategyKind::SortedWindow),
            "filtered" => Ok(StrategyKind::Filtered),
            "fair" => Ok(StrategyKind::Fair),
            other => Err(anyhow::anyhow!("Unknown matchmaking strategy: {}", other)),
        }
    }
}

/// Matchmaking settings shared by every configured strategy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchmakingSettings {
    /// Strategies to simulate, one engine each
    pub strategies: Vec<StrategyKind>,
    pub team_size: usize,
    /// Sampling attempts per lobby for the filtered strategy
    pub max_attempts: u32,
    /// Largest rating spread the filtered strategy accepts
    pub max_mmr_diff: Mmr,
    /// Waiting this many rounds lifts the spread limit of the filtered strategy
    pub long_wait_rounds: Option<u32>,
    pub fair: FairMethodConfig,
}

impl Default for MatchmakingSettings {
    fn default() -> Self {
        Self {
            strategies: vec![StrategyKind::Filtered, StrategyKind::Fair],
            team_size: DEFAULT_TEAM_SIZE,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            max_mmr_diff: 500.0,
            long_wait_rounds: Some(60),
            fair: FairMethodConfig::default(),
        }
    }
}

impl MatchmakingSettings {
    /// Construct a strategy from these settings
    pub fn build(&self, kind: StrategyKind, seed: u64) -> Box<dyn MatchMaker> {
        let team_size = self.team_size;
        match kind {
            StrategyKind::Slicing => Box::new(SlicingMatchMaker::new(team_size)),
            StrategyKind::Random => Box::new(RandomMatchMaker::new(team_size, seed)),
            StrategyKind::SortedWindow => Box::new(SortedWindowMatchMaker::new(team_size, seed)),
            StrategyKind::Filtered => match self.long_wait_rounds {
                Some(wait) => Box::new(FilteredMatchMaker::new(
                    team_size,
                    self.max_attempts,
                    max_mmr_diff_or_long_wait(self.max_mmr_diff, wait),
                    seed,
                )),
                None => Box::new(FilteredMatchMaker::new(
                    team_size,
                    self.max_attempts,
                    max_mmr_diff(self.max_mmr_diff),
                    seed,
                )),
            },
            StrategyKind::Fair => Box::new(FairMatchMaker::new(FairMethodConfig {
                team_size,
                ..self.fair.clone()
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_names_parse() {
        assert_eq!("fair".parse::<StrategyKind>().unwrap(), StrategyKind::Fair);
        assert_eq!(
            "Sorted_Window".parse::<StrategyKind>().unwrap(),
            StrategyKind::SortedWindow
        );
        assert!("elo".parse::<StrategyKind>().is_err());
        assert_eq!(StrategyKind::SortedWindow.to_string(), "sorted-window");
    }

    #[test]
    fn test_build_every_strategy() {
        let settings = MatchmakingSettings::default();
        let kinds = [
            (StrategyKind::Slicing, "slicing"),
            (StrategyKind::Random, "random"),
            (StrategyKind::SortedWindow, "sorted-window"),
            (StrategyKind::Filtered, "filtered-sorted-window"),
            (StrategyKind::Fair, "fair"),
        ];
        for (kind, name) in kinds {
            assert_eq!(settings.build(kind, 1).name(), name);
        }
    }
}
