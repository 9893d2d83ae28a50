//! Rating engine configuration

use crate::error::Result;
use crate::rating::{
    ExtendedWengLinConfig, FixedMarginMmrEngine, MmrEngine, SkillOracle,
    SkillPassthroughMmrEngine, WengLinMmrEngine, DEFAULT_INITIAL_MMR, DEFAULT_MMR_MARGIN,
};
use crate::types::Mmr;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingEngineKind {
    FixedMargin,
    SkillPassthrough,
    WengLin,
}

impl std::str::FromStr for RatingEngineKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "fixed_margin" | "fixed-margin" => Ok(RatingEngineKind::FixedMargin),
            "skill_passthrough" | "skill-passthrough" => Ok(RatingEngineKind::SkillPassthrough),
            "weng_lin" | "weng-lin" => Ok(RatingEngineKind::WengLin),
            other => Err(anyhow::anyhow!("Unknown rating engine: {}", other)),
        }
    }
}

/// Rating system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingSettings {
    pub engine: RatingEngineKind,
    /// Starting rating for the fixed margin engine
    pub initial_mmr: Mmr,
    /// Rating moved per game by the fixed margin engine
    pub margin: Mmr,
    pub weng_lin: ExtendedWengLinConfig,
}

impl Default for RatingSettings {
    fn default() -> Self {
        Self {
            engine: RatingEngineKind::FixedMargin,
            initial_mmr: DEFAULT_INITIAL_MMR,
            margin: DEFAULT_MMR_MARGIN,
            weng_lin: ExtendedWengLinConfig::default(),
        }
    }
}

impl RatingSettings {
    /// Construct the configured rating engine
    ///
    /// `skills` is only consulted by the passthrough engine.
    pub fn build(&self, skills: Arc<dyn SkillOracle>) -> Result<Box<dyn MmrEngine>> {
        Ok(match self.engine {
            RatingEngineKind::FixedMargin => {
                Box::new(FixedMarginMmrEngine::new(self.initial_mmr, self.margin))
            }
            RatingEngineKind::SkillPassthrough => Box::new(SkillPassthroughMmrEngine::new(skills)),
            RatingEngineKind::WengLin => Box::new(WengLinMmrEngine::new(self.weng_lin.clone())?),
        })
    }
}
