//! Rating engines that seed and update player ratings
//!
//! Provides the [`MmrEngine`] trait with a fixed-margin engine, a ground-truth
//! passthrough engine and a Weng-Lin (OpenSkill) engine built on the
//! skillratings crate.

pub mod calculator;
pub mod weng_lin;

// Re-export commonly used types
pub use calculator::{
    FixedMarginMmrEngine, MmrEngine, SkillOracle, SkillPassthroughMmrEngine, DEFAULT_INITIAL_MMR,
    DEFAULT_MMR_MARGIN,
};
pub use weng_lin::{ExtendedWengLinConfig, WengLinMmrEngine};
