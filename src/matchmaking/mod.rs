//! Matchmaking strategies for turning the queue into lobbies
//!
//! Every strategy implements [`MatchMaker`]: it inspects the queue without
//! mutating it and proposes one lobby at a time. Strategies are configured
//! explicitly (team size, thresholds, attempt budgets, RNG seed) at
//! construction time.

pub mod fair;
pub mod filters;
pub mod simple;
pub mod sorted;
pub mod strategy;

// Re-export commonly used types
pub use fair::{FairMatchMaker, FairMethodConfig};
pub use filters::{max_mmr_diff, max_mmr_diff_or_long_wait, LobbyFilter, LongWait, MaxMmrDiff};
pub use simple::{RandomMatchMaker, SlicingMatchMaker};
pub use sorted::{FilteredMatchMaker, SortedWindowMatchMaker, DEFAULT_MAX_ATTEMPTS};
pub use strategy::MatchMaker;
