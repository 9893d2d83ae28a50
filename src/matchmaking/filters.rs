//! Fairness predicates for candidate lobbies
//!
//! Filters are small composable values: a filter decides whether a candidate
//! pairing is acceptable, and `or` combines two filters so either may accept.

use crate::matchmaking::strategy::{max_wait, queuer_spread};
use crate::types::{Mmr, Queuer};

/// Acceptance test on a candidate pairing
pub trait LobbyFilter: Send + Sync {
    fn accepts(&self, team_1: &[&Queuer], team_2: &[&Queuer]) -> bool;

    /// Accept when either this filter or `other` accepts
    fn or<F>(self, other: F) -> AnyOf<Self, F>
    where
        Self: Sized,
        F: LobbyFilter,
    {
        AnyOf {
            left: self,
            right: other,
        }
    }
}

/// Accepts lobbies whose rating spread is strictly below a boundary
#[derive(Debug, Clone, Copy)]
pub struct MaxMmrDiff {
    pub boundary: Mmr,
}

impl LobbyFilter for MaxMmrDiff {
    fn accepts(&self, team_1: &[&Queuer], team_2: &[&Queuer]) -> bool {
        queuer_spread(team_1, team_2) < self.boundary
    }
}

/// Accepts lobbies in which someone has waited longer than a boundary
#[derive(Debug, Clone, Copy)]
pub struct LongWait {
    pub boundary: u32,
}

impl LobbyFilter for LongWait {
    fn accepts(&self, team_1: &[&Queuer], team_2: &[&Queuer]) -> bool {
        max_wait(team_1, team_2) > self.boundary
    }
}

/// Disjunction of two filters
#[derive(Debug, Clone, Copy)]
pub struct AnyOf<A, B> {
    left: A,
    right: B,
}

impl<A: LobbyFilter, B: LobbyFilter> LobbyFilter for AnyOf<A, B> {
    fn accepts(&self, team_1: &[&Queuer], team_2: &[&Queuer]) -> bool {
        self.left.accepts(team_1, team_2) || self.right.accepts(team_1, team_2)
    }
}

pub fn max_mmr_diff(boundary: Mmr) -> MaxMmrDiff {
    MaxMmrDiff { boundary }
}

/// Spread below `mmr_boundary`, unless someone waited longer than `wait_boundary`
pub fn max_mmr_diff_or_long_wait(mmr_boundary: Mmr, wait_boundary: u32) -> AnyOf<MaxMmrDiff, LongWait> {
    max_mmr_diff(mmr_boundary).or(LongWait {
        boundary: wait_boundary,
    })
}
