//! Utility functions for rating arithmetic and aggregates

use crate::types::{Mmr, Participant};

/// Value reported for an average over zero samples
pub const EMPTY_AVERAGE: f64 = -1.0;

/// Calculate the absolute difference between two ratings
pub fn rating_difference(rating1: Mmr, rating2: Mmr) -> Mmr {
    (rating1 - rating2).abs()
}

/// Average rating of a team, 0 for an empty team
pub fn average_mmr(team: &[Participant]) -> Mmr {
    if team.is_empty() {
        return 0.0;
    }
    team.iter().map(|p| p.mmr).sum::<Mmr>() / team.len() as f64
}

/// Spread between the highest and lowest rating found in any of the ratings
pub fn rating_spread(ratings: impl IntoIterator<Item = Mmr>) -> Mmr {
    let (min, max) = ratings
        .into_iter()
        .fold((Mmr::INFINITY, Mmr::NEG_INFINITY), |(min, max), mmr| {
            (min.min(mmr), max.max(mmr))
        });
    if min > max {
        0.0
    } else {
        rating_difference(max, min)
    }
}

/// Spread between the highest and lowest rated player across both teams
pub fn max_mmr_diff(team_1: &[Participant], team_2: &[Participant]) -> Mmr {
    rating_spread(team_1.iter().chain(team_2.iter()).map(|p| p.mmr))
}

/// Arithmetic mean, or [`EMPTY_AVERAGE`] when there are no samples
pub fn average_or_sentinel<T>(samples: &[T]) -> f64
where
    T: Copy + Into<f64>,
{
    if samples.is_empty() {
        return EMPTY_AVERAGE;
    }
    samples.iter().map(|s| (*s).into()).sum::<f64>() / samples.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_difference() {
        assert_eq!(rating_difference(1500.0, 1400.0), 100.0);
        assert_eq!(rating_difference(1400.0, 1500.0), 100.0);
        assert_eq!(rating_difference(1500.0, 1500.0), 0.0);
    }

    #[test]
    fn test_max_mmr_diff_spans_both_teams() {
        let team_1 = vec![Participant::new("a", 1800.0), Participant::new("b", 2200.0)];
        let team_2 = vec![Participant::new("c", 1500.0), Participant::new("d", 2000.0)];

        assert_eq!(max_mmr_diff(&team_1, &team_2), 700.0);
        assert_eq!(max_mmr_diff(&team_2, &team_1), 700.0);
        assert_eq!(max_mmr_diff(&[], &[]), 0.0);
    }

    #[test]
    fn test_average_mmr() {
        let team = vec![Participant::new("a", 1000.0), Participant::new("b", 2000.0)];
        assert_eq!(average_mmr(&team), 1500.0);
        assert_eq!(average_mmr(&[]), 0.0);
    }

    #[test]
    fn test_average_or_sentinel() {
        assert_eq!(average_or_sentinel::<u32>(&[]), EMPTY_AVERAGE);
        assert_eq!(average_or_sentinel(&[1u32, 2, 3]), 2.0);
        assert_eq!(average_or_sentinel(&[0.5f64, 1.5]), 1.0);
    }
}
