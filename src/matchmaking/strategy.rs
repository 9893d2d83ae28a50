//! Matchmaking strategy trait and shared window helpers
//!
//! A strategy only ever sees a read-only view of the queue and answers with a
//! [`LobbyProposal`]. The engine removes the proposed players and asks again,
//! so a strategy is called repeatedly against a shrinking queue until it
//! returns `None` for the round.

use crate::types::{LobbyProposal, Queuer};

/// Trait for lobby-forming algorithms
pub trait MatchMaker: Send {
    /// Propose one lobby from the current queue, or `None` when no further
    /// lobby can be formed this round
    fn find_lobby(&mut self, queue: &[Queuer]) -> Option<LobbyProposal>;

    /// Short human readable name used in logs and reports
    fn name(&self) -> &str;
}

/// Queue entries ordered by rating; entries with equal rating keep arrival order
pub fn sorted_by_mmr(queue: &[Queuer]) -> Vec<&Queuer> {
    let mut sorted: Vec<&Queuer> = queue.iter().collect();
    sorted.sort_by(|a, b| a.mmr.total_cmp(&b.mmr));
    sorted
}

/// Deal a window of `2 * team_size` entries alternately into two teams, so
/// neighbours by rating end up on opposite sides
pub fn split_alternating<'a>(
    window: &[&'a Queuer],
    team_size: usize,
) -> (Vec<&'a Queuer>, Vec<&'a Queuer>) {
    let mut team_1 = Vec::with_capacity(team_size);
    let mut team_2 = Vec::with_capacity(team_size);
    for pair in window.chunks(2).take(team_size) {
        if let [first, second] = pair {
            team_1.push(*first);
            team_2.push(*second);
        }
    }
    (team_1, team_2)
}

/// Longest wait among the given entries
pub fn max_wait(team_1: &[&Queuer], team_2: &[&Queuer]) -> u32 {
    team_1
        .iter()
        .chain(team_2.iter())
        .map(|q| q.waited)
        .max()
        .unwrap_or(0)
}

/// Rating spread among the given entries
pub fn queuer_spread(team_1: &[&Queuer], team_2: &[&Queuer]) -> f64 {
    crate::utils::rating_spread(team_1.iter().chain(team_2.iter()).map(|q| q.mmr))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queuer(id: &str, mmr: f64, waited: u32) -> Queuer {
        Queuer {
            player_id: id.to_string(),
            mmr,
            waited,
        }
    }

    #[test]
    fn test_sorted_by_mmr_is_stable() {
        let queue = vec![
            queuer("a", 2000.0, 0),
            queuer("b", 1000.0, 0),
            queuer("c", 2000.0, 0),
            queuer("d", 1500.0, 0),
        ];
        let ids: Vec<_> = sorted_by_mmr(&queue)
            .iter()
            .map(|q| q.player_id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_split_alternating() {
        let queue: Vec<Queuer> = (0..4).map(|i| queuer(&i.to_string(), 0.0, 0)).collect();
        let window: Vec<&Queuer> = queue.iter().collect();
        let (team_1, team_2) = split_alternating(&window, 2);

        let ids = |team: &[&Queuer]| -> Vec<String> {
            team.iter().map(|q| q.player_id.clone()).collect()
        };
        assert_eq!(ids(&team_1), vec!["0", "2"]);
        assert_eq!(ids(&team_2), vec!["1", "3"]);
    }

    #[test]
    fn test_max_wait_and_spread() {
        let a = queuer("a", 1200.0, 3);
        let b = queuer("b", 1700.0, 9);
        let c = queuer("c", 1500.0, 1);
        assert_eq!(max_wait(&[&a], &[&b, &c]), 9);
        assert_eq!(queuer_spread(&[&a], &[&b, &c]), 500.0);
        assert_eq!(max_wait(&[], &[]), 0);
    }
}
