//! Reference population environment
//!
//! Simulates a pool of human players: an initial burst of arrivals, a trickle
//! of new players every round, short breaks between games, players quitting
//! after a personal game budget or after waiting too long, and game outcomes
//! driven by the true skill difference plus noise. All randomness comes from
//! a seeded generator so runs are reproducible.

use crate::engine::registry::PlayerRegistry;
use crate::environment::{Environment, QueueControl};
use crate::error::{MatchmakingError, Result};
use crate::rating::calculator::SkillOracle;
use crate::types::{Game, Lobby, Mmr, Participant, Player, PlayerId, Team};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Configuration for [`PopulationEnvironment`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    /// Players arriving in the first round (inclusive range)
    pub initial_players: (u32, u32),
    /// Chance per round that one new player arrives
    pub arrival_chance: f64,
    pub skill_mean: Mmr,
    pub skill_std_dev: Mmr,
    /// Games a player plays before quitting (inclusive range)
    pub max_games: (u32, u32),
    /// Rounds a player tolerates in the queue before quitting (inclusive range)
    pub max_queue_time: (u32, u32),
    /// Spread of the break a player takes between games
    pub break_std_dev: f64,
    /// Noise added to the skill difference when deciding a winner
    pub outcome_std_dev: f64,
    pub game_length_mean: f64,
    pub game_length_std_dev: f64,
    /// Skill gap (beyond the noise) that shortens a game by one round
    pub lopsided_rounds_per: f64,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            initial_players: (30, 50),
            arrival_chance: 0.09,
            skill_mean: 2200.0,
            skill_std_dev: 600.0,
            max_games: (1, 5),
            max_queue_time: (120, 1200),
            break_std_dev: 8.0,
            outcome_std_dev: 300.0,
            game_length_mean: 20.0,
            game_length_std_dev: 2.0,
            lopsided_rounds_per: 70.0,
        }
    }
}

impl PopulationConfig {
    pub fn validate(&self) -> Result<()> {
        let ranges = [
            ("initial_players", self.initial_players),
            ("max_games", self.max_games),
            ("max_queue_time", self.max_queue_time),
        ];
        for (name, (low, high)) in ranges {
            if low > high {
                return Err(MatchmakingError::ConfigurationError {
                    message: format!("{} range is empty: {}..={}", name, low, high),
                }
                .into());
            }
        }
        if !(0.0..=1.0).contains(&self.arrival_chance) {
            return Err(MatchmakingError::ConfigurationError {
                message: format!("arrival_chance must be within 0..=1, got {}", self.arrival_chance),
            }
            .into());
        }
        if self.lopsided_rounds_per <= 0.0 {
            return Err(MatchmakingError::ConfigurationError {
                message: "lopsided_rounds_per must be positive".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Shared table of true player skills
#[derive(Debug, Default)]
pub struct PopulationSkills {
    skills: RwLock<BTreeMap<PlayerId, Mmr>>,
}

impl PopulationSkills {
    fn insert(&self, player_id: &str, skill: Mmr) -> Result<()> {
        let mut skills = self
            .skills
            .write()
            .map_err(|_| MatchmakingError::InternalError {
                message: "Failed to acquire skills write lock".to_string(),
            })?;
        skills.insert(player_id.to_string(), skill);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.skills.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SkillOracle for PopulationSkills {
    fn player_skill(&self, player_id: &str) -> Option<Mmr> {
        self.skills.read().ok()?.get(player_id).copied()
    }
}

#[derive(Debug, Clone)]
struct Human {
    max_games: u32,
    max_queue_time: u32,
}

#[derive(Debug, Clone)]
struct OnBreak {
    player_id: PlayerId,
    rounds_left: u32,
}

/// Simulated player population around the engine
#[derive(Debug)]
pub struct PopulationEnvironment {
    config: PopulationConfig,
    rng: StdRng,
    round: u64,
    next_human: u64,
    humans: BTreeMap<PlayerId, Human>,
    on_break: Vec<OnBreak>,
    skills: Arc<PopulationSkills>,
}

impl PopulationEnvironment {
    pub fn new(config: PopulationConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng: StdRng::seed_from_u64(seed),
            round: 0,
            next_human: 1,
            humans: BTreeMap::new(),
            on_break: Vec::new(),
            skills: Arc::new(PopulationSkills::default()),
        })
    }

    /// Ground-truth skills, for rating engines that want to use them
    pub fn skills(&self) -> Arc<PopulationSkills> {
        self.skills.clone()
    }

    /// Players that have not quit yet
    pub fn active_humans(&self) -> usize {
        self.humans.len()
    }

    /// Approximately normal sample (sum of twelve uniforms)
    fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        let sum: f64 = (0..12).map(|_| self.rng.gen::<f64>()).sum();
        mean + (sum - 6.0) * std_dev
    }

    fn add_new_humans(&mut self, queue: &mut dyn QueueControl) -> Result<()> {
        if self.round == 1 {
            let (low, high) = self.config.initial_players;
            let initial = self.rng.gen_range(low..=high);
            for _ in 0..initial {
                self.add_new_human(queue)?;
            }
        }
        if self.rng.gen_bool(self.config.arrival_chance) {
            self.add_new_human(queue)?;
        }
        Ok(())
    }

    fn add_new_human(&mut self, queue: &mut dyn QueueControl) -> Result<()> {
        let id = format!("p-{}", self.next_human);
        self.next_human += 1;

        let skill = self
            .normal(self.config.skill_mean, self.config.skill_std_dev)
            .round();
        let (games_low, games_high) = self.config.max_games;
        let (wait_low, wait_high) = self.config.max_queue_time;
        let human = Human {
            max_games: self.rng.gen_range(games_low..=games_high),
            max_queue_time: self.rng.gen_range(wait_low..=wait_high),
        };

        self.skills.insert(&id, skill)?;
        self.humans.insert(id.clone(), human);
        queue.add_to_queue(&id)
    }

    /// A player stays on break until the queue accepts it
    fn return_players_from_break(&mut self, queue: &mut dyn QueueControl) -> Result<()> {
        let mut index = 0;
        while index < self.on_break.len() {
            let resting = &mut self.on_break[index];
            if resting.rounds_left == 0 {
                queue.add_to_queue(&resting.player_id)?;
                self.on_break.remove(index);
            } else {
                resting.rounds_left -= 1;
                index += 1;
            }
        }
        Ok(())
    }

    fn remove_tired_players(&mut self, queue: &mut dyn QueueControl) -> Result<()> {
        let tired: Vec<PlayerId> = queue
            .queue()
            .iter()
            .filter(|q| {
                self.humans
                    .get(&q.player_id)
                    .map(|h| q.waited > h.max_queue_time)
                    .unwrap_or(false)
            })
            .map(|q| q.player_id.clone())
            .collect();

        for player_id in tired {
            queue.remove_from_queue(&player_id)?;
            self.humans.remove(&player_id);
            debug!("Player '{}' gave up waiting and left", player_id);
        }
        Ok(())
    }

    fn team_skill(&self, team: &[Participant]) -> f64 {
        if team.is_empty() {
            return 0.0;
        }
        let total: f64 = team
            .iter()
            .map(|p| self.skills.player_skill(&p.id).unwrap_or(p.mmr))
            .sum();
        total / team.len() as f64
    }
}

impl Environment for PopulationEnvironment {
    fn one_round(&mut self, queue: &mut dyn QueueControl) -> Result<()> {
        self.round += 1;
        self.add_new_humans(queue)?;
        self.return_players_from_break(queue)?;
        self.remove_tired_players(queue)
    }

    fn new_game(&mut self, lobby: &Lobby) -> Result<Game> {
        if lobby.team_1.is_empty() || lobby.team_2.is_empty() {
            return Err(MatchmakingError::InvalidGame {
                reason: format!("lobby {} has an empty team", lobby.id),
            }
            .into());
        }

        let diff = self.team_skill(&lobby.team_2) - self.team_skill(&lobby.team_1);
        let noise = self.normal(0.0, self.config.outcome_std_dev);
        let winner = if noise < diff { Team::Second } else { Team::First };

        let easy_win = (diff - noise).abs();
        let nominal = self
            .normal(self.config.game_length_mean, self.config.game_length_std_dev)
            .trunc() as i64;
        let shortened = (easy_win / self.config.lopsided_rounds_per).trunc() as i64;
        let length = (nominal - shortened).unsigned_abs() as u32;

        debug!(
            "New game {} - skill diff: {:.0}, length: {}, winner: {}",
            lobby.id, diff, length, winner
        );
        Ok(Game::from_lobby(lobby, length, winner))
    }

    fn on_game_finished(&mut self, game: &Game, players: &PlayerRegistry) -> Result<()> {
        for participant in game.participants() {
            let Some(human) = self.humans.get(&participant.id) else {
                continue;
            };
            // The current game is not in the player's history yet
            let played = players
                .get(&participant.id)
                .map(|p| p.replays.len() as u32 + 1)
                .unwrap_or(1);

            if played >= human.max_games {
                self.humans.remove(&participant.id);
                debug!("Player '{}' retired after {} games", participant.id, played);
            } else {
                let rounds_left = self.normal(0.0, self.config.break_std_dev).abs() as u32;
                self.on_break.push(OnBreak {
                    player_id: participant.id.clone(),
                    rounds_left,
                });
            }
        }
        Ok(())
    }

    fn player_skill(&self, player_id: &str) -> Option<Mmr> {
        self.skills.player_skill(player_id)
    }

    fn player_happiness(&self, player: &Player) -> f64 {
        player
            .replays
            .iter()
            .map(|replay| {
                let unfairness = (replay.mmr_diff.abs() / 500.0).min(1.0);
                if replay.was_won_by(&player.id) {
                    100.0 * (1.0 - unfairness)
                } else {
                    -100.0 * unfairness
                }
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MatchmakingError;
    use crate::types::Queuer;

    /// Queue handle that only records what the environment asked for
    #[derive(Default)]
    struct RecordingQueue {
        queue: Vec<Queuer>,
        refuse: Option<String>,
    }

    impl QueueControl for RecordingQueue {
        fn add_to_queue(&mut self, player_id: &str) -> Result<()> {
            if self.refuse.as_deref() == Some(player_id) {
                return Err(MatchmakingError::AlreadyQueued {
                    player_id: player_id.to_string(),
                }
                .into());
            }
            self.queue.push(Queuer::new(player_id, 2200.0));
            Ok(())
        }

        fn remove_from_queue(&mut self, player_id: &str) -> Result<Queuer> {
            let index = self
                .queue
                .iter()
                .position(|q| q.player_id == player_id)
                .ok_or_else(|| MatchmakingError::NotQueued {
                    player_id: player_id.to_string(),
                })?;
            Ok(self.queue.remove(index))
        }

        fn queue(&self) -> &[Queuer] {
            &self.queue
        }
    }

    fn lobby(skill_1: f64, skill_2: f64) -> Lobby {
        Lobby {
            id: 1,
            team_1: (0..5)
                .map(|i| Participant::new(format!("a{}", i), skill_1))
                .collect(),
            team_2: (0..5)
                .map(|i| Participant::new(format!("b{}", i), skill_2))
                .collect(),
        }
    }

    #[test]
    fn test_first_round_adds_initial_population() {
        let mut environment = PopulationEnvironment::new(PopulationConfig::default(), 5).unwrap();
        let mut queue = RecordingQueue::default();

        environment.one_round(&mut queue).unwrap();

        assert!(queue.queue.len() >= 30 && queue.queue.len() <= 51);
        assert_eq!(environment.skills().len(), queue.queue.len());
        for queuer in &queue.queue {
            assert!(environment.player_skill(&queuer.player_id).is_some());
        }
    }

    #[test]
    fn test_same_seed_same_population() {
        let mut first = PopulationEnvironment::new(PopulationConfig::default(), 9).unwrap();
        let mut second = PopulationEnvironment::new(PopulationConfig::default(), 9).unwrap();
        let mut queue_1 = RecordingQueue::default();
        let mut queue_2 = RecordingQueue::default();

        for _ in 0..20 {
            first.one_round(&mut queue_1).unwrap();
            second.one_round(&mut queue_2).unwrap();
        }
        assert_eq!(queue_1.queue, queue_2.queue);
    }

    #[test]
    fn test_tired_players_leave_the_queue() {
        let config = PopulationConfig {
            initial_players: (3, 3),
            arrival_chance: 0.0,
            max_queue_time: (2, 2),
            ..PopulationConfig::default()
        };
        let mut environment = PopulationEnvironment::new(config, 1).unwrap();
        let mut queue = RecordingQueue::default();
        environment.one_round(&mut queue).unwrap();
        assert_eq!(queue.queue.len(), 3);

        queue.queue[0].waited = 3;
        environment.one_round(&mut queue).unwrap();
        assert_eq!(queue.queue.len(), 2);
        assert_eq!(environment.active_humans(), 2);
    }

    #[test]
    fn test_refused_return_keeps_players_on_break() {
        let mut environment = PopulationEnvironment::new(PopulationConfig::default(), 2).unwrap();
        for id in ["x", "y", "z"] {
            environment.on_break.push(OnBreak {
                player_id: id.to_string(),
                rounds_left: 0,
            });
        }
        let mut queue = RecordingQueue {
            refuse: Some("y".to_string()),
            ..RecordingQueue::default()
        };

        assert!(environment.return_players_from_break(&mut queue).is_err());
        let resting: Vec<&str> = environment
            .on_break
            .iter()
            .map(|b| b.player_id.as_str())
            .collect();
        assert_eq!(resting, vec!["y", "z"]);
        assert_eq!(queue.queue.len(), 1);

        queue.refuse = None;
        environment.return_players_from_break(&mut queue).unwrap();
        assert!(environment.on_break.is_empty());
        let queued: Vec<&str> = queue.queue.iter().map(|q| q.player_id.as_str()).collect();
        assert_eq!(queued, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_stronger_team_usually_wins() {
        let mut environment = PopulationEnvironment::new(PopulationConfig::default(), 3).unwrap();
        let lobby = lobby(1500.0, 3000.0);

        let second_wins = (0..200)
            .map(|_| environment.new_game(&lobby).unwrap())
            .filter(|game| game.winner == Team::Second)
            .count();
        assert!(second_wins > 190);
    }

    #[test]
    fn test_game_copies_lobby() {
        let mut environment = PopulationEnvironment::new(PopulationConfig::default(), 3).unwrap();
        let lobby = lobby(2000.0, 2000.0);
        let game = environment.new_game(&lobby).unwrap();

        assert_eq!(game.id, lobby.id);
        assert_eq!(game.team_1, lobby.team_1);
        assert_eq!(game.team_2, lobby.team_2);
        assert_eq!(game.time_left, game.length);
    }

    #[test]
    fn test_empty_team_is_rejected() {
        let mut environment = PopulationEnvironment::new(PopulationConfig::default(), 3).unwrap();
        let mut lobby = lobby(2000.0, 2000.0);
        lobby.team_2.clear();
        assert!(environment.new_game(&lobby).is_err());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = PopulationConfig {
            max_games: (5, 1),
            ..PopulationConfig::default()
        };
        assert!(PopulationEnvironment::new(config, 0).is_err());
    }
}
