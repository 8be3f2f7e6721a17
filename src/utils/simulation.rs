use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;
use strum::IntoEnumIterator;
use tracing::debug;

use crate::{
    error::Result,
    model::{
        rating_adjuster::{expected_score, RatingAdjustment},
        structures::{
            game_metrics::GameMetrics,
            player::{Player, PlayerId},
            role::Role,
            team_match::{Match, MatchOutcome},
            team_side::TeamSide
        }
    },
    processor::Processor
};

/// Simulated time between two matchmaking rounds
const ROUND_INTERVAL_MINUTES: i64 = 20;
const MIN_DURATION_MINUTES: f64 = 15.0;
const MAX_DURATION_MINUTES: f64 = 60.0;

/// Random plausible statistics for a player in `role`.
pub fn random_metrics(rng: &mut ChaCha8Rng, role: Role, duration_seconds: f64) -> GameMetrics {
    let minutes = duration_seconds / 60.0;
    let core = !role.is_support();
    let cs_ceiling = if core { 10.0 } else { 2.5 };

    GameMetrics {
        kills: rng.random_range(0..=15),
        deaths: rng.random_range(0..=12),
        assists: rng.random_range(0..=25),
        last_hits: (rng.random_range(0.5..=cs_ceiling) * minutes) as i32,
        denies: rng.random_range(0..=25),
        gold_per_minute: rng.random_range(if core { 350.0..=750.0 } else { 200.0..=400.0 }),
        experience_per_minute: rng.random_range(300.0..=850.0),
        hero_damage: rng.random_range(3000..=40000),
        damage_taken: rng.random_range(5000..=35000),
        healing_done: if core { 0 } else { rng.random_range(0..=8000) },
        teamfight_participation: rng.random_range(0.3..=1.0),
        wards_placed: if core { rng.random_range(0..=3) } else { rng.random_range(5..=25) },
        wards_destroyed: rng.random_range(0..=8),
        building_damage: rng.random_range(0..=8000),
        stun_duration: rng.random_range(0.0..=120.0),
        camps_stacked: rng.random_range(0..=10),
        duration_seconds
    }
}

/// `n` players with ratings between 1000 and 4000 and two distinct random roles.
pub fn random_population(n: usize, rng: &mut ChaCha8Rng) -> Vec<Player> {
    let roles: Vec<Role> = Role::iter().collect();

    (0..n)
        .map(|i| {
            let primary = rng.random_range(0..roles.len());
            let secondary = (primary + rng.random_range(1..roles.len())) % roles.len();
            let mut player = Player::new(
                i as PlayerId + 1,
                rng.random_range(1000.0..=4000.0),
                roles[primary],
                roles[secondary]
            );
            player.behavior_score = rng.random_range(0.6..=1.0);

            player
        })
        .collect()
}

/// Plays a formed match: the winner is drawn from the Elo expectation of the
/// two team averages, and every player gets random statistics for their role.
pub fn play_match(
    rng: &mut ChaCha8Rng,
    m: &Match,
    finished_at: DateTime<Utc>
) -> (MatchOutcome, HashMap<PlayerId, GameMetrics>) {
    let p_a = expected_score(m.average_rating(TeamSide::A), m.average_rating(TeamSide::B));
    let winner = if rng.random_bool(p_a.clamp(0.0, 1.0)) {
        TeamSide::A
    } else {
        TeamSide::B
    };
    let duration_seconds = rng.random_range(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES) * 60.0;

    let metrics = m
        .team_a
        .iter()
        .chain(m.team_b.iter())
        .map(|slot| (slot.player_id, random_metrics(rng, slot.role, duration_seconds)))
        .collect();

    (MatchOutcome { winner, finished_at }, metrics)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimulationSummary {
    pub rounds: usize,
    pub matches_formed: usize,
    pub rounds_without_match: usize,
    pub adjustments: usize,
    pub average_quality: f64,
    /// Adjustments whose performance component was withheld, by reason
    pub exclusions: BTreeMap<String, usize>,
    pub min_rating: f64,
    pub max_rating: f64,
    pub mean_rating: f64
}

/// Drives a [`Processor`] the way an external caller would: queue players,
/// form matches, report fabricated results and requeue everyone.
pub struct Simulation {
    processor: Processor,
    rng: ChaCha8Rng,
    clock: DateTime<Utc>,
    summary: SimulationSummary,
    quality_total: f64
}

impl Simulation {
    pub fn new(processor: Processor, seed: u64, start: DateTime<Utc>) -> Simulation {
        Simulation {
            processor,
            rng: ChaCha8Rng::seed_from_u64(seed),
            clock: start,
            summary: SimulationSummary::default(),
            quality_total: 0.0
        }
    }

    pub fn processor(&self) -> &Processor {
        &self.processor
    }

    /// Queues a random population. Players are added concurrently.
    pub fn populate(&mut self, n: usize) -> Result<()> {
        let players = random_population(n, &mut self.rng);
        players
            .into_par_iter()
            .try_for_each(|player| self.processor.add_to_pool(player))
    }

    /// One matchmaking round. Returns the adjustments of the match formed, if any.
    pub fn step(&mut self) -> Result<Option<BTreeMap<PlayerId, RatingAdjustment>>> {
        self.summary.rounds += 1;
        self.clock += Duration::minutes(ROUND_INTERVAL_MINUTES);

        let Some(mut m) = self.processor.find_match() else {
            self.summary.rounds_without_match += 1;
            return Ok(None);
        };

        let (outcome, metrics) = play_match(&mut self.rng, &m, self.clock);
        let adjustments = self.processor.process_match_result(&mut m, outcome, &metrics)?;

        self.summary.matches_formed += 1;
        self.summary.adjustments += adjustments.len();
        self.quality_total += m.quality.overall;
        for verdict in adjustments.values().filter_map(|a| a.exclusion) {
            *self.summary.exclusions.entry(verdict.to_string()).or_default() += 1;
        }

        for id in m.player_ids() {
            if let Some(player) = self.processor.player(id) {
                self.processor.add_to_pool(player)?;
            }
        }

        debug!(match_id = %m.id, round = self.summary.rounds, "Simulated match processed");
        Ok(Some(adjustments))
    }

    pub fn summary(&self) -> SimulationSummary {
        let ratings: Vec<f64> = self.processor.players().iter().map(|p| p.rating).collect();
        let mut summary = self.summary.clone();

        if self.summary.matches_formed > 0 {
            summary.average_quality = self.quality_total / self.summary.matches_formed as f64;
        }
        if !ratings.is_empty() {
            summary.min_rating = ratings.iter().copied().fold(f64::INFINITY, f64::min);
            summary.max_rating = ratings.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            summary.mean_rating = ratings.iter().sum::<f64>() / ratings.len() as f64;
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        model::{config::ProcessorConfig, structures::role::Role},
        processor::Processor,
        utils::{
            simulation::{play_match, random_metrics, random_population, Simulation},
            test_utils::{generate_tight_pool, reference_time}
        }
    };
    use itertools::Itertools;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use strum::IntoEnumIterator;

    #[test]
    fn test_random_metrics_valid() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for role in Role::iter() {
            assert!(random_metrics(&mut rng, role, 2100.0).validate().is_ok());
        }
    }

    #[test]
    fn test_random_population() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let players = random_population(50, &mut rng);

        assert_eq!(players.iter().map(|p| p.id).unique().count(), 50);
        assert!(players.iter().all(|p| p.primary_role != p.secondary_role));
        assert!(players.iter().all(|p| (1000.0..=4000.0).contains(&p.rating)));
    }

    #[test]
    fn test_play_match_reports_every_player() {
        let processor = Processor::new(ProcessorConfig::default()).unwrap();
        for player in generate_tight_pool() {
            processor.add_to_pool(player).unwrap();
        }
        let m = processor.find_match().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        let (outcome, metrics) = play_match(&mut rng, &m, reference_time());

        assert_eq!(outcome.finished_at, reference_time());
        assert_eq!(metrics.len(), 10);
        assert!(metrics.values().all(|m| m.validate().is_ok()));
    }

    #[test]
    fn test_simulation_runs() {
        let processor = Processor::new(ProcessorConfig {
            min_quality_threshold: 0.5,
            ..Default::default()
        })
        .unwrap();
        let mut simulation = Simulation::new(processor, 42, reference_time());
        simulation.populate(100).unwrap();

        for _ in 0..20 {
            simulation.step().unwrap();
        }

        let summary = simulation.summary();
        assert_eq!(summary.rounds, 20);
        assert_eq!(summary.matches_formed + summary.rounds_without_match, 20);
        assert_eq!(summary.adjustments, summary.matches_formed * 10);
        assert_eq!(simulation.processor().pool_size(), 100);
        assert!(summary.min_rating >= 0.0);
    }
}
