use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, Mutex, MutexGuard, PoisonError}
};

use chrono::{DateTime, Utc};
use itertools::Itertools;
use tracing::{debug, info};

use crate::{
    error::{MmrError, Result},
    matchmaking::{generator::MatchGenerator, pool::MatchmakingPool},
    model::{
        config::ProcessorConfig,
        performance::{PerformanceReport, PerformanceScorer},
        rating_adjuster::{PlayerGameResult, RatingAdjuster, RatingAdjustment},
        structures::{
            game_metrics::{GameContext, GameMetrics},
            player::{Player, PlayerId},
            role::Role,
            team_match::{Match, MatchOutcome, TeamSlot},
            team_side::TeamSide
        }
    }
};

/// The core API: queueing, match search and result processing over one
/// in-memory roster of players.
///
/// The roster is the source of truth for ratings and safety history. Pool
/// entries are copies that are refreshed whenever a queued player's rating
/// changes.
pub struct Processor {
    config: Arc<ProcessorConfig>,
    pool: MatchmakingPool,
    roster: Mutex<HashMap<PlayerId, Player>>,
    scorer: PerformanceScorer,
    adjuster: RatingAdjuster,
    generator: MatchGenerator
}

/// A validated player's inputs for one match, computed before anything is mutated.
struct PendingAdjustment {
    slot: TeamSlot,
    side: TeamSide,
    report: PerformanceReport,
    duration_seconds: f64,
    teamfight_participation: f64
}

impl Processor {
    /// Rejects an invalid configuration up front, so nothing fails on it at match time.
    pub fn new(config: ProcessorConfig) -> Result<Processor> {
        config.validate()?;
        let config = Arc::new(config);

        Ok(Processor {
            pool: MatchmakingPool::new(),
            roster: Mutex::new(HashMap::new()),
            scorer: PerformanceScorer::new(config.role_weights.clone()),
            adjuster: RatingAdjuster::new(Arc::clone(&config)),
            generator: MatchGenerator::new(Arc::clone(&config)),
            config
        })
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    fn roster(&self) -> MutexGuard<'_, HashMap<PlayerId, Player>> {
        self.roster.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queues a player. A player seen before keeps the rating and history the
    /// roster holds; only the role preferences and behavior score are taken
    /// from `player`. A rejected call changes nothing.
    pub fn add_to_pool(&self, player: Player) -> Result<()> {
        player.validate()?;

        let mut roster = self.roster();
        if self.pool.contains(player.id) {
            return Err(MmrError::DuplicateEntry(player.id));
        }

        let queued = match roster.get(&player.id) {
            Some(known) => Player {
                primary_role: player.primary_role,
                secondary_role: player.secondary_role,
                behavior_score: player.behavior_score,
                ..known.clone()
            },
            None => player
        };

        self.pool.add(queued.clone())?;
        roster.insert(queued.id, queued);

        Ok(())
    }

    pub fn remove_from_pool(&self, player_id: PlayerId) -> Result<Player> {
        self.pool.remove(player_id)
    }

    /// Searches the current pool and claims the chosen players. `None` when no
    /// match of sufficient quality exists right now.
    pub fn find_match(&self) -> Option<Match> {
        match self.try_find_match() {
            Ok(m) => Some(m),
            Err(e) => {
                debug!("No match formed: {}", e);
                None
            }
        }
    }

    /// Like [`Processor::find_match`] but reports why no match was formed. A
    /// player leaving between the snapshot and the claim fails with `NotFound`
    /// and leaves the pool untouched.
    pub fn try_find_match(&self) -> Result<Match> {
        let snapshot = self.pool.snapshot();
        let formed = self.generator.try_find_match(&snapshot, self.config.team_size)?;
        self.pool.claim(&formed.player_ids())?;

        Ok(formed)
    }

    pub fn calculate_overall_performance(
        &self,
        metrics: &GameMetrics,
        context: &GameContext,
        role: Role
    ) -> Result<PerformanceReport> {
        self.scorer.calculate_overall_performance(metrics, context, role)
    }

    /// Finalizes a match: scores every player, applies the rating changes and
    /// records the outcome on `m`.
    ///
    /// Every input is validated before any player is touched, so on error no
    /// rating or history has changed. A match can be finalized only once.
    pub fn process_match_result(
        &self,
        m: &mut Match,
        outcome: MatchOutcome,
        metrics: &HashMap<PlayerId, GameMetrics>
    ) -> Result<BTreeMap<PlayerId, RatingAdjustment>> {
        if m.is_finalized() {
            return Err(MmrError::MatchAlreadyFinalized(m.id));
        }

        let pending = self.score_match(m, metrics)?;

        let mut adjustments = BTreeMap::new();
        {
            let mut roster = self.roster();
            if let Some(missing) = pending.iter().find(|p| !roster.contains_key(&p.slot.player_id)) {
                return Err(MmrError::NotFound(missing.slot.player_id));
            }

            for p in pending {
                let Some(player) = roster.get_mut(&p.slot.player_id) else {
                    continue;
                };

                let result = PlayerGameResult {
                    won: p.side == outcome.winner,
                    opponent_rating: m.average_rating(p.side.opponent()),
                    score: p.report.score,
                    duration_seconds: p.duration_seconds,
                    finished_at: outcome.finished_at,
                    teamfight_participation: p.teamfight_participation,
                    normalized: p.report.normalized
                };
                let adjustment = self.adjuster.adjust(player, &result);
                self.pool.refresh(player);
                adjustments.insert(p.slot.player_id, adjustment);
            }
        }

        m.outcome = Some(outcome);
        m.rating_deltas = adjustments.iter().map(|(id, a)| (*id, a.rating_delta)).collect();

        info!(
            match_id = %m.id,
            winner = ?outcome.winner,
            "Match finalized, {} ratings adjusted",
            adjustments.len()
        );

        Ok(adjustments)
    }

    /// Validates and scores every slot of `m` without mutating anything.
    fn score_match(&self, m: &Match, metrics: &HashMap<PlayerId, GameMetrics>) -> Result<Vec<PendingAdjustment>> {
        let metrics_for = |slot: &TeamSlot| {
            metrics.get(&slot.player_id).ok_or_else(|| {
                MmrError::InvalidMetrics(format!("no metrics reported for player {}", slot.player_id))
            })
        };

        for slot in m.team_a.iter().chain(m.team_b.iter()) {
            metrics_for(slot)?.validate()?;
        }

        let mut pending = Vec::with_capacity(m.team_a.len() + m.team_b.len());
        for side in [TeamSide::A, TeamSide::B] {
            let team = m.team(side);
            let team_metrics = team.iter().map(metrics_for).collect::<Result<Vec<_>>>()?;
            let opponent_metrics = m
                .team(side.opponent())
                .iter()
                .map(metrics_for)
                .collect::<Result<Vec<_>>>()?;
            let context = GameContext::from_teams(
                team_metrics.iter().copied(),
                opponent_metrics.iter().copied(),
                m.average_rating(side),
                m.average_rating(side.opponent())
            );

            for (slot, player_metrics) in team.iter().zip(team_metrics) {
                let report = self.calculate_overall_performance(player_metrics, &context, slot.role)?;
                pending.push(PendingAdjustment {
                    slot: slot.clone(),
                    side,
                    report,
                    duration_seconds: player_metrics.duration_seconds,
                    teamfight_participation: player_metrics.teamfight_participation
                });
            }
        }

        Ok(pending)
    }

    /// Current roster record for a player, whether queued or not.
    pub fn player(&self, player_id: PlayerId) -> Option<Player> {
        self.roster().get(&player_id).cloned()
    }

    /// Every known player, ordered by id.
    pub fn players(&self) -> Vec<Player> {
        self.roster().values().cloned().sorted_by_key(|p| p.id).collect()
    }

    pub fn pool_size(&self) -> usize {
        self.pool.len()
    }

    pub fn is_queued(&self, player_id: PlayerId) -> bool {
        self.pool.contains(player_id)
    }

    pub fn record_exceptional(&self, player_id: PlayerId, at: DateTime<Utc>) -> Result<()> {
        let mut roster = self.roster();
        let player = roster.get_mut(&player_id).ok_or(MmrError::NotFound(player_id))?;
        self.adjuster.guard().record_exceptional(player, at);

        Ok(())
    }

    pub fn is_throttled(&self, player_id: PlayerId, now: DateTime<Utc>) -> Result<bool> {
        let mut roster = self.roster();
        let player = roster.get_mut(&player_id).ok_or(MmrError::NotFound(player_id))?;

        Ok(self.adjuster.guard().is_throttled(player, now))
    }

    pub fn record_game_duration(&self, player_id: PlayerId, duration_seconds: f64, at: DateTime<Utc>) -> Result<()> {
        let mut roster = self.roster();
        let player = roster.get_mut(&player_id).ok_or(MmrError::NotFound(player_id))?;
        self.adjuster.guard().record_game_duration(player, duration_seconds, at);

        Ok(())
    }
}
