use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::model::{
    config::ProcessorConfig,
    constants::{ELO_SCALE, NEUTRAL_PERFORMANCE, OUTCOME_WEIGHT, PERFORMANCE_WEIGHT},
    metrics::NormalizedMetrics,
    performance::PerformanceScore,
    safety::{SafetyGuard, SafetyVerdict},
    structures::{
        performance_tier::PerformanceTier,
        player::{Player, PlayerId}
    },
    tiers::classify
};

/// One player's view of a finished match.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerGameResult {
    pub won: bool,
    /// Average rating of the opposing team at formation
    pub opponent_rating: f64,
    pub score: PerformanceScore,
    pub duration_seconds: f64,
    pub finished_at: DateTime<Utc>,
    pub teamfight_participation: f64,
    /// Sub-metrics behind `score`, used by the tier gate and the consistency check
    pub normalized: NormalizedMetrics
}

/// The applied rating change for one player and how it was reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingAdjustment {
    pub player_id: PlayerId,
    pub rating_before: f64,
    pub rating_after: f64,
    /// The change actually applied, after flooring at zero
    pub rating_delta: f64,
    pub outcome_component: f64,
    /// Zero whenever `exclusion` is set
    pub performance_component: f64,
    pub score: PerformanceScore,
    pub tier: PerformanceTier,
    pub exclusion: Option<SafetyVerdict>
}

/// Win probability of `own` against `opponent` on the Elo curve.
pub fn expected_score(own: f64, opponent: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((opponent - own) / ELO_SCALE))
}

/// `k * (actual - expected)`. Its magnitude never exceeds `k`.
pub fn outcome_component(own: f64, opponent: f64, won: bool, k: f64) -> f64 {
    let actual = if won { 1.0 } else { 0.0 };
    k * (actual - expected_score(own, opponent))
}

/// Signed around a neutral score of 0.5 and scaled by the tier multiplier,
/// so a strong game softens a loss and a weak one dents a win.
pub fn performance_component(score: PerformanceScore, tier: PerformanceTier, k: f64) -> f64 {
    2.0 * (score.value() - NEUTRAL_PERFORMANCE) * k * tier.multiplier()
}

pub struct RatingAdjuster {
    config: Arc<ProcessorConfig>,
    guard: SafetyGuard
}

impl RatingAdjuster {
    pub fn new(config: Arc<ProcessorConfig>) -> RatingAdjuster {
        let guard = SafetyGuard::new(&config);
        RatingAdjuster { config, guard }
    }

    pub fn guard(&self) -> &SafetyGuard {
        &self.guard
    }

    /// Computes and applies the rating change for one player, then records
    /// the game in the player's safety history.
    pub fn adjust(&self, player: &mut Player, result: &PlayerGameResult) -> RatingAdjustment {
        let k = self.config.rating_k_factor;
        let tier = classify(result.score, &result.normalized, &self.config);
        let verdict = self.guard.evaluate(player, result);

        let outcome = outcome_component(player.rating, result.opponent_rating, result.won, k);
        let performance = if verdict.is_clear() {
            performance_component(result.score, tier, k)
        } else {
            0.0
        };
        let delta = OUTCOME_WEIGHT * outcome + PERFORMANCE_WEIGHT * performance;

        let rating_before = player.rating;
        let applied = player.apply_rating_change(delta);
        player.games_played += 1;

        self.guard
            .record_game(player, result.score, tier, result.duration_seconds, result.finished_at);

        info!(
            player_id = player.id,
            won = result.won,
            score = result.score.value(),
            %tier,
            "Rating {:.1} -> {:.1} ({:+.2})",
            rating_before,
            player.rating,
            applied
        );

        RatingAdjustment {
            player_id: player.id,
            rating_before,
            rating_after: player.rating,
            rating_delta: applied,
            outcome_component: outcome,
            performance_component: performance,
            score: result.score,
            tier,
            exclusion: (!verdict.is_clear()).then_some(verdict)
        }
    }
}
