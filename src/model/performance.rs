use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    model::{
        config::RoleWeightProfile,
        constants::{MAX_CONTEXT_ADJUSTMENT, OPPONENT_STRENGTH_SCALE},
        metrics::{normalize, NormalizedMetrics},
        structures::{
            game_metrics::{GameContext, GameMetrics},
            game_state::GameState,
            role::Role,
            sub_metric::SubMetric
        }
    }
};

/// A player's performance in one match, always within [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct PerformanceScore(f64);

impl PerformanceScore {
    /// Saturates at the bounds. A NaN input scores 0.
    pub fn saturating(value: f64) -> PerformanceScore {
        if value.is_nan() {
            return PerformanceScore(0.0);
        }

        PerformanceScore(value.clamp(0.0, 1.0))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for PerformanceScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

/// Full breakdown of how a score was reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub role: Role,
    pub normalized: NormalizedMetrics,
    /// Each weighted sub-metric's contribution to the raw score
    pub weighted: BTreeMap<SubMetric, f64>,
    pub raw_score: f64,
    pub context_factor: f64,
    pub game_state: GameState,
    pub score: PerformanceScore
}

pub struct PerformanceScorer {
    profile: RoleWeightProfile
}

impl PerformanceScorer {
    pub fn new(profile: RoleWeightProfile) -> PerformanceScorer {
        PerformanceScorer { profile }
    }

    /// Normalizes the raw statistics and scores them for `role`.
    pub fn calculate_overall_performance(
        &self,
        metrics: &GameMetrics,
        context: &GameContext,
        role: Role
    ) -> Result<PerformanceReport> {
        let normalized = normalize(metrics, role, context)?;
        self.score(normalized, role, context)
    }

    /// Weighted sum of the role's sub-metrics, scaled by relative opponent
    /// strength and by the game state, then clamped into [0, 1]. Scores above
    /// 1 saturate on purpose.
    pub fn score(&self, normalized: NormalizedMetrics, role: Role, context: &GameContext) -> Result<PerformanceReport> {
        let weights = self.profile.weights(role)?;

        let weighted: BTreeMap<SubMetric, f64> = weights
            .iter()
            .map(|(metric, w)| (*metric, normalized.get(metric).copied().unwrap_or(0.0) * w))
            .collect();
        let raw_score: f64 = weighted.values().sum();

        let context_factor = context_factor(context);
        let game_state = context.game_state();
        let score = PerformanceScore::saturating(raw_score * context_factor * game_state.multiplier());

        Ok(PerformanceReport {
            role,
            normalized,
            weighted,
            raw_score,
            context_factor,
            game_state,
            score
        })
    }
}

/// Stronger opponents inflate a score, weaker ones deflate it, each by at most
/// [`MAX_CONTEXT_ADJUSTMENT`].
pub fn context_factor(context: &GameContext) -> f64 {
    let gap = (context.opponent_rating - context.team_rating) / OPPONENT_STRENGTH_SCALE;
    if !gap.is_finite() {
        return 1.0;
    }

    1.0 + gap.clamp(-MAX_CONTEXT_ADJUSTMENT, MAX_CONTEXT_ADJUSTMENT)
}

#[cfg(test)]
mod tests {
    use crate::{
        model::{
            config::RoleWeightProfile,
            metrics::NormalizedMetrics,
            performance::{context_factor, PerformanceScore, PerformanceScorer},
            structures::{game_metrics::GameContext, game_state::GameState, role::Role, sub_metric::SubMetric}
        },
        utils::test_utils::{generate_carry_metrics, generate_context, generate_support_metrics}
    };
    use approx::assert_abs_diff_eq;
    use strum::IntoEnumIterator;

    fn scorer() -> PerformanceScorer {
        PerformanceScorer::new(RoleWeightProfile::default())
    }

    fn perfect() -> NormalizedMetrics {
        SubMetric::iter().map(|m| (m, 1.0)).collect()
    }

    #[test]
    fn test_score_in_unit_range_for_every_role() {
        let scorer = scorer();
        for metrics in [generate_carry_metrics(), generate_support_metrics()] {
            for role in Role::iter() {
                let report = scorer
                    .calculate_overall_performance(&metrics, &generate_context(), role)
                    .unwrap();

                assert!((0.0..=1.0).contains(&report.score.value()));
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let scorer = scorer();
        let metrics = generate_carry_metrics();
        let context = generate_context();

        let first = scorer.calculate_overall_performance(&metrics, &context, Role::Carry).unwrap();
        let second = scorer.calculate_overall_performance(&metrics, &context, Role::Carry).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_weighted_contributions_sum_to_raw() {
        let report = scorer()
            .calculate_overall_performance(&generate_carry_metrics(), &generate_context(), Role::Carry)
            .unwrap();

        assert_eq!(report.weighted.len(), 4);
        assert_abs_diff_eq!(report.weighted.values().sum::<f64>(), report.raw_score, epsilon = 1e-12);
        assert_abs_diff_eq!(report.context_factor, 1.0);
        assert_abs_diff_eq!(report.score.value(), report.raw_score, epsilon = 1e-12);
    }

    #[test]
    fn test_stronger_opponents_inflate() {
        let scorer = scorer();
        let metrics = generate_carry_metrics();
        let even = generate_context();
        let stronger = GameContext {
            opponent_rating: even.team_rating + 400.0,
            ..even.clone()
        };
        let weaker = GameContext {
            opponent_rating: even.team_rating - 400.0,
            ..even.clone()
        };

        let even_score = scorer.calculate_overall_performance(&metrics, &even, Role::Carry).unwrap().score;
        let stronger_score = scorer.calculate_overall_performance(&metrics, &stronger, Role::Carry).unwrap().score;
        let weaker_score = scorer.calculate_overall_performance(&metrics, &weaker, Role::Carry).unwrap().score;

        assert!(stronger_score > even_score);
        assert!(weaker_score < even_score);
    }

    #[test]
    fn test_game_state_scales_score() {
        let scorer = scorer();
        let metrics = generate_carry_metrics();
        let even = generate_context();
        let ahead = GameContext {
            team_networth: even.opponent_networth + 10_000.0,
            ..even.clone()
        };
        let behind = GameContext {
            team_networth: even.opponent_networth - 10_000.0,
            ..even.clone()
        };

        let even_report = scorer.calculate_overall_performance(&metrics, &even, Role::Carry).unwrap();
        let ahead_report = scorer.calculate_overall_performance(&metrics, &ahead, Role::Carry).unwrap();
        let behind_report = scorer.calculate_overall_performance(&metrics, &behind, Role::Carry).unwrap();

        assert_eq!(even_report.game_state, GameState::Even);
        assert_eq!(ahead_report.game_state, GameState::Winning);
        assert_eq!(behind_report.game_state, GameState::Losing);
        assert_abs_diff_eq!(ahead_report.score.value(), 0.9 * even_report.score.value(), epsilon = 1e-12);
        assert_abs_diff_eq!(
            behind_report.score.value(),
            (1.2 * even_report.score.value()).min(1.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_saturates_instead_of_renormalizing() {
        let context = GameContext {
            opponent_rating: 4000.0,
            ..generate_context()
        };

        let report = scorer().score(perfect(), Role::Mid, &context).unwrap();

        assert_abs_diff_eq!(report.raw_score, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(report.context_factor, 1.2);
        assert_eq!(report.score.value(), 1.0);
    }

    #[test]
    fn test_context_factor_bounded() {
        let mut context = generate_context();
        context.opponent_rating = 1_000_000.0;
        assert_abs_diff_eq!(context_factor(&context), 1.2);

        context.opponent_rating = -1_000_000.0;
        assert_abs_diff_eq!(context_factor(&context), 0.8);
    }

    #[test]
    fn test_missing_sub_metric_counts_as_zero() {
        let mut normalized = perfect();
        normalized.remove(&SubMetric::FarmEfficiency);

        let report = scorer().score(normalized, Role::Carry, &generate_context()).unwrap();
        assert_abs_diff_eq!(report.raw_score, 0.7, epsilon = 1e-12);
    }

    #[test]
    fn test_saturating_nan() {
        assert_eq!(PerformanceScore::saturating(f64::NAN).value(), 0.0);
        assert_eq!(PerformanceScore::saturating(-0.5).value(), 0.0);
        assert_eq!(PerformanceScore::saturating(1.5).value(), 1.0);
    }
}
