use std::collections::HashMap;

use approx::assert_abs_diff_eq;
use chrono::Duration;
use mmr_processor::{
    model::{
        config::{ProcessorConfig, RoleWeightProfile},
        performance::PerformanceScorer,
        rating_adjuster::outcome_component,
        safety::SafetyVerdict,
        structures::{
            game_metrics::GameMetrics,
            performance_tier::PerformanceTier,
            player::PlayerId,
            role::Role,
            sub_metric::SubMetric,
            team_match::{Match, MatchOutcome},
            team_side::TeamSide
        },
        tiers::classify
    },
    processor::Processor,
    utils::test_utils::{generate_carry_metrics, generate_context, generate_tight_pool, reference_time}
};
use strum::IntoEnumIterator;

mod common;

fn queued_processor() -> Processor {
    let processor = Processor::new(ProcessorConfig::default()).unwrap();
    for player in generate_tight_pool() {
        processor.add_to_pool(player).unwrap();
    }

    processor
}

fn metrics_for(m: &Match, duration_seconds: f64) -> HashMap<PlayerId, GameMetrics> {
    m.player_ids()
        .into_iter()
        .map(|id| {
            (id, GameMetrics {
                duration_seconds,
                ..generate_carry_metrics()
            })
        })
        .collect()
}

#[test]
fn test_default_role_weights_sum_to_one() {
    common::init_test_env();
    let profile = RoleWeightProfile::default();

    for role in Role::iter() {
        let sum: f64 = profile.weights(role).unwrap().values().sum();
        assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-9);
    }
}

#[test]
fn test_carry_game_is_reproducible() {
    common::init_test_env();
    let scorer = PerformanceScorer::new(RoleWeightProfile::default());
    let config = ProcessorConfig::default();
    let metrics = generate_carry_metrics();
    let context = generate_context();

    let first = scorer
        .calculate_overall_performance(&metrics, &context, Role::Carry)
        .unwrap();
    let second = scorer
        .calculate_overall_performance(&metrics, &context, Role::Carry)
        .unwrap();

    assert_eq!(first, second);
    assert!(first.normalized.values().all(|v| (0.0..=1.0).contains(v)));

    let expected = [
        (SubMetric::FarmEfficiency, 0.8333),
        (SubMetric::DamageOutput, 0.8286),
        (SubMetric::Survival, 0.7917),
        (SubMetric::ObjectiveFocus, 0.9524),
        (SubMetric::MapPresence, 0.9),
        (SubMetric::SpaceCreation, 0.875),
        (SubMetric::Utility, 0.2958),
        (SubMetric::TeamfightImpact, 0.6476),
        (SubMetric::VisionControl, 1.0)
    ];
    for (metric, value) in expected {
        assert_abs_diff_eq!(first.normalized[&metric], value, epsilon = 1e-3);
    }
    assert_abs_diff_eq!(first.raw_score, 0.8474, epsilon = 1e-3);
    assert_abs_diff_eq!(first.score.value(), 0.8474, epsilon = 1e-3);

    let tier = classify(first.score, &first.normalized, &config);
    assert!(tier >= PerformanceTier::VeryGood);
    assert_eq!(tier, PerformanceTier::Excellent);
}

#[test]
fn test_outcome_component_bounded_by_k() {
    common::init_test_env();
    let k = ProcessorConfig::default().rating_k_factor;

    for gap in [-5000.0, -400.0, 0.0, 400.0, 5000.0] {
        for won in [true, false] {
            assert!(outcome_component(2000.0, 2000.0 + gap, won, k).abs() <= k);
        }
    }
}

#[test]
fn test_short_game_is_outcome_only() {
    common::init_test_env();
    let processor = queued_processor();
    let mut m = processor.find_match().unwrap();
    let metrics = metrics_for(&m, 15.0 * 60.0);

    let adjustments = processor
        .process_match_result(
            &mut m,
            MatchOutcome {
                winner: TeamSide::B,
                finished_at: reference_time()
            },
            &metrics
        )
        .unwrap();

    assert_eq!(adjustments.len(), 10);
    for adjustment in adjustments.values() {
        assert_eq!(adjustment.exclusion, Some(SafetyVerdict::ShortGame));
        assert_eq!(adjustment.performance_component, 0.0);
        assert_abs_diff_eq!(adjustment.rating_delta, 0.8 * adjustment.outcome_component, epsilon = 1e-9);
    }
    for slot in &m.team_b {
        assert!(adjustments[&slot.player_id].rating_delta > 0.0);
    }
}

#[test]
fn test_throttled_player_is_outcome_only() {
    common::init_test_env();
    let processor = queued_processor();
    let start = reference_time();
    for _ in 0..3 {
        processor.record_exceptional(1, start).unwrap();
    }

    let mut m = processor.find_match().unwrap();
    let metrics = metrics_for(&m, 2400.0);
    let adjustments = processor
        .process_match_result(
            &mut m,
            MatchOutcome {
                winner: TeamSide::A,
                finished_at: start + Duration::hours(1)
            },
            &metrics
        )
        .unwrap();

    let throttled = &adjustments[&1];
    assert_eq!(throttled.exclusion, Some(SafetyVerdict::Throttled));
    assert_eq!(throttled.performance_component, 0.0);
    assert!(adjustments
        .values()
        .filter(|a| a.player_id != 1)
        .all(|a| a.exclusion.is_none()));

    // Flags older than the window no longer count
    assert_eq!(processor.is_throttled(1, start + Duration::hours(25)), Ok(false));
}

#[test]
fn test_ratings_stay_non_negative() {
    common::init_test_env();
    let processor = queued_processor();
    let mut m = processor.find_match().unwrap();
    let metrics = metrics_for(&m, 2400.0);

    processor
        .process_match_result(
            &mut m,
            MatchOutcome {
                winner: TeamSide::A,
                finished_at: reference_time()
            },
            &metrics
        )
        .unwrap();

    assert!(processor.players().iter().all(|p| p.rating >= 0.0));
    assert_eq!(processor.pool_size(), 0);
}
