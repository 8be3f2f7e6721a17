use crate::model::{
    config::ProcessorConfig,
    metrics::NormalizedMetrics,
    performance::PerformanceScore,
    structures::{performance_tier::PerformanceTier, sub_metric::SubMetric}
};

/// Share of each sub-metric in a player's overall effect on the game.
const GAME_IMPACT_WEIGHTS: [(SubMetric, f64); 7] = [
    (SubMetric::DamageOutput, 0.25),
    (SubMetric::FarmEfficiency, 0.15),
    (SubMetric::MapPresence, 0.15),
    (SubMetric::ObjectiveFocus, 0.15),
    (SubMetric::TeamfightImpact, 0.15),
    (SubMetric::VisionControl, 0.08),
    (SubMetric::Utility, 0.07)
];

/// Role-independent blend of the sub-metrics. Missing ones count as 0.
pub fn game_impact(normalized: &NormalizedMetrics) -> f64 {
    GAME_IMPACT_WEIGHTS
        .iter()
        .map(|(metric, w)| normalized.get(metric).copied().unwrap_or(0.0) * w)
        .sum()
}

/// Highest tier whose threshold the score reaches. Thresholds are checked in
/// strictly descending order, so the first match wins.
///
/// An exceptional score only earns the exceptional tier when combat,
/// teamfight and game impact all reach `exceptional_component_floor`;
/// otherwise it is excellent.
pub fn classify(score: PerformanceScore, normalized: &NormalizedMetrics, config: &ProcessorConfig) -> PerformanceTier {
    let value = score.value();

    if value >= config.exceptional_threshold && exceptional_components(normalized, config) {
        PerformanceTier::Exceptional
    } else if value >= config.excellent_threshold {
        PerformanceTier::Excellent
    } else if value >= config.very_good_threshold {
        PerformanceTier::VeryGood
    } else {
        PerformanceTier::Standard
    }
}

fn exceptional_components(normalized: &NormalizedMetrics, config: &ProcessorConfig) -> bool {
    let component = |metric: SubMetric| normalized.get(&metric).copied().unwrap_or(0.0);

    [
        component(SubMetric::DamageOutput),
        component(SubMetric::TeamfightImpact),
        game_impact(normalized)
    ]
    .iter()
    .all(|v| *v >= config.exceptional_component_floor)
}

#[cfg(test)]
mod tests {
    use crate::model::{
        config::ProcessorConfig,
        metrics::NormalizedMetrics,
        performance::PerformanceScore,
        structures::{performance_tier::PerformanceTier, sub_metric::SubMetric},
        tiers::{classify, game_impact}
    };
    use approx::assert_abs_diff_eq;
    use strum::IntoEnumIterator;

    fn uniform(value: f64) -> NormalizedMetrics {
        SubMetric::iter().map(|m| (m, value)).collect()
    }

    fn tier(value: f64) -> PerformanceTier {
        classify(PerformanceScore::saturating(value), &uniform(1.0), &ProcessorConfig::default())
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        assert_eq!(tier(0.9), PerformanceTier::Exceptional);
        assert_eq!(tier(0.8), PerformanceTier::Excellent);
        assert_eq!(tier(0.7), PerformanceTier::VeryGood);
    }

    #[test]
    fn test_classify() {
        assert_eq!(tier(1.0), PerformanceTier::Exceptional);
        assert_eq!(tier(0.899), PerformanceTier::Excellent);
        assert_eq!(tier(0.75), PerformanceTier::VeryGood);
        assert_eq!(tier(0.69), PerformanceTier::Standard);
        assert_eq!(tier(0.0), PerformanceTier::Standard);
    }

    #[test]
    fn test_custom_thresholds() {
        let config = ProcessorConfig {
            exceptional_threshold: 0.99,
            excellent_threshold: 0.6,
            very_good_threshold: 0.5,
            ..Default::default()
        };

        assert_eq!(
            classify(PerformanceScore::saturating(0.95), &uniform(1.0), &config),
            PerformanceTier::Excellent
        );
        assert_eq!(
            classify(PerformanceScore::saturating(0.55), &uniform(1.0), &config),
            PerformanceTier::VeryGood
        );
    }

    #[test]
    fn test_game_impact_weights_sum_to_one() {
        assert_abs_diff_eq!(game_impact(&uniform(1.0)), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(game_impact(&uniform(0.5)), 0.5, epsilon = 1e-12);
        assert_eq!(game_impact(&NormalizedMetrics::new()), 0.0);
    }

    #[test]
    fn test_weak_teamfight_caps_at_excellent() {
        let config = ProcessorConfig::default();
        let mut normalized = uniform(1.0);
        normalized.insert(SubMetric::TeamfightImpact, 0.6);

        assert_eq!(
            classify(PerformanceScore::saturating(0.95), &normalized, &config),
            PerformanceTier::Excellent
        );
    }

    #[test]
    fn test_low_game_impact_caps_at_excellent() {
        let config = ProcessorConfig::default();
        let mut normalized = uniform(0.3);
        normalized.insert(SubMetric::DamageOutput, 1.0);
        normalized.insert(SubMetric::TeamfightImpact, 1.0);

        assert!(game_impact(&normalized) < config.exceptional_component_floor);
        assert_eq!(
            classify(PerformanceScore::saturating(0.95), &normalized, &config),
            PerformanceTier::Excellent
        );
    }

    #[test]
    fn test_gate_only_affects_exceptional() {
        let config = ProcessorConfig::default();
        let empty = NormalizedMetrics::new();

        assert_eq!(
            classify(PerformanceScore::saturating(0.95), &empty, &config),
            PerformanceTier::Excellent
        );
        assert_eq!(
            classify(PerformanceScore::saturating(0.85), &empty, &config),
            PerformanceTier::Excellent
        );
        assert_eq!(
            classify(PerformanceScore::saturating(0.75), &empty, &config),
            PerformanceTier::VeryGood
        );
    }
}
