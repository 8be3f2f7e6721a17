use std::{collections::BTreeMap, convert::TryFrom};

use chrono::Duration;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::{
    error::{MmrError, Result},
    model::{
        constants::*,
        structures::{role::Role, sub_metric::SubMetric}
    }
};

pub type WeightVector = BTreeMap<SubMetric, f64>;

/// Role-specific sub-metric weights. Can only be obtained through validation,
/// so every instance has all five roles and weight vectors summing to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<Role, WeightVector>", into = "BTreeMap<Role, WeightVector>")]
pub struct RoleWeightProfile {
    weights: BTreeMap<Role, WeightVector>
}

impl RoleWeightProfile {
    pub fn weights(&self, role: Role) -> Result<&WeightVector> {
        self.weights
            .get(&role)
            .ok_or_else(|| MmrError::UnknownRole(role.to_string()))
    }

    fn validate(weights: &BTreeMap<Role, WeightVector>) -> Result<()> {
        for role in Role::iter() {
            let vector = weights
                .get(&role)
                .ok_or_else(|| MmrError::Configuration(format!("no weight profile for role {role}")))?;

            if let Some((metric, w)) = vector.iter().find(|(_, w)| !w.is_finite() || !(0.0..=1.0).contains(*w)) {
                return Err(MmrError::Configuration(format!(
                    "weight for {metric} in {role} must be within [0, 1], got {w}"
                )));
            }

            let sum: f64 = vector.values().sum();
            if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
                return Err(MmrError::Configuration(format!(
                    "weights for {role} sum to {sum}, expected 1.0"
                )));
            }
        }

        Ok(())
    }
}

impl TryFrom<BTreeMap<Role, WeightVector>> for RoleWeightProfile {
    type Error = MmrError;

    fn try_from(weights: BTreeMap<Role, WeightVector>) -> Result<Self> {
        RoleWeightProfile::validate(&weights)?;
        Ok(RoleWeightProfile { weights })
    }
}

impl From<RoleWeightProfile> for BTreeMap<Role, WeightVector> {
    fn from(profile: RoleWeightProfile) -> Self {
        profile.weights
    }
}

impl Default for RoleWeightProfile {
    fn default() -> Self {
        use SubMetric::*;

        let table: [(Role, &[(SubMetric, f64)]); 5] = [
            (
                Role::Carry,
                &[(FarmEfficiency, 0.3), (DamageOutput, 0.3), (Survival, 0.2), (ObjectiveFocus, 0.2)]
            ),
            (
                Role::Mid,
                &[(FarmEfficiency, 0.25), (DamageOutput, 0.3), (MapPresence, 0.25), (ObjectiveFocus, 0.2)]
            ),
            (
                Role::Offlane,
                &[(SpaceCreation, 0.3), (Survival, 0.25), (DamageOutput, 0.25), (ObjectiveFocus, 0.2)]
            ),
            (
                Role::SoftSupport,
                &[(MapPresence, 0.3), (Utility, 0.3), (TeamfightImpact, 0.2), (VisionControl, 0.2)]
            ),
            (
                Role::HardSupport,
                &[(VisionControl, 0.3), (Utility, 0.3), (Survival, 0.2), (TeamfightImpact, 0.2)]
            )
        ];

        RoleWeightProfile {
            weights: table
                .iter()
                .map(|(role, vector)| (*role, vector.iter().copied().collect()))
                .collect()
        }
    }
}

/// Weights of the three match quality components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityWeights {
    pub skill_balance: f64,
    pub role_coverage: f64,
    pub skill_spread: f64
}

impl Default for QualityWeights {
    fn default() -> Self {
        QualityWeights {
            skill_balance: QUALITY_WEIGHT_SKILL_BALANCE,
            role_coverage: QUALITY_WEIGHT_ROLE_COVERAGE,
            skill_spread: QUALITY_WEIGHT_SKILL_SPREAD
        }
    }
}

/// Everything the core is tuned by. Supplied by the caller, validated once by
/// [`ProcessorConfig::validate`] before any match is processed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    pub role_weights: RoleWeightProfile,
    pub exceptional_threshold: f64,
    pub excellent_threshold: f64,
    pub very_good_threshold: f64,
    /// Floor the combat, teamfight and game impact components must reach
    /// for an exceptional tier
    pub exceptional_component_floor: f64,
    pub min_quality_threshold: f64,
    pub max_skill_difference: f64,
    pub team_size: usize,
    pub max_consecutive_exceptional: usize,
    pub time_window_hours: i64,
    /// Minutes
    pub minimum_game_duration: f64,
    pub rating_k_factor: f64,
    pub maximum_daily_games: usize,
    pub suspicious_performance_threshold: f64,
    pub required_teamfight_participation: f64,
    /// Largest spread of the core sub-metrics a high score may show
    pub max_metric_deviation: f64,
    pub quality_weights: QualityWeights,
    /// Upper bound on candidate player sets examined per search
    pub search_budget: usize,
    /// Upper bound on team splits examined per candidate set
    pub split_budget: usize
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        ProcessorConfig {
            role_weights: RoleWeightProfile::default(),
            exceptional_threshold: EXCEPTIONAL_THRESHOLD,
            excellent_threshold: EXCELLENT_THRESHOLD,
            very_good_threshold: VERY_GOOD_THRESHOLD,
            exceptional_component_floor: EXCEPTIONAL_COMPONENT_FLOOR,
            min_quality_threshold: MIN_QUALITY_THRESHOLD,
            max_skill_difference: MAX_SKILL_DIFFERENCE,
            team_size: TEAM_SIZE,
            max_consecutive_exceptional: MAX_CONSECUTIVE_EXCEPTIONAL,
            time_window_hours: TIME_WINDOW_HOURS,
            minimum_game_duration: MINIMUM_GAME_DURATION_MINUTES,
            rating_k_factor: RATING_K_FACTOR,
            maximum_daily_games: MAXIMUM_DAILY_GAMES,
            suspicious_performance_threshold: SUSPICIOUS_PERFORMANCE_THRESHOLD,
            required_teamfight_participation: REQUIRED_TEAMFIGHT_PARTICIPATION,
            max_metric_deviation: MAX_METRIC_DEVIATION,
            quality_weights: QualityWeights::default(),
            search_budget: SEARCH_BUDGET,
            split_budget: SPLIT_BUDGET
        }
    }
}

impl ProcessorConfig {
    pub fn validate(&self) -> Result<()> {
        let thresholds_ordered = 0.0 < self.very_good_threshold
            && self.very_good_threshold < self.excellent_threshold
            && self.excellent_threshold < self.exceptional_threshold
            && self.exceptional_threshold <= 1.0;
        if !thresholds_ordered {
            return Err(MmrError::Configuration(format!(
                "tier thresholds must satisfy 0 < very_good ({}) < excellent ({}) < exceptional ({}) <= 1",
                self.very_good_threshold, self.excellent_threshold, self.exceptional_threshold
            )));
        }

        check_unit("min_quality_threshold", self.min_quality_threshold)?;
        check_unit("suspicious_performance_threshold", self.suspicious_performance_threshold)?;
        check_unit("exceptional_component_floor", self.exceptional_component_floor)?;
        check_unit("required_teamfight_participation", self.required_teamfight_participation)?;
        check_unit("max_metric_deviation", self.max_metric_deviation)?;
        check_positive("max_skill_difference", self.max_skill_difference)?;
        check_positive("rating_k_factor", self.rating_k_factor)?;

        if !self.minimum_game_duration.is_finite() || self.minimum_game_duration < 0.0 {
            return Err(MmrError::Configuration(format!(
                "minimum_game_duration must be a non-negative number of minutes, got {}",
                self.minimum_game_duration
            )));
        }

        let counts = [
            ("team_size", self.team_size),
            ("max_consecutive_exceptional", self.max_consecutive_exceptional),
            ("maximum_daily_games", self.maximum_daily_games),
            ("search_budget", self.search_budget),
            ("split_budget", self.split_budget)
        ];
        if let Some((name, _)) = counts.iter().find(|(_, v)| *v == 0) {
            return Err(MmrError::Configuration(format!("{name} must be at least 1")));
        }

        if self.time_window_hours < 1 {
            return Err(MmrError::Configuration(format!(
                "time_window_hours must be at least 1, got {}",
                self.time_window_hours
            )));
        }

        let q = &self.quality_weights;
        check_unit("quality_weights.skill_balance", q.skill_balance)?;
        check_unit("quality_weights.role_coverage", q.role_coverage)?;
        check_unit("quality_weights.skill_spread", q.skill_spread)?;
        let sum = q.skill_balance + q.role_coverage + q.skill_spread;
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(MmrError::Configuration(format!("quality weights sum to {sum}, expected 1.0")));
        }

        Ok(())
    }

    pub fn time_window(&self) -> Duration {
        Duration::hours(self.time_window_hours)
    }

    pub fn minimum_game_duration_seconds(&self) -> f64 {
        self.minimum_game_duration * 60.0
    }
}

fn check_unit(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(MmrError::Configuration(format!("{name} must be within [0, 1], got {value}")))
    }
}

fn check_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MmrError::Configuration(format!("{name} must be positive, got {value}")))
    }
}
