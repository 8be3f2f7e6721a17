use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// Tiers are ordered so that `Exceptional > Excellent > VeryGood > Standard`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PerformanceTier {
    Standard,
    VeryGood,
    Excellent,
    Exceptional
}

impl PerformanceTier {
    /// Scales the performance component of a rating delta, on wins and losses alike.
    pub fn multiplier(&self) -> f64 {
        match self {
            PerformanceTier::Exceptional => 1.5,
            PerformanceTier::Excellent => 1.25,
            PerformanceTier::VeryGood => 1.1,
            PerformanceTier::Standard => 1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::model::structures::performance_tier::PerformanceTier;
    use itertools::Itertools;
    use strum::IntoEnumIterator;

    #[test]
    fn test_multipliers_strictly_increase_with_tier() {
        let multipliers = PerformanceTier::iter().map(|t| t.multiplier()).collect_vec();

        for (lower, higher) in multipliers.iter().tuple_windows() {
            assert!(higher > lower);
        }
    }

    #[test]
    fn test_ordering() {
        assert!(PerformanceTier::Exceptional > PerformanceTier::Excellent);
        assert!(PerformanceTier::Excellent > PerformanceTier::VeryGood);
        assert!(PerformanceTier::VeryGood > PerformanceTier::Standard);
    }
}
