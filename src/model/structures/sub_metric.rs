use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter};

/// Normalized per-match measurements that role weight profiles combine.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SubMetric {
    FarmEfficiency,
    DamageOutput,
    Survival,
    ObjectiveFocus,
    MapPresence,
    SpaceCreation,
    Utility,
    TeamfightImpact,
    VisionControl
}
