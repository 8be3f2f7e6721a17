use serde::{Deserialize, Serialize};

/// Expected competitiveness of a team composition. Every field is in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchQuality {
    /// Inverse of the gap between the two teams' average ratings
    pub skill_balance: f64,
    /// Share of slots filled by a player who declared that role
    pub role_coverage: f64,
    /// Inverse of the rating standard deviation inside each team
    pub skill_spread: f64,
    pub overall: f64
}
