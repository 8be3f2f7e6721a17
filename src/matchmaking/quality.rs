use crate::{
    matchmaking::roles::{assign_roles, role_coverage},
    model::{
        config::ProcessorConfig,
        structures::{match_quality::MatchQuality, player::Player, team_match::TeamSlot}
    }
};

/// One fully evaluated team split.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub team_a: Vec<TeamSlot>,
    pub team_b: Vec<TeamSlot>,
    pub quality: MatchQuality
}

impl Candidate {
    /// Sum of every player id in the match
    pub fn id_sum(&self) -> i64 {
        self.team_a
            .iter()
            .chain(self.team_b.iter())
            .map(|s| s.player_id as i64)
            .sum()
    }

    pub fn sorted_team_a_ids(&self) -> Vec<i32> {
        let mut ids: Vec<i32> = self.team_a.iter().map(|s| s.player_id).collect();
        ids.sort_unstable();
        ids
    }
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mean = mean(values);
    (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64).sqrt()
}

/// 1 for identical team averages, falling linearly to 0 at `max_skill_difference`.
pub fn skill_balance(team_a: &[f64], team_b: &[f64], max_skill_difference: f64) -> f64 {
    (1.0 - (mean(team_a) - mean(team_b)).abs() / max_skill_difference).max(0.0)
}

/// Mean over both teams of how tightly each team's ratings cluster.
pub fn skill_spread(team_a: &[f64], team_b: &[f64], max_skill_difference: f64) -> f64 {
    let tightness = |ratings: &[f64]| (1.0 - std_dev(ratings) / max_skill_difference).max(0.0);
    (tightness(team_a) + tightness(team_b)) / 2.0
}

/// Assigns roles on both sides and scores the resulting match.
pub fn evaluate(team_a: &[&Player], team_b: &[&Player], config: &ProcessorConfig) -> Candidate {
    let slots_a = assign_roles(team_a);
    let slots_b = assign_roles(team_b);

    let ratings_a: Vec<f64> = team_a.iter().map(|p| p.rating).collect();
    let ratings_b: Vec<f64> = team_b.iter().map(|p| p.rating).collect();

    let skill_balance = skill_balance(&ratings_a, &ratings_b, config.max_skill_difference);
    let role_coverage = (role_coverage(&slots_a, team_a) + role_coverage(&slots_b, team_b)) / 2.0;
    let skill_spread = skill_spread(&ratings_a, &ratings_b, config.max_skill_difference);

    let weights = &config.quality_weights;
    let overall = (weights.skill_balance * skill_balance
        + weights.role_coverage * role_coverage
        + weights.skill_spread * skill_spread)
        .clamp(0.0, 1.0);

    Candidate {
        team_a: slots_a,
        team_b: slots_b,
        quality: MatchQuality {
            skill_balance,
            role_coverage,
            skill_spread,
            overall
        }
    }
}
