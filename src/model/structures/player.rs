use serde::{Deserialize, Serialize};

use crate::{
    error::{MmrError, Result},
    model::{
        constants::{DEFAULT_BEHAVIOR_SCORE, PERFORMANCE_HISTORY_SIZE},
        history::{RollingWindow, TimeWindow},
        structures::role::Role
    }
};

pub type PlayerId = i32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    /// Never negative
    pub rating: f64,
    pub primary_role: Role,
    pub secondary_role: Role,
    /// Supplied by an external conduct system, 0 to 1. Read-only here.
    pub behavior_score: f64,
    pub games_played: u32,
    /// Recent performance scores, most-recent-last
    pub performance_history: RollingWindow<f64>,
    /// Timestamps of exceptional-tier performances
    pub exceptional_flags: TimeWindow<()>,
    /// Durations (seconds) of recently played games
    pub recent_games: TimeWindow<f64>
}

impl Player {
    pub fn new(id: PlayerId, rating: f64, primary_role: Role, secondary_role: Role) -> Player {
        Player {
            id,
            rating: rating.max(0.0),
            primary_role,
            secondary_role,
            behavior_score: DEFAULT_BEHAVIOR_SCORE,
            games_played: 0,
            performance_history: RollingWindow::new(PERFORMANCE_HISTORY_SIZE),
            exceptional_flags: TimeWindow::new(),
            recent_games: TimeWindow::new()
        }
    }

    /// Fields are public, so records built by callers are checked before they
    /// are queued.
    pub fn validate(&self) -> Result<()> {
        if !self.rating.is_finite() || self.rating < 0.0 {
            return Err(MmrError::InvalidPlayer(format!(
                "player {} has rating {}, expected a non-negative number",
                self.id, self.rating
            )));
        }

        if !(0.0..=1.0).contains(&self.behavior_score) {
            return Err(MmrError::InvalidPlayer(format!(
                "player {} has behavior score {}, expected a value within [0, 1]",
                self.id, self.behavior_score
            )));
        }

        Ok(())
    }

    pub fn prefers(&self, role: Role) -> bool {
        self.primary_role == role || self.secondary_role == role
    }

    /// Applies a signed change, flooring the rating at zero. Returns the change
    /// that was actually applied.
    pub fn apply_rating_change(&mut self, delta: f64) -> f64 {
        let before = self.rating;
        self.rating = (self.rating + delta).max(0.0);
        self.rating - before
    }
}
