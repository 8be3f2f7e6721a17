use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::model::constants::{GAME_STATE_GOLD_MARGIN, LOSING_STATE_MULTIPLIER, WINNING_STATE_MULTIPLIER};

/// Economic standing of a player's team against the opponents.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GameState {
    Winning,
    Even,
    Losing
}

impl GameState {
    /// Judges the networth gap. A gap under [`GAME_STATE_GOLD_MARGIN`] is even.
    pub fn from_networth(team: f64, opponent: f64) -> GameState {
        let gap = team - opponent;
        if !gap.is_finite() || gap.abs() < GAME_STATE_GOLD_MARGIN {
            return GameState::Even;
        }

        if gap > 0.0 {
            GameState::Winning
        } else {
            GameState::Losing
        }
    }

    /// Performing from behind is worth more than performing from ahead.
    pub fn multiplier(&self) -> f64 {
        match self {
            GameState::Winning => WINNING_STATE_MULTIPLIER,
            GameState::Even => 1.0,
            GameState::Losing => LOSING_STATE_MULTIPLIER
        }
    }
}
