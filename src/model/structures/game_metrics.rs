use serde::{Deserialize, Serialize};

use crate::{
    error::{MmrError, Result},
    model::structures::game_state::GameState
};

/// Raw statistics for one player in one completed match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameMetrics {
    pub kills: i32,
    pub deaths: i32,
    pub assists: i32,
    pub last_hits: i32,
    pub denies: i32,
    pub gold_per_minute: f64,
    pub experience_per_minute: f64,
    pub hero_damage: i64,
    pub damage_taken: i64,
    pub healing_done: i64,
    /// Fraction of the team's fights this player took part in, 0 to 1
    pub teamfight_participation: f64,
    pub wards_placed: i32,
    pub wards_destroyed: i32,
    pub building_damage: i64,
    /// Seconds of disables applied to enemy heroes
    pub stun_duration: f64,
    pub camps_stacked: i32,
    pub duration_seconds: f64
}

impl GameMetrics {
    pub fn duration_minutes(&self) -> f64 {
        self.duration_seconds / 60.0
    }

    /// Rejects malformed statistics. Nothing is clamped here.
    pub fn validate(&self) -> Result<()> {
        if !self.duration_seconds.is_finite() || self.duration_seconds <= 0.0 {
            return Err(MmrError::InvalidMetrics(format!(
                "duration must be positive, got {}",
                self.duration_seconds
            )));
        }

        let counts = [
            ("kills", self.kills as i64),
            ("deaths", self.deaths as i64),
            ("assists", self.assists as i64),
            ("last_hits", self.last_hits as i64),
            ("denies", self.denies as i64),
            ("hero_damage", self.hero_damage),
            ("damage_taken", self.damage_taken),
            ("healing_done", self.healing_done),
            ("wards_placed", self.wards_placed as i64),
            ("wards_destroyed", self.wards_destroyed as i64),
            ("building_damage", self.building_damage),
            ("camps_stacked", self.camps_stacked as i64)
        ];
        if let Some((name, value)) = counts.iter().find(|(_, v)| *v < 0) {
            return Err(MmrError::InvalidMetrics(format!("{name} must not be negative, got {value}")));
        }

        let rates = [
            ("gold_per_minute", self.gold_per_minute),
            ("experience_per_minute", self.experience_per_minute),
            ("stun_duration", self.stun_duration)
        ];
        if let Some((name, value)) = rates.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
            return Err(MmrError::InvalidMetrics(format!(
                "{name} must be a non-negative number, got {value}"
            )));
        }

        if !(0.0..=1.0).contains(&self.teamfight_participation) {
            return Err(MmrError::InvalidMetrics(format!(
                "teamfight_participation must be within [0, 1], got {}",
                self.teamfight_participation
            )));
        }

        Ok(())
    }
}

/// Team-level totals and rating context a player's statistics are judged against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameContext {
    pub team_hero_damage: i64,
    pub team_building_damage: i64,
    pub team_kills: i32,
    /// Gold earned by the player's team over the whole game
    #[serde(default)]
    pub team_networth: f64,
    #[serde(default)]
    pub opponent_networth: f64,
    /// Average rating of the player's own team
    pub team_rating: f64,
    /// Average rating of the opposing team
    pub opponent_rating: f64
}

impl GameContext {
    /// Builds the context from every teammate's statistics (the player
    /// included) and the opponents' statistics.
    pub fn from_teams<'a>(
        team: impl IntoIterator<Item = &'a GameMetrics>,
        opponents: impl IntoIterator<Item = &'a GameMetrics>,
        team_rating: f64,
        opponent_rating: f64
    ) -> GameContext {
        let mut context = GameContext {
            team_hero_damage: 0,
            team_building_damage: 0,
            team_kills: 0,
            team_networth: 0.0,
            opponent_networth: opponents.into_iter().map(networth).sum(),
            team_rating,
            opponent_rating
        };

        for m in team {
            context.team_hero_damage += m.hero_damage;
            context.team_building_damage += m.building_damage;
            context.team_kills += m.kills;
            context.team_networth += networth(m);
        }

        context
    }

    pub fn game_state(&self) -> GameState {
        GameState::from_networth(self.team_networth, self.opponent_networth)
    }
}

fn networth(m: &GameMetrics) -> f64 {
    m.gold_per_minute * m.duration_minutes()
}
