use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::structures::{match_quality::MatchQuality, player::PlayerId, role::Role, team_side::TeamSide};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSlot {
    pub player_id: PlayerId,
    pub role: Role,
    /// Rating at the time the match was formed
    pub rating: f64
}

/// Set once, when the externally played match reports its result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub winner: TeamSide,
    pub finished_at: DateTime<Utc>
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: Uuid,
    pub team_a: Vec<TeamSlot>,
    pub team_b: Vec<TeamSlot>,
    pub quality: MatchQuality,
    pub created_at: DateTime<Utc>,
    /// `None` until the result is processed
    pub outcome: Option<MatchOutcome>,
    /// Populated once the match is finalized
    pub rating_deltas: BTreeMap<PlayerId, f64>
}

impl Match {
    pub fn new(team_a: Vec<TeamSlot>, team_b: Vec<TeamSlot>, quality: MatchQuality) -> Match {
        Match {
            id: Uuid::new_v4(),
            team_a,
            team_b,
            quality,
            created_at: Utc::now(),
            outcome: None,
            rating_deltas: BTreeMap::new()
        }
    }

    pub fn team(&self, side: TeamSide) -> &[TeamSlot] {
        match side {
            TeamSide::A => &self.team_a,
            TeamSide::B => &self.team_b
        }
    }

    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.team_a.iter().chain(self.team_b.iter()).map(|s| s.player_id).collect_vec()
    }

    /// Mean formation rating of one side.
    pub fn average_rating(&self, side: TeamSide) -> f64 {
        let team = self.team(side);
        if team.is_empty() {
            return 0.0;
        }

        team.iter().map(|s| s.rating).sum::<f64>() / team.len() as f64
    }

    pub fn is_finalized(&self) -> bool {
        self.outcome.is_some()
    }
}
