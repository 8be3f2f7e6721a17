use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    model::structures::{
        game_metrics::{GameContext, GameMetrics},
        role::Role,
        sub_metric::SubMetric
    }
};

pub type NormalizedMetrics = BTreeMap<SubMetric, f64>;

/// KDA ratio treated as a perfect score
const KDA_BENCHMARK: f64 = 4.0;
const HEALING_BENCHMARK: f64 = 5000.0;
/// Seconds of disable per minute treated as a perfect score
const STUN_PER_MINUTE_BENCHMARK: f64 = 3.0;
/// Damage absorbed per minute treated as a perfect score
const DAMAGE_TAKEN_PER_MINUTE_BENCHMARK: f64 = 600.0;
/// Building damage per minute treated as a perfect score
const BUILDING_DAMAGE_PER_MINUTE_BENCHMARK: f64 = 100.0;
const KILL_PARTICIPATION_BENCHMARK: f64 = 0.7;
const STACKS_PER_MINUTE_BENCHMARK: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    Early,
    Mid,
    Late
}

impl GamePhase {
    pub fn from_minutes(minutes: f64) -> GamePhase {
        if minutes < 15.0 {
            GamePhase::Early
        } else if minutes < 30.0 {
            GamePhase::Mid
        } else {
            GamePhase::Late
        }
    }

    /// Farm expectations grow as the game goes on.
    pub fn benchmark_scale(&self) -> f64 {
        match self {
            GamePhase::Early => 0.8,
            GamePhase::Mid => 1.0,
            GamePhase::Late => 1.1
        }
    }
}

/// What an average player in a role is expected to produce.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoleBenchmark {
    pub last_hits_per_minute: f64,
    pub gold_per_minute: f64,
    pub damage_share: f64,
    pub deaths_per_minute: f64,
    pub building_share: f64,
    pub vision_per_minute: f64
}

impl RoleBenchmark {
    pub fn for_role(role: Role) -> RoleBenchmark {
        match role {
            Role::Carry => RoleBenchmark {
                last_hits_per_minute: 10.0,
                gold_per_minute: 600.0,
                damage_share: 0.35,
                deaths_per_minute: 0.12,
                building_share: 0.35,
                vision_per_minute: 0.05
            },
            Role::Mid => RoleBenchmark {
                last_hits_per_minute: 8.0,
                gold_per_minute: 550.0,
                damage_share: 0.30,
                deaths_per_minute: 0.14,
                building_share: 0.25,
                vision_per_minute: 0.1
            },
            Role::Offlane => RoleBenchmark {
                last_hits_per_minute: 6.0,
                gold_per_minute: 450.0,
                damage_share: 0.20,
                deaths_per_minute: 0.16,
                building_share: 0.20,
                vision_per_minute: 0.1
            },
            Role::SoftSupport => RoleBenchmark {
                last_hits_per_minute: 2.0,
                gold_per_minute: 300.0,
                damage_share: 0.10,
                deaths_per_minute: 0.20,
                building_share: 0.10,
                vision_per_minute: 0.4
            },
            Role::HardSupport => RoleBenchmark {
                last_hits_per_minute: 1.0,
                gold_per_minute: 250.0,
                damage_share: 0.05,
                deaths_per_minute: 0.25,
                building_share: 0.10,
                vision_per_minute: 0.5
            }
        }
    }
}

/// Converts raw statistics into role-relative sub-metrics in [0, 1].
///
/// Every raw value is divided by a role benchmark scaled by match duration and
/// game phase, then clamped. Malformed input is rejected before any of that.
pub fn normalize(metrics: &GameMetrics, role: Role, context: &GameContext) -> Result<NormalizedMetrics> {
    metrics.validate()?;

    let benchmark = RoleBenchmark::for_role(role);
    let minutes = metrics.duration_minutes();
    let phase = GamePhase::from_minutes(minutes);

    let damage_share = share(metrics.hero_damage, context.team_hero_damage);
    let building_share = share(metrics.building_damage, context.team_building_damage);
    let stun_score = ratio(metrics.stun_duration, STUN_PER_MINUTE_BENCHMARK * minutes);

    let mut normalized = NormalizedMetrics::new();
    normalized.insert(
        SubMetric::FarmEfficiency,
        farm_efficiency(metrics, &benchmark, minutes, phase)
    );
    normalized.insert(SubMetric::DamageOutput, damage_output(metrics, &benchmark, damage_share));
    normalized.insert(SubMetric::Survival, survival(metrics, &benchmark, minutes));
    normalized.insert(SubMetric::ObjectiveFocus, ratio(building_share, benchmark.building_share));
    normalized.insert(SubMetric::MapPresence, map_presence(metrics, context));
    normalized.insert(SubMetric::SpaceCreation, space_creation(metrics, minutes));
    normalized.insert(SubMetric::Utility, utility(metrics, stun_score, minutes));
    normalized.insert(
        SubMetric::TeamfightImpact,
        0.5 * metrics.teamfight_participation + 0.3 * ratio(damage_share, benchmark.damage_share) + 0.2 * stun_score
    );
    normalized.insert(
        SubMetric::VisionControl,
        ratio(
            (metrics.wards_placed as f64 + 0.5 * metrics.wards_destroyed as f64) / minutes,
            benchmark.vision_per_minute
        )
    );

    Ok(normalized)
}

/// `value / expected` clamped to [0, 1]. A non-positive expectation scores 0.
fn ratio(value: f64, expected: f64) -> f64 {
    if expected <= 0.0 {
        return 0.0;
    }

    (value / expected).clamp(0.0, 1.0)
}

fn share(part: i64, total: i64) -> f64 {
    part as f64 / total.max(1) as f64
}

fn farm_efficiency(metrics: &GameMetrics, benchmark: &RoleBenchmark, minutes: f64, phase: GamePhase) -> f64 {
    let scale = phase.benchmark_scale();
    let cs = ratio(metrics.last_hits as f64, benchmark.last_hits_per_minute * scale * minutes);
    let gpm = ratio(metrics.gold_per_minute, benchmark.gold_per_minute * scale);

    (cs + gpm) / 2.0
}

fn damage_output(metrics: &GameMetrics, benchmark: &RoleBenchmark, damage_share: f64) -> f64 {
    let kda = (metrics.kills + metrics.assists) as f64 / metrics.deaths.max(1) as f64;

    0.6 * ratio(damage_share, benchmark.damage_share) + 0.4 * ratio(kda, KDA_BENCHMARK)
}

/// Dying at the role's expected rate scores 0.5; twice that rate scores 0.
fn survival(metrics: &GameMetrics, benchmark: &RoleBenchmark, minutes: f64) -> f64 {
    let death_rate = metrics.deaths as f64 / minutes;

    (1.0 - death_rate / (2.0 * benchmark.deaths_per_minute)).clamp(0.0, 1.0)
}

fn map_presence(metrics: &GameMetrics, context: &GameContext) -> f64 {
    let kill_participation = (metrics.kills + metrics.assists) as f64 / context.team_kills.max(1) as f64;

    0.5 * ratio(kill_participation, KILL_PARTICIPATION_BENCHMARK) + 0.5 * metrics.teamfight_participation
}

fn space_creation(metrics: &GameMetrics, minutes: f64) -> f64 {
    let absorbed = ratio(metrics.damage_taken as f64, DAMAGE_TAKEN_PER_MINUTE_BENCHMARK * minutes);
    let pressure = ratio(metrics.building_damage as f64, BUILDING_DAMAGE_PER_MINUTE_BENCHMARK * minutes);

    0.5 * absorbed + 0.5 * pressure
}

fn utility(metrics: &GameMetrics, stun_score: f64, minutes: f64) -> f64 {
    let healing = ratio(metrics.healing_done as f64, HEALING_BENCHMARK);
    let stacking = ratio(metrics.camps_stacked as f64, STACKS_PER_MINUTE_BENCHMARK * minutes);

    0.35 * stun_score + 0.25 * healing + 0.25 * metrics.teamfight_participation + 0.15 * stacking
}
