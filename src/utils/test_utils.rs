use crate::model::structures::{
    game_metrics::{GameContext, GameMetrics},
    player::{Player, PlayerId},
    role::Role
};
use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use strum::IntoEnumIterator;

/// Fixed instant so time-window tests are reproducible (2024-01-01 12:00 UTC)
pub fn reference_time() -> DateTime<Utc> {
    DateTime::from_timestamp(1_704_110_400, 0).unwrap_or_default()
}

fn role_at(index: usize) -> Role {
    let roles: Vec<Role> = Role::iter().collect();
    roles[index % roles.len()]
}

/// A player whose primary role cycles with the id and whose secondary role is
/// the next one in order.
pub fn generate_player(id: PlayerId, rating: f64) -> Player {
    let index = id.unsigned_abs() as usize;
    Player::new(id, rating, role_at(index), role_at(index + 1))
}

pub fn generate_player_with_roles(id: PlayerId, rating: f64, primary: Role, secondary: Role) -> Player {
    Player::new(id, rating, primary, secondary)
}

/// 40-minute carry game: 10/2/15, 300 last hits, 650 GPM, 80% teamfight participation.
pub fn generate_carry_metrics() -> GameMetrics {
    GameMetrics {
        kills: 10,
        deaths: 2,
        assists: 15,
        last_hits: 300,
        denies: 20,
        gold_per_minute: 650.0,
        experience_per_minute: 750.0,
        hero_damage: 25000,
        damage_taken: 18000,
        healing_done: 0,
        teamfight_participation: 0.8,
        wards_placed: 2,
        wards_destroyed: 1,
        building_damage: 5000,
        stun_duration: 20.0,
        camps_stacked: 2,
        duration_seconds: 2400.0
    }
}

/// 40-minute hard support game with heavy warding and healing.
pub fn generate_support_metrics() -> GameMetrics {
    GameMetrics {
        kills: 2,
        deaths: 6,
        assists: 22,
        last_hits: 40,
        denies: 5,
        gold_per_minute: 280.0,
        experience_per_minute: 420.0,
        hero_damage: 8000,
        damage_taken: 15000,
        healing_done: 6000,
        teamfight_participation: 0.75,
        wards_placed: 18,
        wards_destroyed: 6,
        building_damage: 600,
        stun_duration: 90.0,
        camps_stacked: 8,
        duration_seconds: 2400.0
    }
}

/// Team totals matching the carry fixture, against an evenly rated opponent.
pub fn generate_context() -> GameContext {
    GameContext {
        team_hero_damage: 100000,
        team_building_damage: 15000,
        team_kills: 35,
        team_networth: 90_000.0,
        opponent_networth: 90_000.0,
        team_rating: 2000.0,
        opponent_rating: 2000.0
    }
}

/// `n` players with ratings uniformly spread within `center ± spread`.
/// Primary roles cycle so every role is represented; secondary roles are random.
pub fn generate_pool(n: usize, center: f64, spread: f64, seed: u64) -> Vec<Player> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    (0..n)
        .map(|i| {
            let primary = role_at(i);
            let secondary = role_at(i + rng.random_range(1..5));
            let rating = center + rng.random_range(-spread..=spread);

            Player::new(i as PlayerId + 1, rating, primary, secondary)
        })
        .collect()
}

/// Ten players rated 2000 to 2180, two per primary role, arranged so that a
/// snake draft puts one of each role on both teams.
pub fn generate_tight_pool() -> Vec<Player> {
    let primaries = [
        Role::Carry,
        Role::Carry,
        Role::Mid,
        Role::Mid,
        Role::Offlane,
        Role::Offlane,
        Role::SoftSupport,
        Role::SoftSupport,
        Role::HardSupport,
        Role::HardSupport
    ];

    // A snake draft splits ids into {1, 4, 5, 8, 9} and {2, 3, 6, 7, 10}, one of each pair
    (0..10)
        .map(|i| {
            let secondary = primaries[(i + 2) % primaries.len()];
            Player::new(i as PlayerId + 1, 2000.0 + 20.0 * i as f64, primaries[i], secondary)
        })
        .collect()
}

/// The tight pool with its last player moved 3000 points above everyone else.
pub fn generate_outlier_pool() -> Vec<Player> {
    let mut players = generate_tight_pool();
    if let Some(last) = players.last_mut() {
        last.rating += 3000.0;
    }

    players
}
