use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use tracing::warn;

use crate::{
    matchmaking::quality::std_dev,
    model::{
        config::ProcessorConfig,
        constants::{NEUTRAL_PERFORMANCE, SUSPICIOUS_STREAK_LENGTH},
        metrics::NormalizedMetrics,
        performance::PerformanceScore,
        rating_adjuster::PlayerGameResult,
        structures::{performance_tier::PerformanceTier, player::Player, sub_metric::SubMetric}
    }
};

/// Sub-metrics a genuinely strong game lifts together.
const CORE_SUB_METRICS: [SubMetric; 5] = [
    SubMetric::FarmEfficiency,
    SubMetric::DamageOutput,
    SubMetric::MapPresence,
    SubMetric::ObjectiveFocus,
    SubMetric::TeamfightImpact
];

/// Why (or whether) a player's performance component is withheld for a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SafetyVerdict {
    Clear,
    /// The game ended before the minimum duration
    ShortGame,
    /// An above-neutral score from a player who sat out most fights
    LowTeamfightParticipation,
    /// Too many exceptional performances inside the time window
    Throttled,
    /// Too many games inside the time window
    DailyGameCap,
    /// Another near-perfect score on top of a near-perfect streak
    SuspiciousStreak,
    /// A high score carried by a few sub-metrics while the rest lag far behind
    InconsistentProfile
}

impl SafetyVerdict {
    pub fn is_clear(&self) -> bool {
        matches!(self, SafetyVerdict::Clear)
    }
}

/// Anti-abuse checks around the exceptional-performance bonus. The guard is
/// stateless; everything it tracks lives on the [`Player`].
#[derive(Debug, Clone)]
pub struct SafetyGuard {
    max_consecutive_exceptional: usize,
    time_window: Duration,
    minimum_game_duration_seconds: f64,
    maximum_daily_games: usize,
    suspicious_performance_threshold: f64,
    required_teamfight_participation: f64,
    max_metric_deviation: f64,
    very_good_threshold: f64
}

impl SafetyGuard {
    pub fn new(config: &ProcessorConfig) -> SafetyGuard {
        SafetyGuard {
            max_consecutive_exceptional: config.max_consecutive_exceptional,
            time_window: config.time_window(),
            minimum_game_duration_seconds: config.minimum_game_duration_seconds(),
            maximum_daily_games: config.maximum_daily_games,
            suspicious_performance_threshold: config.suspicious_performance_threshold,
            required_teamfight_participation: config.required_teamfight_participation,
            max_metric_deviation: config.max_metric_deviation,
            very_good_threshold: config.very_good_threshold
        }
    }

    pub fn record_exceptional(&self, player: &mut Player, at: DateTime<Utc>) {
        player.exceptional_flags.record(at, ());
    }

    /// True once the player has `max_consecutive_exceptional` flags inside
    /// the trailing window. Expired flags are pruned.
    pub fn is_throttled(&self, player: &mut Player, now: DateTime<Utc>) -> bool {
        player.exceptional_flags.count_within(now, self.time_window) >= self.max_consecutive_exceptional
    }

    pub fn record_game_duration(&self, player: &mut Player, duration_seconds: f64, at: DateTime<Utc>) {
        player.recent_games.record(at, duration_seconds);
    }

    pub fn is_short_game(&self, duration_seconds: f64) -> bool {
        duration_seconds < self.minimum_game_duration_seconds
    }

    /// Games already recorded inside the window, excluding the one being evaluated.
    pub fn games_in_window(&self, player: &mut Player, now: DateTime<Utc>) -> usize {
        player.recent_games.count_within(now, self.time_window)
    }

    fn is_suspicious_streak(&self, player: &Player, score: PerformanceScore) -> bool {
        let threshold = self.suspicious_performance_threshold;
        if score.value() <= threshold || player.performance_history.len() < SUSPICIOUS_STREAK_LENGTH {
            return false;
        }

        player
            .performance_history
            .recent(SUSPICIOUS_STREAK_LENGTH)
            .all(|s| *s > threshold)
    }

    /// Only an above-neutral score needs the player to have shown up for fights.
    pub fn is_low_participation(&self, score: PerformanceScore, teamfight_participation: f64) -> bool {
        score.value() > NEUTRAL_PERFORMANCE && teamfight_participation < self.required_teamfight_participation
    }

    /// True when a very good score or better comes with core sub-metrics whose
    /// population standard deviation exceeds `max_metric_deviation`.
    pub fn is_inconsistent(&self, score: PerformanceScore, normalized: &NormalizedMetrics) -> bool {
        if score.value() < self.very_good_threshold {
            return false;
        }

        let core = CORE_SUB_METRICS
            .iter()
            .map(|m| normalized.get(m).copied().unwrap_or(0.0))
            .collect::<Vec<_>>();
        std_dev(&core) > self.max_metric_deviation
    }

    /// Decides whether the performance component of this game counts. Must be
    /// called before the game is recorded with [`SafetyGuard::record_game`],
    /// so the current game never throttles itself.
    ///
    /// Checks run in order and the first failing one is returned: short game,
    /// teamfight participation, throttle, daily cap, suspicious streak,
    /// profile consistency.
    pub fn evaluate(&self, player: &mut Player, result: &PlayerGameResult) -> SafetyVerdict {
        let now = result.finished_at;
        let score = result.score;

        let verdict = if self.is_short_game(result.duration_seconds) {
            SafetyVerdict::ShortGame
        } else if self.is_low_participation(score, result.teamfight_participation) {
            SafetyVerdict::LowTeamfightParticipation
        } else if self.is_throttled(player, now) {
            SafetyVerdict::Throttled
        } else if self.games_in_window(player, now) >= self.maximum_daily_games {
            SafetyVerdict::DailyGameCap
        } else if self.is_suspicious_streak(player, score) {
            SafetyVerdict::SuspiciousStreak
        } else if self.is_inconsistent(score, &result.normalized) {
            SafetyVerdict::InconsistentProfile
        } else {
            SafetyVerdict::Clear
        };

        if !verdict.is_clear() {
            warn!(
                player_id = player.id,
                score = score.value(),
                duration_seconds = result.duration_seconds,
                "Performance component withheld: {}",
                verdict
            );
        }

        verdict
    }

    /// Bookkeeping after a game is finalized. Exceptional performances from
    /// full-length games are flagged even while throttled, so the throttle
    /// holds for as long as the streak continues.
    pub fn record_game(
        &self,
        player: &mut Player,
        score: PerformanceScore,
        tier: PerformanceTier,
        duration_seconds: f64,
        at: DateTime<Utc>
    ) {
        player.performance_history.push(score.value());
        self.record_game_duration(player, duration_seconds, at);

        if tier == PerformanceTier::Exceptional && !self.is_short_game(duration_seconds) {
            self.record_exceptional(player, at);
        }
    }
}
