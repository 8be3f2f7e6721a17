// Rating constants
pub const DEFAULT_BEHAVIOR_SCORE: f64 = 1.0;
pub const RATING_K_FACTOR: f64 = 50.0;
pub const ELO_SCALE: f64 = 400.0;
pub const OUTCOME_WEIGHT: f64 = 0.8;
pub const PERFORMANCE_WEIGHT: f64 = 0.2;
pub const NEUTRAL_PERFORMANCE: f64 = 0.5;
pub const PERFORMANCE_HISTORY_SIZE: usize = 20;

// Performance tiers
pub const EXCEPTIONAL_THRESHOLD: f64 = 0.9;
pub const EXCELLENT_THRESHOLD: f64 = 0.8;
pub const VERY_GOOD_THRESHOLD: f64 = 0.7;
pub const EXCEPTIONAL_COMPONENT_FLOOR: f64 = 0.85;

// Context adjustment
pub const OPPONENT_STRENGTH_SCALE: f64 = 2000.0;
pub const MAX_CONTEXT_ADJUSTMENT: f64 = 0.2;
pub const GAME_STATE_GOLD_MARGIN: f64 = 5000.0;
pub const WINNING_STATE_MULTIPLIER: f64 = 0.9;
pub const LOSING_STATE_MULTIPLIER: f64 = 1.2;

// Matchmaking
pub const TEAM_SIZE: usize = 5;
pub const MAX_SKILL_DIFFERENCE: f64 = 500.0;
pub const MIN_QUALITY_THRESHOLD: f64 = 0.8;
pub const QUALITY_WEIGHT_SKILL_BALANCE: f64 = 0.4;
pub const QUALITY_WEIGHT_ROLE_COVERAGE: f64 = 0.3;
pub const QUALITY_WEIGHT_SKILL_SPREAD: f64 = 0.3;
pub const SEARCH_BUDGET: usize = 256;
pub const SPLIT_BUDGET: usize = 128;

// Safety
pub const MAX_CONSECUTIVE_EXCEPTIONAL: usize = 3;
pub const TIME_WINDOW_HOURS: i64 = 24;
pub const MINIMUM_GAME_DURATION_MINUTES: f64 = 25.0;
pub const MAXIMUM_DAILY_GAMES: usize = 30;
pub const SUSPICIOUS_PERFORMANCE_THRESHOLD: f64 = 0.95;
pub const SUSPICIOUS_STREAK_LENGTH: usize = 5;
pub const REQUIRED_TEAMFIGHT_PARTICIPATION: f64 = 0.6;
pub const MAX_METRIC_DEVIATION: f64 = 0.3;

pub const WEIGHT_TOLERANCE: f64 = 1e-6;
