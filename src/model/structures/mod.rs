pub mod game_metrics;
pub mod game_state;
pub mod match_quality;
pub mod performance_tier;
pub mod player;
pub mod role;
pub mod sub_metric;
pub mod team_match;
pub mod team_side;
