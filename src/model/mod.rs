pub mod config;
pub mod constants;
pub mod history;
pub mod metrics;
pub mod performance;
pub mod rating_adjuster;
pub mod safety;
pub mod structures;
pub mod tiers;
