pub mod error;
pub mod matchmaking;
pub mod model;
pub mod processor;
pub mod utils;
