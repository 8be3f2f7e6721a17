use thiserror::Error;
use uuid::Uuid;

use crate::model::structures::player::PlayerId;

pub type Result<T> = std::result::Result<T, MmrError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MmrError {
    /// Raw statistics were malformed or out of range. These are rejected, never clamped.
    #[error("invalid metrics: {0}")]
    InvalidMetrics(String),

    /// A player record that breaks the rating or behavior score invariants.
    #[error("invalid player: {0}")]
    InvalidPlayer(String),

    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("player {0} is already queued")]
    DuplicateEntry(PlayerId),

    #[error("player {0} not found")]
    NotFound(PlayerId),

    #[error("pool has {available} eligible players, {required} are needed for one match")]
    InsufficientPool { available: usize, required: usize },

    #[error("no candidate reached the quality threshold (best: {best_quality:.3})")]
    NoQualifyingMatch { best_quality: f64 },

    #[error("match {0} has already been finalized")]
    MatchAlreadyFinalized(Uuid),

    #[error("invalid configuration: {0}")]
    Configuration(String)
}
