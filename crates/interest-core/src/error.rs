//! Error types for the scoring engine.

use thiserror::Error;

/// Failure talking to the topic score store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("topic store backend error: {0}")]
    Backend(String),
}

/// Errors surfaced by the engine to its callers.
#[derive(Debug, Error)]
pub enum ScoringError {
    /// Malformed input to a scoring operation.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The topic store failed; the whole event was aborted.
    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),

    #[error("topic not found: {0}")]
    NotFound(String),
}

pub type Result<T, E = ScoringError> = std::result::Result<T, E>;
