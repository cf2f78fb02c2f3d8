//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type shared by every bounded context.
///
/// Context-specific errors (content violations, progression and leveling
/// rejections) convert into this type at the application boundary.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An aggregate was not found.
    #[error("aggregate not found: {0}")]
    AggregateNotFound(Uuid),

    /// Optimistic concurrency conflict.
    #[error(
        "concurrency conflict on aggregate {aggregate_id}: expected version {expected}, found {actual}"
    )]
    ConcurrencyConflict {
        /// The aggregate that had the conflict.
        aggregate_id: Uuid,
        /// The expected version.
        expected: i64,
        /// The actual version found.
        actual: i64,
    },

    /// Malformed command input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Authored content failed publish-time validation. Carries every
    /// violation found, not just the first.
    #[error("content validation failed with {} violation(s)", .0.len())]
    ValidationFailed(Vec<String>),

    /// Content or rules that should have been rejected before reaching play.
    /// Treated as a fatal precondition failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A command that is not legal in the aggregate's current state.
    /// The aggregate is left unchanged.
    #[error("state error: {0}")]
    State(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
