//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

use crate::identity::AccountId;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The caller is not allowed to perform a guarded operation.
    #[error("unauthorized: {caller} may not perform {operation}")]
    Unauthorized {
        /// The operation that was attempted.
        operation: &'static str,
        /// The identity that attempted it.
        caller: AccountId,
    },

    /// An input cannot be represented or is disallowed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An aggregate was not found.
    #[error("aggregate not found: {0}")]
    AggregateNotFound(Uuid),

    /// Optimistic concurrency conflict.
    #[error("concurrency conflict on aggregate {aggregate_id}: expected version {expected}, found {actual}")]
    ConcurrencyConflict {
        /// The aggregate that had the conflict.
        aggregate_id: Uuid,
        /// The expected version.
        expected: i64,
        /// The actual version found.
        actual: i64,
    },

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
