//! Cross-cutting error types for the evidence store.
//!
//! `CoreError` is the domain taxonomy callers branch on. Storage-specific
//! failures live in `ev-db`'s `DatabaseError`, which wraps `CoreError`.

use thiserror::Error;

use crate::enums::{Authority, EntityKind, StatusKind};

/// Domain errors raised by the lifecycle, graph and query layers.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {kind} {id}")]
    NotFound { kind: EntityKind, id: i64 },

    /// A status transition outside the lifecycle, or a mutation of a `DEL` entity.
    #[error("Invalid state transition: {kind} {id} from {from} to {to}")]
    InvalidTransition {
        kind: EntityKind,
        id: i64,
        from: StatusKind,
        to: StatusKind,
    },

    /// Duplicate active edge, or the write gate could not be acquired in time.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Bad sort property, malformed filter, disallowed link pair, bad reference.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The caller may not perform the mutation.
    #[error(transparent)]
    Authorization(#[from] AuthorizationError),

    /// The operation is not offered for this kind.
    #[error("Unsupported operation: {operation} on {kind}")]
    UnsupportedOperation {
        kind: EntityKind,
        operation: &'static str,
    },

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}

/// Authorization failures surfaced as "Unauthorized" / "Forbidden".
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthorizationError {
    #[error("Unauthorized: authentication required")]
    Unauthorized,

    #[error("Forbidden: user '{user}' lacks authority {required}")]
    Forbidden { user: String, required: Authority },
}
