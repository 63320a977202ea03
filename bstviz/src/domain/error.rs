//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::arena::Key;

/// Domain errors represent violated tree preconditions.
/// They carry keys, never arena handles, so they stay meaningful to callers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("key not found in tree: {0}")]
    NotFound(Key),

    #[error("tree is empty")]
    EmptyTree,

    #[error("tree invariant violated: {0}")]
    InvariantViolation(String),

    #[error("invalid key: {token}")]
    InvalidKey { token: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
