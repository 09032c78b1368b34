//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::hierarchy::NodeHandle;

/// Domain errors represent violations of the hierarchy's structural rules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("no vessel for handle {0} in the hierarchy")]
    InvalidHandle(NodeHandle),

    #[error("inserting vessel '{segment}' would close a cycle in the hierarchy")]
    CycleDetected { segment: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
