//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("cannot extract vessel: no {missing} selected")]
    IncompleteSelection { missing: &'static str },

    #[error("vessel extraction failed: {message}")]
    Extraction { message: String },

    #[error("unknown point: {0}")]
    UnknownPoint(String),

    #[error("unknown vessel: {0}")]
    UnknownVessel(String),

    #[error("invalid session {path}: {message}")]
    Session { path: PathBuf, message: String },

    #[error("config error: {message}")]
    Config { message: String },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
