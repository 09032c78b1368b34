//! Errors at the file boundary

use std::path::PathBuf;

use thiserror::Error;

use crate::application::ApplicationError;

#[derive(Error, Debug)]
pub enum InfraError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// The session script could not be read from disk.
    #[error("cannot read session {}: {source}", path.display())]
    SessionRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl InfraError {
    pub fn session_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::SessionRead {
            path: path.into(),
            source,
        }
    }

    /// True when the session file does not exist.
    pub fn is_missing_session(&self) -> bool {
        matches!(
            self,
            InfraError::SessionRead { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}

pub type InfraResult<T> = Result<T, InfraError>;
