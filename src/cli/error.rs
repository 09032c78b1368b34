//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::SessionRead { .. } if e.is_missing_session() => {
                    crate::exitcode::NOINPUT
                }
                InfraError::SessionRead { .. } => crate::exitcode::IOERR,
                InfraError::Application(app) => match app {
                    ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                    ApplicationError::Session { .. }
                    | ApplicationError::UnknownPoint(_)
                    | ApplicationError::UnknownVessel(_)
                    | ApplicationError::IncompleteSelection { .. }
                    | ApplicationError::Domain(_) => crate::exitcode::DATAERR,
                    ApplicationError::Extraction { .. } => crate::exitcode::SOFTWARE,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn given_session_read_errors_when_mapping_then_missing_file_is_noinput() {
        let missing: CliError =
            InfraError::session_read("s.toml", io::Error::from(io::ErrorKind::NotFound)).into();
        let denied: CliError =
            InfraError::session_read("s.toml", io::Error::from(io::ErrorKind::PermissionDenied))
                .into();

        assert_eq!(missing.exit_code(), crate::exitcode::NOINPUT);
        assert_eq!(denied.exit_code(), crate::exitcode::IOERR);
    }

    #[test]
    fn given_unknown_vessel_when_mapping_then_dataerr() {
        let err: CliError = ApplicationError::UnknownVessel("LAD".into()).into();
        assert_eq!(err.exit_code(), crate::exitcode::DATAERR);
    }
}
