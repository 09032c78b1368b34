//! Session file loading

use std::path::Path;

use tracing::debug;

use crate::application::session::Session;
use crate::infrastructure::{InfraError, InfraResult};

/// Read and parse a session script.
pub fn load_session(path: &Path) -> InfraResult<Session> {
    debug!("load_session: {}", path.display());
    let content = std::fs::read_to_string(path)
        .map_err(|e| InfraError::session_read(path, e))?;
    Ok(Session::parse(&content, path)?)
}
