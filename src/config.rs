//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/rvessel/rvessel.toml`
//! 3. Local config: `<session_dir>/.rvessel.toml`
//! 4. Environment variables: `RVESSEL_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::DEFAULT_VESSEL_PREFIX;

/// Unified configuration for rvessel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Prefix of generated vessel names (default: "Vessel")
    pub vessel_prefix: String,
    /// After an extraction, reuse the end point as the next start point
    pub advance_start_point: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            vessel_prefix: DEFAULT_VESSEL_PREFIX.to_string(),
            advance_start_point: true,
        }
    }
}

/// Raw settings for intermediate parsing (`None` = not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub vessel_prefix: Option<String>,
    pub advance_start_point: Option<bool>,
}

/// Get the XDG config directory for rvessel.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "rvessel").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("rvessel.toml"))
}

/// Get the path to the local config file in a session directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".rvessel.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            vessel_prefix: overlay
                .vessel_prefix
                .clone()
                .unwrap_or_else(|| self.vessel_prefix.clone()),
            advance_start_point: overlay
                .advance_start_point
                .unwrap_or(self.advance_start_point),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.rvessel.toml` (usually the session's)
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("global config: {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                debug!("local config: {}", local_path.display());
                current = current.merge_with(&load_raw_settings(&local_path)?);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.validate()?;
        Ok(current)
    }

    /// Apply RVESSEL_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("RVESSEL").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("vessel_prefix") {
            settings.vessel_prefix = val;
        }
        if let Ok(val) = config.get_bool("advance_start_point") {
            settings.advance_start_point = val;
        }

        Ok(settings)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if self.vessel_prefix.trim().is_empty() {
            return Err(ApplicationError::Config {
                message: "vessel_prefix must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Render as TOML, for `config show`.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: e.to_string(),
        })
    }
}
