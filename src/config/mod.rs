//! Configuration schema and loading.
//!
//! Everything is optional in the TOML file; missing sections and fields fall
//! back to their defaults.

mod general;
mod ofono;
mod paths;

#[cfg(test)]
mod tests;

use std::{fs, io::ErrorKind, path::Path};

pub use general::{GeneralConfig, LogFormat, LogLevel};
pub use ofono::{BusKind, OfonoConfig};
pub use paths::ConfigPaths;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Result, TelephonyError};

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// General application settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// oFono connection settings.
    #[serde(default)]
    pub ofono: OfonoConfig,
}

impl Config {
    /// Load configuration from `path`.
    ///
    /// A missing file is not an error and yields the defaults.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or is not
    /// valid TOML for this schema.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("No config file at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(TelephonyError::IoError {
                    path: path.to_path_buf(),
                    details: err.to_string(),
                });
            }
        };

        toml::from_str(&content).map_err(|err| TelephonyError::toml_parse(err, Some(path)))
    }

    /// Load configuration from the default location.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined or the
    /// file cannot be parsed.
    pub fn load_default() -> Result<Self> {
        let path = ConfigPaths::main_config()?;
        Self::load(&path)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    /// Returns an error if `content` is not valid TOML for this schema.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|err| TelephonyError::toml_parse(err, None))
    }
}
