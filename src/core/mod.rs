use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::services::ofono::OfonoError;

/// Error types for the telephony host.
///
/// Covers configuration loading and driver lifecycle. Bus-level failures
/// inside the oFono driver are carried as [`OfonoError`].
#[derive(Error, Debug)]
pub enum TelephonyError {
    /// I/O operation error
    #[error("I/O error on '{path}': {details}")]
    IoError {
        /// Path where I/O error occurred
        path: PathBuf,
        /// I/O error details
        details: String,
    },

    /// Standard I/O operation error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error with location context
    #[error("failed to parse TOML at '{location}': {details}")]
    TomlParseError {
        /// Location of TOML being parsed (file path or "string")
        location: String,
        /// Parse error details
        details: String,
    },

    /// A driver with the same name is already registered
    #[error("driver '{0}' is already registered")]
    DriverAlreadyRegistered(String),

    /// No driver with this name is registered
    #[error("driver '{0}' is not registered")]
    DriverNotRegistered(String),

    /// A driver failed to probe or remove
    #[error("driver '{driver}' failed: {source}")]
    Driver {
        /// Name of the failing driver
        driver: &'static str,
        /// Underlying oFono error
        #[source]
        source: Box<OfonoError>,
    },
}

/// A specialized `Result` type for telephony host operations.
pub type Result<T> = std::result::Result<T, TelephonyError>;

impl TelephonyError {
    /// Creates a TOML parsing error with optional file path context.
    pub fn toml_parse(error: impl std::fmt::Display, path: Option<&Path>) -> Self {
        let location = match path {
            Some(path) => path.display().to_string(),
            None => "string".to_string(),
        };

        TelephonyError::TomlParseError {
            location,
            details: error.to_string(),
        }
    }
}
