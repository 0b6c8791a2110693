use std::{
    env,
    io::{Error, ErrorKind},
    path::PathBuf,
};

const APP_NAME: &str = "ofono-sync";

/// Locates configuration and log files.
///
/// Follows the XDG Base Directory specification.
pub struct ConfigPaths;

impl ConfigPaths {
    /// Returns the configuration directory.
    ///
    /// Uses `XDG_CONFIG_HOME`, falling back to `$HOME/.config`.
    ///
    /// # Errors
    /// Returns an error if neither `XDG_CONFIG_HOME` nor `HOME` is set.
    pub fn config_dir() -> Result<PathBuf, Error> {
        let config_home = env::var("XDG_CONFIG_HOME")
            .or_else(|_| env::var("HOME").map(|home| format!("{home}/.config")))
            .map_err(|_| {
                Error::new(
                    ErrorKind::NotFound,
                    "Neither XDG_CONFIG_HOME nor HOME environment variable found",
                )
            })?;

        Ok(PathBuf::from(config_home).join(APP_NAME))
    }

    /// Returns the data directory, creating it if needed.
    ///
    /// Uses `XDG_STATE_HOME`, falling back to `$HOME/.local/state`.
    ///
    /// # Errors
    /// Returns an error if no base directory is set or it cannot be created.
    pub fn data_dir() -> Result<PathBuf, Error> {
        let state_home = env::var("XDG_STATE_HOME")
            .or_else(|_| env::var("HOME").map(|home| format!("{home}/.local/state")))
            .map_err(|_| {
                Error::new(
                    ErrorKind::NotFound,
                    "Neither XDG_STATE_HOME nor HOME environment variable found",
                )
            })?;

        let data_dir = PathBuf::from(state_home).join(APP_NAME);
        std::fs::create_dir_all(&data_dir)?;

        Ok(data_dir)
    }

    /// Returns the log directory, creating it if needed.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be determined or created.
    pub fn log_dir() -> Result<PathBuf, Error> {
        let log_dir = Self::data_dir()?.join("logs");
        std::fs::create_dir_all(&log_dir)?;

        Ok(log_dir)
    }

    /// Returns the path to the main configuration file.
    ///
    /// # Errors
    /// Returns an error if the configuration directory cannot be determined.
    pub fn main_config() -> Result<PathBuf, Error> {
        Ok(Self::config_dir()?.join("config.toml"))
    }
}
