mod config;
pub mod database;
pub mod migrations;
pub(crate) mod rows;

pub use config::{Config, DatabaseConfig, LoggingConfig, ProgramConfig};
pub use database::TrackerDb;

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the data directory holding `config.toml` and the database.
///
/// `BEAUTY_TRACKER_HOME` overrides the location entirely. Otherwise this is
/// `~/.config/beauty-tracker[-dev]/`, with BEAUTY_TRACKER_ENV=dev selecting the
/// development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var("BEAUTY_TRACKER_HOME") {
        Ok(home) if !home.trim().is_empty() => PathBuf::from(home.trim()),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env =
                std::env::var("BEAUTY_TRACKER_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("beauty-tracker-dev")
            } else {
                base_dir.join("beauty-tracker")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

/// Resolve the database file: `BEAUTY_TRACKER_DB`, then `database.path` from
/// the config, then `beauty-tracker.db` in [`data_dir`].
///
/// # Errors
/// Returns an error if the data directory is needed and cannot be created.
pub fn database_path(config: &Config) -> Result<PathBuf, ConfigError> {
    if let Ok(p) = std::env::var("BEAUTY_TRACKER_DB") {
        let p = p.trim();
        if !p.is_empty() {
            return Ok(PathBuf::from(p));
        }
    }
    if let Some(p) = config.database.path.as_deref().map(str::trim) {
        if !p.is_empty() {
            return Ok(PathBuf::from(p));
        }
    }
    Ok(data_dir()?.join("beauty-tracker.db"))
}
