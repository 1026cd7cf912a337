//! Core error types for beauty-tracker-core.
//!
//! Precondition violations raised by the program engine and the catalog live
//! in [`TrackerError`]. They describe invalid sequencing by the caller and are
//! never worth retrying. Storage and configuration failures have their own
//! enums and are all wrapped by [`CoreError`].

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for beauty-tracker-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Program and catalog precondition violations
    #[error(transparent)]
    Tracker(#[from] TrackerError),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// The tracker precondition behind this error, if that is what it is.
    pub fn tracker(&self) -> Option<&TrackerError> {
        match self {
            CoreError::Tracker(err) => Some(err),
            _ => None,
        }
    }

    /// True for caller errors (bad sequencing or bad input), false for
    /// storage and environment failures.
    pub fn is_precondition(&self) -> bool {
        matches!(self, CoreError::Tracker(_) | CoreError::Validation(_))
    }
}

/// Precondition violations of the program engine and the catalog.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackerError {
    #[error("You already have an active program")]
    AlreadyEnrolled,

    #[error("No active program found")]
    NoActiveProgram,

    #[error("No active program template found")]
    NoTemplateAvailable,

    #[error("Day number {0} is out of range for this program")]
    InvalidDayNumber(i64),

    #[error("Day {day_number} is locked: previous day must be completed or skipped first")]
    DayLocked { day_number: u32 },

    #[error("Day {day_number} is not open")]
    DayNotOpen { day_number: u32 },

    #[error("Maximum skips reached ({allowed_skips})")]
    SkipBudgetExhausted { allowed_skips: u32 },

    #[error("Habit {habit_id} is not part of day {day_number}")]
    HabitNotInDay { day_number: u32, habit_id: i64 },

    #[error("No current day available")]
    NoCurrentDay,

    #[error("Program template {0} not found")]
    TemplateNotFound(i64),

    #[error("Habit {0} not found")]
    HabitNotFound(i64),

    #[error("Day not found: {0}")]
    DayNotFound(String),

    #[error("Day {day_number} already exists in template {template_id}")]
    DuplicateDay { template_id: i64, day_number: u32 },

    #[error("Program template {0} is used by an active program")]
    TemplateInUse(i64),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Stored value could not be decoded
    #[error("Corrupt value in column '{column}': {value}")]
    CorruptValue { column: &'static str, value: String },

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors for catalog input.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Empty required text
    #[error("'{0}' must not be empty")]
    EmptyField(&'static str),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked
                    || err.code == rusqlite::ErrorCode::DatabaseBusy
                {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_errors_are_preconditions() {
        let err: CoreError = TrackerError::AlreadyEnrolled.into();
        assert!(err.is_precondition());
        assert_eq!(err.tracker(), Some(&TrackerError::AlreadyEnrolled));
        assert_eq!(err.to_string(), "You already have an active program");
    }

    #[test]
    fn database_errors_are_not_preconditions() {
        let err: CoreError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(!err.is_precondition());
        assert!(err.tracker().is_none());
    }

    #[test]
    fn invalid_day_message_names_day() {
        let err = TrackerError::InvalidDayNumber(31);
        assert_eq!(err.to_string(), "Day number 31 is out of range for this program");
    }
}
