//! Core error types for parishsync-core.
//!
//! Validation errors are the only category that should block a
//! user-initiated save; store errors are the only category allowed to
//! abort an operation outright. Everything transient is caught and
//! logged at the integration boundary where it happens.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for parishsync-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Persistent store errors (fatal: there is no fallback for the
    /// source of truth)
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Settings-file errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors, surfaced before any persistence attempt
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Calendar synchronization errors
    #[error("Sync error: {0}")]
    Sync(#[from] crate::sync::SyncError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Meeting-store specific errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the database
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

    /// Record not found
    #[error("Meeting {0} not found")]
    MeetingNotFound(i64),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Settings-file specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load settings
    #[error("Failed to load settings from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save settings
    #[error("Failed to save settings to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid settings value
    #[error("Invalid settings value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse settings
    #[error("Failed to parse settings: {0}")]
    ParseFailed(String),
}

/// Validation errors.
///
/// These block a save synchronously; nothing is written when one is
/// returned.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// End time not after start time
    #[error("Invalid time range: end time ({end}) must be after start time ({start})")]
    InvalidTimeRange { start: String, end: String },

    /// Malformed "HH:mm" time string
    #[error("Invalid time '{value}' for '{field}': expected zero-padded HH:mm")]
    InvalidTime { field: String, value: String },

    /// Required field is empty
    #[error("Field '{0}' must not be empty")]
    EmptyField(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StoreError::Locked
                } else {
                    StoreError::QueryFailed(err.to_string())
                }
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for CoreError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        CoreError::Custom(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
