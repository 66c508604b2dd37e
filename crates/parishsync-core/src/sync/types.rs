//! Core types for calendar synchronization.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Calendar-store access state. Expected to fluctuate; never treated as
/// exceptional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    Granted,
    Denied,
    Undetermined,
}

/// Fields sent to the calendar store when creating or updating an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDetails {
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub location: Option<String>,
    pub notes: Option<String>,
}

/// An event as read back from the calendar store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalEvent {
    pub id: String,
    pub calendar_id: String,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub location: Option<String>,
    pub notes: Option<String>,
}

impl ExternalEvent {
    /// Event start time as a zero-padded "HH:mm" string.
    pub fn start_hhmm(&self) -> String {
        self.start.format("%H:%M").to_string()
    }

    /// Event end time as a zero-padded "HH:mm" string.
    pub fn end_hhmm(&self) -> String {
        self.end.format("%H:%M").to_string()
    }
}

/// A calendar listed on the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarInfo {
    pub id: String,
    pub title: String,
}

/// Outcome of an import pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

/// Outcome of a drift-detection pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftSummary {
    pub updated: usize,
    pub deleted: usize,
}

/// Sync error types.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Calendar API error: {0}")]
    CalendarApi(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Calendar not found")]
    CalendarNotFound,

    #[error("Event {0} not found")]
    EventNotFound(String),

    #[error("Calendar access not granted")]
    PermissionDenied,

    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(#[from] Box<dyn std::error::Error + Send + Sync>),
}
