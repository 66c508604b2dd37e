//! Durable storage: the meeting database and the parish settings file.

pub mod meeting_db;
pub mod migrations;
mod settings;

pub use meeting_db::MeetingDb;
pub use settings::ParishSettings;

use chrono::NaiveDate;
use std::path::PathBuf;

use crate::error::StoreError;
use crate::meeting::Meeting;

/// Capability set of the meeting store.
///
/// The sync reconciler talks to the store through this trait so tests
/// can substitute an in-memory fake. [`MeetingDb`] is the production
/// implementation.
pub trait MeetingStore {
    /// All meetings, ascending by `(date, start_time)`.
    fn list(&self) -> Result<Vec<Meeting>, StoreError>;

    /// Meetings on one date, ascending by start time.
    fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Meeting>, StoreError>;

    fn get_by_id(&self, id: i64) -> Result<Option<Meeting>, StoreError>;

    /// Insert a meeting and return its assigned id.
    fn create(&self, meeting: &Meeting) -> Result<i64, StoreError>;

    fn update(&self, meeting: &Meeting) -> Result<(), StoreError>;

    fn delete(&self, id: i64) -> Result<(), StoreError>;

    fn delete_all(&self) -> Result<(), StoreError>;
}

/// Returns `~/.config/parishsync[-dev]/` based on PARISHSYNC_ENV.
///
/// Set PARISHSYNC_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("PARISHSYNC_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("parishsync-dev")
    } else {
        base_dir.join("parishsync")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
