//! The external calendar-store seam.

use chrono::NaiveDateTime;

use super::types::{CalendarInfo, EventDetails, ExternalEvent, PermissionStatus, SyncError};

/// Capability set of a third-party calendar provider.
///
/// [`super::GoogleCalendarStore`] is the production implementation;
/// tests substitute in-memory fakes. All sync operations check
/// [`CalendarStore::permission_status`] first and short-circuit to a
/// no-op outcome when access is not granted.
pub trait CalendarStore {
    fn permission_status(&self) -> PermissionStatus;

    fn list_calendars(&self) -> Result<Vec<CalendarInfo>, SyncError>;

    /// Create a calendar and return its id.
    fn create_calendar(&self, title: &str) -> Result<String, SyncError>;

    /// Create an event and return its id.
    fn create_event(&self, calendar_id: &str, details: &EventDetails) -> Result<String, SyncError>;

    /// Update an existing event.
    ///
    /// # Errors
    /// [`SyncError::EventNotFound`] if the event no longer exists.
    fn update_event(&self, event_id: &str, details: &EventDetails) -> Result<(), SyncError>;

    /// Delete an event. Tolerant of not-found: deleting an event that is
    /// already gone succeeds.
    fn delete_event(&self, event_id: &str) -> Result<(), SyncError>;

    /// Events on the given calendars within `[start, end]`.
    fn list_events(
        &self,
        calendar_ids: &[String],
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<ExternalEvent>, SyncError>;

    /// Fetch one event by id, `None` if it no longer exists.
    fn get_event(&self, event_id: &str) -> Result<Option<ExternalEvent>, SyncError>;
}
