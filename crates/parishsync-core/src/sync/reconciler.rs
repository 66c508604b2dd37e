//! Two-way reconciliation between the meeting store and the external
//! calendar store.
//!
//! Per-meeting failures are isolated: a calendar error on one meeting is
//! logged and never aborts the batch. Only meeting-store errors
//! propagate, since there is no fallback for the source of truth.

use std::collections::HashSet;

use chrono::{Months, Utc};
use log::{debug, info, warn};

use super::store::CalendarStore;
use super::types::{DriftSummary, EventDetails, ExternalEvent, ImportSummary, PermissionStatus};
use crate::error::StoreError;
use crate::meeting::{overlaps, Meeting};
use crate::storage::MeetingStore;

/// Well-known name of the app-owned calendar on the external store.
pub const APP_CALENDAR_NAME: &str = "Parish Meetings";

/// Import window length ahead of now.
const IMPORT_WINDOW_MONTHS: u32 = 3;

/// Reconciler over a calendar store and a meeting store.
pub struct SyncReconciler<C, M> {
    calendar: C,
    meetings: M,
    /// Cached id of the app-owned calendar, resolved once per instance.
    app_calendar_id: Option<String>,
}

impl<C: CalendarStore, M: MeetingStore> SyncReconciler<C, M> {
    pub fn new(calendar: C, meetings: M) -> Self {
        Self {
            calendar,
            meetings,
            app_calendar_id: None,
        }
    }

    /// The underlying meeting store.
    pub fn meetings(&self) -> &M {
        &self.meetings
    }

    /// The underlying calendar store.
    pub fn calendar(&self) -> &C {
        &self.calendar
    }

    fn permission_granted(&self) -> bool {
        match self.calendar.permission_status() {
            PermissionStatus::Granted => true,
            status => {
                debug!("calendar permission not granted ({status:?}); skipping sync");
                false
            }
        }
    }

    /// Resolve the app-owned calendar id, creating the calendar when
    /// `create` is set and it does not exist yet.
    fn resolve_app_calendar(&mut self, create: bool) -> Option<String> {
        if let Some(ref id) = self.app_calendar_id {
            return Some(id.clone());
        }
        let calendars = match self.calendar.list_calendars() {
            Ok(calendars) => calendars,
            Err(e) => {
                warn!("listing calendars failed: {e}");
                return None;
            }
        };
        if let Some(cal) = calendars.iter().find(|c| c.title == APP_CALENDAR_NAME) {
            self.app_calendar_id = Some(cal.id.clone());
            return Some(cal.id.clone());
        }
        if !create {
            return None;
        }
        match self.calendar.create_calendar(APP_CALENDAR_NAME) {
            Ok(id) => {
                info!("created app calendar {id}");
                self.app_calendar_id = Some(id.clone());
                Some(id)
            }
            Err(e) => {
                warn!("creating app calendar failed: {e}");
                None
            }
        }
    }

    /// Export one meeting to the app-owned calendar.
    ///
    /// Returns the external event id, or `None` when the export failed;
    /// export failure is non-fatal and the meeting stays valid locally.
    /// The id is persisted back onto the meeting whenever it changed.
    ///
    /// # Errors
    /// Only meeting-store failures propagate.
    pub fn sync_meeting_to_calendar(
        &mut self,
        meeting: &Meeting,
    ) -> Result<Option<String>, StoreError> {
        if !self.permission_granted() {
            return Ok(None);
        }
        let Some(calendar_id) = self.resolve_app_calendar(true) else {
            return Ok(None);
        };

        let details = event_details(meeting);
        let event_id = match meeting.calendar_event_id {
            Some(ref existing) => match self.calendar.update_event(existing, &details) {
                Ok(()) => Some(existing.clone()),
                Err(super::SyncError::EventNotFound(_)) => {
                    // The event was removed externally; recreate it.
                    debug!("event {existing} gone externally, recreating");
                    match self.calendar.create_event(&calendar_id, &details) {
                        Ok(id) => Some(id),
                        Err(e) => {
                            warn!("recreating event for meeting {} failed: {e}", meeting.id);
                            None
                        }
                    }
                }
                Err(e) => {
                    warn!("updating event for meeting {} failed: {e}", meeting.id);
                    None
                }
            },
            None => match self.calendar.create_event(&calendar_id, &details) {
                Ok(id) => Some(id),
                Err(e) => {
                    warn!("creating event for meeting {} failed: {e}", meeting.id);
                    None
                }
            },
        };

        if let Some(ref id) = event_id {
            if meeting.calendar_event_id.as_deref() != Some(id) {
                let mut updated = meeting.clone();
                updated.calendar_event_id = Some(id.clone());
                updated.last_synced = Some(Utc::now());
                self.meetings.update(&updated)?;
            }
        }
        Ok(event_id)
    }

    /// Delete a meeting locally, best-effort removing its app-owned
    /// calendar event first. External delete failures are swallowed;
    /// local deletion proceeds regardless.
    ///
    /// # Errors
    /// Only meeting-store failures propagate.
    pub fn remove_meeting(&mut self, meeting: &Meeting) -> Result<(), StoreError> {
        if let Some(ref event_id) = meeting.calendar_event_id {
            if self.permission_granted() {
                if let Err(e) = self.calendar.delete_event(event_id) {
                    warn!("deleting event {event_id} failed (continuing): {e}");
                }
            }
        }
        self.meetings.delete(meeting.id)
    }

    /// Import foreign events from all calendars except the app's own,
    /// for the window `[now, now + 3 months]`.
    ///
    /// An event is skipped when it was already imported (its id appears
    /// as some meeting's `external_event_id`) or when duplicate
    /// detection matches an existing meeting: same date, overlapping
    /// time window, case-insensitively equal title. Running the pass
    /// twice without external changes imports nothing the second time.
    ///
    /// # Errors
    /// Only meeting-store failures propagate.
    pub fn smart_import_meetings(&mut self) -> Result<ImportSummary, StoreError> {
        let mut summary = ImportSummary::default();
        if !self.permission_granted() {
            return Ok(summary);
        }

        let calendars = match self.calendar.list_calendars() {
            Ok(calendars) => calendars,
            Err(e) => {
                warn!("listing calendars failed: {e}");
                return Ok(summary);
            }
        };
        let app_id = self.resolve_app_calendar(false);
        let foreign: Vec<_> = calendars
            .iter()
            .filter(|c| Some(&c.id) != app_id.as_ref())
            .collect();
        let foreign_ids: Vec<String> = foreign.iter().map(|c| c.id.clone()).collect();

        let now = Utc::now().naive_utc();
        let window_end = now + Months::new(IMPORT_WINDOW_MONTHS);
        let events = match self.calendar.list_events(&foreign_ids, now, window_end) {
            Ok(events) => events,
            Err(e) => {
                warn!("listing events failed: {e}");
                return Ok(summary);
            }
        };

        let mut existing = self.meetings.list()?;
        let mut imported_ids: HashSet<String> = existing
            .iter()
            .filter_map(|m| m.external_event_id.clone())
            .collect();

        for event in events {
            if imported_ids.contains(&event.id) {
                summary.skipped += 1;
                continue;
            }
            if is_duplicate(&event, &existing) {
                debug!("skipping duplicate event \"{}\"", event.title);
                summary.skipped += 1;
                continue;
            }

            let source = foreign
                .iter()
                .find(|c| c.id == event.calendar_id)
                .map(|c| c.title.clone());
            let meeting = imported_meeting(&event, source);
            let id = self.meetings.create(&meeting)?;

            imported_ids.insert(event.id.clone());
            existing.push(Meeting { id, ..meeting });
            summary.imported += 1;
        }

        info!(
            "import pass done: {} imported, {} skipped",
            summary.imported, summary.skipped
        );
        Ok(summary)
    }

    /// Reflect external edits and deletions onto imported meetings.
    ///
    /// A vanished external event deletes the local meeting (it is
    /// already gone remotely; no external call is made). A changed one
    /// overwrites the local fields. Fetch errors skip that meeting only.
    ///
    /// # Errors
    /// Only meeting-store failures propagate.
    pub fn sync_external_changes(&mut self) -> Result<DriftSummary, StoreError> {
        let mut summary = DriftSummary::default();
        if !self.permission_granted() {
            return Ok(summary);
        }

        for meeting in self.meetings.list()? {
            let Some(ref external_id) = meeting.external_event_id else {
                continue;
            };
            match self.calendar.get_event(external_id) {
                Err(e) => {
                    warn!("fetching event {external_id} failed (skipping): {e}");
                }
                Ok(None) => {
                    self.meetings.delete(meeting.id)?;
                    summary.deleted += 1;
                }
                Ok(Some(event)) => {
                    if external_differs(&meeting, &event) {
                        let mut updated = meeting.clone();
                        updated.title = event.title.clone();
                        updated.date = event.start.date();
                        updated.start_time = event.start_hhmm();
                        updated.end_time = event.end_hhmm();
                        updated.location = event.location.clone();
                        updated.last_synced = Some(Utc::now());
                        self.meetings.update(&updated)?;
                        summary.updated += 1;
                    }
                }
            }
        }

        info!(
            "drift pass done: {} updated, {} deleted",
            summary.updated, summary.deleted
        );
        Ok(summary)
    }
}

/// Calendar-event payload for a meeting.
fn event_details(meeting: &Meeting) -> EventDetails {
    let start = meeting
        .start_datetime()
        .unwrap_or_else(|| meeting.date.and_hms_opt(0, 0, 0).unwrap_or_default());
    let end = meeting
        .end_datetime()
        .unwrap_or_else(|| meeting.date.and_hms_opt(0, 0, 0).unwrap_or_default());
    EventDetails {
        title: meeting.title.clone(),
        start,
        end,
        location: meeting.location.clone(),
        notes: meeting.notes.clone(),
    }
}

/// Duplicate detection: same date, overlapping window, titles equal
/// ignoring case.
fn is_duplicate(event: &ExternalEvent, existing: &[Meeting]) -> bool {
    let event_date = event.start.date();
    let (start, end) = (event.start_hhmm(), event.end_hhmm());
    existing.iter().any(|m| {
        m.date == event_date
            && overlaps(&start, &end, &m.start_time, &m.end_time)
            && m.title.eq_ignore_ascii_case(&event.title)
    })
}

/// Local meeting mirroring a foreign event.
fn imported_meeting(event: &ExternalEvent, source: Option<String>) -> Meeting {
    let mut meeting = Meeting::new(
        event.title.clone(),
        event.start.date(),
        &event.start_hhmm(),
        &event.end_hhmm(),
    );
    meeting.location = event.location.clone();
    meeting.notes = event.notes.clone();
    meeting.external_event_id = Some(event.id.clone());
    meeting.calendar_source = source;
    meeting.last_synced = Some(Utc::now());
    meeting
}

/// Whether any synced field diverges between the local meeting and the
/// external event.
fn external_differs(meeting: &Meeting, event: &ExternalEvent) -> bool {
    meeting.title != event.title
        || meeting.date != event.start.date()
        || meeting.start_time != event.start_hhmm()
        || meeting.end_time != event.end_hhmm()
        || meeting.location != event.location
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MeetingDb;
    use crate::sync::types::{CalendarInfo, SyncError};
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    /// In-memory calendar store for reconciler tests.
    struct FakeCalendar {
        permission: PermissionStatus,
        calendars: RefCell<Vec<CalendarInfo>>,
        events: RefCell<HashMap<String, ExternalEvent>>,
        next_id: Cell<u32>,
        delete_calls: Cell<u32>,
        fail_get: RefCell<HashSet<String>>,
    }

    impl FakeCalendar {
        fn new() -> Self {
            Self {
                permission: PermissionStatus::Granted,
                calendars: RefCell::new(Vec::new()),
                events: RefCell::new(HashMap::new()),
                next_id: Cell::new(1),
                delete_calls: Cell::new(0),
                fail_get: RefCell::new(HashSet::new()),
            }
        }

        fn with_calendar(title: &str) -> Self {
            let fake = Self::new();
            fake.calendars.borrow_mut().push(CalendarInfo {
                id: format!("cal-{title}"),
                title: title.to_string(),
            });
            fake
        }

        fn fresh_id(&self, prefix: &str) -> String {
            let n = self.next_id.get();
            self.next_id.set(n + 1);
            format!("{prefix}-{n}")
        }

        fn add_event(&self, calendar_id: &str, title: &str, start: NaiveDateTime, minutes: i64) -> String {
            let id = self.fresh_id("ev");
            self.events.borrow_mut().insert(
                id.clone(),
                ExternalEvent {
                    id: id.clone(),
                    calendar_id: calendar_id.to_string(),
                    title: title.to_string(),
                    start,
                    end: start + Duration::minutes(minutes),
                    location: None,
                    notes: None,
                },
            );
            id
        }
    }

    impl CalendarStore for FakeCalendar {
        fn permission_status(&self) -> PermissionStatus {
            self.permission
        }

        fn list_calendars(&self) -> Result<Vec<CalendarInfo>, SyncError> {
            Ok(self.calendars.borrow().clone())
        }

        fn create_calendar(&self, title: &str) -> Result<String, SyncError> {
            let id = self.fresh_id("cal");
            self.calendars.borrow_mut().push(CalendarInfo {
                id: id.clone(),
                title: title.to_string(),
            });
            Ok(id)
        }

        fn create_event(&self, calendar_id: &str, details: &EventDetails) -> Result<String, SyncError> {
            let id = self.fresh_id("ev");
            self.events.borrow_mut().insert(
                id.clone(),
                ExternalEvent {
                    id: id.clone(),
                    calendar_id: calendar_id.to_string(),
                    title: details.title.clone(),
                    start: details.start,
                    end: details.end,
                    location: details.location.clone(),
                    notes: details.notes.clone(),
                },
            );
            Ok(id)
        }

        fn update_event(&self, event_id: &str, details: &EventDetails) -> Result<(), SyncError> {
            let mut events = self.events.borrow_mut();
            let Some(event) = events.get_mut(event_id) else {
                return Err(SyncError::EventNotFound(event_id.to_string()));
            };
            event.title = details.title.clone();
            event.start = details.start;
            event.end = details.end;
            event.location = details.location.clone();
            event.notes = details.notes.clone();
            Ok(())
        }

        fn delete_event(&self, event_id: &str) -> Result<(), SyncError> {
            self.delete_calls.set(self.delete_calls.get() + 1);
            self.events.borrow_mut().remove(event_id);
            Ok(())
        }

        fn list_events(
            &self,
            calendar_ids: &[String],
            _start: NaiveDateTime,
            _end: NaiveDateTime,
        ) -> Result<Vec<ExternalEvent>, SyncError> {
            let mut events: Vec<_> = self
                .events
                .borrow()
                .values()
                .filter(|e| calendar_ids.contains(&e.calendar_id))
                .cloned()
                .collect();
            events.sort_by(|a, b| a.id.cmp(&b.id));
            Ok(events)
        }

        fn get_event(&self, event_id: &str) -> Result<Option<ExternalEvent>, SyncError> {
            if self.fail_get.borrow().contains(event_id) {
                return Err(SyncError::CalendarApi("boom".to_string()));
            }
            Ok(self.events.borrow().get(event_id).cloned())
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn soon(hour: u32) -> NaiveDateTime {
        // Tomorrow keeps events inside the 3-month import window.
        (Utc::now() + Duration::days(1))
            .date_naive()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn reconciler() -> SyncReconciler<FakeCalendar, MeetingDb> {
        SyncReconciler::new(FakeCalendar::new(), MeetingDb::open_in_memory().unwrap())
    }

    #[test]
    fn export_creates_calendar_and_event_and_persists_id() {
        let mut r = reconciler();
        let id = r
            .meetings
            .create(&Meeting::new("Council", d(2025, 3, 10), "10:00", "11:00"))
            .unwrap();
        let meeting = r.meetings.get_by_id(id).unwrap().unwrap();

        let event_id = r.sync_meeting_to_calendar(&meeting).unwrap().unwrap();

        let stored = r.meetings.get_by_id(id).unwrap().unwrap();
        assert_eq!(stored.calendar_event_id.as_deref(), Some(event_id.as_str()));
        assert!(stored.last_synced.is_some());
        let calendars = r.calendar.list_calendars().unwrap();
        assert!(calendars.iter().any(|c| c.title == APP_CALENDAR_NAME));
    }

    #[test]
    fn export_updates_existing_event_in_place() {
        let mut r = reconciler();
        let id = r
            .meetings
            .create(&Meeting::new("Council", d(2025, 3, 10), "10:00", "11:00"))
            .unwrap();
        let meeting = r.meetings.get_by_id(id).unwrap().unwrap();
        let first = r.sync_meeting_to_calendar(&meeting).unwrap().unwrap();

        let mut changed = r.meetings.get_by_id(id).unwrap().unwrap();
        changed.title = "Council (moved)".to_string();
        r.meetings.update(&changed).unwrap();
        let second = r.sync_meeting_to_calendar(&changed).unwrap().unwrap();

        assert_eq!(first, second);
        let event = r.calendar.get_event(&first).unwrap().unwrap();
        assert_eq!(event.title, "Council (moved)");
    }

    #[test]
    fn export_recreates_event_lost_externally() {
        let mut r = reconciler();
        let id = r
            .meetings
            .create(&Meeting::new("Council", d(2025, 3, 10), "10:00", "11:00"))
            .unwrap();
        let meeting = r.meetings.get_by_id(id).unwrap().unwrap();
        let first = r.sync_meeting_to_calendar(&meeting).unwrap().unwrap();

        // Event removed behind our back.
        r.calendar.events.borrow_mut().remove(&first);

        let meeting = r.meetings.get_by_id(id).unwrap().unwrap();
        let second = r.sync_meeting_to_calendar(&meeting).unwrap().unwrap();
        assert_ne!(first, second);
        let stored = r.meetings.get_by_id(id).unwrap().unwrap();
        assert_eq!(stored.calendar_event_id.as_deref(), Some(second.as_str()));
    }

    #[test]
    fn export_without_permission_is_a_noop() {
        let mut r = reconciler();
        r.calendar.permission = PermissionStatus::Denied;
        let id = r
            .meetings
            .create(&Meeting::new("Council", d(2025, 3, 10), "10:00", "11:00"))
            .unwrap();
        let meeting = r.meetings.get_by_id(id).unwrap().unwrap();
        assert!(r.sync_meeting_to_calendar(&meeting).unwrap().is_none());
        assert!(r.calendar.list_calendars().unwrap().is_empty());
    }

    #[test]
    fn remove_meeting_deletes_external_event_best_effort() {
        let mut r = reconciler();
        let id = r
            .meetings
            .create(&Meeting::new("Council", d(2025, 3, 10), "10:00", "11:00"))
            .unwrap();
        let meeting = r.meetings.get_by_id(id).unwrap().unwrap();
        let event_id = r.sync_meeting_to_calendar(&meeting).unwrap().unwrap();

        let meeting = r.meetings.get_by_id(id).unwrap().unwrap();
        r.remove_meeting(&meeting).unwrap();

        assert!(r.meetings.get_by_id(id).unwrap().is_none());
        assert!(r.calendar.get_event(&event_id).unwrap().is_none());
    }

    #[test]
    fn import_twice_is_idempotent() {
        let fake = FakeCalendar::with_calendar("Family");
        for i in 0..5u32 {
            fake.add_event("cal-Family", &format!("Event {i}"), soon(9 + i), 60);
        }
        let mut r = SyncReconciler::new(fake, MeetingDb::open_in_memory().unwrap());

        let first = r.smart_import_meetings().unwrap();
        assert_eq!(first, ImportSummary { imported: 5, skipped: 0 });

        let second = r.smart_import_meetings().unwrap();
        assert_eq!(second, ImportSummary { imported: 0, skipped: 5 });
        assert_eq!(r.meetings.list().unwrap().len(), 5);
    }

    #[test]
    fn import_records_source_and_linkage() {
        let fake = FakeCalendar::with_calendar("Family");
        let ev = fake.add_event("cal-Family", "Birthday", soon(12), 120);
        let mut r = SyncReconciler::new(fake, MeetingDb::open_in_memory().unwrap());

        r.smart_import_meetings().unwrap();
        let meetings = r.meetings.list().unwrap();
        assert_eq!(meetings.len(), 1);
        assert_eq!(meetings[0].external_event_id.as_deref(), Some(ev.as_str()));
        assert_eq!(meetings[0].calendar_source.as_deref(), Some("Family"));
        assert!(meetings[0].last_synced.is_some());
    }

    #[test]
    fn import_skips_case_insensitive_duplicates() {
        let fake = FakeCalendar::with_calendar("Work");
        let start = soon(10);
        fake.add_event("cal-Work", "Staff Meeting", start, 60);
        let db = MeetingDb::open_in_memory().unwrap();
        db.create(&Meeting::new(
            "staff meeting",
            start.date(),
            "10:30",
            "11:30",
        ))
        .unwrap();
        let mut r = SyncReconciler::new(fake, db);

        let summary = r.smart_import_meetings().unwrap();
        assert_eq!(summary, ImportSummary { imported: 0, skipped: 1 });
        assert_eq!(r.meetings.list().unwrap().len(), 1);
    }

    #[test]
    fn import_ignores_the_app_calendar() {
        let fake = FakeCalendar::with_calendar("Family");
        fake.calendars.borrow_mut().push(CalendarInfo {
            id: "cal-app".to_string(),
            title: APP_CALENDAR_NAME.to_string(),
        });
        fake.add_event("cal-app", "Exported meeting", soon(9), 60);
        fake.add_event("cal-Family", "Picnic", soon(13), 60);
        let mut r = SyncReconciler::new(fake, MeetingDb::open_in_memory().unwrap());

        let summary = r.smart_import_meetings().unwrap();
        assert_eq!(summary.imported, 1);
        assert_eq!(r.meetings.list().unwrap()[0].title, "Picnic");
    }

    #[test]
    fn import_without_permission_reports_zero() {
        let mut fake = FakeCalendar::with_calendar("Family");
        fake.add_event("cal-Family", "Event", soon(9), 60);
        fake.permission = PermissionStatus::Undetermined;
        let mut r = SyncReconciler::new(fake, MeetingDb::open_in_memory().unwrap());
        assert_eq!(r.smart_import_meetings().unwrap(), ImportSummary::default());
    }

    #[test]
    fn drift_deletes_vanished_meetings_without_remote_calls() {
        let fake = FakeCalendar::with_calendar("Family");
        let ev = fake.add_event("cal-Family", "Recital", soon(17), 60);
        let mut r = SyncReconciler::new(fake, MeetingDb::open_in_memory().unwrap());
        r.smart_import_meetings().unwrap();

        // Gone externally; local copy must follow.
        r.calendar.events.borrow_mut().remove(&ev);
        let before = r.calendar.delete_calls.get();

        let summary = r.sync_external_changes().unwrap();
        assert_eq!(summary, DriftSummary { updated: 0, deleted: 1 });
        assert!(r.meetings.list().unwrap().is_empty());
        assert_eq!(r.calendar.delete_calls.get(), before);
    }

    #[test]
    fn drift_overwrites_edited_fields() {
        let fake = FakeCalendar::with_calendar("Family");
        let ev = fake.add_event("cal-Family", "Recital", soon(17), 60);
        let mut r = SyncReconciler::new(fake, MeetingDb::open_in_memory().unwrap());
        r.smart_import_meetings().unwrap();

        {
            let mut events = r.calendar.events.borrow_mut();
            let event = events.get_mut(&ev).unwrap();
            event.title = "Recital (moved)".to_string();
            event.start += Duration::minutes(30);
            event.end += Duration::minutes(30);
            event.location = Some("Chapel".to_string());
        }

        let summary = r.sync_external_changes().unwrap();
        assert_eq!(summary, DriftSummary { updated: 1, deleted: 0 });
        let meeting = &r.meetings.list().unwrap()[0];
        assert_eq!(meeting.title, "Recital (moved)");
        assert_eq!(meeting.start_time, "17:30");
        assert_eq!(meeting.location.as_deref(), Some("Chapel"));
    }

    #[test]
    fn drift_is_stable_when_nothing_changed() {
        let fake = FakeCalendar::with_calendar("Family");
        fake.add_event("cal-Family", "Recital", soon(17), 60);
        let mut r = SyncReconciler::new(fake, MeetingDb::open_in_memory().unwrap());
        r.smart_import_meetings().unwrap();

        assert_eq!(r.sync_external_changes().unwrap(), DriftSummary::default());
        // Import -> drift -> import stays stable too.
        assert_eq!(
            r.smart_import_meetings().unwrap(),
            ImportSummary { imported: 0, skipped: 1 }
        );
    }

    #[test]
    fn drift_skips_meetings_whose_fetch_fails() {
        let fake = FakeCalendar::with_calendar("Family");
        let bad = fake.add_event("cal-Family", "Flaky", soon(9), 60);
        let good = fake.add_event("cal-Family", "Stable", soon(11), 60);
        let mut r = SyncReconciler::new(fake, MeetingDb::open_in_memory().unwrap());
        r.smart_import_meetings().unwrap();

        r.calendar.fail_get.borrow_mut().insert(bad.clone());
        r.calendar.events.borrow_mut().remove(&good);

        let summary = r.sync_external_changes().unwrap();
        // The failing fetch is skipped, the vanished one still deletes.
        assert_eq!(summary, DriftSummary { updated: 0, deleted: 1 });
        assert_eq!(r.meetings.list().unwrap().len(), 1);
        assert_eq!(r.meetings.list().unwrap()[0].title, "Flaky");
    }
}
