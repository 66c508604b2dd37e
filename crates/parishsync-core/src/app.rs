//! Application state and the command entry points the CLI calls.
//!
//! `App` ties the settings singleton, the liturgical data table, and
//! the reconciler together. The calendar engine and conflict detector
//! stay pure; all state lives here.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::conflict::{self, Conflict};
use crate::error::Result;
use crate::liturgical::LiturgicalData;
use crate::meeting::Meeting;
use crate::storage::{MeetingStore, ParishSettings};
use crate::sync::{CalendarStore, DriftSummary, ImportSummary, SyncReconciler};

/// Result of saving a meeting. The conflict is advisory: the meeting is
/// persisted either way, and the caller decides how to present it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveOutcome {
    pub id: i64,
    pub conflict: Option<Conflict>,
}

/// Combined result of one refresh pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RefreshSummary {
    pub import: ImportSummary,
    pub drift: DriftSummary,
}

/// Application state over a calendar store and a meeting store.
pub struct App<C, M> {
    settings: ParishSettings,
    reconciler: SyncReconciler<C, M>,
    data: LiturgicalData,
    refresh_in_flight: bool,
}

impl<C: CalendarStore, M: MeetingStore> App<C, M> {
    pub fn new(calendar: C, meetings: M, settings: ParishSettings) -> Self {
        Self {
            settings,
            reconciler: SyncReconciler::new(calendar, meetings),
            data: LiturgicalData::builtin(),
            refresh_in_flight: false,
        }
    }

    pub fn settings(&self) -> &ParishSettings {
        &self.settings
    }

    pub fn meetings(&self) -> &M {
        self.reconciler.meetings()
    }

    pub fn calendar(&self) -> &C {
        self.reconciler.calendar()
    }

    pub fn data(&self) -> &LiturgicalData {
        &self.data
    }

    /// Validate, check for a liturgical conflict, persist, and export.
    ///
    /// A meeting with `id == 0` is created, any other id is updated.
    /// The conflict never blocks the save; validation failures do.
    ///
    /// # Errors
    /// Validation and store errors propagate; export failures do not.
    pub fn save_meeting(&mut self, meeting: &Meeting) -> Result<SaveOutcome> {
        meeting.validate()?;
        let conflict = conflict::detect_conflict(meeting, Some(&self.settings), &self.data);

        let id = if meeting.id == 0 {
            self.reconciler.meetings().create(meeting)?
        } else {
            self.reconciler.meetings().update(meeting)?;
            meeting.id
        };

        let stored = Meeting { id, ..meeting.clone() };
        self.reconciler.sync_meeting_to_calendar(&stored)?;
        info!("saved meeting {id} (\"{}\")", stored.title);
        Ok(SaveOutcome { id, conflict })
    }

    /// Delete a meeting, best-effort removing its exported event.
    ///
    /// # Errors
    /// Store errors propagate, including an unknown id.
    pub fn delete_meeting(&mut self, id: i64) -> Result<()> {
        let Some(meeting) = self.reconciler.meetings().get_by_id(id)? else {
            return Err(crate::error::StoreError::MeetingNotFound(id).into());
        };
        self.reconciler.remove_meeting(&meeting)?;
        info!("deleted meeting {id}");
        Ok(())
    }

    /// Conflicts for all stored meetings, in store order.
    pub fn all_conflicts(&self) -> Result<Vec<Conflict>> {
        let meetings = self.reconciler.meetings().list()?;
        Ok(conflict::detect_all_conflicts(
            &meetings,
            Some(&self.settings),
            &self.data,
        ))
    }

    /// Run one import-then-drift pass against the external calendar.
    ///
    /// Passes are serialized: a call arriving while one is running
    /// returns `None` instead of starting a second pass.
    ///
    /// # Errors
    /// Only meeting-store failures propagate.
    pub fn refresh(&mut self) -> Result<Option<RefreshSummary>> {
        self.guarded(Self::refresh_inner)
    }

    fn refresh_inner(&mut self) -> Result<RefreshSummary> {
        let import = self.reconciler.smart_import_meetings()?;
        let drift = self.reconciler.sync_external_changes()?;
        Ok(RefreshSummary { import, drift })
    }

    /// Import pass only, under the same guard as [`App::refresh`].
    pub fn refresh_import(&mut self) -> Result<Option<ImportSummary>> {
        self.guarded(|app| Ok(app.reconciler.smart_import_meetings()?))
    }

    /// Drift pass only, under the same guard as [`App::refresh`].
    pub fn refresh_drift(&mut self) -> Result<Option<DriftSummary>> {
        self.guarded(|app| Ok(app.reconciler.sync_external_changes()?))
    }

    fn guarded<T>(&mut self, pass: impl FnOnce(&mut Self) -> Result<T>) -> Result<Option<T>> {
        if self.refresh_in_flight {
            debug!("refresh already in flight; skipping");
            return Ok(None);
        }
        self.refresh_in_flight = true;
        let result = pass(self);
        self.refresh_in_flight = false;
        result.map(Some)
    }
}
