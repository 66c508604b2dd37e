//! Parish meeting records.
//!
//! Times are zero-padded "HH:mm" strings in local parish time; the
//! zero-padding makes plain lexical comparison order-correct, and the
//! whole crate relies on that.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A scheduled parish meeting.
///
/// Calendar linkage is split across two independent fields:
/// `calendar_event_id` is the event the app itself owns on the external
/// store (export acts on it), `external_event_id` is a foreign event
/// this meeting mirrors (drift detection acts on it). A meeting may
/// carry neither, either, or both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    /// Assigned by the store on create; 0 until then.
    pub id: i64,
    pub title: String,
    pub date: NaiveDate,
    /// "HH:mm", 24h.
    pub start_time: String,
    /// "HH:mm", 24h.
    pub end_time: String,
    pub location: Option<String>,
    pub notes: Option<String>,
    /// Id of the app-owned event on the calendar store.
    pub calendar_event_id: Option<String>,
    /// Id of the foreign event this meeting was imported from.
    pub external_event_id: Option<String>,
    /// Display title of the origin calendar for imported meetings.
    pub calendar_source: Option<String>,
    pub last_synced: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Meeting {
    /// New unsaved meeting with the mandatory fields.
    pub fn new(title: impl Into<String>, date: NaiveDate, start_time: &str, end_time: &str) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            title: title.into(),
            date,
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
            location: None,
            notes: None,
            calendar_event_id: None,
            external_event_id: None,
            calendar_source: None,
            last_synced: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check the invariants that must hold before any persistence
    /// attempt: non-empty title, well-formed times, start before end.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyField("title".to_string()));
        }
        validate_time("start_time", &self.start_time)?;
        validate_time("end_time", &self.end_time)?;
        if self.start_time >= self.end_time {
            return Err(ValidationError::InvalidTimeRange {
                start: self.start_time.clone(),
                end: self.end_time.clone(),
            });
        }
        Ok(())
    }

    /// Whether `[start_time, end_time)` overlaps another half-open
    /// window. Touching endpoints do not overlap.
    pub fn overlaps(&self, other_start: &str, other_end: &str) -> bool {
        overlaps(&self.start_time, &self.end_time, other_start, other_end)
    }

    /// Meeting start as a naive local datetime.
    pub fn start_datetime(&self) -> Option<NaiveDateTime> {
        parse_hhmm(&self.start_time).map(|t| self.date.and_time(t))
    }

    /// Meeting end as a naive local datetime.
    pub fn end_datetime(&self) -> Option<NaiveDateTime> {
        parse_hhmm(&self.end_time).map(|t| self.date.and_time(t))
    }
}

/// Half-open interval overlap on "HH:mm" strings.
pub fn overlaps(a_start: &str, a_end: &str, b_start: &str, b_end: &str) -> bool {
    a_start < b_end && a_end > b_start
}

/// Parse a zero-padded "HH:mm" string.
pub fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M").ok()
}

/// Render minutes-since-midnight back to "HH:mm", clamped to the day.
pub fn format_hhmm(minutes: i64) -> String {
    let clamped = minutes.clamp(0, 23 * 60 + 59);
    format!("{:02}:{:02}", clamped / 60, clamped % 60)
}

/// Add a duration to an "HH:mm" string.
pub fn add_minutes(time: &str, minutes: i64) -> Option<String> {
    let (h, m) = time.split_once(':')?;
    let total = h.parse::<i64>().ok()? * 60 + m.parse::<i64>().ok()? + minutes;
    Some(format_hhmm(total))
}

fn validate_time(field: &str, value: &str) -> Result<(), ValidationError> {
    let well_formed = value.len() == 5
        && value.as_bytes()[2] == b':'
        && parse_hhmm(value).is_some();
    if well_formed {
        Ok(())
    } else {
        Err(ValidationError::InvalidTime {
            field: field.to_string(),
            value: value.to_string(),
        })
    }
}
