//! Conflict detection between meetings and implied liturgy windows.
//!
//! A liturgy window is the configured start time plus a level-dependent
//! duration. Detection is a pure function of the meeting, the parish
//! settings, and the liturgical data table; at most one conflict is
//! reported per meeting, with feast-driven checks taking precedence
//! over the generic Sunday check.

use serde::{Deserialize, Serialize};

use crate::liturgical::{self, FeastLevel, LiturgicalData, OrthodoxEvent};
use crate::meeting::{add_minutes, overlaps, Meeting};
use crate::storage::ParishSettings;

/// Liturgy duration in minutes for great and major feasts.
const FEAST_LITURGY_MINUTES: i64 = 120;
/// Liturgy duration in minutes for lesser observances.
const WEEKDAY_LITURGY_MINUTES: i64 = 90;

/// What kind of observance the meeting collides with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    Sunday,
    GreatFeast,
    MajorFeast,
    WeekdayLiturgy,
}

/// How disruptive scheduling over the window would be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    High,
    Medium,
    Low,
}

/// A detected collision. Recomputed on every check, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    pub meeting: Meeting,
    pub event: OrthodoxEvent,
    pub conflict_type: ConflictType,
    pub severity: Severity,
    pub message: String,
}

/// Check one meeting against the liturgy windows implied by its date.
///
/// Returns the first applicable conflict only. `settings` are mandatory
/// input; without them no window can be derived and no conflict is
/// possible.
pub fn detect_conflict(
    meeting: &Meeting,
    settings: Option<&ParishSettings>,
    data: &LiturgicalData,
) -> Option<Conflict> {
    let settings = settings?;

    for event in liturgical::events_for_date(data, meeting.date) {
        if !event.liturgy_required {
            continue;
        }
        let feast_rank = matches!(event.level, FeastLevel::Great | FeastLevel::Major);
        let liturgy_start = if feast_rank {
            settings.sunday_liturgy_time.clone()
        } else {
            settings
                .weekday_liturgy_time
                .clone()
                .unwrap_or_else(|| settings.sunday_liturgy_time.clone())
        };
        let duration = if feast_rank {
            FEAST_LITURGY_MINUTES
        } else {
            WEEKDAY_LITURGY_MINUTES
        };
        let liturgy_end = add_minutes(&liturgy_start, duration)?;

        if overlaps(&meeting.start_time, &meeting.end_time, &liturgy_start, &liturgy_end) {
            let (conflict_type, severity) = match event.level {
                FeastLevel::Great => (ConflictType::GreatFeast, Severity::High),
                FeastLevel::Major => (ConflictType::MajorFeast, Severity::Medium),
                _ => (ConflictType::WeekdayLiturgy, Severity::Low),
            };
            let message = format!(
                "\"{}\" overlaps the {} liturgy ({}-{})",
                meeting.title, event.name, liturgy_start, liturgy_end
            );
            return Some(Conflict {
                meeting: meeting.clone(),
                event,
                conflict_type,
                severity,
                message,
            });
        }
    }

    if liturgical::is_sunday(meeting.date) {
        let liturgy_start = settings.sunday_liturgy_time.clone();
        let liturgy_end = add_minutes(&liturgy_start, FEAST_LITURGY_MINUTES)?;
        if overlaps(&meeting.start_time, &meeting.end_time, &liturgy_start, &liturgy_end) {
            let message = format!(
                "\"{}\" overlaps the Sunday liturgy ({}-{})",
                meeting.title, liturgy_start, liturgy_end
            );
            return Some(Conflict {
                meeting: meeting.clone(),
                event: sunday_event(meeting),
                conflict_type: ConflictType::Sunday,
                severity: Severity::High,
                message,
            });
        }
    }

    None
}

/// Map [`detect_conflict`] over a set of meetings, dropping the clean
/// ones. Input order is preserved.
pub fn detect_all_conflicts(
    meetings: &[Meeting],
    settings: Option<&ParishSettings>,
    data: &LiturgicalData,
) -> Vec<Conflict> {
    meetings
        .iter()
        .filter_map(|m| detect_conflict(m, settings, data))
        .collect()
}

/// Synthetic event for the weekly Sunday liturgy.
fn sunday_event(meeting: &Meeting) -> OrthodoxEvent {
    OrthodoxEvent {
        name: "Sunday".to_string(),
        name_en: None,
        date: meeting.date,
        moveable: false,
        liturgy_required: true,
        level: FeastLevel::Regular,
        fasting: None,
    }
}
