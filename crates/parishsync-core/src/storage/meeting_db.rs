//! SQLite-based storage for meetings.

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{data_dir, migrations, MeetingStore};
use crate::error::StoreError;
use crate::meeting::Meeting;

/// Parse an RFC3339 timestamp with fallback to the current time.
fn parse_datetime_fallback(dt_str: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(dt_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Parse an ISO date column.
fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap_or_default()
}

/// Build a Meeting from a database row (column order matches SELECT_COLS).
fn row_to_meeting(row: &Row) -> Result<Meeting, rusqlite::Error> {
    let date_str: String = row.get(2)?;
    let last_synced: Option<String> = row.get(10)?;
    let created_at: String = row.get(11)?;
    let updated_at: String = row.get(12)?;

    Ok(Meeting {
        id: row.get(0)?,
        title: row.get(1)?,
        date: parse_date(&date_str),
        start_time: row.get(3)?,
        end_time: row.get(4)?,
        location: row.get(5)?,
        notes: row.get(6)?,
        calendar_event_id: row.get(7)?,
        external_event_id: row.get(8)?,
        calendar_source: row.get(9)?,
        last_synced: last_synced.as_deref().map(parse_datetime_fallback),
        created_at: parse_datetime_fallback(&created_at),
        updated_at: parse_datetime_fallback(&updated_at),
    })
}

const SELECT_COLS: &str = "id, title, date, start_time, end_time, location, notes, \
     calendar_event_id, external_event_id, calendar_source, last_synced, \
     created_at, updated_at";

/// Meeting database backed by SQLite.
pub struct MeetingDb {
    conn: Connection,
}

impl MeetingDb {
    /// Open (and migrate) the database at the default location.
    pub fn open() -> Result<Self, StoreError> {
        let dir = data_dir().map_err(|e| StoreError::QueryFailed(e.to_string()))?;
        Self::open_at(dir.join("meetings.db"))
    }

    /// Open (and migrate) the database at an explicit path.
    pub fn open_at(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        migrations::migrate(&conn).map_err(|e| StoreError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    /// In-memory database, used by tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        migrations::migrate(&conn).map_err(|e| StoreError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }
}

impl MeetingStore for MeetingDb {
    fn list(&self) -> Result<Vec<Meeting>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SELECT_COLS} FROM meetings ORDER BY date, start_time"
        ))?;
        let rows = stmt.query_map([], row_to_meeting)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Meeting>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SELECT_COLS} FROM meetings WHERE date = ?1 ORDER BY start_time"
        ))?;
        let rows = stmt.query_map(params![date.to_string()], row_to_meeting)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn get_by_id(&self, id: i64) -> Result<Option<Meeting>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SELECT_COLS} FROM meetings WHERE id = ?1"
        ))?;
        Ok(stmt.query_row(params![id], row_to_meeting).optional()?)
    }

    fn create(&self, meeting: &Meeting) -> Result<i64, StoreError> {
        self.conn.execute(
            "INSERT INTO meetings (title, date, start_time, end_time, location, notes, \
             calendar_event_id, external_event_id, calendar_source, last_synced, \
             created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                meeting.title,
                meeting.date.to_string(),
                meeting.start_time,
                meeting.end_time,
                meeting.location,
                meeting.notes,
                meeting.calendar_event_id,
                meeting.external_event_id,
                meeting.calendar_source,
                meeting.last_synced.map(|dt| dt.to_rfc3339()),
                meeting.created_at.to_rfc3339(),
                meeting.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update(&self, meeting: &Meeting) -> Result<(), StoreError> {
        let changed = self.conn.execute(
            "UPDATE meetings SET title = ?1, date = ?2, start_time = ?3, end_time = ?4, \
             location = ?5, notes = ?6, calendar_event_id = ?7, external_event_id = ?8, \
             calendar_source = ?9, last_synced = ?10, updated_at = ?11 WHERE id = ?12",
            params![
                meeting.title,
                meeting.date.to_string(),
                meeting.start_time,
                meeting.end_time,
                meeting.location,
                meeting.notes,
                meeting.calendar_event_id,
                meeting.external_event_id,
                meeting.calendar_source,
                meeting.last_synced.map(|dt| dt.to_rfc3339()),
                Utc::now().to_rfc3339(),
                meeting.id,
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::MeetingNotFound(meeting.id));
        }
        Ok(())
    }

    fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.conn.execute("DELETE FROM meetings WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn delete_all(&self) -> Result<(), StoreError> {
        self.conn.execute("DELETE FROM meetings", [])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn db_with(meetings: &[(&str, NaiveDate, &str, &str)]) -> MeetingDb {
        let db = MeetingDb::open_in_memory().unwrap();
        for (title, date, start, end) in meetings {
            db.create(&Meeting::new(*title, *date, start, end)).unwrap();
        }
        db
    }

    #[test]
    fn create_assigns_sequential_ids() {
        let db = MeetingDb::open_in_memory().unwrap();
        let m = Meeting::new("Council", d(2025, 3, 10), "10:00", "11:00");
        let first = db.create(&m).unwrap();
        let second = db.create(&m).unwrap();
        assert!(second > first);
    }

    #[test]
    fn list_orders_by_date_then_start_time() {
        let db = db_with(&[
            ("Later day", d(2025, 3, 11), "08:00", "09:00"),
            ("Early slot", d(2025, 3, 10), "09:00", "10:00"),
            ("Late slot", d(2025, 3, 10), "14:00", "15:00"),
        ]);
        let titles: Vec<String> = db.list().unwrap().into_iter().map(|m| m.title).collect();
        assert_eq!(titles, vec!["Early slot", "Late slot", "Later day"]);
    }

    #[test]
    fn list_by_date_filters() {
        let db = db_with(&[
            ("A", d(2025, 3, 10), "09:00", "10:00"),
            ("B", d(2025, 3, 11), "09:00", "10:00"),
        ]);
        let on_10th = db.list_by_date(d(2025, 3, 10)).unwrap();
        assert_eq!(on_10th.len(), 1);
        assert_eq!(on_10th[0].title, "A");
    }

    #[test]
    fn round_trips_optional_fields() {
        let db = MeetingDb::open_in_memory().unwrap();
        let mut m = Meeting::new("Vestry", d(2025, 5, 1), "18:00", "19:30");
        m.location = Some("Parish hall".to_string());
        m.external_event_id = Some("ext-42".to_string());
        m.calendar_source = Some("Family".to_string());
        m.last_synced = Some(Utc::now());

        let id = db.create(&m).unwrap();
        let loaded = db.get_by_id(id).unwrap().unwrap();
        assert_eq!(loaded.location.as_deref(), Some("Parish hall"));
        assert_eq!(loaded.external_event_id.as_deref(), Some("ext-42"));
        assert_eq!(loaded.calendar_source.as_deref(), Some("Family"));
        assert!(loaded.last_synced.is_some());
    }

    #[test]
    fn update_rewrites_fields_and_bumps_updated_at() {
        let db = MeetingDb::open_in_memory().unwrap();
        let id = db
            .create(&Meeting::new("Choir", d(2025, 5, 1), "18:00", "19:00"))
            .unwrap();

        let mut m = db.get_by_id(id).unwrap().unwrap();
        m.title = "Choir practice".to_string();
        m.calendar_event_id = Some("cal-7".to_string());
        db.update(&m).unwrap();

        let loaded = db.get_by_id(id).unwrap().unwrap();
        assert_eq!(loaded.title, "Choir practice");
        assert_eq!(loaded.calendar_event_id.as_deref(), Some("cal-7"));
    }

    #[test]
    fn update_of_missing_meeting_errors() {
        let db = MeetingDb::open_in_memory().unwrap();
        let mut m = Meeting::new("Ghost", d(2025, 5, 1), "18:00", "19:00");
        m.id = 999;
        assert!(matches!(
            db.update(&m),
            Err(StoreError::MeetingNotFound(999))
        ));
    }

    #[test]
    fn delete_and_delete_all() {
        let db = db_with(&[
            ("A", d(2025, 3, 10), "09:00", "10:00"),
            ("B", d(2025, 3, 11), "09:00", "10:00"),
        ]);
        let first = db.list().unwrap()[0].id;
        db.delete(first).unwrap();
        assert_eq!(db.list().unwrap().len(), 1);
        // Deleting an absent id is a no-op.
        db.delete(first).unwrap();
        db.delete_all().unwrap();
        assert!(db.list().unwrap().is_empty());
    }

    #[test]
    fn open_at_persists_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meetings.db");
        {
            let db = MeetingDb::open_at(&path).unwrap();
            db.create(&Meeting::new("Persisted", d(2025, 3, 10), "09:00", "10:00"))
                .unwrap();
        }
        let db = MeetingDb::open_at(&path).unwrap();
        assert_eq!(db.list().unwrap().len(), 1);
    }
}
