//! Google Calendar implementation of the calendar-store seam.
//!
//! Talks to the Calendar v3 REST API with a bearer token from the OS
//! keyring. The API base URL is injectable so tests can point the store
//! at a local mock server.

use chrono::{DateTime, NaiveDateTime};
use serde_json::{json, Value};

use super::keyring_store;
use super::store::CalendarStore;
use super::types::{CalendarInfo, EventDetails, ExternalEvent, PermissionStatus, SyncError};

const GOOGLE_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";
const ACCESS_TOKEN_KEY: &str = "google_access_token";

/// Google Calendar API client.
pub struct GoogleCalendarStore {
    client: reqwest::Client,
    runtime: tokio::runtime::Runtime,
    base_url: String,
    token: Option<String>,
}

impl GoogleCalendarStore {
    /// Client against the real API, token loaded from the keyring (if
    /// the user has authenticated).
    pub fn new() -> Result<Self, SyncError> {
        let token = keyring_store::get(ACCESS_TOKEN_KEY)
            .ok()
            .flatten()
            .filter(|t| !t.is_empty());
        Self::with_config(GOOGLE_CALENDAR_API_BASE, token)
    }

    /// Client against an explicit base URL with an explicit token.
    pub fn with_config(base_url: &str, token: Option<String>) -> Result<Self, SyncError> {
        Ok(Self {
            client: reqwest::Client::new(),
            runtime: tokio::runtime::Runtime::new()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn token(&self) -> Result<&str, SyncError> {
        self.token.as_deref().ok_or(SyncError::AuthenticationRequired)
    }

    fn get_json(&self, url: &str) -> Result<Value, SyncError> {
        let token = self.token()?;
        let response = self.runtime.block_on(async {
            self.client
                .get(url)
                .bearer_auth(token)
                .send()
                .await?
                .error_for_status()?
                .json::<Value>()
                .await
        })?;
        Ok(response)
    }

    fn post_json(&self, url: &str, body: &Value) -> Result<Value, SyncError> {
        let token = self.token()?;
        let response = self.runtime.block_on(async {
            self.client
                .post(url)
                .bearer_auth(token)
                .json(body)
                .send()
                .await?
                .error_for_status()?
                .json::<Value>()
                .await
        })?;
        Ok(response)
    }

    /// Locate an event by bare id across all calendars. Google keys
    /// events per calendar, so this probes each one; the device-store
    /// notion of a global event id maps onto the first hit.
    fn find_event(&self, event_id: &str) -> Result<Option<ExternalEvent>, SyncError> {
        let token = self.token()?;
        for calendar in self.list_calendars()? {
            let url = format!(
                "{}/calendars/{}/events/{}",
                self.base_url,
                urlencoding::encode(&calendar.id),
                urlencoding::encode(event_id)
            );
            let response = self
                .runtime
                .block_on(async { self.client.get(&url).bearer_auth(token).send().await })?;
            if response.status() == reqwest::StatusCode::NOT_FOUND {
                continue;
            }
            let body: Value = self
                .runtime
                .block_on(async { response.error_for_status()?.json::<Value>().await })?;
            // Cancelled events linger in the API with status "cancelled".
            if body["status"].as_str() == Some("cancelled") {
                return Ok(None);
            }
            return Ok(parse_event(&body, &calendar.id));
        }
        Ok(None)
    }
}

impl CalendarStore for GoogleCalendarStore {
    fn permission_status(&self) -> PermissionStatus {
        if self.token.is_some() {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Undetermined
        }
    }

    fn list_calendars(&self) -> Result<Vec<CalendarInfo>, SyncError> {
        let url = format!("{}/users/me/calendarList", self.base_url);
        let body = self.get_json(&url)?;
        let calendars = body["items"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|cal| {
                        Some(CalendarInfo {
                            id: cal["id"].as_str()?.to_string(),
                            title: cal["summary"].as_str().unwrap_or_default().to_string(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(calendars)
    }

    fn create_calendar(&self, title: &str) -> Result<String, SyncError> {
        let url = format!("{}/calendars", self.base_url);
        let body = self.post_json(&url, &json!({ "summary": title }))?;
        body["id"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| SyncError::CalendarApi("calendar create returned no id".to_string()))
    }

    fn create_event(&self, calendar_id: &str, details: &EventDetails) -> Result<String, SyncError> {
        let url = format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(calendar_id)
        );
        let body = self.post_json(&url, &event_body(details))?;
        body["id"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| SyncError::CalendarApi("event create returned no id".to_string()))
    }

    fn update_event(&self, event_id: &str, details: &EventDetails) -> Result<(), SyncError> {
        let Some(existing) = self.find_event(event_id)? else {
            return Err(SyncError::EventNotFound(event_id.to_string()));
        };
        let token = self.token()?;
        let url = format!(
            "{}/calendars/{}/events/{}",
            self.base_url,
            urlencoding::encode(&existing.calendar_id),
            urlencoding::encode(event_id)
        );
        let body = event_body(details);
        self.runtime.block_on(async {
            self.client
                .put(&url)
                .bearer_auth(token)
                .json(&body)
                .send()
                .await?
                .error_for_status()?;
            Ok::<_, reqwest::Error>(())
        })?;
        Ok(())
    }

    fn delete_event(&self, event_id: &str) -> Result<(), SyncError> {
        // Tolerant of not-found: nothing to do when the event is gone.
        let Some(existing) = self.find_event(event_id)? else {
            return Ok(());
        };
        let token = self.token()?;
        let url = format!(
            "{}/calendars/{}/events/{}",
            self.base_url,
            urlencoding::encode(&existing.calendar_id),
            urlencoding::encode(event_id)
        );
        let response = self
            .runtime
            .block_on(async { self.client.delete(&url).bearer_auth(token).send().await })?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }
        response.error_for_status().map_err(SyncError::Network)?;
        Ok(())
    }

    fn list_events(
        &self,
        calendar_ids: &[String],
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<ExternalEvent>, SyncError> {
        let mut events = Vec::new();
        for calendar_id in calendar_ids {
            let query = [
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
                ("timeMin", format!("{}Z", start.format("%Y-%m-%dT%H:%M:%S"))),
                ("timeMax", format!("{}Z", end.format("%Y-%m-%dT%H:%M:%S"))),
            ]
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
            let url = format!(
                "{}/calendars/{}/events?{}",
                self.base_url,
                urlencoding::encode(calendar_id),
                query
            );
            let body = self.get_json(&url)?;
            if let Some(items) = body["items"].as_array() {
                events.extend(items.iter().filter_map(|item| parse_event(item, calendar_id)));
            }
        }
        Ok(events)
    }

    fn get_event(&self, event_id: &str) -> Result<Option<ExternalEvent>, SyncError> {
        self.find_event(event_id)
    }
}

/// Request body for event create/update.
fn event_body(details: &EventDetails) -> Value {
    let mut body = json!({
        "summary": details.title,
        "start": { "dateTime": format!("{}Z", details.start.format("%Y-%m-%dT%H:%M:%S")) },
        "end": { "dateTime": format!("{}Z", details.end.format("%Y-%m-%dT%H:%M:%S")) },
    });
    if let Some(ref location) = details.location {
        body["location"] = json!(location);
    }
    if let Some(ref notes) = details.notes {
        body["description"] = json!(notes);
    }
    body
}

/// Parse an API event; all-day events (date without time) are ignored.
fn parse_event(item: &Value, calendar_id: &str) -> Option<ExternalEvent> {
    let id = item["id"].as_str()?;
    let start = parse_event_time(&item["start"])?;
    let end = parse_event_time(&item["end"])?;
    Some(ExternalEvent {
        id: id.to_string(),
        calendar_id: calendar_id.to_string(),
        title: item["summary"].as_str().unwrap_or_default().to_string(),
        start,
        end,
        location: item["location"].as_str().map(str::to_string),
        notes: item["description"].as_str().map(str::to_string),
    })
}

fn parse_event_time(value: &Value) -> Option<NaiveDateTime> {
    let raw = value["dateTime"].as_str()?;
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_local())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn details() -> EventDetails {
        let start = NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        EventDetails {
            title: "Parish council".to_string(),
            start,
            end: start + chrono::Duration::minutes(60),
            location: Some("Parish hall".to_string()),
            notes: None,
        }
    }

    fn store(server: &mockito::Server) -> GoogleCalendarStore {
        GoogleCalendarStore::with_config(&server.url(), Some("test-token".to_string())).unwrap()
    }

    #[test]
    fn permission_tracks_token_presence() {
        let with_token =
            GoogleCalendarStore::with_config("http://localhost", Some("t".to_string())).unwrap();
        assert_eq!(with_token.permission_status(), PermissionStatus::Granted);
        let without = GoogleCalendarStore::with_config("http://localhost", None).unwrap();
        assert_eq!(without.permission_status(), PermissionStatus::Undetermined);
    }

    #[test]
    fn no_token_means_authentication_required() {
        let store = GoogleCalendarStore::with_config("http://localhost", None).unwrap();
        assert!(matches!(
            store.list_calendars(),
            Err(SyncError::AuthenticationRequired)
        ));
    }

    #[test]
    fn lists_calendars() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", "/users/me/calendarList")
            .with_status(200)
            .with_body(
                r#"{"items":[{"id":"cal1","summary":"Family"},{"id":"cal2","summary":"Work"}]}"#,
            )
            .create();

        let calendars = store(&server).list_calendars().unwrap();
        assert_eq!(calendars.len(), 2);
        assert_eq!(calendars[0].title, "Family");
    }

    #[test]
    fn creates_event_and_returns_id() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("POST", "/calendars/cal1/events")
            .with_status(200)
            .with_body(r#"{"id":"ev-99"}"#)
            .create();

        let id = store(&server).create_event("cal1", &details()).unwrap();
        assert_eq!(id, "ev-99");
    }

    #[test]
    fn update_of_vanished_event_reports_not_found() {
        let mut server = mockito::Server::new();
        let _cals = server
            .mock("GET", "/users/me/calendarList")
            .with_status(200)
            .with_body(r#"{"items":[{"id":"cal1","summary":"Family"}]}"#)
            .create();
        let _missing = server
            .mock("GET", "/calendars/cal1/events/ev-1")
            .with_status(404)
            .create();

        let result = store(&server).update_event("ev-1", &details());
        assert!(matches!(result, Err(SyncError::EventNotFound(_))));
    }

    #[test]
    fn delete_of_vanished_event_is_tolerated() {
        let mut server = mockito::Server::new();
        let _cals = server
            .mock("GET", "/users/me/calendarList")
            .with_status(200)
            .with_body(r#"{"items":[{"id":"cal1","summary":"Family"}]}"#)
            .create();
        let _missing = server
            .mock("GET", "/calendars/cal1/events/ev-1")
            .with_status(404)
            .create();

        assert!(store(&server).delete_event("ev-1").is_ok());
    }

    #[test]
    fn get_event_probes_calendars_until_found() {
        let mut server = mockito::Server::new();
        let _cals = server
            .mock("GET", "/users/me/calendarList")
            .with_status(200)
            .with_body(
                r#"{"items":[{"id":"cal1","summary":"Family"},{"id":"cal2","summary":"Work"}]}"#,
            )
            .create();
        let _miss = server
            .mock("GET", "/calendars/cal1/events/ev-7")
            .with_status(404)
            .create();
        let _hit = server
            .mock("GET", "/calendars/cal2/events/ev-7")
            .with_status(200)
            .with_body(
                r#"{"id":"ev-7","summary":"Standup",
                    "start":{"dateTime":"2025-03-10T10:00:00Z"},
                    "end":{"dateTime":"2025-03-10T10:30:00Z"}}"#,
            )
            .create();

        let event = store(&server).get_event("ev-7").unwrap().unwrap();
        assert_eq!(event.calendar_id, "cal2");
        assert_eq!(event.title, "Standup");
        assert_eq!(event.start_hhmm(), "10:00");
    }

    #[test]
    fn list_events_skips_all_day_entries() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock(
                "GET",
                mockito::Matcher::Regex(r"^/calendars/cal1/events\?.*".to_string()),
            )
            .with_status(200)
            .with_body(
                r#"{"items":[
                    {"id":"ev-1","summary":"Timed",
                     "start":{"dateTime":"2025-03-10T10:00:00Z"},
                     "end":{"dateTime":"2025-03-10T11:00:00Z"}},
                    {"id":"ev-2","summary":"All day",
                     "start":{"date":"2025-03-10"},
                     "end":{"date":"2025-03-11"}}
                ]}"#,
            )
            .create();

        let start = NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let events = store(&server)
            .list_events(&["cal1".to_string()], start, start + chrono::Duration::days(90))
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "ev-1");
    }
}
