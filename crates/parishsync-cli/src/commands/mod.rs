//! CLI subcommand modules and shared helpers.

pub mod auth;
pub mod calendar;
pub mod completions;
pub mod meeting;
pub mod settings;
pub mod sync;
pub mod today;

use chrono::{Local, NaiveDate};
use parishsync_core::{App, GoogleCalendarStore, MeetingDb, ParishSettings};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Application state over the real stores.
pub fn open_app() -> Result<App<GoogleCalendarStore, MeetingDb>, Box<dyn std::error::Error>> {
    let calendar = GoogleCalendarStore::new()?;
    let meetings = MeetingDb::open()?;
    Ok(App::new(calendar, meetings, ParishSettings::load_or_default()))
}

/// Parse a `YYYY-MM-DD` argument, defaulting to the local date.
pub fn parse_date(arg: Option<&str>) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    match arg {
        None => Ok(Local::now().date_naive()),
        Some(s) => Ok(NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|e| format!("invalid date '{s}': {e}"))?),
    }
}
