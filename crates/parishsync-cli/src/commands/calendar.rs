use chrono::{Datelike, Local, NaiveDate};
use clap::Subcommand;
use parishsync_core::liturgical;
use parishsync_core::remote::DayDetailClient;
use parishsync_core::LiturgicalData;

use super::{parse_date, CliResult};

/// Default base URL of the liturgical day service.
const DAY_API_BASE: &str = "https://api.parishsync.app";

#[derive(Subcommand)]
pub enum CalendarAction {
    /// Events for one date
    Show {
        /// Date (YYYY-MM-DD, defaults to today)
        date: Option<String>,
        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },
    /// Events for a whole month
    Month {
        /// Year (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,
        /// Month 1-12 (defaults to the current month)
        #[arg(long)]
        month: Option<u32>,
    },
    /// Liturgical season for a date
    Season {
        date: Option<String>,
    },
    /// Choir tone for a date
    Tone {
        date: Option<String>,
    },
    /// Fasting level for a date
    Fasting {
        date: Option<String>,
    },
    /// Julian (old calendar) date for a Gregorian date
    Julian {
        date: Option<String>,
    },
    /// Detailed day view from the remote service
    Detail {
        date: Option<String>,
        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: CalendarAction) -> CliResult {
    let data = LiturgicalData::builtin();
    match action {
        CalendarAction::Show { date, json } => {
            let date = parse_date(date.as_deref())?;
            let events = liturgical::events_for_date(&data, date);
            if json {
                println!("{}", serde_json::to_string_pretty(&events)?);
            } else if events.is_empty() {
                println!("{date}: no feasts");
            } else {
                for event in &events {
                    println!("{date}  {:?}  {}", event.level, event.name);
                }
            }
        }
        CalendarAction::Month { year, month } => {
            let today = Local::now().date_naive();
            let year = year.unwrap_or_else(|| today.year());
            let month = month.unwrap_or_else(|| today.month());
            let mut day = NaiveDate::from_ymd_opt(year, month, 1)
                .ok_or_else(|| format!("invalid month: {year}-{month:02}"))?;
            while day.month() == month {
                for event in liturgical::events_for_date(&data, day) {
                    println!("{day}  {:?}  {}", event.level, event.name);
                }
                let Some(next) = day.succ_opt() else { break };
                day = next;
            }
        }
        CalendarAction::Season { date } => {
            let date = parse_date(date.as_deref())?;
            println!("{}", liturgical::liturgical_season(&data, date));
        }
        CalendarAction::Tone { date } => {
            let date = parse_date(date.as_deref())?;
            println!("{}", liturgical::choir_tone(&data, date));
        }
        CalendarAction::Fasting { date } => {
            let date = parse_date(date.as_deref())?;
            println!("{:?}", liturgical::fasting_level(&data, date));
        }
        CalendarAction::Julian { date } => {
            let date = parse_date(date.as_deref())?;
            println!("{}", liturgical::julian_date(date));
        }
        CalendarAction::Detail { date, json } => {
            let date = parse_date(date.as_deref())?;
            let mut client = DayDetailClient::new(DAY_API_BASE, data)?;
            let detail = client.fetch_detail(date);
            if json {
                println!("{}", serde_json::to_string_pretty(&detail)?);
            } else {
                for event in &detail.events {
                    println!("{:?}  {}", event.level, event.name);
                    if let Some(ref description) = event.description {
                        println!("    {description}");
                    }
                }
                println!("fasting: {:?}  (source: {:?})", detail.fasting, detail.source);
            }
        }
    }
    Ok(())
}
