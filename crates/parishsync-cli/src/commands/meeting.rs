use clap::Subcommand;
use parishsync_core::{Meeting, MeetingStore};

use super::{open_app, parse_date, CliResult};

#[derive(Subcommand)]
pub enum MeetingAction {
    /// Add a meeting (warns about liturgical conflicts)
    Add {
        /// Meeting title
        title: String,
        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
        /// Start time (HH:mm)
        #[arg(long)]
        start: String,
        /// End time (HH:mm)
        #[arg(long)]
        end: String,
        /// Location
        #[arg(long)]
        location: Option<String>,
        /// Notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// List all meetings
    List {
        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one meeting
    Show {
        /// Meeting id
        id: i64,
    },
    /// Remove a meeting (also removes its exported calendar event)
    Remove {
        /// Meeting id
        id: i64,
    },
    /// Check all meetings for liturgical conflicts
    Check {
        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: MeetingAction) -> CliResult {
    match action {
        MeetingAction::Add {
            title,
            date,
            start,
            end,
            location,
            notes,
        } => {
            let mut app = open_app()?;
            let mut meeting = Meeting::new(title, parse_date(date.as_deref())?, &start, &end);
            meeting.location = location;
            meeting.notes = notes;
            let outcome = app.save_meeting(&meeting)?;
            println!("meeting created: {}", outcome.id);
            if let Some(conflict) = outcome.conflict {
                eprintln!("warning: {}", conflict.message);
            }
        }
        MeetingAction::List { json } => {
            let app = open_app()?;
            let meetings = app.meetings().list()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&meetings)?);
            } else {
                for m in &meetings {
                    println!(
                        "{:>4}  {}  {}-{}  {}",
                        m.id, m.date, m.start_time, m.end_time, m.title
                    );
                }
            }
        }
        MeetingAction::Show { id } => {
            let app = open_app()?;
            match app.meetings().get_by_id(id)? {
                Some(meeting) => println!("{}", serde_json::to_string_pretty(&meeting)?),
                None => {
                    eprintln!("meeting {id} not found");
                    std::process::exit(1);
                }
            }
        }
        MeetingAction::Remove { id } => {
            let mut app = open_app()?;
            app.delete_meeting(id)?;
            println!("meeting {id} removed");
        }
        MeetingAction::Check { json } => {
            let app = open_app()?;
            let conflicts = app.all_conflicts()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&conflicts)?);
            } else if conflicts.is_empty() {
                println!("no conflicts");
            } else {
                for c in &conflicts {
                    println!(
                        "{}  {:?}/{:?}  {}",
                        c.meeting.date, c.conflict_type, c.severity, c.message
                    );
                }
            }
        }
    }
    Ok(())
}
