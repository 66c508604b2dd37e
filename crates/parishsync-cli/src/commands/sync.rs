use clap::Subcommand;
use parishsync_core::{CalendarStore, MeetingStore, PermissionStatus};

use super::{open_app, CliResult};

#[derive(Subcommand)]
pub enum SyncAction {
    /// Run a full pass: import foreign events, then apply external edits
    Run,
    /// Export all local meetings to the app calendar
    Push,
    /// Import foreign calendar events as meetings
    Import,
    /// Apply external edits and deletions to imported meetings
    Drift,
    /// Show calendar permission and linkage counts
    Status,
}

pub fn run(action: SyncAction) -> CliResult {
    match action {
        SyncAction::Run => {
            let mut app = open_app()?;
            match app.refresh()? {
                Some(summary) => println!(
                    "imported {}, skipped {}, updated {}, deleted {}",
                    summary.import.imported,
                    summary.import.skipped,
                    summary.drift.updated,
                    summary.drift.deleted
                ),
                None => println!("a refresh pass is already running"),
            }
        }
        SyncAction::Push => {
            let mut app = open_app()?;
            let meetings = app.meetings().list()?;
            let mut pushed = 0;
            for meeting in &meetings {
                if app.save_meeting(meeting)?.id > 0 {
                    pushed += 1;
                }
            }
            println!("pushed {pushed} of {} meetings", meetings.len());
        }
        SyncAction::Import => {
            let mut app = open_app()?;
            if let Some(summary) = app.refresh_import()? {
                println!("imported {}, skipped {}", summary.imported, summary.skipped);
            } else {
                println!("a refresh pass is already running");
            }
        }
        SyncAction::Drift => {
            let mut app = open_app()?;
            if let Some(summary) = app.refresh_drift()? {
                println!("updated {}, deleted {}", summary.updated, summary.deleted);
            } else {
                println!("a refresh pass is already running");
            }
        }
        SyncAction::Status => {
            let app = open_app()?;
            let meetings = app.meetings().list()?;
            let exported = meetings
                .iter()
                .filter(|m| m.calendar_event_id.is_some())
                .count();
            let imported = meetings
                .iter()
                .filter(|m| m.external_event_id.is_some())
                .count();
            let permission = app.calendar().permission_status();
            println!("permission: {:?}", permission);
            if permission != PermissionStatus::Granted {
                println!("hint: run `parishsync-cli auth google login --token <token>`");
            }
            println!("meetings:  {}", meetings.len());
            println!("exported:  {exported}");
            println!("imported:  {imported}");
        }
    }
    Ok(())
}
