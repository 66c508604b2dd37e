use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "parishsync-cli", version, about = "Parishsync CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Liturgical summary for a day
    Today {
        #[command(flatten)]
        args: commands::today::TodayArgs,
    },
    /// Calendar queries (events, season, tone, fasting)
    Calendar {
        #[command(subcommand)]
        action: commands::calendar::CalendarAction,
    },
    /// Meeting management
    Meeting {
        #[command(subcommand)]
        action: commands::meeting::MeetingAction,
    },
    /// Parish settings management
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Calendar synchronization
    Sync {
        #[command(subcommand)]
        action: commands::sync::SyncAction,
    },
    /// Authentication management for calendar backends
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// Generate shell completions
    Completions {
        #[command(flatten)]
        args: commands::completions::CompletionsArgs,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Today { args } => commands::today::run(args),
        Commands::Calendar { action } => commands::calendar::run(action),
        Commands::Meeting { action } => commands::meeting::run(action),
        Commands::Settings { action } => commands::settings::run(action),
        Commands::Sync { action } => commands::sync::run(action),
        Commands::Auth { action } => commands::auth::run(action),
        Commands::Completions { args } => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
