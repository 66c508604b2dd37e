use clap::Subcommand;
use parishsync_core::ParishSettings;

use super::CliResult;

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Get a settings value
    Get {
        /// Settings key (e.g. "parish_name", "sunday_liturgy_time")
        key: String,
    },
    /// Set a settings value
    Set {
        /// Settings key
        key: String,
        /// New value (empty string clears the optional times)
        value: String,
    },
    /// List all settings
    List,
    /// Reset settings to defaults
    Reset,
}

pub fn run(action: SettingsAction) -> CliResult {
    match action {
        SettingsAction::Get { key } => {
            let settings = ParishSettings::load_or_default();
            match settings.get(&key) {
                Some(value) => println!("{value}"),
                None => {
                    eprintln!("unknown key: {key}");
                    std::process::exit(1);
                }
            }
        }
        SettingsAction::Set { key, value } => {
            let mut settings = ParishSettings::load_or_default();
            settings.set(&key, &value)?;
            settings.save()?;
            println!("ok");
        }
        SettingsAction::List => {
            let settings = ParishSettings::load_or_default();
            let json = serde_json::to_string_pretty(&settings)?;
            println!("{json}");
        }
        SettingsAction::Reset => {
            let settings = ParishSettings::default();
            settings.save()?;
            println!("settings reset to defaults");
        }
    }
    Ok(())
}
