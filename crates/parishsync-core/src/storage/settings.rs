//! TOML-based parish settings.
//!
//! A singleton record created at onboarding and mutated from the
//! settings screen; stored at `~/.config/parishsync/settings.toml`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::ConfigError;

fn default_sunday_liturgy_time() -> String {
    "09:00".to_string()
}

/// Parish configuration consumed by the conflict detector and the
/// calendar screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParishSettings {
    #[serde(default)]
    pub parish_name: String,
    /// "HH:mm"; also the window start for great and major feasts.
    #[serde(default = "default_sunday_liturgy_time")]
    pub sunday_liturgy_time: String,
    /// "HH:mm", optional.
    #[serde(default)]
    pub saturday_vespers_time: Option<String>,
    /// "HH:mm"; lesser observances fall back to the Sunday time when
    /// this is unset.
    #[serde(default)]
    pub weekday_liturgy_time: Option<String>,
    /// Display dates on the Julian ("old") calendar as well.
    #[serde(default)]
    pub julian_calendar_enabled: bool,
}

impl Default for ParishSettings {
    fn default() -> Self {
        Self {
            parish_name: String::new(),
            sunday_liturgy_time: default_sunday_liturgy_time(),
            saturday_vespers_time: None,
            weekday_liturgy_time: None,
            julian_calendar_enabled: false,
        }
    }
}

impl ParishSettings {
    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/parishsync"),
            message: e.to_string(),
        })?;
        Ok(dir.join("settings.toml"))
    }

    /// Load from disk.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed. A missing
    /// file is reported as `LoadFailed`; callers that tolerate an
    /// un-onboarded state use [`ParishSettings::load_or_default`].
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::LoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Load from disk, falling back to defaults for a fresh install.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Read one value by key, rendered as a string.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "parish_name" => Some(self.parish_name.clone()),
            "sunday_liturgy_time" => Some(self.sunday_liturgy_time.clone()),
            "saturday_vespers_time" => Some(self.saturday_vespers_time.clone().unwrap_or_default()),
            "weekday_liturgy_time" => Some(self.weekday_liturgy_time.clone().unwrap_or_default()),
            "julian_calendar_enabled" => Some(self.julian_calendar_enabled.to_string()),
            _ => None,
        }
    }

    /// Set one value by key. Time-valued keys must be zero-padded
    /// "HH:mm"; an empty string clears the optional ones.
    ///
    /// # Errors
    /// Returns `InvalidValue` for unknown keys or malformed values.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "parish_name" => self.parish_name = value.to_string(),
            "sunday_liturgy_time" => {
                validate_time_value(key, value)?;
                self.sunday_liturgy_time = value.to_string();
            }
            "saturday_vespers_time" => {
                self.saturday_vespers_time = parse_optional_time(key, value)?;
            }
            "weekday_liturgy_time" => {
                self.weekday_liturgy_time = parse_optional_time(key, value)?;
            }
            "julian_calendar_enabled" => {
                self.julian_calendar_enabled =
                    value.parse().map_err(|_| ConfigError::InvalidValue {
                        key: key.to_string(),
                        message: format!("expected true or false, got '{value}'"),
                    })?;
            }
            _ => {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: "unknown key".to_string(),
                })
            }
        }
        Ok(())
    }

    /// Persist to disk.
    ///
    /// # Errors
    /// Returns an error if the settings cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }
}

fn validate_time_value(key: &str, value: &str) -> Result<(), ConfigError> {
    let well_formed = value.len() == 5
        && value.as_bytes()[2] == b':'
        && crate::meeting::parse_hhmm(value).is_some();
    if well_formed {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected zero-padded HH:mm, got '{value}'"),
        })
    }
}

fn parse_optional_time(key: &str, value: &str) -> Result<Option<String>, ConfigError> {
    if value.is_empty() {
        return Ok(None);
    }
    validate_time_value(key, value)?;
    Ok(Some(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_round_trip() {
        let settings = ParishSettings {
            parish_name: "Holy Trinity".to_string(),
            sunday_liturgy_time: "09:30".to_string(),
            saturday_vespers_time: Some("18:00".to_string()),
            weekday_liturgy_time: None,
            julian_calendar_enabled: true,
        };

        let toml_str = toml::to_string_pretty(&settings).unwrap();
        let parsed: ParishSettings = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn keyed_get_and_set() {
        let mut settings = ParishSettings::default();
        settings.set("parish_name", "St. George").unwrap();
        settings.set("sunday_liturgy_time", "10:00").unwrap();
        settings.set("weekday_liturgy_time", "08:00").unwrap();
        settings.set("julian_calendar_enabled", "true").unwrap();

        assert_eq!(settings.get("parish_name").as_deref(), Some("St. George"));
        assert_eq!(settings.get("sunday_liturgy_time").as_deref(), Some("10:00"));
        assert_eq!(settings.get("julian_calendar_enabled").as_deref(), Some("true"));
        assert!(settings.get("no_such_key").is_none());

        // Empty string clears an optional time.
        settings.set("weekday_liturgy_time", "").unwrap();
        assert!(settings.weekday_liturgy_time.is_none());
    }

    #[test]
    fn set_rejects_bad_values() {
        let mut settings = ParishSettings::default();
        assert!(settings.set("sunday_liturgy_time", "9:00").is_err());
        assert!(settings.set("sunday_liturgy_time", "25:00").is_err());
        assert!(settings.set("julian_calendar_enabled", "maybe").is_err());
        assert!(settings.set("no_such_key", "x").is_err());
    }

    #[test]
    fn missing_fields_take_defaults() {
        let parsed: ParishSettings = toml::from_str("parish_name = \"St. George\"").unwrap();
        assert_eq!(parsed.sunday_liturgy_time, "09:00");
        assert!(parsed.weekday_liturgy_time.is_none());
        assert!(!parsed.julian_calendar_enabled);
    }
}
