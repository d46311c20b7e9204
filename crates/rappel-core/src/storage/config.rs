//! TOML-based application configuration.
//!
//! Stores the local user id and the notification preferences driving
//! the reminder scheduler. Persisted at `~/.config/rappel/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::{ConfigError, ValidationError};

/// Notification preferences, the scheduler's sole input.
///
/// When `enable_reminders` is false every other field is ignored and
/// scheduling clears any existing notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationSettings {
    /// Master switch. The only way to silence reminders.
    #[serde(default = "default_true")]
    pub enable_reminders: bool,
    /// Whether scheduled notifications play a sound.
    #[serde(default = "default_true")]
    pub sound: bool,
    /// Daily streak nudge at 08:00, independent of the time window.
    #[serde(default = "default_true")]
    pub morning_reminder: bool,
    /// Daily streak nudge at 21:00, independent of the time window.
    #[serde(default = "default_true")]
    pub evening_reminder: bool,
    /// Gates the second, deceased-prayer notification stream.
    #[serde(default)]
    pub enable_deceased_reminder: bool,
    /// Prayer reminders per enabled day, 1..=10.
    #[serde(default = "default_daily_count")]
    pub daily_count: u32,
    /// Window start, "HH:MM".
    #[serde(default = "default_start_time")]
    pub start_time: String,
    /// Window end, "HH:MM", inclusive.
    #[serde(default = "default_end_time")]
    pub end_time: String,
    /// User-facing feed label routed to a content family.
    #[serde(default = "default_feed")]
    pub selected_feed: String,
    /// Index 0 = Sunday .. index 6 = Saturday.
    #[serde(default = "default_days")]
    pub selected_days: [bool; 7],
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enable_reminders: true,
            sound: true,
            morning_reminder: true,
            evening_reminder: true,
            enable_deceased_reminder: false,
            daily_count: default_daily_count(),
            start_time: default_start_time(),
            end_time: default_end_time(),
            selected_feed: default_feed(),
            selected_days: default_days(),
        }
    }
}

impl NotificationSettings {
    /// Validate user-entered values before saving or scheduling.
    ///
    /// The scheduler assumes validated input; it never re-checks.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=10).contains(&self.daily_count) {
            return Err(ValidationError::InvalidValue {
                field: "daily_count".to_string(),
                message: format!("{} is outside 1..=10", self.daily_count),
            });
        }
        let start = parse_strict(&self.start_time).ok_or_else(|| {
            ValidationError::InvalidValue {
                field: "start_time".to_string(),
                message: format!("'{}' is not HH:MM", self.start_time),
            }
        })?;
        let end = parse_strict(&self.end_time).ok_or_else(|| {
            ValidationError::InvalidValue {
                field: "end_time".to_string(),
                message: format!("'{}' is not HH:MM", self.end_time),
            }
        })?;
        if end < start {
            return Err(ValidationError::InvalidTimeWindow {
                start: self.start_time.clone(),
                end: self.end_time.clone(),
            });
        }
        Ok(())
    }
}

/// Strict "HH:MM" parse as minutes since midnight.
fn parse_strict(value: &str) -> Option<u32> {
    let (hour, minute) = value.split_once(':')?;
    let hour: u32 = hour.parse().ok()?;
    let minute: u32 = minute.parse().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some(hour * 60 + minute)
}

/// Local user identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserConfig {
    /// Store user id, set after the surrounding app authenticates.
    #[serde(default)]
    pub id: Option<String>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/rappel/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub user: UserConfig,
    #[serde(default)]
    pub notifications: NotificationSettings,
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/rappel"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load the configuration, falling back to defaults when the file
    /// does not exist yet.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    /// Load from an explicit path.
    pub fn load_from(path: &PathBuf) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Save the configuration.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        self.save_to(&path)
    }

    /// Save to an explicit path.
    pub fn save_to(&self, path: &PathBuf) -> Result<(), ConfigError> {
        let raw = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(path, raw).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })
    }
}

fn default_true() -> bool {
    true
}

fn default_daily_count() -> u32 {
    3
}

fn default_start_time() -> String {
    "09:00".to_string()
}

fn default_end_time() -> String {
    "22:00".to_string()
}

fn default_feed() -> String {
    "Feed actuel".to_string()
}

fn default_days() -> [bool; 7] {
    [true; 7]
}
