//! Notification scheduling: platform seam, reminder scheduler and
//! fallback messages.
//!
//! The platform's own notification store is the single source of truth
//! for what is scheduled; this crate keeps no parallel ledger of
//! notification ids.

pub mod memory;
pub mod messages;
mod scheduler;
mod traits;

pub use memory::MemoryNotifier;
pub use scheduler::{compute_slots, parse_time_or, trigger_weekday, ReminderScheduler};
pub use traits::Notifier;

use serde::{Deserialize, Serialize};

use crate::content::Feed;

/// Platform permission snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    pub granted: bool,
    pub can_ask_again: bool,
    pub status: String,
}

impl Permissions {
    pub fn granted() -> Self {
        Self {
            granted: true,
            can_ask_again: true,
            status: "granted".to_string(),
        }
    }

    pub fn denied() -> Self {
        Self {
            granted: false,
            can_ask_again: false,
            status: "denied".to_string(),
        }
    }
}

/// Category tag carried in the notification payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    PrayerReminder,
    DeceasedPrayer,
    MorningStreak,
    EveningStreak,
    Test,
}

/// Display payload for one notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
    pub kind: NotificationKind,
    /// Feed the body was resolved from, for prayer reminders.
    pub feed: Option<Feed>,
    pub sound: bool,
}

/// When the platform should deliver a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Trigger {
    /// Recurs every week. Weekday is ISO numbered, Monday = 1 through
    /// Sunday = 7; a backend for a platform that numbers differently
    /// re-maps in its `schedule` implementation.
    Weekly { weekday: u8, hour: u8, minute: u8 },
    /// Recurs every day.
    Daily { hour: u8, minute: u8 },
    /// Fires once, after a delay.
    AfterSeconds { seconds: u64 },
}

/// A notification handed to the platform scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub content: NotificationContent,
    pub trigger: Trigger,
}

/// A notification the platform reports as scheduled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledNotification {
    pub id: String,
    pub content: NotificationContent,
    pub trigger: Trigger,
}
