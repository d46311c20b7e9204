//! # Rappel Core Library
//!
//! Core business logic for the Rappel prayer reminder app. All
//! operations are available through a standalone CLI binary; a GUI
//! shell would be a thin layer over this same library.
//!
//! ## Architecture
//!
//! - **Notify**: turns user notification settings into a concrete set
//!   of weekly and daily scheduled notifications behind a [`Notifier`]
//!   seam
//! - **Streak**: per-user daily prayer sessions and consecutive-day
//!   streak bookkeeping
//! - **Content**: prayer formulas, verses and hadiths, with random
//!   selection per reminder feed
//! - **Storage**: SQLite-based content and streak persistence plus
//!   TOML-based configuration
//!
//! ## Key Components
//!
//! - [`ReminderScheduler`]: settings to scheduled-notification fan-out
//! - [`StreakService`]: session recording and streak advancement
//! - [`ContentProvider`]: random content resolution per feed
//! - [`Database`]: content and streak persistence
//! - [`Config`]: application configuration management

pub mod content;
pub mod error;
pub mod notify;
pub mod storage;
pub mod streak;

pub use content::{ContentProvider, Feed, Hadith, PrayerFormula, Verse};
pub use error::{ConfigError, CoreError, NotifyError, StoreError, ValidationError};
pub use notify::{
    MemoryNotifier, NotificationKind, NotificationRequest, Notifier, Permissions,
    ReminderScheduler, ScheduledNotification, Trigger,
};
pub use storage::{
    Config, ContentStore, Database, MemoryStore, NotificationSettings, StreakStore, UserConfig,
};
pub use streak::{
    PrayerSessionData, SessionOutcome, StreakData, StreakDay, StreakService, StreakStats,
};
