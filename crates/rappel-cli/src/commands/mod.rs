pub mod config;
pub mod content;
pub mod reminders;
pub mod streak;
