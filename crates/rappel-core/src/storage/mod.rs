//! Persistence: configuration, document store seams and their
//! implementations.

mod config;
pub mod database;
pub mod memory;
mod traits;

pub use config::{Config, NotificationSettings, UserConfig};
pub use database::Database;
pub use memory::MemoryStore;
pub use traits::{ContentStore, StreakStore};

use std::path::PathBuf;

/// Returns `~/.config/rappel[-dev]/` based on RAPPEL_ENV.
///
/// Set RAPPEL_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("RAPPEL_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("rappel-dev")
    } else {
        base_dir.join("rappel")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
