//! Core error types for rappel-core.
//!
//! This module defines the error hierarchy using thiserror. Every
//! operation surfaces an explicit `Result` so callers can inform the
//! user; the core itself never retries (see the concurrency notes in
//! the crate docs).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for rappel-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Document store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Notification platform errors
    #[error("Notification error: {0}")]
    Notify(#[from] NotifyError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Document store errors.
///
/// Reads and writes are reported separately: a failed read is fatal for
/// the specific call, a failed write means the whole operation failed
/// and the caller may retry it as a unit.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A collection read failed
    #[error("Read from '{collection}' failed: {message}")]
    ReadFailed { collection: String, message: String },

    /// A document write failed
    #[error("Write to '{collection}' failed: {message}")]
    WriteFailed { collection: String, message: String },
}

impl StoreError {
    /// Read failure for `collection`, keeping the backend's message.
    pub fn read(collection: &str, err: impl std::fmt::Display) -> Self {
        StoreError::ReadFailed {
            collection: collection.to_string(),
            message: err.to_string(),
        }
    }

    /// Write failure for `collection`, keeping the backend's message.
    pub fn write(collection: &str, err: impl std::fmt::Display) -> Self {
        StoreError::WriteFailed {
            collection: collection.to_string(),
            message: err.to_string(),
        }
    }
}

/// Notification platform errors.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The platform has not granted notification permission.
    ///
    /// Scheduling checks permission, it never requests it; requesting
    /// is the surrounding app's job. Never auto-retried.
    #[error("Notification permissions not granted")]
    PermissionDenied,

    /// The platform scheduler rejected a request
    #[error("Platform scheduler error: {0}")]
    Backend(String),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors for user-supplied settings.
///
/// The scheduler itself assumes validated input; callers run
/// [`crate::storage::NotificationSettings::validate`] before saving or
/// scheduling.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Invalid time window
    #[error("Invalid time window: end ({end}) is before start ({start})")]
    InvalidTimeWindow { start: String, end: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
