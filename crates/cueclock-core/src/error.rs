//! Core error types for cueclock-core.
//!
//! Each subsystem has its own error enum; `CoreError` aggregates them for
//! callers that cross subsystem boundaries. Rejected `start()` calls are the
//! only errors a countdown caller ever sees -- everything else is caught and
//! logged at the boundary where it occurs.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for cueclock-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Countdown state machine errors
    #[error("Countdown error: {0}")]
    Countdown(#[from] CountdownError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// External trigger bridge errors
    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),

    /// Notification sink errors
    #[error("Notification error: {0}")]
    Notification(#[from] NotificationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from the countdown controller.
///
/// These are the only failures surfaced to a caller; a run that is underway
/// is never aborted by an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CountdownError {
    /// `start()` was called with a zero-length run.
    #[error("invalid run config: total duration must be at least 1 second (got {total_seconds})")]
    InvalidConfig { total_seconds: u32 },

    /// `start()` or a selection mutation was attempted while a run is active.
    #[error("a countdown is already running")]
    AlreadyRunning,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Errors from the external trigger bridge.
///
/// Never fatal to the countdown: the bridge logs these and retries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// The push channel could not be opened or has dropped.
    #[error("trigger channel unavailable: {0}")]
    ChannelUnavailable(String),

    /// The consuming side has gone away; the bridge shuts down.
    #[error("trigger channel closed")]
    Closed,
}

/// Errors from a notification sink implementation.
///
/// Playback is fire-and-forget: the controller logs these and carries on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotificationError {
    /// The sink could not start playback for the named target.
    #[error("playback failed for '{target}': {message}")]
    Playback { target: String, message: String },

    /// The sink is not available at all (no audio device, closed surface).
    #[error("notification sink unavailable: {0}")]
    Unavailable(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
