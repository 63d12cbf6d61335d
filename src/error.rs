//! Error types for the tickwork scheduler.
//!
//! Registry operations themselves never fail: clearing or pausing something
//! that is not registered is a silent no-op. Errors only surface from the
//! ambient layers (configuration, logging, host runtime discovery).

use thiserror::Error;

/// Scheduler-level errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid configuration:\n{0}")]
    ValidationFailed(String),

    #[error("Logging initialization failed: {0}")]
    LoggingError(String),

    #[error("No async runtime available for wall-clock timers: {0}")]
    RuntimeUnavailable(String),
}

impl From<config::ConfigError> for SchedulerError {
    fn from(err: config::ConfigError) -> Self {
        SchedulerError::ConfigError(err.to_string())
    }
}
