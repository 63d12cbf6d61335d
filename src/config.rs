//! Configuration System
//!
//! Scheduler settings loaded through the `config` crate: merge-policy
//! defaults, then an optional TOML file, then `TICKWORK__*` environment
//! overrides (e.g. `TICKWORK__FRAME__PAUSED_ENTRY_POLICY=halt_tick`).

use crate::error::SchedulerError;
use crate::frame::{FirstSample, PausedEntryPolicy};
use crate::identity::DEFAULT_PRUNE_THRESHOLD;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

mod loader;
mod merge_policy;

pub use loader::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Frame ticker behavior
    #[serde(default)]
    pub frame: FrameConfig,

    /// Context identity side table
    #[serde(default)]
    pub identity: IdentityConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Frame ticker and render-loop driver settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameConfig {
    /// What a tick does when it meets a paused entry
    #[serde(default)]
    pub paused_entry_policy: PausedEntryPolicy,

    /// How the first render-loop sample becomes a delta
    #[serde(default)]
    pub first_sample: FirstSample,

    /// Start the frame driver when the session is created
    #[serde(default = "default_true")]
    pub autostart: bool,
}

fn default_true() -> bool {
    true
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            paused_entry_policy: PausedEntryPolicy::default(),
            first_sample: FirstSample::default(),
            autostart: default_true(),
        }
    }
}

/// Identity resolver settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Tag count at which released contexts are swept from the side table
    #[serde(default = "default_prune_threshold")]
    pub prune_threshold: usize,
}

fn default_prune_threshold() -> usize {
    DEFAULT_PRUNE_THRESHOLD
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            prune_threshold: default_prune_threshold(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Identity(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Identity(msg) => write!(f, "Identity: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];
const LOG_FORMATS: &[&str] = &["text", "json"];
const LOG_OUTPUTS: &[&str] = &["stdout", "stderr", "file"];

impl SchedulerConfig {
    /// Validate the entire configuration, collecting every problem
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.identity.prune_threshold == 0 {
            errors.push(ValidationError::Identity(
                "prune_threshold must be at least 1".to_string(),
            ));
        }

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError::Logging(format!(
                "Invalid level '{}' (must be one of {})",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            errors.push(ValidationError::Logging(format!(
                "Invalid format '{}' (must be 'json' or 'text')",
                self.logging.format
            )));
        }
        if !LOG_OUTPUTS.contains(&self.logging.output.as_str()) {
            errors.push(ValidationError::Logging(format!(
                "Invalid output '{}' (must be 'stdout', 'stderr' or 'file')",
                self.logging.output
            )));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate, folding all problems into one error
    pub fn ensure_valid(&self) -> Result<(), SchedulerError> {
        self.validate().map_err(|errors| {
            let msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            SchedulerError::ValidationFailed(msgs.join("\n"))
        })
    }
}
