//! Layered configuration loading.

use crate::config::merge_policy;
use crate::config::SchedulerConfig;
use config::{ConfigError, Environment, File};
use std::path::Path;
use tracing::debug;

/// Environment prefix; nested keys use `__`, e.g. `TICKWORK__FRAME__AUTOSTART`.
pub const ENV_PREFIX: &str = "TICKWORK";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load defaults, then `path` if given, then environment overrides
    pub fn load(path: Option<&Path>) -> Result<SchedulerConfig, ConfigError> {
        let mut builder = merge_policy::builder_with_defaults()?;

        if let Some(path) = path {
            debug!(config_path = %path.display(), "Loading configuration file");
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Load a specific configuration file (plus environment overrides)
    pub fn load_from_file(path: &Path) -> Result<SchedulerConfig, ConfigError> {
        Self::load(Some(path))
    }
}
