//! Merge rules: defaults applied beneath every other source.

use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("frame.paused_entry_policy", "skip_entry")?
        .set_default("frame.first_sample", "elapsed")?
        .set_default("frame.autostart", true)?
        .set_default(
            "identity.prune_threshold",
            crate::identity::DEFAULT_PRUNE_THRESHOLD as u64,
        )?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "text")?
        .set_default("logging.output", "stderr")
}
