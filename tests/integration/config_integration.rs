//! Integration tests for configuration loading

use std::sync::Mutex;
use tempfile::TempDir;
use tickwork::config::ConfigLoader;
use tickwork::{FirstSample, PausedEntryPolicy, Scheduler};

/// Environment overrides are process-wide; serialize the tests that read them.
static ENV_LOCK: Mutex<()> = Mutex::new(());

#[test]
fn test_load_without_file_uses_defaults() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let config = ConfigLoader::load(None).unwrap();
    assert_eq!(config.frame.paused_entry_policy, PausedEntryPolicy::SkipEntry);
    assert_eq!(config.frame.first_sample, FirstSample::Elapsed);
    assert!(config.frame.autostart);
    assert_eq!(config.logging.output, "stderr");
    assert!(config.validate().is_ok());
}

#[test]
fn test_load_from_toml_file() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("tickwork.toml");

    std::fs::write(
        &config_file,
        r#"
[frame]
paused_entry_policy = "halt_tick"
first_sample = "zero"
autostart = false

[identity]
prune_threshold = 64

[logging]
level = "debug"
format = "json"

[logging.modules]
tickwork = "trace"
"#,
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&config_file).unwrap();
    assert_eq!(config.frame.paused_entry_policy, PausedEntryPolicy::HaltTick);
    assert_eq!(config.frame.first_sample, FirstSample::Zero);
    assert!(!config.frame.autostart);
    assert_eq!(config.identity.prune_threshold, 64);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, "json");
    assert_eq!(
        config.logging.modules.get("tickwork"),
        Some(&"trace".to_string())
    );

    let (scheduler, _clock) = Scheduler::manual(config).unwrap();
    assert!(!scheduler.frames_running());
    assert_eq!(scheduler.frames().policy(), PausedEntryPolicy::HaltTick);
}

#[test]
fn test_partial_file_keeps_defaults() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("tickwork.toml");
    std::fs::write(&config_file, "[identity]\nprune_threshold = 8\n").unwrap();

    let config = ConfigLoader::load_from_file(&config_file).unwrap();
    assert_eq!(config.identity.prune_threshold, 8);
    assert_eq!(config.frame.paused_entry_policy, PausedEntryPolicy::SkipEntry);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_environment_overrides_file() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("tickwork.toml");
    std::fs::write(
        &config_file,
        "[frame]\npaused_entry_policy = \"skip_entry\"\n",
    )
    .unwrap();

    std::env::set_var("TICKWORK__FRAME__PAUSED_ENTRY_POLICY", "halt_tick");
    let result = ConfigLoader::load_from_file(&config_file);
    std::env::remove_var("TICKWORK__FRAME__PAUSED_ENTRY_POLICY");

    let config = result.unwrap();
    assert_eq!(config.frame.paused_entry_policy, PausedEntryPolicy::HaltTick);
}

#[test]
fn test_missing_file_is_error() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("absent.toml");
    assert!(ConfigLoader::load_from_file(&missing).is_err());
}

#[test]
fn test_unknown_policy_is_error() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("tickwork.toml");
    std::fs::write(&config_file, "[frame]\npaused_entry_policy = \"sometimes\"\n").unwrap();
    assert!(ConfigLoader::load_from_file(&config_file).is_err());
}

#[test]
fn test_invalid_values_fail_validation() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("tickwork.toml");
    std::fs::write(
        &config_file,
        "[identity]\nprune_threshold = 0\n\n[logging]\noutput = \"syslog\"\n",
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&config_file).unwrap();
    assert_eq!(config.validate().unwrap_err().len(), 2);
    assert!(Scheduler::manual(config).is_err());
}
