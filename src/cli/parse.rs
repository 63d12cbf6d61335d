//! CLI parse: clap types for tickwork. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tickwork CLI - identity-keyed wall-clock and frame timers
#[derive(Parser)]
#[command(name = "tickwork")]
#[command(about = "Identity-keyed wall-clock and frame-driven callback timers")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Drive a scheduler session with synthetic frames and report every fire
    Simulate {
        /// Number of frames to render
        #[arg(long, default_value = "60")]
        frames: u32,
        /// Milliseconds per frame; wall-clock time advances by the same amount
        #[arg(long, default_value = "16")]
        frame_ms: u64,
        /// Frame-driven one-shot timers (threshold in ms, repeatable)
        #[arg(long = "frame-once", value_name = "MS")]
        frame_once: Vec<u64>,
        /// Frame-driven looping timers (threshold in ms, repeatable)
        #[arg(long = "frame-loop", value_name = "MS")]
        frame_loop: Vec<u64>,
        /// Wall-clock one-shot timers (delay in ms, repeatable)
        #[arg(long = "once", value_name = "MS")]
        once: Vec<u64>,
        /// Wall-clock looping timers (period in ms, repeatable)
        #[arg(long = "loop", value_name = "MS")]
        every: Vec<u64>,
        /// Pause frame timers once this many frames have rendered
        #[arg(long)]
        pause_frames_after: Option<u32>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print the effective configuration as JSON
    Config,
}
