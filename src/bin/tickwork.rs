//! Tickwork CLI Binary
//!
//! Drives a scheduler session offline and prints what fired.

use clap::Parser;
use std::process;
use tickwork::cli::{Cli, Commands, SimulationPlan};
use tickwork::config::{ConfigLoader, SchedulerConfig};
use tickwork::error::SchedulerError;
use tickwork::logging::{init_logging, LoggingConfig};
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    let config = match ConfigLoader::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", tickwork::cli::map_error(&SchedulerError::from(e)));
            process::exit(1);
        }
    };

    let logging_config = build_logging_config(&cli, &config);
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("Tickwork CLI starting");

    match execute(&cli.command, config) {
        Ok(output) => {
            info!("Command completed successfully");
            println!("{}", output);
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", tickwork::cli::map_error(&e));
            process::exit(1);
        }
    }
}

fn execute(command: &Commands, config: SchedulerConfig) -> Result<String, SchedulerError> {
    match command {
        Commands::Simulate {
            frames,
            frame_ms,
            frame_once,
            frame_loop,
            once,
            every,
            pause_frames_after,
            format,
        } => {
            let plan = SimulationPlan {
                frames: *frames,
                frame_ms: *frame_ms,
                frame_once: frame_once.clone(),
                frame_loop: frame_loop.clone(),
                once: once.clone(),
                every: every.clone(),
                pause_frames_after: *pause_frames_after,
            };
            let report = tickwork::cli::run_simulation(config, &plan)?;
            match format.as_str() {
                "json" => tickwork::cli::format_report_json(&report),
                "text" => Ok(tickwork::cli::format_report_text(&report)),
                other => Err(SchedulerError::ConfigError(format!(
                    "Unknown output format '{}' (must be 'text' or 'json')",
                    other
                ))),
            }
        }
        Commands::Config => {
            config.ensure_valid()?;
            serde_json::to_string_pretty(&config)
                .map_err(|e| SchedulerError::ConfigError(e.to_string()))
        }
    }
}

/// Build logging configuration from CLI args over the loaded config file.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli, config: &SchedulerConfig) -> LoggingConfig {
    let mut logging = config.logging.clone();

    if cli.verbose {
        logging.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        logging.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        logging.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        logging.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        logging.file = file.clone();
    }

    logging
}
