//! CLI output: report rendering and error mapping.

use crate::cli::SimulationReport;
use crate::error::SchedulerError;

/// Map domain errors to a string for CLI output.
pub fn map_error(e: &SchedulerError) -> String {
    e.to_string()
}

pub fn format_report_text(report: &SimulationReport) -> String {
    let mut out = String::new();
    for event in &report.events {
        out.push_str(&format!(
            "{:>8}ms  {:<5}  {}\n",
            event.at_ms,
            event.source.as_str(),
            event.label
        ));
    }
    out.push_str(&format!(
        "{} frames, {}ms elapsed, {} fires, {} wall-clock and {} frame timers still live",
        report.frames,
        report.elapsed_ms,
        report.events.len(),
        report.live_timers,
        report.live_frame_timers
    ));
    out
}

pub fn format_report_json(report: &SimulationReport) -> Result<String, SchedulerError> {
    serde_json::to_string_pretty(report)
        .map_err(|e| SchedulerError::ConfigError(format!("Failed to render report: {}", e)))
}
