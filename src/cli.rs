//! CLI domain: parse, simulate and output only.
//! The simulation drives a real scheduler session over a manual clock.

mod output;
mod parse;
mod simulate;

pub use output::{format_report_json, format_report_text, map_error};
pub use parse::{Cli, Commands};
pub use simulate::{run_simulation, FireEvent, FireSource, SimulationPlan, SimulationReport};
