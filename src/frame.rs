//! Frame-driven timers.
//!
//! Instead of a host clock, entries accumulate the per-frame deltas fed in by
//! the render loop and fire once their accumulated time reaches their delay.
//! Nothing advances while frames stop arriving.

mod driver;
mod entry;
mod ticker;

pub use driver::FrameDriver;
pub use ticker::FrameTicker;

use serde::{Deserialize, Serialize};

/// What a tick does when it meets a paused entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PausedEntryPolicy {
    /// Leave the paused entry alone and keep walking
    #[default]
    SkipEntry,
    /// Stop the whole tick at the first paused entry
    HaltTick,
}

/// How the first render-loop sample after `start` is turned into a delta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirstSample {
    /// Baseline is zero, so the first delta is the sample itself
    #[default]
    Elapsed,
    /// The first sample only establishes the baseline
    Zero,
}
