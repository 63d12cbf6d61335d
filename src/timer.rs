//! Wall-clock timers keyed by (context, callback).

mod registry;

pub use registry::TimerRegistry;

use serde::{Deserialize, Serialize};

/// Whether a timer retires after firing or keeps running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopType {
    /// Fires once, then retires
    Once,
    /// Fires on every period until cleared
    Loop,
}

impl LoopType {
    pub fn as_str(self) -> &'static str {
        match self {
            LoopType::Once => "once",
            LoopType::Loop => "loop",
        }
    }
}
