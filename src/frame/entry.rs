//! Per-registration frame timer state.

use crate::timer::LoopType;
use std::sync::Arc;
use std::time::Duration;

/// Callback already bound to its context and arguments
pub(crate) type BoundCallback = Arc<dyn Fn() + Send + Sync>;

pub(crate) struct FrameEntry {
    pub(crate) fire: BoundCallback,
    pub(crate) loop_type: LoopType,
    pub(crate) paused: bool,
    pub(crate) elapsed: Duration,
    pub(crate) delay: Duration,
}

impl FrameEntry {
    pub(crate) fn new(fire: BoundCallback, loop_type: LoopType, delay: Duration) -> Self {
        Self {
            fire,
            loop_type,
            paused: false,
            elapsed: Duration::ZERO,
            delay,
        }
    }

    /// Accumulate `delta`; true once the delay has been reached
    pub(crate) fn advance(&mut self, delta: Duration) -> bool {
        self.elapsed = self.elapsed.saturating_add(delta);
        self.elapsed >= self.delay
    }

    pub(crate) fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}
