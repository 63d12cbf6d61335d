//! Host timer facility: the wall-clock primitives the timer registry drives.
//!
//! The registry never keeps time itself. It hands bound tasks to a
//! [`TimerHost`] and keeps the returned handles so it can cancel them later.

use std::fmt;
use std::time::Duration;

mod manual;
mod runtime;

pub use manual::ManualClock;
pub use runtime::TokioTimerHost;

/// A bound unit of work scheduled on the host.
pub type HostTask = Box<dyn FnMut() + Send + 'static>;

/// Opaque handle to a scheduled host timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HostHandle(u64);

impl HostHandle {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for HostHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "host#{}", self.0)
    }
}

/// Wall-clock scheduling primitives
///
/// Implementations must honor cancel-before-fire: once `cancel` returns, the
/// task does not start again. Cancelling an unknown or finished handle is a
/// no-op.
///
/// `schedule_once` and `schedule_repeating` must never run the task before
/// returning, not even for a zero delay: callers may hold their own locks
/// across the call, and the task may need them.
pub trait TimerHost: Send + Sync {
    /// Run `task` once after `delay`
    fn schedule_once(&self, delay: Duration, task: HostTask) -> HostHandle;

    /// Run `task` every `period`, first after one full period
    fn schedule_repeating(&self, period: Duration, task: HostTask) -> HostHandle;

    fn cancel(&self, handle: HostHandle);
}

/// Shortest repeating period a host will honor.
pub const MIN_REPEAT_PERIOD: Duration = Duration::from_millis(1);

pub(crate) fn clamp_period(period: Duration) -> Duration {
    period.max(MIN_REPEAT_PERIOD)
}
