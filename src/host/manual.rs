//! Virtual-time host driven explicitly by the caller.
//!
//! Useful for deterministic tests, replays and offline simulation: nothing
//! fires until [`ManualClock::advance`] moves time forward.

use crate::host::{clamp_period, HostHandle, HostTask, TimerHost};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

/// Deadline of a timer whose due time saturated past representable time
const NEVER: Duration = Duration::MAX;

struct Scheduled {
    /// [`NEVER`] once the deadline no longer fits
    deadline: Duration,
    period: Option<Duration>,
    /// `None` while the task is running
    task: Option<HostTask>,
}

struct ClockState {
    now: Duration,
    next_id: u64,
    timers: HashMap<u64, Scheduled>,
}

/// Host timer facility over a manually advanced clock
///
/// Clones share the same clock.
#[derive(Clone)]
pub struct ManualClock {
    state: Arc<Mutex<ClockState>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ClockState {
                now: Duration::ZERO,
                next_id: 1,
                timers: HashMap::new(),
            })),
        }
    }

    /// Time elapsed since the clock was created
    pub fn now(&self) -> Duration {
        self.state.lock().now
    }

    /// Number of scheduled timers, including repeating ones
    pub fn pending(&self) -> usize {
        self.state.lock().timers.len()
    }

    /// Move time forward by `by`, running every task that comes due
    ///
    /// Time saturates at `Duration::MAX`; timers due beyond that never fire.
    ///
    /// Tasks run in deadline order (ties in scheduling order) with the clock
    /// set to their deadline, and outside the clock's lock, so a task may
    /// schedule or cancel timers, including itself. Returns the number of task
    /// runs.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.state.lock().now.saturating_add(by);
        let mut runs = 0;

        loop {
            let (id, mut task) = {
                let mut state = self.state.lock();
                let next = state
                    .timers
                    .iter()
                    .filter(|(_, timer)| {
                        timer.task.is_some() && timer.deadline != NEVER && timer.deadline <= target
                    })
                    .min_by_key(|(id, timer)| (timer.deadline, **id))
                    .map(|(id, timer)| (*id, timer.deadline));

                let Some((id, deadline)) = next else {
                    state.now = target;
                    break;
                };
                state.now = deadline;
                match state.timers.get_mut(&id).and_then(|timer| timer.task.take()) {
                    Some(task) => (id, task),
                    None => continue,
                }
            };

            trace!(timer = id, "Manual clock firing");
            task();
            runs += 1;

            let mut state = self.state.lock();
            let requeued = match state.timers.get_mut(&id) {
                Some(timer) => match timer.period {
                    Some(period) => {
                        timer.deadline = timer.deadline.saturating_add(period);
                        timer.task = Some(task);
                        true
                    }
                    None => false,
                },
                // Cancelled while running
                None => false,
            };
            if !requeued {
                state.timers.remove(&id);
            }
        }

        runs
    }

    fn schedule(&self, delay: Duration, period: Option<Duration>, task: HostTask) -> HostHandle {
        let mut state = self.state.lock();
        let id = state.next_id;
        state.next_id += 1;
        let deadline = state.now.saturating_add(delay);
        state.timers.insert(
            id,
            Scheduled {
                deadline,
                period,
                task: Some(task),
            },
        );
        HostHandle::new(id)
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerHost for ManualClock {
    fn schedule_once(&self, delay: Duration, task: HostTask) -> HostHandle {
        self.schedule(delay, None, task)
    }

    fn schedule_repeating(&self, period: Duration, task: HostTask) -> HostHandle {
        let period = clamp_period(period);
        self.schedule(period, Some(period), task)
    }

    fn cancel(&self, handle: HostHandle) {
        self.state.lock().timers.remove(&handle.get());
    }
}
