//! Wall-clock host backed by a tokio runtime.

use crate::error::SchedulerError;
use crate::host::{clamp_period, HostHandle, HostTask, TimerHost};
use parking_lot::{Mutex, ReentrantMutex};
use std::cell::Cell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Run gate shared by a timer's task and `cancel`: the flag is the
/// cancelled bit, and the task only runs while holding the gate with the bit
/// clear. Re-entrant so a task may cancel its own timer.
type Gate = Arc<ReentrantMutex<Cell<bool>>>;

struct Spawned {
    join: JoinHandle<()>,
    gate: Gate,
}

impl Spawned {
    /// Stop the timer; waits for a run already in progress on another thread.
    fn stop(self) {
        self.gate.lock().set(true);
        self.join.abort();
    }
}

/// Run `task` unless the timer has been cancelled; false once cancelled
fn run_gated(gate: &Gate, task: &mut HostTask) -> bool {
    let cancelled = gate.lock();
    if cancelled.get() {
        return false;
    }
    task();
    true
}

/// Tasks idle far beyond any real deadline when `now + delay` overflows.
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Spawns one tokio task per timer; cancelling aborts the task.
///
/// `cancel` never returns while the timer's task is running on another
/// thread, so nothing runs after it. Two timer tasks that cancel each other
/// from different worker threads at the same instant would wait on each
/// other.
pub struct TokioTimerHost {
    runtime: Handle,
    next_id: AtomicU64,
    tasks: Arc<Mutex<HashMap<u64, Spawned>>>,
}

impl TokioTimerHost {
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            next_id: AtomicU64::new(1),
            tasks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Bind to the runtime of the calling context
    pub fn current() -> Result<Self, SchedulerError> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|e| SchedulerError::RuntimeUnavailable(e.to_string()))
    }

    /// Number of timers that have neither finished nor been cancelled
    pub fn active(&self) -> usize {
        self.tasks.lock().len()
    }

    fn next_handle(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

impl TimerHost for TokioTimerHost {
    fn schedule_once(&self, delay: Duration, mut task: HostTask) -> HostHandle {
        let id = self.next_handle();
        let registry = Arc::downgrade(&self.tasks);
        let gate: Gate = Arc::new(ReentrantMutex::new(Cell::new(false)));
        let task_gate = Arc::clone(&gate);

        // Held across spawn so the task cannot deregister before it is recorded.
        let mut tasks = self.tasks.lock();
        let join = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if run_gated(&task_gate, &mut task) {
                if let Some(registry) = registry.upgrade() {
                    registry.lock().remove(&id);
                }
            }
        });
        tasks.insert(id, Spawned { join, gate });
        HostHandle::new(id)
    }

    fn schedule_repeating(&self, period: Duration, mut task: HostTask) -> HostHandle {
        let id = self.next_handle();
        let period = clamp_period(period);
        let gate: Gate = Arc::new(ReentrantMutex::new(Cell::new(false)));
        let task_gate = Arc::clone(&gate);

        let mut tasks = self.tasks.lock();
        let join = self.runtime.spawn(async move {
            let now = Instant::now();
            let start = now
                .checked_add(period)
                .unwrap_or_else(|| now + FAR_FUTURE);
            let mut interval = interval_at(start, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if !run_gated(&task_gate, &mut task) {
                    break;
                }
            }
        });
        tasks.insert(id, Spawned { join, gate });
        HostHandle::new(id)
    }

    fn cancel(&self, handle: HostHandle) {
        let spawned = self.tasks.lock().remove(&handle.get());
        if let Some(spawned) = spawned {
            spawned.stop();
        }
    }
}

impl Drop for TokioTimerHost {
    fn drop(&mut self) {
        let spawned: Vec<Spawned> = self.tasks.lock().drain().map(|(_, s)| s).collect();
        for timer in spawned {
            timer.stop();
        }
    }
}
