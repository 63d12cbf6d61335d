//! Offline simulation: a scheduler session over a manual clock, advanced one
//! synthetic frame at a time.

use crate::config::SchedulerConfig;
use crate::error::SchedulerError;
use crate::host::ManualClock;
use crate::identity::Callback;
use crate::scheduler::Scheduler;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FireSource {
    Wall,
    Frame,
}

impl FireSource {
    pub fn as_str(self) -> &'static str {
        match self {
            FireSource::Wall => "wall",
            FireSource::Frame => "frame",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FireEvent {
    pub at_ms: u64,
    pub source: FireSource,
    pub label: String,
}

#[derive(Debug, Clone, Default)]
pub struct SimulationPlan {
    pub frames: u32,
    pub frame_ms: u64,
    pub frame_once: Vec<u64>,
    pub frame_loop: Vec<u64>,
    pub once: Vec<u64>,
    pub every: Vec<u64>,
    pub pause_frames_after: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub frames: u32,
    pub elapsed_ms: u64,
    pub events: Vec<FireEvent>,
    pub live_timers: usize,
    pub live_frame_timers: usize,
}

/// Whole milliseconds, capped at `u64::MAX`
fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Execution context for every simulated timer
struct Recorder {
    clock: ManualClock,
    frame_ms: AtomicU64,
    events: Mutex<Vec<FireEvent>>,
}

impl Recorder {
    fn record(&self, source: FireSource, label: &str) {
        let at_ms = match source {
            FireSource::Wall => millis(self.clock.now()),
            FireSource::Frame => self.frame_ms.load(Ordering::SeqCst),
        };
        self.events.lock().push(FireEvent {
            at_ms,
            source,
            label: label.to_string(),
        });
    }
}

type Label = (FireSource, String);

fn recording_callback() -> Callback<Recorder, Label> {
    Callback::new(|recorder: &Recorder, (source, label): &Label| {
        recorder.record(*source, label)
    })
}

/// Run `plan` against a fresh session built from `config`
///
/// Each frame first advances the manual clock by `frame_ms` (firing due
/// wall-clock timers), then delivers the frame sample to the ticker.
pub fn run_simulation(
    config: SchedulerConfig,
    plan: &SimulationPlan,
) -> Result<SimulationReport, SchedulerError> {
    let (mut scheduler, clock) = Scheduler::manual(config)?;
    let recorder = Arc::new(Recorder {
        clock: clock.clone(),
        frame_ms: AtomicU64::new(0),
        events: Mutex::new(Vec::new()),
    });

    // One callback per registration: each needs its own identity.
    for &ms in &plan.frame_once {
        let cb = recording_callback();
        let label = (FireSource::Frame, format!("frame-once({})", ms));
        scheduler
            .frames()
            .frame_once(Duration::from_millis(ms), &recorder, &cb, true, label);
    }
    for &ms in &plan.frame_loop {
        let cb = recording_callback();
        let label = (FireSource::Frame, format!("frame-loop({})", ms));
        scheduler
            .frames()
            .frame_loop(Duration::from_millis(ms), &recorder, &cb, true, label);
    }
    for &ms in &plan.once {
        let cb = recording_callback();
        let label = (FireSource::Wall, format!("once({})", ms));
        scheduler
            .timers()
            .schedule_once(Duration::from_millis(ms), &recorder, &cb, true, label);
    }
    for &ms in &plan.every {
        let cb = recording_callback();
        let label = (FireSource::Wall, format!("loop({})", ms));
        scheduler
            .timers()
            .schedule_loop(Duration::from_millis(ms), &recorder, &cb, true, label);
    }

    let step = Duration::from_millis(plan.frame_ms);
    for frame in 1..=plan.frames {
        if plan.pause_frames_after == Some(frame - 1) {
            scheduler.frames().pause_all(&recorder);
        }
        clock.advance(step);
        let elapsed_ms = plan.frame_ms.saturating_mul(u64::from(frame));
        recorder.frame_ms.store(elapsed_ms, Ordering::SeqCst);
        scheduler.on_frame(Duration::from_millis(elapsed_ms));
    }

    let report = SimulationReport {
        frames: plan.frames,
        elapsed_ms: millis(clock.now()),
        events: std::mem::take(&mut *recorder.events.lock()),
        live_timers: scheduler.timers().len(),
        live_frame_timers: scheduler.frames().len(),
    };

    // The session's timers hold the recorder; release them with it.
    scheduler.clear_context(&recorder);
    info!(fires = report.events.len(), "Simulation finished");
    Ok(report)
}
