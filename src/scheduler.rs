//! Scheduler session: one wall-clock registry and one frame ticker sharing
//! an identity resolver, owned by the application instead of living in
//! process-wide singletons.

use crate::config::SchedulerConfig;
use crate::error::SchedulerError;
use crate::frame::{FrameDriver, FrameTicker};
use crate::host::{ManualClock, TimerHost, TokioTimerHost};
use crate::identity::IdentityResolver;
use crate::timer::TimerRegistry;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub struct Scheduler {
    config: SchedulerConfig,
    resolver: IdentityResolver,
    timers: TimerRegistry,
    frames: FrameTicker,
    driver: FrameDriver,
}

impl Scheduler {
    /// Build a session over `host`
    ///
    /// The frame driver is started immediately when `frame.autostart` is set.
    pub fn new(config: SchedulerConfig, host: Arc<dyn TimerHost>) -> Result<Self, SchedulerError> {
        config.ensure_valid()?;

        let resolver = IdentityResolver::with_prune_threshold(config.identity.prune_threshold);
        let timers = TimerRegistry::with_resolver(host, resolver.clone());
        let frames = FrameTicker::with_resolver(resolver.clone(), config.frame.paused_entry_policy);
        let mut driver = FrameDriver::new(frames.clone(), config.frame.first_sample);
        if config.frame.autostart {
            driver.start();
        }

        info!(
            paused_entry_policy = ?config.frame.paused_entry_policy,
            first_sample = ?config.frame.first_sample,
            autostart = config.frame.autostart,
            "Scheduler session created"
        );

        Ok(Self {
            config,
            resolver,
            timers,
            frames,
            driver,
        })
    }

    /// Build a session over a fresh [`ManualClock`], returning both
    pub fn manual(config: SchedulerConfig) -> Result<(Self, ManualClock), SchedulerError> {
        let clock = ManualClock::new();
        let scheduler = Self::new(config, Arc::new(clock.clone()))?;
        Ok((scheduler, clock))
    }

    /// Build a session whose wall-clock timers run on the current tokio runtime
    pub fn with_tokio(config: SchedulerConfig) -> Result<Self, SchedulerError> {
        let host = TokioTimerHost::current()?;
        Self::new(config, Arc::new(host))
    }

    pub fn timers(&self) -> &TimerRegistry {
        &self.timers
    }

    pub fn frames(&self) -> &FrameTicker {
        &self.frames
    }

    pub fn resolver(&self) -> &IdentityResolver {
        &self.resolver
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Start (or restart) the render-loop subscription
    pub fn start_frames(&mut self) {
        self.driver.start();
    }

    pub fn stop_frames(&mut self) {
        self.driver.stop();
    }

    pub fn frames_running(&self) -> bool {
        self.driver.is_running()
    }

    /// Deliver one render-loop sample of total elapsed time
    pub fn on_frame(&mut self, elapsed_total: Duration) -> Option<Duration> {
        self.driver.sample(elapsed_total)
    }

    /// Drop every timer of `context` from both registries; returns how many
    pub fn clear_context<C>(&self, context: &Arc<C>) -> usize
    where
        C: Send + Sync + 'static,
    {
        self.timers.clear_all(context) + self.frames.clear_all(context)
    }
}
