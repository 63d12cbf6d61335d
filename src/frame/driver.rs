//! Render-loop subscription feeding a [`FrameTicker`].
//!
//! The host render loop reports monotonically increasing elapsed-time samples
//! through [`FrameDriver::sample`]; the driver turns them into per-frame
//! deltas. One driver serves one ticker for the life of its session.

use crate::frame::{FirstSample, FrameTicker};
use std::time::Duration;
use tracing::{debug, trace};

pub struct FrameDriver {
    ticker: FrameTicker,
    first_sample: FirstSample,
    running: bool,
    /// Previous elapsed-total sample; `None` until a baseline exists
    stamp: Option<Duration>,
}

impl FrameDriver {
    /// Attach a driver to `ticker`; it delivers nothing until started
    pub fn new(ticker: FrameTicker, first_sample: FirstSample) -> Self {
        Self {
            ticker,
            first_sample,
            running: false,
            stamp: None,
        }
    }

    /// Begin delivering samples and un-pause the ticker
    pub fn start(&mut self) {
        self.stamp = match self.first_sample {
            FirstSample::Elapsed => Some(Duration::ZERO),
            FirstSample::Zero => None,
        };
        self.running = true;
        self.ticker.set_paused(false);
        debug!(first_sample = ?self.first_sample, "Frame driver started");
    }

    /// Stop delivering samples; the ticker keeps its state
    pub fn stop(&mut self) {
        self.running = false;
        debug!("Frame driver stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Feed one render-loop sample of total elapsed time
    ///
    /// Returns the delta handed to the ticker, or `None` while stopped. A
    /// sample older than the previous one yields a zero delta.
    pub fn sample(&mut self, elapsed_total: Duration) -> Option<Duration> {
        if !self.running {
            return None;
        }
        let delta = match self.stamp {
            Some(previous) => elapsed_total.saturating_sub(previous),
            None => Duration::ZERO,
        };
        self.stamp = Some(elapsed_total);

        let fired = self.ticker.tick(delta);
        trace!(delta_us = delta.as_micros() as u64, fired, "Frame sample");
        Some(delta)
    }

    pub fn ticker(&self) -> &FrameTicker {
        &self.ticker
    }
}
