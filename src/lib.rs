//! Tickwork: Identity-Keyed Callback Timers
//!
//! Two timer registries for interactive applications, both keyed on the pair
//! (execution context, callback):
//!
//! - [`TimerRegistry`] schedules wall-clock timers on a [`host::TimerHost`].
//! - [`FrameTicker`] accumulates render-loop frame deltas and fires callbacks
//!   once their threshold is reached, with per-entry and global pause.
//!
//! A [`Scheduler`] session owns one of each, sharing a single
//! [`IdentityResolver`].

pub mod cli;
pub mod config;
pub mod error;
pub mod frame;
pub mod host;
pub mod identity;
pub mod logging;
pub mod scheduler;
pub mod table;
pub mod timer;

pub use config::SchedulerConfig;
pub use error::SchedulerError;
pub use frame::{FirstSample, FrameDriver, FrameTicker, PausedEntryPolicy};
pub use host::{ManualClock, TimerHost, TokioTimerHost};
pub use identity::{Callback, CallbackId, ContextId, IdentityResolver, TimerKey};
pub use scheduler::Scheduler;
pub use timer::{LoopType, TimerRegistry};
