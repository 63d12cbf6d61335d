//! Frame ticker: keyed registry of frame-driven timers.
//!
//! Shares the (context, callback) identity and the register/clear protocol
//! of the wall-clock registry, but stores value entries that are advanced by
//! [`FrameTicker::tick`] instead of host timers.

use crate::frame::entry::{BoundCallback, FrameEntry};
use crate::frame::PausedEntryPolicy;
use crate::identity::{Callback, IdentityResolver, TimerKey};
use crate::table::TimerTable;
use crate::timer::LoopType;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

struct TickerState {
    table: TimerTable<FrameEntry>,
    /// Global pause: while set, ticks are ignored entirely
    paused: bool,
}

/// Registry of frame-driven timers
///
/// Constructed globally paused; [`FrameDriver::start`](crate::frame::FrameDriver::start)
/// un-pauses it. Clones share state, so callbacks may hold a clone and
/// register, clear or pause entries while a tick is running.
#[derive(Clone)]
pub struct FrameTicker {
    resolver: IdentityResolver,
    policy: PausedEntryPolicy,
    state: Arc<Mutex<TickerState>>,
}

impl FrameTicker {
    pub fn new() -> Self {
        Self::with_resolver(IdentityResolver::new(), PausedEntryPolicy::default())
    }

    /// Create a ticker sharing `resolver` with other components
    pub fn with_resolver(resolver: IdentityResolver, policy: PausedEntryPolicy) -> Self {
        Self {
            resolver,
            policy,
            state: Arc::new(Mutex::new(TickerState {
                table: TimerTable::new(),
                paused: true,
            })),
        }
    }

    /// Fire `callback` once after `threshold` of accumulated frame time
    pub fn frame_once<C, A>(
        &self,
        threshold: Duration,
        context: &Arc<C>,
        callback: &Callback<C, A>,
        clear_existing: bool,
        args: A,
    ) -> TimerKey
    where
        C: Send + Sync + 'static,
        A: Send + Sync + 'static,
    {
        self.register(LoopType::Once, threshold, context, callback, clear_existing, args)
    }

    /// Fire `callback` every `threshold` of accumulated frame time
    pub fn frame_loop<C, A>(
        &self,
        threshold: Duration,
        context: &Arc<C>,
        callback: &Callback<C, A>,
        clear_existing: bool,
        args: A,
    ) -> TimerKey
    where
        C: Send + Sync + 'static,
        A: Send + Sync + 'static,
    {
        self.register(LoopType::Loop, threshold, context, callback, clear_existing, args)
    }

    fn register<C, A>(
        &self,
        loop_type: LoopType,
        threshold: Duration,
        context: &Arc<C>,
        callback: &Callback<C, A>,
        clear_existing: bool,
        args: A,
    ) -> TimerKey
    where
        C: Send + Sync + 'static,
        A: Send + Sync + 'static,
    {
        let key = self.resolver.key(Some(context), callback);
        let target = Arc::clone(context);
        let callback = callback.clone();
        let fire: BoundCallback = Arc::new(move || callback.call(&target, &args));

        let mut state = self.state.lock();
        if clear_existing {
            state.table.remove(&key);
        }
        state
            .table
            .insert(key, FrameEntry::new(fire, loop_type, threshold));
        drop(state);

        debug!(
            key = %key.digest(),
            context = %key.context,
            kind = loop_type.as_str(),
            threshold_ms = threshold.as_millis() as u64,
            "Added frame timer"
        );
        key
    }

    /// Remove the entry for (context, callback), if any
    pub fn clear<C, A>(&self, context: &Arc<C>, callback: &Callback<C, A>) -> bool
    where
        C: Send + Sync + 'static,
    {
        let key = self.resolver.key(Some(context), callback);
        let removed = self.state.lock().table.remove(&key).is_some();
        if removed {
            debug!(key = %key.digest(), "Cleared frame timer");
        }
        removed
    }

    /// Remove every entry under `context`; returns how many
    pub fn clear_all<C>(&self, context: &Arc<C>) -> usize
    where
        C: Send + Sync + 'static,
    {
        let id = self.resolver.id_of(context);
        let count = self.state.lock().table.remove_context(id).len();
        if count > 0 {
            debug!(context = %id, count, "Cleared all frame timers");
        }
        count
    }

    /// Stop one entry from accumulating time
    pub fn pause<C, A>(&self, context: &Arc<C>, callback: &Callback<C, A>)
    where
        C: Send + Sync + 'static,
    {
        self.set_entry_paused(context, callback, true);
    }

    pub fn resume<C, A>(&self, context: &Arc<C>, callback: &Callback<C, A>)
    where
        C: Send + Sync + 'static,
    {
        self.set_entry_paused(context, callback, false);
    }

    fn set_entry_paused<C, A>(&self, context: &Arc<C>, callback: &Callback<C, A>, paused: bool)
    where
        C: Send + Sync + 'static,
    {
        let key = self.resolver.key(Some(context), callback);
        if let Some(entry) = self.state.lock().table.get_mut(&key) {
            entry.paused = paused;
        }
    }

    /// Pause every entry under `context`
    pub fn pause_all<C>(&self, context: &Arc<C>)
    where
        C: Send + Sync + 'static,
    {
        self.set_context_paused(context, true);
    }

    pub fn resume_all<C>(&self, context: &Arc<C>)
    where
        C: Send + Sync + 'static,
    {
        self.set_context_paused(context, false);
    }

    fn set_context_paused<C>(&self, context: &Arc<C>, paused: bool)
    where
        C: Send + Sync + 'static,
    {
        let id = self.resolver.id_of(context);
        let mut state = self.state.lock();
        for entry in state.table.context_values_mut(id) {
            entry.paused = paused;
        }
    }

    /// Advance every entry by `delta` and fire those that came due
    ///
    /// Does nothing while the ticker is globally paused. Entries are walked
    /// in registration order over a snapshot taken at the start of the tick.
    /// Entries cleared by an earlier callback are skipped, and so are entries
    /// inserted after the snapshot, including a key that an earlier callback
    /// cleared and registered again; they first accumulate on the next tick.
    /// An entry overwritten in place (`clear_existing = false`) keeps its slot
    /// and is advanced. A Once entry is removed before its callback runs; a
    /// Loop entry has its accumulator reset. Returns the number of callbacks
    /// fired.
    pub fn tick(&self, delta: Duration) -> usize {
        let (keys, watermark) = {
            let state = self.state.lock();
            if state.paused {
                return 0;
            }
            (state.table.keys(), state.table.watermark())
        };

        let mut fired = 0;
        for key in keys {
            let fire = {
                let mut state = self.state.lock();
                match state.table.seq_of(&key) {
                    Some(seq) if seq < watermark => {}
                    _ => continue,
                }
                let Some(entry) = state.table.get_mut(&key) else {
                    continue;
                };
                if entry.paused {
                    match self.policy {
                        PausedEntryPolicy::SkipEntry => continue,
                        PausedEntryPolicy::HaltTick => {
                            trace!(key = %key, "Paused frame timer halted tick");
                            break;
                        }
                    }
                }
                if !entry.advance(delta) {
                    continue;
                }
                let fire = Arc::clone(&entry.fire);
                if entry.loop_type == LoopType::Loop {
                    entry.reset();
                } else {
                    state.table.remove(&key);
                }
                fire
            };

            trace!(key = %key, "Frame timer fired");
            fire();
            fired += 1;
        }
        fired
    }

    /// Set or clear the global pause
    pub fn set_paused(&self, paused: bool) {
        self.state.lock().paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.state.lock().paused
    }

    pub fn policy(&self) -> PausedEntryPolicy {
        self.policy
    }

    /// Whether an entry exists for (context, callback)
    pub fn contains<C, A>(&self, context: &Arc<C>, callback: &Callback<C, A>) -> bool
    where
        C: Send + Sync + 'static,
    {
        let key = self.resolver.key(Some(context), callback);
        self.state.lock().table.contains(&key)
    }

    /// Whether the entry for (context, callback) is paused; `None` if absent
    pub fn is_entry_paused<C, A>(&self, context: &Arc<C>, callback: &Callback<C, A>) -> Option<bool>
    where
        C: Send + Sync + 'static,
    {
        let key = self.resolver.key(Some(context), callback);
        self.state.lock().table.get(&key).map(|entry| entry.paused)
    }

    /// Accumulated time of the entry for (context, callback); `None` if absent
    pub fn elapsed<C, A>(&self, context: &Arc<C>, callback: &Callback<C, A>) -> Option<Duration>
    where
        C: Send + Sync + 'static,
    {
        let key = self.resolver.key(Some(context), callback);
        self.state.lock().table.get(&key).map(|entry| entry.elapsed)
    }

    /// Total number of entries
    pub fn len(&self) -> usize {
        self.state.lock().table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().table.is_empty()
    }

    /// Number of entries under `context`
    pub fn context_len<C>(&self, context: &Arc<C>) -> usize
    where
        C: Send + Sync + 'static,
    {
        let id = self.resolver.id_of(context);
        self.state.lock().table.context_len(id)
    }

    /// Number of contexts that currently own entries
    pub fn context_count(&self) -> usize {
        self.state.lock().table.context_count()
    }
}

impl Default for FrameTicker {
    fn default() -> Self {
        Self::new()
    }
}
