//! Timer registry: wall-clock timers grouped by context.
//!
//! Registration computes the composite key, optionally clears whatever is
//! already registered under it, hands a bound task to the [`TimerHost`] and
//! records the returned handle. A one-shot timer retires its own entry when
//! it fires.

use crate::host::{HostHandle, TimerHost};
use crate::identity::{Callback, IdentityResolver, TimerKey};
use crate::table::TimerTable;
use crate::timer::LoopType;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace, warn};

struct TimerSlot {
    handle: HostHandle,
    /// Distinguishes this registration from any later one under the same key
    generation: u64,
    kind: LoopType,
}

struct RegistryState {
    table: TimerTable<TimerSlot>,
    next_generation: u64,
}

impl RegistryState {
    fn retire(&mut self, key: &TimerKey, generation: u64) {
        if self
            .table
            .get(key)
            .is_some_and(|slot| slot.generation == generation)
        {
            self.table.remove(key);
        }
    }
}

/// Registry of host-backed timers
///
/// Cloning yields another handle to the same registry, so callbacks may hold
/// one and clear or re-register timers while they run.
#[derive(Clone)]
pub struct TimerRegistry {
    resolver: IdentityResolver,
    host: Arc<dyn TimerHost>,
    state: Arc<Mutex<RegistryState>>,
}

impl TimerRegistry {
    /// Create a registry with its own identity resolver
    pub fn new(host: Arc<dyn TimerHost>) -> Self {
        Self::with_resolver(host, IdentityResolver::new())
    }

    /// Create a registry sharing `resolver` with other components
    pub fn with_resolver(host: Arc<dyn TimerHost>, resolver: IdentityResolver) -> Self {
        Self {
            resolver,
            host,
            state: Arc::new(Mutex::new(RegistryState {
                table: TimerTable::new(),
                next_generation: 0,
            })),
        }
    }

    /// Run `callback` on `context` every `delay`
    ///
    /// With `clear_existing`, any timer already registered for this
    /// (context, callback) pair is cancelled first. Without it, an occupied
    /// key is overwritten and the earlier host timer keeps running untracked.
    pub fn schedule_loop<C, A>(
        &self,
        delay: Duration,
        context: &Arc<C>,
        callback: &Callback<C, A>,
        clear_existing: bool,
        args: A,
    ) -> TimerKey
    where
        C: Send + Sync + 'static,
        A: Send + Sync + 'static,
    {
        self.schedule(LoopType::Loop, delay, context, callback, clear_existing, args)
    }

    /// Run `callback` on `context` once after `delay`
    pub fn schedule_once<C, A>(
        &self,
        delay: Duration,
        context: &Arc<C>,
        callback: &Callback<C, A>,
        clear_existing: bool,
        args: A,
    ) -> TimerKey
    where
        C: Send + Sync + 'static,
        A: Send + Sync + 'static,
    {
        self.schedule(LoopType::Once, delay, context, callback, clear_existing, args)
    }

    fn schedule<C, A>(
        &self,
        kind: LoopType,
        delay: Duration,
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
        if clear_existing {
            self.clear_key(&key);
        }

        let target = Arc::clone(context);
        let callback = callback.clone();

        // The lock is held across scheduling so a task firing on another
        // thread cannot try to retire its slot before the slot exists. Hosts
        // never run a task inside `schedule_*`, so this cannot self-deadlock.
        let mut state = self.state.lock();
        state.next_generation += 1;
        let generation = state.next_generation;

        let handle = match kind {
            LoopType::Loop => self.host.schedule_repeating(
                delay,
                Box::new(move || {
                    trace!(key = %key, "Loop timer fired");
                    callback.call(&target, &args);
                }),
            ),
            LoopType::Once => {
                let registry = Arc::downgrade(&self.state);
                self.host.schedule_once(
                    delay,
                    Box::new(move || {
                        if let Some(registry) = registry.upgrade() {
                            registry.lock().retire(&key, generation);
                        }
                        trace!(key = %key, "Once timer fired");
                        callback.call(&target, &args);
                    }),
                )
            }
        };

        let displaced = state.table.insert(
            key,
            TimerSlot {
                handle,
                generation,
                kind,
            },
        );
        drop(state);

        if let Some(previous) = displaced {
            warn!(
                key = %key.digest(),
                untracked = %previous.handle,
                "Timer key overwritten without clearing; the previous host timer is no longer tracked"
            );
        }
        debug!(
            key = %key.digest(),
            context = %key.context,
            kind = kind.as_str(),
            delay_ms = delay.as_millis() as u64,
            "Added timer"
        );
        key
    }

    /// Cancel the timer registered for (context, callback), if any
    pub fn clear<C, A>(&self, context: &Arc<C>, callback: &Callback<C, A>) -> bool
    where
        C: Send + Sync + 'static,
    {
        let key = self.resolver.key(Some(context), callback);
        self.clear_key(&key)
    }

    fn clear_key(&self, key: &TimerKey) -> bool {
        let removed = self.state.lock().table.remove(key);
        match removed {
            Some(slot) => {
                self.host.cancel(slot.handle);
                debug!(key = %key.digest(), kind = slot.kind.as_str(), "Cleared timer");
                true
            }
            None => false,
        }
    }

    /// Cancel every timer registered under `context`; returns how many
    pub fn clear_all<C>(&self, context: &Arc<C>) -> usize
    where
        C: Send + Sync + 'static,
    {
        let id = self.resolver.id_of(context);
        let removed = self.state.lock().table.remove_context(id);
        for (_, slot) in &removed {
            self.host.cancel(slot.handle);
        }
        if !removed.is_empty() {
            debug!(context = %id, count = removed.len(), "Cleared all timers");
        }
        removed.len()
    }

    /// Whether a timer is registered for (context, callback)
    pub fn contains<C, A>(&self, context: &Arc<C>, callback: &Callback<C, A>) -> bool
    where
        C: Send + Sync + 'static,
    {
        let key = self.resolver.key(Some(context), callback);
        self.state.lock().table.contains(&key)
    }

    /// Total number of tracked timers
    pub fn len(&self) -> usize {
        self.state.lock().table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().table.is_empty()
    }

    /// Number of tracked timers under `context`
    pub fn context_len<C>(&self, context: &Arc<C>) -> usize
    where
        C: Send + Sync + 'static,
    {
        let id = self.resolver.id_of(context);
        self.state.lock().table.context_len(id)
    }

    /// Number of contexts that currently own timers
    pub fn context_count(&self) -> usize {
        self.state.lock().table.context_count()
    }

    pub fn resolver(&self) -> &IdentityResolver {
        &self.resolver
    }
}
