//! Context identity resolution backed by a weak side table.

use crate::identity::{Callback, TimerKey};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::trace;

/// Process-wide context id counter. Starts at 1; 0 is the absent sentinel.
static CONTEXT_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Tag count at which dead entries are first swept.
pub const DEFAULT_PRUNE_THRESHOLD: usize = 1024;

/// Stable identity of an execution context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContextId(u64);

impl ContextId {
    /// Identity reported for an absent context.
    pub const ABSENT: ContextId = ContextId(0);

    pub fn get(self) -> u64 {
        self.0
    }

    pub fn is_absent(self) -> bool {
        self == Self::ABSENT
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_absent() {
            write!(f, "absent")
        } else {
            write!(f, "ctx_{}", self.0)
        }
    }
}

struct Tag {
    owner: Weak<dyn Any + Send + Sync>,
    id: ContextId,
}

struct ResolverState {
    /// Keyed by the context's allocation address. The weak reference keeps
    /// that address from being reused while the tag exists.
    tags: HashMap<usize, Tag>,
    prune_threshold: usize,
    next_prune_at: usize,
}

impl ResolverState {
    fn prune(&mut self) -> usize {
        let before = self.tags.len();
        self.tags.retain(|_, tag| tag.owner.strong_count() > 0);
        let removed = before - self.tags.len();
        self.next_prune_at = self.prune_threshold.max(self.tags.len() * 2);
        removed
    }
}

/// Assigns ids to execution contexts without mutating them.
///
/// Cheap to clone; clones share one side table so both registries of a
/// session agree on every context's id.
#[derive(Clone)]
pub struct IdentityResolver {
    state: Arc<Mutex<ResolverState>>,
}

impl IdentityResolver {
    pub fn new() -> Self {
        Self::with_prune_threshold(DEFAULT_PRUNE_THRESHOLD)
    }

    /// Create a resolver that sweeps dead tags once `threshold` tags exist
    pub fn with_prune_threshold(threshold: usize) -> Self {
        let threshold = threshold.max(1);
        Self {
            state: Arc::new(Mutex::new(ResolverState {
                tags: HashMap::new(),
                prune_threshold: threshold,
                next_prune_at: threshold,
            })),
        }
    }

    /// Resolve a context to its id, assigning a fresh one on first use
    ///
    /// An absent context resolves to [`ContextId::ABSENT`].
    pub fn resolve<C>(&self, context: Option<&Arc<C>>) -> ContextId
    where
        C: Send + Sync + 'static,
    {
        match context {
            Some(context) => self.id_of(context),
            None => ContextId::ABSENT,
        }
    }

    /// Resolve a present context
    pub fn id_of<C>(&self, context: &Arc<C>) -> ContextId
    where
        C: Send + Sync + 'static,
    {
        let address = Arc::as_ptr(context) as *const () as usize;
        let mut state = self.state.lock();

        if let Some(tag) = state.tags.get(&address) {
            if tag.owner.strong_count() > 0 {
                return tag.id;
            }
        }

        let id = ContextId(CONTEXT_COUNTER.fetch_add(1, Ordering::Relaxed));
        let owner: Weak<C> = Arc::downgrade(context);
        let owner: Weak<dyn Any + Send + Sync> = owner;
        state.tags.insert(address, Tag { owner, id });
        trace!(context = %id, "Assigned context id");

        if state.tags.len() >= state.next_prune_at {
            let removed = state.prune();
            trace!(removed, remaining = state.tags.len(), "Pruned dead context tags");
        }
        id
    }

    /// Composite key for a (context, callback) pair
    pub fn key<C, A>(&self, context: Option<&Arc<C>>, callback: &Callback<C, A>) -> TimerKey
    where
        C: Send + Sync + 'static,
    {
        TimerKey::new(self.resolve(context), callback.id())
    }

    /// Drop tags whose context has been released; returns how many were removed
    pub fn prune(&self) -> usize {
        self.state.lock().prune()
    }

    /// Number of tags held, live or not yet pruned
    pub fn len(&self) -> usize {
        self.state.lock().tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for IdentityResolver {
    fn default() -> Self {
        Self::new()
    }
}
