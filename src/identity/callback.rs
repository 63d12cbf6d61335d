//! Callback handles with reference identity.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static CALLBACK_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identity of a callback, shared by all clones of the same [`Callback`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CallbackId(u64);

impl CallbackId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CallbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cb_{}", self.0)
    }
}

/// A callback invoked with its execution context and the arguments bound at
/// registration.
///
/// Identity is fixed at construction: clones compare equal, while two
/// callbacks built from identical closures do not. Registering the same
/// `Callback` twice on one context therefore targets the same timer slot.
pub struct Callback<C, A = ()> {
    id: CallbackId,
    func: Arc<dyn Fn(&C, &A) + Send + Sync>,
}

impl<C, A> Callback<C, A> {
    /// Wrap a closure, assigning it a fresh identity
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&C, &A) + Send + Sync + 'static,
    {
        Self {
            id: CallbackId(CALLBACK_COUNTER.fetch_add(1, Ordering::Relaxed)),
            func: Arc::new(func),
        }
    }

    pub fn id(&self) -> CallbackId {
        self.id
    }

    /// Invoke with `context` as the receiver
    pub fn call(&self, context: &C, args: &A) {
        (self.func)(context, args)
    }
}

impl<C> Callback<C, ()> {
    /// Wrap a closure that takes no bound arguments
    pub fn no_args<F>(func: F) -> Self
    where
        F: Fn(&C) + Send + Sync + 'static,
    {
        Self::new(move |context: &C, _: &()| func(context))
    }
}

impl<C, A> Clone for Callback<C, A> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            func: Arc::clone(&self.func),
        }
    }
}

impl<C, A> fmt::Debug for Callback<C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback").field("id", &self.id).finish()
    }
}
