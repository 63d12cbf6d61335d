//! Identity: how a (context, callback) registration is recognized.
//!
//! Every timer in either registry is keyed by the pair of its execution
//! context and its callback. Contexts get a process-wide id on first use
//! through a weak side table; callbacks carry their own id from creation.

mod callback;
mod key;
mod resolver;

pub use callback::{Callback, CallbackId};
pub use key::TimerKey;
pub use resolver::{ContextId, IdentityResolver, DEFAULT_PRUNE_THRESHOLD};
