//! Composite timer keys.

use crate::identity::{CallbackId, ContextId};
use blake3::Hasher;
use std::fmt;

/// Composite key for a (context, callback) registration.
///
/// At most one live timer exists per key in each registry. Equality is
/// structural.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerKey {
    pub context: ContextId,
    pub callback: CallbackId,
}

impl TimerKey {
    pub fn new(context: ContextId, callback: CallbackId) -> Self {
        Self { context, callback }
    }

    /// Fixed-length content digest of the key
    ///
    /// digest = hex(blake3(context || ":" || callback))
    ///
    /// Used as the stable, opaque key shown in logs and tool output.
    pub fn digest(&self) -> String {
        let mut hasher = Hasher::new();
        hasher.update(self.context.to_string().as_bytes());
        hasher.update(b":");
        hasher.update(self.callback.to_string().as_bytes());
        hex::encode(hasher.finalize().as_bytes())
    }
}

impl fmt::Display for TimerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.context, self.callback)
    }
}
