//! Two-level timer table: context id → (timer key → value).
//!
//! Inner maps are created on first insert for a context and dropped as soon
//! as their last entry goes, so a context is present iff it owns at least one
//! timer. Walks follow registration order: contexts in the order their map
//! was (re)created, entries in the order their key was inserted. Overwriting
//! a live key keeps its place; removing and re-inserting moves it last.

use crate::identity::{ContextId, TimerKey};
use std::collections::{BTreeMap, HashMap};

struct Slot<V> {
    seq: u64,
    value: V,
}

struct ContextSlot<V> {
    seq: u64,
    entries: HashMap<TimerKey, Slot<V>>,
    /// Insertion sequence → key
    order: BTreeMap<u64, TimerKey>,
}

/// Keyed, per-context storage shared by both registries
pub struct TimerTable<V> {
    contexts: HashMap<ContextId, ContextSlot<V>>,
    /// Registration sequence → context
    order: BTreeMap<u64, ContextId>,
    next_seq: u64,
}

impl<V> TimerTable<V> {
    pub fn new() -> Self {
        Self {
            contexts: HashMap::new(),
            order: BTreeMap::new(),
            next_seq: 0,
        }
    }

    /// Insert under `key`, returning any value it displaced
    pub fn insert(&mut self, key: TimerKey, value: V) -> Option<V> {
        let Self {
            contexts,
            order,
            next_seq,
        } = self;

        let inner = contexts.entry(key.context).or_insert_with(|| {
            let seq = *next_seq;
            *next_seq += 1;
            order.insert(seq, key.context);
            ContextSlot {
                seq,
                entries: HashMap::new(),
                order: BTreeMap::new(),
            }
        });

        if let Some(slot) = inner.entries.get_mut(&key) {
            return Some(std::mem::replace(&mut slot.value, value));
        }
        let seq = *next_seq;
        *next_seq += 1;
        inner.order.insert(seq, key);
        inner.entries.insert(key, Slot { seq, value });
        None
    }

    pub fn get(&self, key: &TimerKey) -> Option<&V> {
        self.contexts
            .get(&key.context)?
            .entries
            .get(key)
            .map(|slot| &slot.value)
    }

    pub fn get_mut(&mut self, key: &TimerKey) -> Option<&mut V> {
        self.contexts
            .get_mut(&key.context)?
            .entries
            .get_mut(key)
            .map(|slot| &mut slot.value)
    }

    pub fn contains(&self, key: &TimerKey) -> bool {
        self.get(key).is_some()
    }

    /// Insertion sequence of a live key
    ///
    /// Sequences only grow, so comparing one against a [`watermark`](Self::watermark)
    /// tells whether the key was inserted after it was taken.
    pub fn seq_of(&self, key: &TimerKey) -> Option<u64> {
        self.contexts
            .get(&key.context)?
            .entries
            .get(key)
            .map(|slot| slot.seq)
    }

    /// Sequence the next insertion will receive
    pub fn watermark(&self) -> u64 {
        self.next_seq
    }

    /// Remove one entry, dropping its context's map if it is now empty
    pub fn remove(&mut self, key: &TimerKey) -> Option<V> {
        let inner = self.contexts.get_mut(&key.context)?;
        let slot = inner.entries.remove(key)?;
        inner.order.remove(&slot.seq);
        if inner.entries.is_empty() {
            let context_seq = inner.seq;
            self.contexts.remove(&key.context);
            self.order.remove(&context_seq);
        }
        Some(slot.value)
    }

    /// Remove a whole context, returning its entries in registration order
    pub fn remove_context(&mut self, context: ContextId) -> Vec<(TimerKey, V)> {
        let Some(mut inner) = self.contexts.remove(&context) else {
            return Vec::new();
        };
        self.order.remove(&inner.seq);
        inner
            .order
            .values()
            .filter_map(|key| inner.entries.remove(key).map(|slot| (*key, slot.value)))
            .collect()
    }

    /// Mutable access to every entry of one context
    pub fn context_values_mut(&mut self, context: ContextId) -> impl Iterator<Item = &mut V> {
        self.contexts
            .get_mut(&context)
            .into_iter()
            .flat_map(|inner| inner.entries.values_mut().map(|slot| &mut slot.value))
    }

    /// Snapshot of all keys in walk order
    pub fn keys(&self) -> Vec<TimerKey> {
        self.order
            .values()
            .filter_map(|context| self.contexts.get(context))
            .flat_map(|inner| inner.order.values().copied())
            .collect()
    }

    /// Total number of entries
    pub fn len(&self) -> usize {
        self.contexts.values().map(|inner| inner.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    /// Number of entries registered under `context`
    pub fn context_len(&self, context: ContextId) -> usize {
        self.contexts
            .get(&context)
            .map_or(0, |inner| inner.entries.len())
    }

    /// Number of contexts that currently own at least one entry
    pub fn context_count(&self) -> usize {
        self.contexts.len()
    }
}

impl<V> Default for TimerTable<V> {
    fn default() -> Self {
        Self::new()
    }
}
