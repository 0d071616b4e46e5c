//! Per-transaction overlay of pending key mutations.

use std::collections::HashMap;
use std::hash::Hash;

/// A pending mutation recorded in a transaction's overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayEntry<V> {
    /// Insert or update the key with this value on commit.
    Put(V),
    /// Delete the key on commit.
    ///
    /// A tombstone is distinct from absence: it shadows a committed value so
    /// the owning transaction observes the key as deleted before commit.
    Tombstone,
}

/// A transaction-local record of pending mutations, layered over the shared
/// base store.
///
/// The overlay is owned exclusively by its transaction. Last write per key
/// wins; insertion order is irrelevant. Nothing in the overlay is visible to
/// other transactions until the owning transaction commits.
#[derive(Debug, Clone)]
pub struct Overlay<K, V> {
    entries: HashMap<K, OverlayEntry<V>>,
}

impl<K, V> Default for Overlay<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, V> Overlay<K, V> {
    /// Creates a new empty overlay.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the pending entry for a key, if any.
    ///
    /// `None` means the transaction has not touched the key and the base
    /// store's value applies.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&OverlayEntry<V>> {
        self.entries.get(key)
    }

    /// Records a pending put, replacing any earlier entry for the key.
    pub fn put(&mut self, key: K, value: V) {
        self.entries.insert(key, OverlayEntry::Put(value));
    }

    /// Records a pending delete as a tombstone, replacing any earlier entry.
    pub fn remove(&mut self, key: K) {
        self.entries.insert(key, OverlayEntry::Tombstone);
    }

    /// Returns the number of pending entries (tombstones included).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the overlay has no pending entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over all pending entries.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &OverlayEntry<V>)> {
        self.entries.iter()
    }

    /// Consumes the overlay, yielding its entries for a commit merge.
    #[must_use]
    pub fn into_entries(self) -> HashMap<K, OverlayEntry<V>> {
        self.entries
    }
}
