//! The shared committed state.

use crate::overlay::{Overlay, OverlayEntry};
use crate::types::StoreVersion;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

/// The shared, committed key-value state.
///
/// The base store is the only resource shared across transactions. It is
/// mutated only by successful commit merges and by auto-commit operations
/// performed outside any transaction. A single lock guards the entries so a
/// merge is atomic and readers never observe a torn write; two merges on the
/// same key serialize to some order of the commit calls.
#[derive(Debug)]
pub struct BaseStore<K, V> {
    entries: RwLock<HashMap<K, V>>,
    version: AtomicU64,
}

impl<K, V> Default for BaseStore<K, V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            version: AtomicU64::new(0),
        }
    }
}

impl<K: Eq + Hash + Clone, V: Clone> BaseStore<K, V> {
    /// Creates a new empty base store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new base store with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::with_capacity(capacity)),
            version: AtomicU64::new(0),
        }
    }

    /// Returns the current version stamp.
    #[must_use]
    pub fn version(&self) -> StoreVersion {
        StoreVersion::new(self.version.load(Ordering::SeqCst))
    }

    fn bump(&self) -> StoreVersion {
        StoreVersion::new(self.version.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Returns the committed value for a key.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<V> {
        self.entries.read().get(key).cloned()
    }

    /// Returns `true` if the key has a committed value.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.read().contains_key(key)
    }

    /// Returns the number of committed entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if there are no committed entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns a point-in-time copy of the committed entries.
    ///
    /// Enumeration operations work against a snapshot so a whole
    /// keys/values/entries call observes one consistent committed state.
    #[must_use]
    pub fn snapshot(&self) -> HashMap<K, V> {
        self.entries.read().clone()
    }

    /// Inserts a committed value directly (auto-commit path), returning the
    /// previous value.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        let previous = self.entries.write().insert(key, value);
        self.bump();
        previous
    }

    /// Removes a committed value directly (auto-commit path), returning it.
    pub fn remove(&self, key: &K) -> Option<V> {
        let previous = self.entries.write().remove(key);
        self.bump();
        previous
    }

    /// Removes all committed entries (auto-commit path).
    pub fn clear(&self) {
        self.entries.write().clear();
        self.bump();
    }

    /// Inserts many committed values directly (auto-commit path).
    pub fn extend(&self, new_entries: impl IntoIterator<Item = (K, V)>) {
        self.entries.write().extend(new_entries);
        self.bump();
    }

    /// Merges a transaction's overlay into the committed state.
    ///
    /// Every `Put` is applied as an upsert and every `Tombstone` as a
    /// delete, under a single write lock so no two merges interleave on the
    /// same key. Returns the version stamp of the merged state.
    pub fn apply(&self, overlay: Overlay<K, V>) -> StoreVersion {
        let mut entries = self.entries.write();
        for (key, entry) in overlay.into_entries() {
            match entry {
                OverlayEntry::Put(value) => {
                    entries.insert(key, value);
                }
                OverlayEntry::Tombstone => {
                    entries.remove(&key);
                }
            }
        }
        drop(entries);
        self.bump()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_store_is_empty_at_version_zero() {
        let store: BaseStore<String, String> = BaseStore::new();
        assert!(store.is_empty());
        assert_eq!(store.version(), StoreVersion::new(0));
    }

    #[test]
    fn insert_bumps_version() {
        let store = BaseStore::new();
        store.insert("k", 1);

        assert_eq!(store.get(&"k"), Some(1));
        assert_eq!(store.version(), StoreVersion::new(1));
    }

    #[test]
    fn remove_returns_previous_value() {
        let store = BaseStore::new();
        store.insert("k", 1);

        assert_eq!(store.remove(&"k"), Some(1));
        assert_eq!(store.remove(&"k"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn apply_merges_puts_and_tombstones() {
        let store = BaseStore::new();
        store.insert("keep", 1);
        store.insert("gone", 2);

        let mut overlay = Overlay::new();
        overlay.put("new", 3);
        overlay.remove("gone");
        let version = store.apply(overlay);

        assert_eq!(store.get(&"keep"), Some(1));
        assert_eq!(store.get(&"new"), Some(3));
        assert_eq!(store.get(&"gone"), None);
        assert_eq!(version, store.version());
    }

    #[test]
    fn apply_bumps_version_once() {
        let store = BaseStore::new();
        let mut overlay = Overlay::new();
        overlay.put("a", 1);
        overlay.put("b", 2);
        store.apply(overlay);

        assert_eq!(store.version(), StoreVersion::new(1));
    }

    #[test]
    fn snapshot_is_point_in_time() {
        let store = BaseStore::new();
        store.insert("k", 1);
        let snapshot = store.snapshot();
        store.insert("k", 2);

        assert_eq!(snapshot.get(&"k"), Some(&1));
        assert_eq!(store.get(&"k"), Some(2));
    }

    #[test]
    fn clear_empties_and_bumps() {
        let store = BaseStore::new();
        store.insert("a", 1);
        store.insert("b", 2);
        store.clear();

        assert!(store.is_empty());
        assert_eq!(store.version(), StoreVersion::new(3));
    }
}
