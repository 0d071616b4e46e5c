//! The transactional map engine.

use crate::config::Config;
use crate::error::MapResult;
use crate::overlay::OverlayEntry;
use crate::stats::{EngineStats, StatsSnapshot};
use crate::store::BaseStore;
use crate::transaction::{TransactionRegistry, TransactionState};
use crate::types::{StoreVersion, TransactionId};
use std::hash::Hash;
use tracing::{debug, trace};

/// An in-memory map with transactional semantics.
///
/// The engine provides read-committed isolation:
/// - A transaction sees its own uncommitted writes immediately.
/// - A transaction never sees another transaction's uncommitted writes,
///   suspended or not.
/// - A transaction does see values committed by others after it started
///   (read-committed, not snapshot isolation).
///
/// Every map operation takes an optional transaction id. With `None` the
/// operation acts directly on the committed state (auto-commit semantics).
///
/// ## Concurrency
///
/// The engine never blocks internally and performs no I/O; callers bring
/// their own threads. Write-write conflicts are not detected: two
/// transactions committing the same key merge in some serial order of their
/// commit calls and the last committer wins. Callers are expected to
/// serialize operations within one transaction id.
#[derive(Debug)]
pub struct MapEngine<K, V> {
    base: BaseStore<K, V>,
    registry: TransactionRegistry<K, V>,
    config: Config,
    stats: EngineStats,
}

impl<K, V> Default for MapEngine<K, V> {
    fn default() -> Self {
        Self {
            base: BaseStore::default(),
            registry: TransactionRegistry::default(),
            config: Config::default(),
            stats: EngineStats::default(),
        }
    }
}

impl<K: Eq + Hash + Clone, V: Clone> MapEngine<K, V> {
    /// Creates a new engine with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new engine with the given configuration.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self {
            base: BaseStore::with_capacity(config.initial_capacity),
            registry: TransactionRegistry::new(),
            config,
            stats: EngineStats::new(),
        }
    }

    // === Lifecycle ===

    /// Starts a new transaction and returns its id.
    ///
    /// The context snapshots the current base store version. A transaction
    /// abandoned without commit or rollback stays active indefinitely and
    /// leaks its context; callers own lifecycle sequencing.
    pub fn start(&self) -> TransactionId {
        let snapshot = self.base.version();
        let id = self.registry.start(snapshot);
        self.stats.record_started();
        debug!(id = %id, snapshot = %snapshot, "transaction started");
        id
    }

    /// Commits a transaction, merging its overlay into the committed state.
    ///
    /// Requires the transaction to be active; committing a suspended
    /// transaction without resuming it first, or committing twice, fails
    /// with an invalid state error and performs no merge.
    ///
    /// No write-write conflict detection is performed: if another
    /// transaction committed the same key in the meantime, this commit
    /// silently overwrites it (last committer wins).
    pub fn commit(&self, id: TransactionId) -> MapResult<()> {
        let overlay = self.registry.with_mut(id, |ctx| ctx.mark_committed())?;
        let pending = overlay.len();
        let version = self.base.apply(overlay);
        if self.config.auto_reap {
            self.registry.forget(id)?;
        }
        self.stats.record_committed();
        debug!(id = %id, version = %version, pending, "transaction committed");
        Ok(())
    }

    /// Rolls back a transaction, discarding its overlay.
    ///
    /// Requires the transaction to be active; same failure mode as
    /// [`commit`](Self::commit) when misused.
    pub fn rollback(&self, id: TransactionId) -> MapResult<()> {
        self.registry.with_mut(id, |ctx| ctx.mark_rolled_back())?;
        if self.config.auto_reap {
            self.registry.forget(id)?;
        }
        self.stats.record_rolled_back();
        debug!(id = %id, "transaction rolled back");
        Ok(())
    }

    /// Suspends an active transaction.
    ///
    /// The overlay is retained untouched but operations against the
    /// transaction are rejected until [`resume`](Self::resume).
    pub fn suspend(&self, id: TransactionId) -> MapResult<()> {
        self.registry.with_mut(id, |ctx| ctx.suspend())?;
        self.stats.record_suspension();
        trace!(id = %id, "transaction suspended");
        Ok(())
    }

    /// Resumes a suspended transaction, re-activating it.
    pub fn resume(&self, id: TransactionId) -> MapResult<()> {
        self.registry.with_mut(id, |ctx| ctx.resume())?;
        self.stats.record_resumption();
        trace!(id = %id, "transaction resumed");
        Ok(())
    }

    /// Returns the lifecycle state of a registered transaction.
    pub fn transaction_state(&self, id: TransactionId) -> MapResult<TransactionState> {
        self.registry.state(id)
    }

    /// Reclaims a terminal context; afterwards the id is unknown.
    pub fn forget(&self, id: TransactionId) -> MapResult<()> {
        self.registry.forget(id)
    }

    /// Reclaims every terminal context, returning how many were removed.
    pub fn reap_terminal(&self) -> usize {
        self.registry.reap_terminal()
    }

    // === Map operations ===

    /// Returns the value visible to the given transaction for a key.
    ///
    /// Resolution order: the transaction's own overlay entry if present
    /// (tombstone means absent), else the latest committed value.
    pub fn get(&self, txn: Option<TransactionId>, key: &K) -> MapResult<Option<V>> {
        match txn {
            Some(id) => self.registry.with(id, |ctx| {
                ctx.ensure_active()?;
                Ok(match ctx.overlay().get(key) {
                    Some(OverlayEntry::Put(value)) => Some(value.clone()),
                    Some(OverlayEntry::Tombstone) => None,
                    None => self.base.get(key),
                })
            }),
            None => Ok(self.base.get(key)),
        }
    }

    /// Inserts a value, returning the previously visible value.
    ///
    /// Inside a transaction the write is staged in the overlay; outside any
    /// transaction it is applied to the committed state immediately.
    pub fn put(&self, txn: Option<TransactionId>, key: K, value: V) -> MapResult<Option<V>> {
        match txn {
            Some(id) => self.registry.with_mut(id, |ctx| {
                ctx.ensure_active()?;
                let previous = match ctx.overlay().get(&key) {
                    Some(OverlayEntry::Put(v)) => Some(v.clone()),
                    Some(OverlayEntry::Tombstone) => None,
                    None => self.base.get(&key),
                };
                ctx.put(key, value)?;
                Ok(previous)
            }),
            None => Ok(self.base.insert(key, value)),
        }
    }

    /// Removes a key, returning the previously visible value.
    ///
    /// Inside a transaction this stages a tombstone; the committed value is
    /// untouched until commit.
    pub fn remove(&self, txn: Option<TransactionId>, key: &K) -> MapResult<Option<V>> {
        match txn {
            Some(id) => self.registry.with_mut(id, |ctx| {
                ctx.ensure_active()?;
                let previous = match ctx.overlay().get(key) {
                    Some(OverlayEntry::Put(v)) => Some(v.clone()),
                    Some(OverlayEntry::Tombstone) => None,
                    None => self.base.get(key),
                };
                ctx.remove(key.clone())?;
                Ok(previous)
            }),
            None => Ok(self.base.remove(key)),
        }
    }

    /// Returns `true` if the key is visible to the given transaction.
    pub fn contains_key(&self, txn: Option<TransactionId>, key: &K) -> MapResult<bool> {
        match txn {
            Some(id) => self.registry.with(id, |ctx| {
                ctx.ensure_active()?;
                Ok(match ctx.overlay().get(key) {
                    Some(OverlayEntry::Put(_)) => true,
                    Some(OverlayEntry::Tombstone) => false,
                    None => self.base.contains_key(key),
                })
            }),
            None => Ok(self.base.contains_key(key)),
        }
    }

    /// Returns `true` if any visible entry holds the given value.
    pub fn contains_value(&self, txn: Option<TransactionId>, value: &V) -> MapResult<bool>
    where
        V: PartialEq,
    {
        Ok(self.values(txn)?.iter().any(|v| v == value))
    }

    /// Returns the number of visible entries.
    pub fn len(&self, txn: Option<TransactionId>) -> MapResult<usize> {
        match txn {
            Some(_) => Ok(self.keys(txn)?.len()),
            None => Ok(self.base.len()),
        }
    }

    /// Returns `true` if no entries are visible.
    pub fn is_empty(&self, txn: Option<TransactionId>) -> MapResult<bool> {
        Ok(self.len(txn)? == 0)
    }

    /// Returns the visible keys: the union of committed keys and the
    /// transaction's overlay puts, excluding tombstoned keys.
    pub fn keys(&self, txn: Option<TransactionId>) -> MapResult<Vec<K>> {
        match txn {
            Some(id) => self.registry.with(id, |ctx| {
                ctx.ensure_active()?;
                let base = self.base.snapshot();
                let mut keys: Vec<K> = base
                    .keys()
                    .filter(|k| !matches!(ctx.overlay().get(k), Some(OverlayEntry::Tombstone)))
                    .cloned()
                    .collect();
                for (key, entry) in ctx.overlay().iter() {
                    if matches!(entry, OverlayEntry::Put(_)) && !base.contains_key(key) {
                        keys.push(key.clone());
                    }
                }
                Ok(keys)
            }),
            None => Ok(self.base.snapshot().into_keys().collect()),
        }
    }

    /// Returns the visible values.
    pub fn values(&self, txn: Option<TransactionId>) -> MapResult<Vec<V>> {
        Ok(self.entries(txn)?.into_iter().map(|(_, v)| v).collect())
    }

    /// Returns the visible entries, applying the per-key resolution rule to
    /// the union of committed keys and the transaction's overlay keys.
    pub fn entries(&self, txn: Option<TransactionId>) -> MapResult<Vec<(K, V)>> {
        match txn {
            Some(id) => self.registry.with(id, |ctx| {
                ctx.ensure_active()?;
                let base = self.base.snapshot();
                let mut out = Vec::with_capacity(base.len());
                for (key, value) in &base {
                    match ctx.overlay().get(key) {
                        Some(OverlayEntry::Put(v)) => out.push((key.clone(), v.clone())),
                        Some(OverlayEntry::Tombstone) => {}
                        None => out.push((key.clone(), value.clone())),
                    }
                }
                for (key, entry) in ctx.overlay().iter() {
                    if let OverlayEntry::Put(v) = entry {
                        if !base.contains_key(key) {
                            out.push((key.clone(), v.clone()));
                        }
                    }
                }
                Ok(out)
            }),
            None => Ok(self.base.snapshot().into_iter().collect()),
        }
    }

    /// Removes every visible entry.
    ///
    /// Inside a transaction this stages a tombstone for each visible key;
    /// keys committed by others afterwards are unaffected.
    pub fn clear(&self, txn: Option<TransactionId>) -> MapResult<()> {
        match txn {
            Some(id) => {
                let keys = self.keys(txn)?;
                self.registry.with_mut(id, |ctx| {
                    for key in keys {
                        ctx.remove(key)?;
                    }
                    Ok(())
                })
            }
            None => {
                self.base.clear();
                Ok(())
            }
        }
    }

    /// Inserts every entry from the iterator.
    pub fn put_all(
        &self,
        txn: Option<TransactionId>,
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> MapResult<()> {
        match txn {
            Some(id) => self.registry.with_mut(id, |ctx| {
                ctx.ensure_active()?;
                for (key, value) in entries {
                    ctx.put(key, value)?;
                }
                Ok(())
            }),
            None => {
                self.base.extend(entries);
                Ok(())
            }
        }
    }

    // === Introspection ===

    /// Returns the current base store version.
    #[must_use]
    pub fn version(&self) -> StoreVersion {
        self.base.version()
    }

    /// Returns a point-in-time view of counters and gauges.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        StatsSnapshot {
            started: self.stats.started(),
            committed: self.stats.committed(),
            rolled_back: self.stats.rolled_back(),
            suspensions: self.stats.suspensions(),
            resumptions: self.stats.resumptions(),
            active_transactions: self.registry.count_in_state(TransactionState::Active),
            suspended_transactions: self.registry.count_in_state(TransactionState::Suspended),
            base_entries: self.base.len(),
            version: self.base.version(),
        }
    }
}
