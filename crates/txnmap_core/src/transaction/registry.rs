//! Transaction registry.

use crate::error::{MapError, MapResult};
use crate::transaction::context::{TransactionContext, TransactionState};
use crate::types::{StoreVersion, TransactionId};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

/// Tracks every live transaction context by id.
///
/// Many transactions may be active or suspended concurrently system-wide.
/// Ids are assigned monotonically and never reused; terminal contexts stay
/// registered until reclaimed with [`forget`](Self::forget) or
/// [`reap_terminal`](Self::reap_terminal) so that lifecycle misuse after
/// commit or rollback is reported as an invalid state rather than an
/// unknown transaction.
#[derive(Debug)]
pub struct TransactionRegistry<K, V> {
    contexts: RwLock<HashMap<TransactionId, TransactionContext<K, V>>>,
    next_id: AtomicU64,
}

impl<K, V> Default for TransactionRegistry<K, V> {
    fn default() -> Self {
        Self {
            contexts: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

impl<K: Eq + Hash, V> TransactionRegistry<K, V> {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new active context snapshotting the given store version.
    pub fn start(&self, snapshot_version: StoreVersion) -> TransactionId {
        let id = TransactionId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.contexts
            .write()
            .insert(id, TransactionContext::new(id, snapshot_version));
        id
    }

    /// Runs a closure against a registered context.
    pub fn with<R>(
        &self,
        id: TransactionId,
        f: impl FnOnce(&TransactionContext<K, V>) -> MapResult<R>,
    ) -> MapResult<R> {
        let contexts = self.contexts.read();
        let ctx = contexts
            .get(&id)
            .ok_or_else(|| MapError::unknown_transaction(id))?;
        f(ctx)
    }

    /// Runs a closure against a registered context, mutably.
    pub fn with_mut<R>(
        &self,
        id: TransactionId,
        f: impl FnOnce(&mut TransactionContext<K, V>) -> MapResult<R>,
    ) -> MapResult<R> {
        let mut contexts = self.contexts.write();
        let ctx = contexts
            .get_mut(&id)
            .ok_or_else(|| MapError::unknown_transaction(id))?;
        f(ctx)
    }

    /// Returns the state of a registered transaction.
    pub fn state(&self, id: TransactionId) -> MapResult<TransactionState> {
        self.with(id, |ctx| Ok(ctx.state()))
    }

    /// Reclaims a terminal context.
    ///
    /// After `forget` the id is gone for good; any later reference reports
    /// `UnknownTransaction`.
    pub fn forget(&self, id: TransactionId) -> MapResult<()> {
        let mut contexts = self.contexts.write();
        let ctx = contexts
            .get(&id)
            .ok_or_else(|| MapError::unknown_transaction(id))?;
        if !ctx.state().is_terminal() {
            return Err(MapError::invalid_state(format!(
                "cannot forget {}: state is {}",
                id,
                ctx.state()
            )));
        }
        contexts.remove(&id);
        Ok(())
    }

    /// Reclaims every terminal context, returning how many were removed.
    pub fn reap_terminal(&self) -> usize {
        let mut contexts = self.contexts.write();
        let before = contexts.len();
        contexts.retain(|_, ctx| !ctx.state().is_terminal());
        before - contexts.len()
    }

    /// Counts registered contexts in the given state.
    #[must_use]
    pub fn count_in_state(&self, state: TransactionState) -> usize {
        self.contexts
            .read()
            .values()
            .filter(|ctx| ctx.state() == state)
            .count()
    }

    /// Returns the total number of registered contexts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contexts.read().len()
    }

    /// Returns `true` if no contexts are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contexts.read().is_empty()
    }
}
