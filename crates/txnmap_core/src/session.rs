//! Calling-context handle over a shared engine.

use crate::engine::MapEngine;
use crate::error::{MapError, MapResult};
use crate::types::TransactionId;
use std::hash::Hash;
use std::sync::Arc;

/// One calling context's view of a shared [`MapEngine`].
///
/// A session holds the "current transaction" pointer for a thread, task, or
/// other unit of control flow, replacing the hidden thread-local state a
/// host framework would otherwise manage. Every map operation routes through
/// the engine with the session's current transaction id; with no current
/// transaction, operations act directly on the committed state.
///
/// Many sessions can share one engine. A transaction suspended in one
/// session can be resumed in another, which is how nested independent units
/// of work hand the ambient transaction around.
#[derive(Debug)]
pub struct Session<K, V> {
    engine: Arc<MapEngine<K, V>>,
    current: Option<TransactionId>,
}

impl<K: Eq + Hash + Clone, V: Clone> Session<K, V> {
    /// Creates a session with no current transaction.
    #[must_use]
    pub fn new(engine: Arc<MapEngine<K, V>>) -> Self {
        Self {
            engine,
            current: None,
        }
    }

    /// Returns the shared engine.
    #[must_use]
    pub fn engine(&self) -> &Arc<MapEngine<K, V>> {
        &self.engine
    }

    /// Returns the current transaction id, if any.
    #[must_use]
    pub fn current_transaction(&self) -> Option<TransactionId> {
        self.current
    }

    fn current_or_err(&self) -> MapResult<TransactionId> {
        self.current.ok_or_else(|| {
            MapError::invalid_state("session has no current transaction")
        })
    }

    // === Lifecycle ===

    /// Starts a new transaction and makes it current.
    pub fn begin(&mut self) -> MapResult<TransactionId> {
        if let Some(id) = self.current {
            return Err(MapError::invalid_state(format!(
                "session already bound to {id}"
            )));
        }
        let id = self.engine.start();
        self.current = Some(id);
        Ok(id)
    }

    /// Commits the current transaction and clears the pointer.
    pub fn commit(&mut self) -> MapResult<()> {
        let id = self.current_or_err()?;
        self.engine.commit(id)?;
        self.current = None;
        Ok(())
    }

    /// Rolls back the current transaction and clears the pointer.
    pub fn rollback(&mut self) -> MapResult<()> {
        let id = self.current_or_err()?;
        self.engine.rollback(id)?;
        self.current = None;
        Ok(())
    }

    /// Suspends the current transaction and clears the pointer.
    ///
    /// Subsequent operations on this session act without an ambient
    /// transaction (or against whatever transaction becomes current), so
    /// the suspended work is invisible to them. Returns the suspended id for
    /// a later [`resume`](Self::resume).
    pub fn suspend(&mut self) -> MapResult<TransactionId> {
        let id = self.current_or_err()?;
        self.engine.suspend(id)?;
        self.current = None;
        Ok(id)
    }

    /// Resumes a suspended transaction and makes it current.
    pub fn resume(&mut self, id: TransactionId) -> MapResult<()> {
        if let Some(current) = self.current {
            return Err(MapError::invalid_state(format!(
                "cannot resume {id}: session already bound to {current}"
            )));
        }
        self.engine.resume(id)?;
        self.current = Some(id);
        Ok(())
    }

    // === Map operations ===

    /// Returns the value visible to this session for a key.
    pub fn get(&self, key: &K) -> MapResult<Option<V>> {
        self.engine.get(self.current, key)
    }

    /// Inserts a value, returning the previously visible value.
    pub fn put(&self, key: K, value: V) -> MapResult<Option<V>> {
        self.engine.put(self.current, key, value)
    }

    /// Removes a key, returning the previously visible value.
    pub fn remove(&self, key: &K) -> MapResult<Option<V>> {
        self.engine.remove(self.current, key)
    }

    /// Returns `true` if the key is visible to this session.
    pub fn contains_key(&self, key: &K) -> MapResult<bool> {
        self.engine.contains_key(self.current, key)
    }

    /// Returns `true` if any visible entry holds the given value.
    pub fn contains_value(&self, value: &V) -> MapResult<bool>
    where
        V: PartialEq,
    {
        self.engine.contains_value(self.current, value)
    }

    /// Returns the number of visible entries.
    pub fn len(&self) -> MapResult<usize> {
        self.engine.len(self.current)
    }

    /// Returns `true` if no entries are visible.
    pub fn is_empty(&self) -> MapResult<bool> {
        self.engine.is_empty(self.current)
    }

    /// Returns the visible keys.
    pub fn keys(&self) -> MapResult<Vec<K>> {
        self.engine.keys(self.current)
    }

    /// Returns the visible values.
    pub fn values(&self) -> MapResult<Vec<V>> {
        self.engine.values(self.current)
    }

    /// Returns the visible entries.
    pub fn entries(&self) -> MapResult<Vec<(K, V)>> {
        self.engine.entries(self.current)
    }

    /// Removes every visible entry.
    pub fn clear(&self) -> MapResult<()> {
        self.engine.clear(self.current)
    }

    /// Inserts every entry from the iterator.
    pub fn put_all(&self, entries: impl IntoIterator<Item = (K, V)>) -> MapResult<()> {
        self.engine.put_all(self.current, entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session<String, String> {
        Session::new(Arc::new(MapEngine::new()))
    }

    fn s(text: &str) -> String {
        text.to_owned()
    }

    #[test]
    fn new_session_has_no_transaction() {
        let session = session();
        assert!(session.current_transaction().is_none());
    }

    #[test]
    fn begin_sets_current() {
        let mut session = session();
        let id = session.begin().unwrap();
        assert_eq!(session.current_transaction(), Some(id));
    }

    #[test]
    fn begin_twice_fails() {
        let mut session = session();
        session.begin().unwrap();
        assert!(session.begin().is_err());
    }

    #[test]
    fn commit_clears_current() {
        let mut session = session();
        session.begin().unwrap();
        session.put(s("k"), s("v")).unwrap();
        session.commit().unwrap();

        assert!(session.current_transaction().is_none());
        assert_eq!(session.get(&s("k")).unwrap(), Some(s("v")));
    }

    #[test]
    fn commit_without_transaction_fails() {
        let mut session = session();
        assert!(session.commit().is_err());
    }

    #[test]
    fn suspend_detaches_and_resume_reattaches() {
        let mut session = session();
        session.begin().unwrap();
        session.put(s("k"), s("pending")).unwrap();

        let id = session.suspend().unwrap();
        assert!(session.current_transaction().is_none());
        // With no ambient transaction, the pending write is invisible.
        assert_eq!(session.get(&s("k")).unwrap(), None);

        session.resume(id).unwrap();
        assert_eq!(session.get(&s("k")).unwrap(), Some(s("pending")));
        session.rollback().unwrap();
    }

    #[test]
    fn resume_while_bound_fails() {
        let engine = Arc::new(MapEngine::<String, String>::new());
        let mut a = Session::new(Arc::clone(&engine));
        let mut b = Session::new(Arc::clone(&engine));

        a.begin().unwrap();
        let suspended = a.suspend().unwrap();

        b.begin().unwrap();
        assert!(b.resume(suspended).is_err());
        b.rollback().unwrap();

        // A different unbound session may pick the transaction up.
        b.resume(suspended).unwrap();
        b.rollback().unwrap();
    }

    #[test]
    fn sessions_share_committed_state() {
        let engine = Arc::new(MapEngine::new());
        let mut writer = Session::new(Arc::clone(&engine));
        let reader = Session::new(Arc::clone(&engine));

        writer.begin().unwrap();
        writer.put(s("k"), s("v")).unwrap();
        assert_eq!(reader.get(&s("k")).unwrap(), None);

        writer.commit().unwrap();
        assert_eq!(reader.get(&s("k")).unwrap(), Some(s("v")));
    }

    #[test]
    fn auto_commit_without_transaction() {
        let session = session();
        session.put(s("k"), s("v")).unwrap();
        assert_eq!(session.len().unwrap(), 1);
        session.remove(&s("k")).unwrap();
        assert!(session.is_empty().unwrap());
    }
}
