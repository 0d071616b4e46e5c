//! Transaction context and lifecycle state machine.

use crate::error::{MapError, MapResult};
use crate::overlay::Overlay;
use crate::types::{StoreVersion, TransactionId};
use std::fmt;
use std::hash::Hash;

/// State of a transaction.
///
/// `Committed` and `RolledBack` are terminal. A suspended transaction must
/// be resumed before any further lifecycle call or map operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    /// Transaction is active and can perform operations.
    Active,
    /// Transaction is detached from its calling context; its overlay is
    /// retained untouched but unreachable until resume.
    Suspended,
    /// Transaction has been committed (terminal).
    Committed,
    /// Transaction has been rolled back (terminal).
    RolledBack,
}

impl TransactionState {
    /// Returns `true` for terminal states.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Committed | Self::RolledBack)
    }
}

impl fmt::Display for TransactionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Committed => "committed",
            Self::RolledBack => "rolled back",
        };
        f.write_str(name)
    }
}

/// One logical transaction: its id, lifecycle state, pending overlay, and
/// the base-store version observed at start.
///
/// The overlay is owned exclusively by this transaction and is never visible
/// to other transactions. Callers are expected to serialize operations
/// within one transaction id.
#[derive(Debug)]
pub struct TransactionContext<K, V> {
    id: TransactionId,
    state: TransactionState,
    overlay: Overlay<K, V>,
    snapshot_version: StoreVersion,
}

impl<K: Eq + Hash, V> TransactionContext<K, V> {
    /// Creates a new active context.
    pub(crate) fn new(id: TransactionId, snapshot_version: StoreVersion) -> Self {
        Self {
            id,
            state: TransactionState::Active,
            overlay: Overlay::new(),
            snapshot_version,
        }
    }

    /// Returns the transaction ID.
    #[must_use]
    pub fn id(&self) -> TransactionId {
        self.id
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// Returns the base-store version observed at start.
    #[must_use]
    pub fn snapshot_version(&self) -> StoreVersion {
        self.snapshot_version
    }

    /// Checks if the transaction is still active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state == TransactionState::Active
    }

    /// Returns the pending overlay.
    #[must_use]
    pub fn overlay(&self) -> &Overlay<K, V> {
        &self.overlay
    }

    /// Records a pending put.
    pub(crate) fn put(&mut self, key: K, value: V) -> MapResult<()> {
        self.ensure_active()?;
        self.overlay.put(key, value);
        Ok(())
    }

    /// Records a pending delete as a tombstone.
    pub(crate) fn remove(&mut self, key: K) -> MapResult<()> {
        self.ensure_active()?;
        self.overlay.remove(key);
        Ok(())
    }

    /// Detaches the transaction from its calling context.
    pub(crate) fn suspend(&mut self) -> MapResult<()> {
        self.ensure_active()?;
        self.state = TransactionState::Suspended;
        Ok(())
    }

    /// Reattaches a suspended transaction.
    pub(crate) fn resume(&mut self) -> MapResult<()> {
        if self.state != TransactionState::Suspended {
            return Err(MapError::invalid_state(format!(
                "cannot resume {}: state is {}, expected suspended",
                self.id, self.state
            )));
        }
        self.state = TransactionState::Active;
        Ok(())
    }

    /// Moves to the committed terminal state, yielding the overlay to merge.
    pub(crate) fn mark_committed(&mut self) -> MapResult<Overlay<K, V>> {
        self.ensure_active()?;
        self.state = TransactionState::Committed;
        Ok(std::mem::take(&mut self.overlay))
    }

    /// Moves to the rolled-back terminal state, discarding the overlay.
    pub(crate) fn mark_rolled_back(&mut self) -> MapResult<()> {
        self.ensure_active()?;
        self.state = TransactionState::RolledBack;
        self.overlay = Overlay::new();
        Ok(())
    }

    /// Ensures the transaction can accept operations.
    ///
    /// Suspended contexts are unreachable until resume; terminal contexts
    /// accept nothing.
    pub(crate) fn ensure_active(&self) -> MapResult<()> {
        if self.is_active() {
            Ok(())
        } else {
            Err(MapError::invalid_state(format!(
                "transaction {} is {}",
                self.id, self.state
            )))
        }
    }
}
