//! Engine statistics.
//!
//! Lifecycle counters are atomic and can be read while operations are in
//! progress. Counters are monotonically increasing; gauges (active and
//! suspended transactions, base entries) come from the registry and base
//! store at snapshot time.

use crate::types::StoreVersion;
use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic lifecycle counters maintained by the engine.
#[derive(Debug, Default)]
pub struct EngineStats {
    started: AtomicU64,
    committed: AtomicU64,
    rolled_back: AtomicU64,
    suspensions: AtomicU64,
    resumptions: AtomicU64,
}

impl EngineStats {
    /// Creates a new stats instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_started(&self) {
        self.started.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_committed(&self) {
        self.committed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rolled_back(&self) {
        self.rolled_back.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_suspension(&self) {
        self.suspensions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_resumption(&self) {
        self.resumptions.fetch_add(1, Ordering::Relaxed);
    }

    /// Total transactions started.
    #[must_use]
    pub fn started(&self) -> u64 {
        self.started.load(Ordering::Relaxed)
    }

    /// Total transactions committed.
    #[must_use]
    pub fn committed(&self) -> u64 {
        self.committed.load(Ordering::Relaxed)
    }

    /// Total transactions rolled back.
    #[must_use]
    pub fn rolled_back(&self) -> u64 {
        self.rolled_back.load(Ordering::Relaxed)
    }

    /// Total suspend calls.
    #[must_use]
    pub fn suspensions(&self) -> u64 {
        self.suspensions.load(Ordering::Relaxed)
    }

    /// Total resume calls.
    #[must_use]
    pub fn resumptions(&self) -> u64 {
        self.resumptions.load(Ordering::Relaxed)
    }
}

/// Point-in-time view of engine state and counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Total transactions started.
    pub started: u64,
    /// Total transactions committed.
    pub committed: u64,
    /// Total transactions rolled back.
    pub rolled_back: u64,
    /// Total suspend calls.
    pub suspensions: u64,
    /// Total resume calls.
    pub resumptions: u64,
    /// Transactions currently active.
    pub active_transactions: usize,
    /// Transactions currently suspended.
    pub suspended_transactions: usize,
    /// Committed entries in the base store.
    pub base_entries: usize,
    /// Current base store version.
    pub version: StoreVersion,
}
