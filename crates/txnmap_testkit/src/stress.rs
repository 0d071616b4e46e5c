//! Multithreaded stress helpers.
//!
//! Drives many concurrent sessions against one shared engine and reports
//! what happened, so tests can assert engine invariants under contention.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use txnmap_core::{MapEngine, Session};

/// Result of a stress run.
#[derive(Debug, Clone)]
pub struct StressReport {
    /// Transactions committed across all threads.
    pub committed: usize,
    /// Transactions rolled back across all threads.
    pub rolled_back: usize,
    /// Total duration of the run.
    pub duration: Duration,
}

impl StressReport {
    /// Transactions finished per second.
    #[must_use]
    pub fn txns_per_second(&self) -> f64 {
        let total = (self.committed + self.rolled_back) as f64;
        if self.duration.as_secs_f64() > 0.0 {
            total / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Runs a mixed put/remove workload over a small shared keyspace.
///
/// Each thread owns one session and runs `txns_per_thread` transactions;
/// even-numbered transactions commit, odd-numbered ones roll back. All
/// threads hammer the same keys, so commits interleave on identical keys
/// and exercise the last-committer-wins merge path.
pub fn run_mixed_workload(
    engine: &Arc<MapEngine<String, String>>,
    threads: usize,
    txns_per_thread: usize,
) -> StressReport {
    let keys = ["a", "b", "c", "d", "e"];
    let start = Instant::now();

    let handles: Vec<_> = (0..threads)
        .map(|thread_idx| {
            let engine = Arc::clone(engine);
            thread::spawn(move || {
                let mut session = Session::new(engine);
                let mut committed = 0;
                let mut rolled_back = 0;

                for txn_idx in 0..txns_per_thread {
                    session.begin().expect("session is unbound between txns");
                    for (op_idx, key) in keys.iter().enumerate() {
                        if (txn_idx + op_idx) % 3 == 0 {
                            session.remove(&(*key).to_owned()).unwrap();
                        } else {
                            let value = format!("t{thread_idx}-x{txn_idx}");
                            session.put((*key).to_owned(), value).unwrap();
                        }
                    }
                    if txn_idx % 2 == 0 {
                        session.commit().unwrap();
                        committed += 1;
                    } else {
                        session.rollback().unwrap();
                        rolled_back += 1;
                    }
                }
                (committed, rolled_back)
            })
        })
        .collect();

    let mut committed = 0;
    let mut rolled_back = 0;
    for handle in handles {
        let (c, r) = handle.join().expect("stress thread panicked");
        committed += c;
        rolled_back += r;
    }

    StressReport {
        committed,
        rolled_back,
        duration: start.elapsed(),
    }
}
