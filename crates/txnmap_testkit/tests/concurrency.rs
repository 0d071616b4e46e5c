//! Concurrency tests: invariants under parallel sessions.

use std::sync::Arc;
use std::thread;
use txnmap_core::{MapEngine, Session};
use txnmap_testkit::prelude::*;

fn s(text: &str) -> String {
    text.to_owned()
}

#[test]
fn mixed_workload_leaves_only_committed_values() {
    init_tracing();
    let engine = Arc::new(MapEngine::new());
    let report = run_mixed_workload(&engine, 4, 25);

    assert_eq!(report.committed, 4 * 13);
    assert_eq!(report.rolled_back, 4 * 12);

    // Every surviving value was written by a committed transaction: the
    // workload commits even-numbered transactions only, and values carry
    // their transaction number as "t{thread}-x{txn}".
    for (key, value) in engine.entries(None).unwrap() {
        let txn_idx: usize = value
            .rsplit_once('x')
            .unwrap_or_else(|| panic!("unexpected value {value} for key {key}"))
            .1
            .parse()
            .expect("value suffix is a transaction number");
        assert_eq!(txn_idx % 2, 0, "key {key} holds rolled-back value {value}");
    }

    let stats = engine.stats();
    assert_eq!(stats.active_transactions, 0);
    assert_eq!(stats.suspended_transactions, 0);
}

#[test]
fn concurrent_commits_on_disjoint_keys_all_land() {
    let engine: Arc<MapEngine<String, String>> = Arc::new(MapEngine::new());

    let handles: Vec<_> = (0..8)
        .map(|idx| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let mut session = Session::new(engine);
                session.begin().unwrap();
                session
                    .put(format!("key-{idx}"), format!("value-{idx}"))
                    .unwrap();
                session.commit().unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(engine.len(None).unwrap(), 8);
    for idx in 0..8 {
        assert_eq!(
            engine.get(None, &format!("key-{idx}")).unwrap(),
            Some(format!("value-{idx}"))
        );
    }
}

#[test]
fn readers_never_observe_uncommitted_writes() {
    let engine: Arc<MapEngine<String, String>> = Arc::new(MapEngine::new());
    engine.put(None, s("k"), s("committed")).unwrap();

    let writer_engine = Arc::clone(&engine);
    let writer = thread::spawn(move || {
        let mut session = Session::new(writer_engine);
        for _ in 0..200 {
            session.begin().unwrap();
            session.put(s("k"), s("uncommitted")).unwrap();
            session.rollback().unwrap();
        }
    });

    let reader_engine = Arc::clone(&engine);
    let reader = thread::spawn(move || {
        let session = Session::new(reader_engine);
        for _ in 0..200 {
            // Rolled-back overlays must never leak into committed reads.
            assert_eq!(session.get(&s("k")).unwrap(), Some(s("committed")));
        }
    });

    writer.join().unwrap();
    reader.join().unwrap();
}

#[test]
fn same_key_commits_serialize_to_one_winner() {
    let engine: Arc<MapEngine<String, String>> = Arc::new(MapEngine::new());

    let handles: Vec<_> = (0..8)
        .map(|idx| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let mut session = Session::new(engine);
                session.begin().unwrap();
                session.put(s("contended"), format!("writer-{idx}")).unwrap();
                session.commit().unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // No conflict detection: exactly one writer's value survives, whole.
    let value = engine.get(None, &s("contended")).unwrap().unwrap();
    assert!(value.starts_with("writer-"));
    assert_eq!(engine.len(None).unwrap(), 1);
}
