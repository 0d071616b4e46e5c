//! End-to-end scenarios driving the engine through sessions and the
//! propagation helpers, the way a host transaction manager would.

use txnmap_testkit::prelude::*;

fn s(text: &str) -> String {
    text.to_owned()
}

#[test]
fn committed_value_visible_to_next_transaction() {
    init_tracing();
    let map = TestMap::new();
    let mut session = map.session();

    session.begin().unwrap();
    session.put(s("k"), s("v0")).unwrap();
    session.commit().unwrap();

    session.begin().unwrap();
    assert_eq!(session.get(&s("k")).unwrap(), Some(s("v0")));
    session.rollback().unwrap();
}

#[test]
fn suspended_outer_and_independent_inner() {
    // T1 stages "a"="1" and is suspended; T2 runs independently, writes
    // "a"="2" and commits; T1 resumes, still sees its own overlay, and its
    // later commit wins.
    let map = TestMap::new();
    let mut session = map.session();

    session.begin().unwrap();
    session.put(s("a"), s("1")).unwrap();
    let outer = session.suspend().unwrap();

    session.begin().unwrap();
    assert_eq!(session.get(&s("a")).unwrap(), None);
    session.put(s("a"), s("2")).unwrap();
    session.commit().unwrap();

    session.resume(outer).unwrap();
    assert_eq!(session.get(&s("a")).unwrap(), Some(s("1")));
    session.commit().unwrap();

    assert_eq!(map.engine.get(None, &s("a")).unwrap(), Some(s("1")));
}

#[test]
fn auto_commit_outside_any_transaction() {
    let map = TestMap::new();
    let mut session = map.session();

    session.begin().unwrap();
    session.put(s("x"), s("1")).unwrap();
    session.commit().unwrap();
    assert_eq!(session.len().unwrap(), 1);

    session.remove(&s("x")).unwrap();
    assert_eq!(session.len().unwrap(), 0);
}

#[test]
fn rolled_back_overwrite_leaves_committed_value() {
    let map = TestMap::new();
    let mut session = map.session();

    session.begin().unwrap();
    session.put(s("k1"), s("value1")).unwrap();
    session.commit().unwrap();

    session.begin().unwrap();
    assert_eq!(session.get(&s("k1")).unwrap(), Some(s("value1")));
    session.put(s("k1"), s("otherValue")).unwrap();
    session.rollback().unwrap();

    assert_eq!(session.get(&s("k1")).unwrap(), Some(s("value1")));
    assert_eq!(map.engine.get(None, &s("k1")).unwrap(), Some(s("value1")));
}

#[test]
fn inner_failure_rolls_back_only_the_inner_transaction() {
    // An outer REQUIRED scope stages a write; a REQUIRES_NEW scope
    // overwrites the same key and fails. The inner rollback must not
    // disturb the outer overlay, and the outer commit publishes both keys.
    let map = TestMap::new();
    let mut session = map.session();

    session.put(s("key0"), s("value0")).unwrap();

    required(&mut session, |outer| {
        outer.put(s("key1"), s("value1")).unwrap();

        let result: Result<(), &str> = requires_new(outer, |inner| {
            inner.put(s("key1"), s("otherValue")).unwrap();
            Err("inner failure")
        });
        assert_eq!(result, Err("inner failure"));

        // The outer overlay is untouched by the inner rollback.
        assert_eq!(outer.get(&s("key1")).unwrap(), Some(s("value1")));
        Ok::<(), ()>(())
    })
    .unwrap();

    assert_eq!(map.engine.len(None).unwrap(), 2);
    assert_eq!(map.engine.get(None, &s("key1")).unwrap(), Some(s("value1")));
}

#[test]
fn suspended_work_is_invisible_to_nested_scopes() {
    let map = TestMap::new();
    let mut session = map.session();

    session.put(s("test1"), s("value1")).unwrap();

    required(&mut session, |outer| {
        assert_eq!(outer.get(&s("test1")).unwrap(), Some(s("value1")));
        outer.put(s("test2"), s("value2")).unwrap();

        requires_new(outer, |inner| {
            // The suspended outer overlay must not leak in.
            assert!(!inner.contains_key(&s("test2")).unwrap());
            inner.put(s("test3"), s("value3")).unwrap();

            not_supported(inner, |none| {
                // No ambient transaction at all: neither pending overlay
                // is visible.
                assert!(!none.contains_key(&s("test3")).unwrap());
                assert!(!none.contains_key(&s("test2")).unwrap());
            });
            Ok::<(), ()>(())
        })?;

        // Back in the outer scope: own overlay plus the inner commit.
        assert!(outer.contains_key(&s("test2")).unwrap());
        assert!(outer.contains_key(&s("test3")).unwrap());
        Ok::<(), ()>(())
    })
    .unwrap();
}

#[test]
fn double_commit_reports_invalid_state_once_terminal() {
    let map = TestMap::new();
    let engine = &map.engine;

    let txn = engine.start();
    engine.put(Some(txn), s("k"), s("v")).unwrap();
    engine.commit(txn).unwrap();

    let second = engine.commit(txn);
    assert!(matches!(
        second,
        Err(txnmap_core::MapError::InvalidState { .. })
    ));
    assert_eq!(engine.get(None, &s("k")).unwrap(), Some(s("v")));
}

#[test]
fn handing_a_suspended_transaction_to_another_session() {
    let map = TestMap::new();
    let mut first = map.session();
    let mut second = map.session();

    first.begin().unwrap();
    first.put(s("k"), s("pending")).unwrap();
    let suspended = first.suspend().unwrap();

    // A different calling context resumes and finishes the transaction.
    second.resume(suspended).unwrap();
    assert_eq!(second.get(&s("k")).unwrap(), Some(s("pending")));
    second.commit().unwrap();

    assert_eq!(map.engine.get(None, &s("k")).unwrap(), Some(s("pending")));
}
