//! Transaction propagation drivers.
//!
//! Host transaction managers expose propagation policies that decide how a
//! unit of work relates to the ambient transaction. These helpers implement
//! the three policies the engine's suspend/resume primitives exist for,
//! using nothing but the public lifecycle API:
//!
//! - [`required`]: join the ambient transaction, or run in a new one.
//! - [`requires_new`]: suspend the ambient transaction and run in a fresh,
//!   independent transaction that commits or rolls back on its own.
//! - [`not_supported`]: suspend the ambient transaction and run without any
//!   transaction (auto-commit).
//!
//! An action returning `Err` rolls its transaction back; `Ok` commits it.

use std::hash::Hash;
use txnmap_core::Session;

/// Runs the action inside the ambient transaction, starting one if needed.
///
/// If the session already has a current transaction the action simply joins
/// it and the existing owner stays responsible for its outcome. Otherwise a
/// new transaction wraps the action: committed on `Ok`, rolled back on
/// `Err`.
pub fn required<K, V, R, E>(
    session: &mut Session<K, V>,
    action: impl FnOnce(&mut Session<K, V>) -> Result<R, E>,
) -> Result<R, E>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    if session.current_transaction().is_some() {
        return action(session);
    }

    session.begin().expect("session has no current transaction");
    match action(session) {
        Ok(value) => {
            session.commit().expect("commit of owned transaction");
            Ok(value)
        }
        Err(err) => {
            session.rollback().expect("rollback of owned transaction");
            Err(err)
        }
    }
}

/// Runs the action in a new transaction, independent of the ambient one.
///
/// The ambient transaction (if any) is suspended for the duration, so the
/// inner work neither sees its pending writes nor is attributed to it. The
/// inner transaction commits on `Ok` and rolls back on `Err`; either way the
/// ambient transaction is resumed afterwards.
pub fn requires_new<K, V, R, E>(
    session: &mut Session<K, V>,
    action: impl FnOnce(&mut Session<K, V>) -> Result<R, E>,
) -> Result<R, E>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    let suspended = session
        .current_transaction()
        .map(|_| session.suspend().expect("suspend of current transaction"));

    session.begin().expect("session has no current transaction");
    let outcome = match action(session) {
        Ok(value) => {
            session.commit().expect("commit of inner transaction");
            Ok(value)
        }
        Err(err) => {
            session.rollback().expect("rollback of inner transaction");
            Err(err)
        }
    };

    if let Some(id) = suspended {
        session.resume(id).expect("resume of suspended transaction");
    }
    outcome
}

/// Runs the action without any transaction.
///
/// The ambient transaction (if any) is suspended for the duration; the
/// action's operations act directly on the committed state (auto-commit).
pub fn not_supported<K, V, R>(
    session: &mut Session<K, V>,
    action: impl FnOnce(&mut Session<K, V>) -> R,
) -> R
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    let suspended = session
        .current_transaction()
        .map(|_| session.suspend().expect("suspend of current transaction"));

    let outcome = action(session);

    if let Some(id) = suspended {
        session.resume(id).expect("resume of suspended transaction");
    }
    outcome
}
