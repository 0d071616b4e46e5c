//! Transaction contexts and the registry that tracks them.
//!
//! A transaction is an id, a lifecycle state, and an overlay of pending
//! mutations. The registry maps ids to contexts and is the single source of
//! truth for which transactions exist; the engine drives state transitions
//! through it.

mod context;
mod registry;

pub use context::{TransactionContext, TransactionState};
pub use registry::TransactionRegistry;
