//! # TxnMap Core
//!
//! An in-memory map with transactional semantics and read-committed
//! isolation.
//!
//! Concurrent logical transactions read and mutate a shared backing store;
//! each transaction's changes become visible to others only on commit and
//! are fully discarded on rollback. Suspend/resume detaches a transaction
//! from its calling context without ending it, so nested independent units
//! of work can run without seeing or being seen by it.
//!
//! ## Isolation model
//!
//! - A transaction sees its own uncommitted writes immediately.
//! - A transaction never sees another transaction's uncommitted writes.
//! - A transaction sees the latest value committed by any other transaction
//!   since its own last read (read-committed, not snapshot isolation).
//! - Write-write conflicts are **not** detected; two transactions committing
//!   the same key merge in some serial order of their commit calls and the
//!   last committer wins.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use txnmap_core::{MapEngine, Session};
//!
//! let engine = Arc::new(MapEngine::new());
//! let mut session = Session::new(Arc::clone(&engine));
//!
//! session.begin().unwrap();
//! session.put("key".to_owned(), "value".to_owned()).unwrap();
//!
//! // Invisible to other contexts until commit.
//! assert_eq!(engine.get(None, &"key".to_owned()).unwrap(), None);
//!
//! session.commit().unwrap();
//! assert_eq!(
//!     engine.get(None, &"key".to_owned()).unwrap(),
//!     Some("value".to_owned())
//! );
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod engine;
mod error;
mod overlay;
mod session;
mod stats;
mod store;
mod transaction;
mod types;

pub use config::Config;
pub use engine::MapEngine;
pub use error::{MapError, MapResult};
pub use overlay::{Overlay, OverlayEntry};
pub use session::Session;
pub use stats::{EngineStats, StatsSnapshot};
pub use store::BaseStore;
pub use transaction::{TransactionContext, TransactionRegistry, TransactionState};
pub use types::{StoreVersion, TransactionId};
