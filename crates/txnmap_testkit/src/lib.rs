//! # TxnMap Testkit
//!
//! Test utilities for TxnMap.
//!
//! This crate provides:
//! - Engine and session fixtures with seeded data
//! - A transaction-propagation driver (`required`, `requires_new`,
//!   `not_supported`) mirroring host transaction managers
//! - Property-based test generators using proptest
//! - Multithreaded stress helpers
//!
//! ## Usage
//!
//! ```rust
//! use txnmap_testkit::prelude::*;
//!
//! let map = TestMap::seeded(&[("k", "v")]);
//! let mut session = map.session();
//! required(&mut session, |s| {
//!     s.put("k2".to_owned(), "v2".to_owned()).unwrap();
//!     Ok::<(), ()>(())
//! })
//! .unwrap();
//! assert_eq!(map.engine.len(None).unwrap(), 2);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod propagation;
pub mod stress;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::propagation::*;
    pub use crate::stress::*;
}

pub use fixtures::*;
pub use generators::*;
pub use propagation::*;
pub use stress::*;
