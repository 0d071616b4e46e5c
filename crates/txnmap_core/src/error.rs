//! Error types for the transactional map engine.

use crate::types::TransactionId;
use thiserror::Error;

/// Result type for map engine operations.
pub type MapResult<T> = Result<T, MapError>;

/// Errors that can occur in map engine operations.
///
/// Both variants indicate a caller protocol violation. The engine never
/// retries and takes no corrective action. Ordinary map misses (absent keys)
/// are `None` results, not errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MapError {
    /// Operation referenced a transaction id absent from the registry,
    /// either already reclaimed or never started.
    #[error("unknown transaction: {id}")]
    UnknownTransaction {
        /// The id that was not found.
        id: TransactionId,
    },

    /// Lifecycle call incompatible with the transaction's current state.
    #[error("invalid transaction state: {message}")]
    InvalidState {
        /// Description of the protocol violation.
        message: String,
    },
}

impl MapError {
    /// Creates an unknown transaction error.
    pub fn unknown_transaction(id: TransactionId) -> Self {
        Self::UnknownTransaction { id }
    }

    /// Creates an invalid state error.
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }
}
