//! Error types for ledger operations.

use std::io;
use thiserror::Error;

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// An I/O error occurred while reading or writing a snapshot.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A key read by the transaction was changed by a later commit.
    #[error("read conflict on key {key}: observed version {observed:?}, committed version {current:?}")]
    Conflict {
        /// The conflicting key.
        key: String,
        /// Version observed when the transaction read the key.
        observed: Option<u64>,
        /// Version committed at validation time.
        current: Option<u64>,
    },

    /// The rich query could not be parsed.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Keys must be non-empty.
    #[error("empty key")]
    EmptyKey,

    /// Snapshot data is corrupted.
    #[error("snapshot corrupted: {0}")]
    Corrupted(String),

    /// The transaction is no longer active.
    #[error("transaction {tx_id} is {state}")]
    TransactionClosed {
        /// The transaction id.
        tx_id: String,
        /// Final state of the transaction.
        state: &'static str,
    },
}

impl LedgerError {
    /// Creates an invalid query error.
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery(message.into())
    }

    /// Creates a snapshot corruption error.
    pub fn corrupted(message: impl Into<String>) -> Self {
        Self::Corrupted(message.into())
    }

    /// Returns true if retrying the whole transaction may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}
