//! The ledger contract seen by transaction logic.

use crate::error::LedgerResult;

/// A document returned by a rich query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRecord {
    /// Ledger key of the document.
    pub key: String,
    /// Raw stored bytes.
    pub value: Vec<u8>,
}

/// Lazily evaluated rich-query results.
pub type QueryIter<'a> = Box<dyn Iterator<Item = LedgerResult<QueryRecord>> + 'a>;

/// Transaction-scoped access to the ledger.
///
/// Every call is scoped to one transaction. The ledger owns storage,
/// versioning and conflict detection; implementors only buffer and forward.
///
/// # Invariants
///
/// - `get_state` returns the transaction's own pending write for a key if
///   there is one, otherwise the last committed value
/// - `put_state` is invisible to other transactions until commit
/// - `query` evaluates against committed state only
/// - `tx_id` is stable for the transaction's lifetime
///
/// # Implementors
///
/// - [`crate::LedgerTransaction`] - transactions of the in-memory ledger
pub trait LedgerStub {
    /// Returns the identifier of the current transaction.
    fn tx_id(&self) -> &str;

    /// Reads the value stored at `key`.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty or the transaction is closed.
    fn get_state(&mut self, key: &str) -> LedgerResult<Option<Vec<u8>>>;

    /// Buffers a write of `value` at `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty or the transaction is closed.
    fn put_state(&mut self, key: &str, value: Vec<u8>) -> LedgerResult<()>;

    /// Runs a rich query and returns matching documents.
    ///
    /// # Errors
    ///
    /// Returns an error if the query cannot be parsed by the query engine.
    fn query(&self, query: &str) -> LedgerResult<QueryIter<'_>>;
}

impl<S: LedgerStub + ?Sized> LedgerStub for &mut S {
    fn tx_id(&self) -> &str {
        (**self).tx_id()
    }

    fn get_state(&mut self, key: &str) -> LedgerResult<Option<Vec<u8>>> {
        (**self).get_state(key)
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> LedgerResult<()> {
        (**self).put_state(key, value)
    }

    fn query(&self, query: &str) -> LedgerResult<QueryIter<'_>> {
        (**self).query(query)
    }
}
