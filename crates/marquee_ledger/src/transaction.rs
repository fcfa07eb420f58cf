//! Transaction state for the in-memory ledger.

use crate::error::{LedgerError, LedgerResult};
use crate::memory::InMemoryLedger;
use crate::query::RichQuery;
use crate::stub::{LedgerStub, QueryIter};
use std::collections::HashMap;

/// State of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    /// Transaction is active and can perform operations.
    Active,
    /// Transaction has been committed.
    Committed,
    /// Transaction has been aborted.
    Aborted,
}

impl TransactionState {
    fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Committed => "committed",
            Self::Aborted => "aborted",
        }
    }
}

/// An active transaction against an [`InMemoryLedger`].
///
/// Writes are buffered until [`InMemoryLedger::commit`]. Reads are recorded
/// with the version they observed so commit can detect conflicting writers.
#[derive(Debug)]
pub struct LedgerTransaction<'a> {
    ledger: &'a InMemoryLedger,
    tx_id: String,
    state: TransactionState,
    /// Pending writes: key -> value.
    writes: HashMap<String, Vec<u8>>,
    /// Keys in the order they were first written.
    write_order: Vec<String>,
    /// Read set: key -> version observed (`None` if absent).
    reads: HashMap<String, Option<u64>>,
}

impl<'a> LedgerTransaction<'a> {
    pub(crate) fn new(ledger: &'a InMemoryLedger, tx_id: String) -> Self {
        Self {
            ledger,
            tx_id,
            state: TransactionState::Active,
            writes: HashMap::new(),
            write_order: Vec::new(),
            reads: HashMap::new(),
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// Checks if the transaction is still active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state == TransactionState::Active
    }

    /// Returns the number of distinct keys written.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.len()
    }

    /// Returns written keys in first-write order.
    pub fn written_keys(&self) -> impl Iterator<Item = &str> {
        self.write_order.iter().map(String::as_str)
    }

    /// Returns the read set.
    pub fn read_set(&self) -> impl Iterator<Item = (&str, Option<u64>)> {
        self.reads.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub(crate) fn pending_writes(&self) -> impl Iterator<Item = (&String, &Vec<u8>)> {
        self.write_order
            .iter()
            .filter_map(|key| self.writes.get_key_value(key))
    }

    pub(crate) fn mark_committed(&mut self) {
        self.state = TransactionState::Committed;
    }

    pub(crate) fn mark_aborted(&mut self) {
        self.state = TransactionState::Aborted;
        self.writes.clear();
        self.write_order.clear();
    }

    pub(crate) fn ensure_active(&self) -> LedgerResult<()> {
        match self.state {
            TransactionState::Active => Ok(()),
            other => Err(LedgerError::TransactionClosed {
                tx_id: self.tx_id.clone(),
                state: other.as_str(),
            }),
        }
    }
}

impl LedgerStub for LedgerTransaction<'_> {
    fn tx_id(&self) -> &str {
        &self.tx_id
    }

    fn get_state(&mut self, key: &str) -> LedgerResult<Option<Vec<u8>>> {
        self.ensure_active()?;
        if key.is_empty() {
            return Err(LedgerError::EmptyKey);
        }

        if let Some(value) = self.writes.get(key) {
            return Ok(Some(value.clone()));
        }

        let committed = self.ledger.read_committed(key);
        // First observation wins; a re-read sees the same snapshot version
        self.reads
            .entry(key.to_string())
            .or_insert_with(|| committed.as_ref().map(|(_, version)| *version));
        Ok(committed.map(|(value, _)| value))
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> LedgerResult<()> {
        self.ensure_active()?;
        if key.is_empty() {
            return Err(LedgerError::EmptyKey);
        }

        if self.writes.insert(key.to_string(), value).is_none() {
            self.write_order.push(key.to_string());
        }
        Ok(())
    }

    fn query(&self, query: &str) -> LedgerResult<QueryIter<'_>> {
        self.ensure_active()?;
        let parsed = RichQuery::parse(query)?;
        Ok(self.ledger.query_committed(parsed))
    }
}
