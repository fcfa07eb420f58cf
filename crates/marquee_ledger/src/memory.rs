//! In-memory reference ledger.

use crate::error::{LedgerError, LedgerResult};
use crate::query::RichQuery;
use crate::stub::{QueryIter, QueryRecord};
use crate::transaction::LedgerTransaction;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;
use uuid::Uuid;

/// Generates a fresh transaction identifier.
#[must_use]
pub fn new_tx_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[derive(Debug, Clone)]
struct Versioned {
    value: Vec<u8>,
    /// Commit height that last wrote this key.
    version: u64,
}

#[derive(Debug, Default)]
struct LedgerState {
    entries: BTreeMap<String, Versioned>,
    height: u64,
}

/// A versioned key-value ledger held in memory.
///
/// Suitable for:
/// - Unit and integration tests of transaction logic
/// - Local tooling backed by a JSON snapshot file
///
/// Commits are serialized behind a write lock and validated against each
/// transaction's read set, so two transactions that read the same key and
/// both write cannot both commit.
///
/// # Example
///
/// ```rust
/// use marquee_ledger::{InMemoryLedger, LedgerError, LedgerStub};
///
/// let ledger = InMemoryLedger::new();
/// let value = ledger
///     .transaction("tx-1", |txn| {
///         txn.put_state("NEXT_SHOW_ID", br#"{"key":"NEXT_SHOW_ID","value":"0"}"#.to_vec())?;
///         Ok::<_, LedgerError>(42)
///     })
///     .unwrap();
/// assert_eq!(value, 42);
/// assert!(ledger.get("NEXT_SHOW_ID").is_some());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    state: RwLock<LedgerState>,
}

impl InMemoryLedger {
    /// Creates a new empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a ledger with pre-existing committed entries.
    ///
    /// All entries start at version 1.
    #[must_use]
    pub fn with_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<u8>)>,
    {
        let entries: BTreeMap<_, _> = entries
            .into_iter()
            .map(|(key, value)| (key, Versioned { value, version: 1 }))
            .collect();
        let height = u64::from(!entries.is_empty());
        Self {
            state: RwLock::new(LedgerState { entries, height }),
        }
    }

    /// Begins a transaction with the given identifier.
    pub fn begin(&self, tx_id: impl Into<String>) -> LedgerTransaction<'_> {
        LedgerTransaction::new(self, tx_id.into())
    }

    /// Commits a transaction.
    ///
    /// Validates the read set against committed versions and then applies
    /// all pending writes atomically. Returns the commit height, which only
    /// advances when the transaction wrote something.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Conflict`] if a key the transaction read was
    /// committed by another transaction in the meantime; the transaction is
    /// aborted and none of its writes are applied.
    pub fn commit(&self, txn: &mut LedgerTransaction<'_>) -> LedgerResult<u64> {
        txn.ensure_active()?;
        let mut state = self.state.write();

        let conflict = txn.read_set().find_map(|(key, observed)| {
            let current = state.entries.get(key).map(|v| v.version);
            (current != observed).then(|| LedgerError::Conflict {
                key: key.to_string(),
                observed,
                current,
            })
        });
        if let Some(err) = conflict {
            drop(state);
            txn.mark_aborted();
            return Err(err);
        }

        let height = state.height + 1;
        let mut applied = 0usize;
        for (key, value) in txn.pending_writes() {
            state.entries.insert(
                key.clone(),
                Versioned {
                    value: value.clone(),
                    version: height,
                },
            );
            applied += 1;
        }
        if applied > 0 {
            state.height = height;
        }
        let height = state.height;
        drop(state);

        debug!(tx_id = %crate::LedgerStub::tx_id(&*txn), height, writes = applied, "committed");
        txn.mark_committed();
        Ok(height)
    }

    /// Aborts a transaction, discarding its pending writes.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction is not active.
    pub fn abort(&self, txn: &mut LedgerTransaction<'_>) -> LedgerResult<()> {
        txn.ensure_active()?;
        txn.mark_aborted();
        Ok(())
    }

    /// Executes a function within a transaction.
    ///
    /// If the function returns `Ok`, the transaction is committed.
    /// If it returns `Err`, the transaction is aborted.
    ///
    /// # Errors
    ///
    /// Returns the function's error, or the commit error converted into `E`.
    pub fn transaction<F, T, E>(&self, tx_id: impl Into<String>, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut LedgerTransaction<'_>) -> Result<T, E>,
        E: From<LedgerError>,
    {
        let mut txn = self.begin(tx_id);
        match f(&mut txn) {
            Ok(result) => {
                self.commit(&mut txn)?;
                Ok(result)
            }
            Err(e) => {
                // Don't mask the original error
                let _ = self.abort(&mut txn);
                Err(e)
            }
        }
    }

    /// Returns the latest committed value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.read_committed(key).map(|(value, _)| value)
    }

    /// Returns the committed version of `key`.
    #[must_use]
    pub fn version(&self, key: &str) -> Option<u64> {
        self.state.read().entries.get(key).map(|v| v.version)
    }

    /// Returns the current commit height.
    #[must_use]
    pub fn height(&self) -> u64 {
        self.state.read().height
    }

    /// Returns the number of committed keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    /// Returns true if nothing has been committed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.read().entries.is_empty()
    }

    /// Returns a copy of all committed entries in key order.
    #[must_use]
    pub fn entries(&self) -> Vec<(String, Vec<u8>)> {
        self.state
            .read()
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.value.clone()))
            .collect()
    }

    /// Loads a ledger from a JSON snapshot file.
    ///
    /// The snapshot is a JSON object mapping each key to its document.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a JSON object.
    pub fn load(path: &Path) -> LedgerResult<Self> {
        let text = fs::read_to_string(path)?;
        let root: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| LedgerError::corrupted(format!("{}: {e}", path.display())))?;
        let object = root
            .as_object()
            .ok_or_else(|| LedgerError::corrupted("snapshot root must be a JSON object"))?;

        let mut entries = Vec::with_capacity(object.len());
        for (key, doc) in object {
            let bytes = serde_json::to_vec(doc)
                .map_err(|e| LedgerError::corrupted(format!("{key}: {e}")))?;
            entries.push((key.clone(), bytes));
        }
        debug!(path = %path.display(), keys = entries.len(), "loaded snapshot");
        Ok(Self::with_entries(entries))
    }

    /// Opens a snapshot file, or an empty ledger if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be loaded.
    pub fn open(path: &Path) -> LedgerResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::new())
        }
    }

    /// Saves all committed entries to a JSON snapshot file.
    ///
    /// # Errors
    ///
    /// Returns an error if a stored value is not valid JSON or the file
    /// cannot be written.
    pub fn save(&self, path: &Path) -> LedgerResult<()> {
        let mut object = serde_json::Map::new();
        for (key, value) in self.entries() {
            let doc: serde_json::Value = serde_json::from_slice(&value)
                .map_err(|e| LedgerError::corrupted(format!("{key} is not JSON: {e}")))?;
            object.insert(key, doc);
        }
        let text = serde_json::to_string_pretty(&serde_json::Value::Object(object))
            .map_err(|e| LedgerError::corrupted(e.to_string()))?;
        fs::write(path, text)?;
        Ok(())
    }

    pub(crate) fn read_committed(&self, key: &str) -> Option<(Vec<u8>, u64)> {
        self.state
            .read()
            .entries
            .get(key)
            .map(|v| (v.value.clone(), v.version))
    }

    /// Evaluates a query against committed state.
    ///
    /// Entries are copied under the read lock; matching happens as the
    /// returned iterator is consumed.
    pub(crate) fn query_committed(&self, query: RichQuery) -> QueryIter<'static> {
        let entries = self.entries();
        let limit = query.limit().unwrap_or(usize::MAX);
        Box::new(
            entries
                .into_iter()
                .filter_map(move |(key, value)| {
                    let doc: serde_json::Value = serde_json::from_slice(&value).ok()?;
                    query
                        .matches(&doc)
                        .then_some(Ok(QueryRecord { key, value }))
                })
                .take(limit),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LedgerStub;

    fn seeded() -> InMemoryLedger {
        InMemoryLedger::with_entries(vec![
            ("SHOW1".to_string(), br#"{"showID":1,"quantity":10,"docType":"SHOW"}"#.to_vec()),
            ("SHOW2".to_string(), br#"{"showID":2,"quantity":0,"docType":"SHOW"}"#.to_vec()),
            ("WINDOW1".to_string(), br#"{"windowNo":1,"ticketsSold":0,"docType":"WINDOW"}"#.to_vec()),
        ])
    }

    #[test]
    fn new_ledger_is_empty() {
        let ledger = InMemoryLedger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.height(), 0);
    }

    #[test]
    fn read_only_commit_keeps_height() {
        let ledger = InMemoryLedger::with_entries(vec![("A".to_string(), b"1".to_vec())]);
        let mut txn = ledger.begin("tx");
        txn.get_state("A").unwrap();

        assert_eq!(ledger.commit(&mut txn).unwrap(), 1);
        assert_eq!(ledger.height(), 1);

        let mut txn = ledger.begin("tx-2");
        txn.put_state("B", b"2".to_vec()).unwrap();
        assert_eq!(ledger.commit(&mut txn).unwrap(), 2);
    }

    #[test]
    fn commit_applies_writes_atomically() {
        let ledger = InMemoryLedger::new();
        let mut txn = ledger.begin("tx");
        txn.put_state("A", b"1".to_vec()).unwrap();
        txn.put_state("B", b"2".to_vec()).unwrap();

        assert!(ledger.get("A").is_none());
        let height = ledger.commit(&mut txn).unwrap();

        assert_eq!(height, 1);
        assert_eq!(ledger.get("A"), Some(b"1".to_vec()));
        assert_eq!(ledger.version("B"), Some(1));
    }

    #[test]
    fn abort_discards_writes() {
        let ledger = InMemoryLedger::new();
        let mut txn = ledger.begin("tx");
        txn.put_state("A", b"1".to_vec()).unwrap();
        ledger.abort(&mut txn).unwrap();

        assert!(ledger.is_empty());
        assert!(ledger.commit(&mut txn).is_err());
    }

    #[test]
    fn conflicting_reader_cannot_commit() {
        let ledger = seeded();
        let mut first = ledger.begin("tx-1");
        let mut second = ledger.begin("tx-2");

        first.get_state("SHOW1").unwrap();
        second.get_state("SHOW1").unwrap();
        first.put_state("SHOW1", b"{}".to_vec()).unwrap();
        second.put_state("SHOW1", b"{}".to_vec()).unwrap();

        ledger.commit(&mut first).unwrap();
        let result = ledger.commit(&mut second);

        assert!(matches!(result, Err(LedgerError::Conflict { ref key, .. }) if key == "SHOW1"));
        assert!(result.unwrap_err().is_retryable());
    }

    #[test]
    fn phantom_insert_conflicts_with_absent_read() {
        let ledger = InMemoryLedger::new();
        let mut first = ledger.begin("tx-1");
        let mut second = ledger.begin("tx-2");

        assert!(second.get_state("THEATRE9").unwrap().is_none());
        first.put_state("THEATRE9", b"{}".to_vec()).unwrap();
        ledger.commit(&mut first).unwrap();

        assert!(ledger.commit(&mut second).is_err());
    }

    #[test]
    fn disjoint_transactions_both_commit() {
        let ledger = seeded();
        let mut first = ledger.begin("tx-1");
        let mut second = ledger.begin("tx-2");

        first.get_state("SHOW1").unwrap();
        second.get_state("SHOW2").unwrap();
        first.put_state("SHOW1", b"{}".to_vec()).unwrap();
        second.put_state("SHOW2", b"{}".to_vec()).unwrap();

        assert_eq!(ledger.commit(&mut first).unwrap(), 2);
        assert_eq!(ledger.commit(&mut second).unwrap(), 3);
    }

    #[test]
    fn transaction_closure_aborts_on_error() {
        let ledger = InMemoryLedger::new();
        let result: LedgerResult<()> = ledger.transaction("tx", |txn| {
            txn.put_state("A", b"1".to_vec())?;
            Err(LedgerError::invalid_query("boom"))
        });

        assert!(result.is_err());
        assert!(ledger.is_empty());
    }

    #[test]
    fn query_reads_committed_state_only() {
        let ledger = seeded();
        let mut txn = ledger.begin("tx");
        txn.put_state("SHOW3", br#"{"showID":3,"docType":"SHOW"}"#.to_vec())
            .unwrap();

        let keys: Vec<String> = txn
            .query(r#"{"selector":{"docType":"SHOW"}}"#)
            .unwrap()
            .map(|r| r.unwrap().key)
            .collect();
        assert_eq!(keys, vec!["SHOW1", "SHOW2"]);
    }

    #[test]
    fn query_honours_limit() {
        let ledger = seeded();
        let txn = ledger.begin("tx");
        let count = txn
            .query(r#"{"selector":{"docType":"SHOW"},"limit":1}"#)
            .unwrap()
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn snapshot_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");

        let ledger = seeded();
        ledger.save(&path).unwrap();

        let loaded = InMemoryLedger::load(&path).unwrap();
        assert_eq!(loaded.len(), 3);
        let doc: serde_json::Value =
            serde_json::from_slice(&loaded.get("SHOW1").unwrap()).unwrap();
        assert_eq!(doc["quantity"], 10);
    }

    #[test]
    fn open_missing_snapshot_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = InMemoryLedger::open(&dir.path().join("absent.json")).unwrap();
        assert!(ledger.is_empty());
    }

    #[test]
    fn save_rejects_non_json_values() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = InMemoryLedger::with_entries(vec![("RAW".to_string(), vec![0xff])]);
        assert!(matches!(
            ledger.save(&dir.path().join("x.json")),
            Err(LedgerError::Corrupted(_))
        ));
    }

    #[test]
    fn tx_ids_are_unique() {
        assert_ne!(new_tx_id(), new_tx_id());
        assert_eq!(new_tx_id().len(), 32);
    }
}
