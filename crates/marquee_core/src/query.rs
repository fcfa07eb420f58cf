//! Rich-query pass-through.

use crate::error::ContractResult;
use crate::store::EntityStore;
use marquee_ledger::LedgerStub;
use tracing::debug;

/// Forwards query strings to the ledger and packs the hits into a JSON array.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryGateway;

impl QueryGateway {
    /// Runs `query` and returns `[doc1,doc2,...]`.
    ///
    /// Documents are copied as stored, without re-encoding. The query string
    /// is not inspected here.
    ///
    /// # Errors
    ///
    /// Returns the ledger's error if the query is rejected or a result cannot
    /// be read.
    pub fn query<S: LedgerStub + ?Sized>(
        &self,
        store: &EntityStore<'_, S>,
        query: &str,
    ) -> ContractResult<Vec<u8>> {
        debug!(%query, "rich query");

        let mut buffer = vec![b'['];
        let mut count = 0usize;
        for record in store.query(query)? {
            let record = record?;
            if count > 0 {
                buffer.push(b',');
            }
            buffer.extend_from_slice(&record.value);
            count += 1;
        }
        buffer.push(b']');

        debug!(count, result = %String::from_utf8_lossy(&buffer), "query result");
        Ok(buffer)
    }
}
