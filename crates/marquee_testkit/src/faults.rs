//! Fault injection.

use marquee_ledger::{LedgerError, LedgerResult, LedgerStub, QueryIter};
use std::io;

/// A stub wrapper whose writes start failing after a budget is spent.
///
/// Wrap the transaction handed out by the ledger to make an operation fail
/// part way through its writes.
#[derive(Debug)]
pub struct FailingStub<S> {
    inner: S,
    writes_left: usize,
}

impl<S: LedgerStub> FailingStub<S> {
    /// Allows `writes` successful writes, then fails every write after.
    pub fn new(inner: S, writes: usize) -> Self {
        Self {
            inner,
            writes_left: writes,
        }
    }

    /// Returns the wrapped stub.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: LedgerStub> LedgerStub for FailingStub<S> {
    fn tx_id(&self) -> &str {
        self.inner.tx_id()
    }

    fn get_state(&mut self, key: &str) -> LedgerResult<Option<Vec<u8>>> {
        self.inner.get_state(key)
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> LedgerResult<()> {
        if self.writes_left == 0 {
            return Err(LedgerError::Io(io::Error::other(format!(
                "injected write failure at {key}"
            ))));
        }
        self.writes_left -= 1;
        self.inner.put_state(key, value)
    }

    fn query(&self, query: &str) -> LedgerResult<QueryIter<'_>> {
        self.inner.query(query)
    }
}
