//! # Marquee Ledger
//!
//! The ledger contract consumed by the Marquee ticketing logic, plus an
//! in-memory reference ledger.
//!
//! The business logic only ever sees a [`LedgerStub`]: transaction-scoped
//! `get_state`/`put_state`, a rich `query`, and the current transaction id.
//! Production deployments provide the stub from their ledger runtime; this
//! crate provides [`InMemoryLedger`] for tests, tooling and local runs.
//!
//! ## Transaction model
//!
//! - Writes are buffered in a [`LedgerTransaction`] and applied atomically on
//!   commit
//! - Reads see the transaction's own writes, then the last committed state
//! - Every read records the observed key version; commit fails with
//!   [`LedgerError::Conflict`] if any of them changed since
//! - Rich queries read committed state only
//!
//! ## Example
//!
//! ```rust
//! use marquee_ledger::{InMemoryLedger, LedgerStub};
//!
//! let ledger = InMemoryLedger::new();
//! let mut txn = ledger.begin("tx-1");
//! txn.put_state("SHOW1", br#"{"showID":1,"docType":"SHOW"}"#.to_vec()).unwrap();
//! ledger.commit(&mut txn).unwrap();
//!
//! let results: Vec<_> = ledger
//!     .begin("tx-2")
//!     .query(r#"{"selector":{"docType":"SHOW"}}"#)
//!     .unwrap()
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(results.len(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod memory;
mod query;
mod stub;
mod transaction;

pub use error::{LedgerError, LedgerResult};
pub use memory::{new_tx_id, InMemoryLedger};
pub use query::{Condition, Predicate, RichQuery};
pub use stub::{LedgerStub, QueryIter, QueryRecord};
pub use transaction::{LedgerTransaction, TransactionState};
