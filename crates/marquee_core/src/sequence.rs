//! Ledger-resident sequence counters.
//!
//! Counters are ordinary ledger records, so an allocation is a
//! read-modify-write inside the caller's transaction. Two transactions that
//! allocate from the same counter both read its key; the ledger lets at most
//! one of them commit.

use crate::error::{ContractError, ContractResult};
use crate::store::EntityStore;
use marquee_ledger::LedgerStub;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// A named string property. Backs the sequence counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    /// Property key; also its ledger key.
    pub key: String,
    /// Value as a decimal string.
    pub value: String,
}

/// The sequence counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Counter {
    /// Allocates show ids.
    NextShowId,
    /// Allocates ticket numbers.
    NextTicketId,
}

impl Counter {
    /// All counters, in initialization order.
    pub const ALL: [Counter; 2] = [Counter::NextShowId, Counter::NextTicketId];

    /// Returns the counter's ledger key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::NextShowId => "NEXT_SHOW_ID",
            Self::NextTicketId => "NEXT_TICKET_ID",
        }
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Allocates monotonically increasing ids from [`Counter`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceAllocator;

impl SequenceAllocator {
    /// Seeds every counter with `0`.
    ///
    /// # Errors
    ///
    /// Returns an error if a write fails.
    pub fn init<S: LedgerStub + ?Sized>(store: &mut EntityStore<'_, S>) -> ContractResult<()> {
        for counter in Counter::ALL {
            Self::set(store, counter, 0)?;
        }
        Ok(())
    }

    /// Returns the last allocated value without advancing.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::NotFound`] if the counter was never
    /// initialized, or [`ContractError::CorruptCounter`] if its value is not
    /// an integer.
    pub fn current<S: LedgerStub + ?Sized>(
        store: &mut EntityStore<'_, S>,
        counter: Counter,
    ) -> ContractResult<u64> {
        let property: Property = store
            .get_json(counter.key())?
            .ok_or_else(|| ContractError::not_found(counter.key()))?;
        property
            .value
            .parse()
            .map_err(|_| ContractError::CorruptCounter {
                key: counter.key().to_string(),
                value: property.value,
            })
    }

    /// Advances the counter and returns the new value.
    ///
    /// The caller must write the entity it numbers in the same transaction.
    ///
    /// # Errors
    ///
    /// Same as [`SequenceAllocator::current`], plus write failures.
    pub fn next<S: LedgerStub + ?Sized>(
        store: &mut EntityStore<'_, S>,
        counter: Counter,
    ) -> ContractResult<u64> {
        let current = Self::current(store, counter)?;
        let next = current
            .checked_add(1)
            .ok_or_else(|| ContractError::CorruptCounter {
                key: counter.key().to_string(),
                value: current.to_string(),
            })?;
        Self::set(store, counter, next)?;
        debug!(%counter, value = next, "allocated");
        Ok(next)
    }

    fn set<S: LedgerStub + ?Sized>(
        store: &mut EntityStore<'_, S>,
        counter: Counter,
        value: u64,
    ) -> ContractResult<()> {
        let property = Property {
            key: counter.key().to_string(),
            value: value.to_string(),
        };
        store.put_json(counter.key(), &property)
    }
}
