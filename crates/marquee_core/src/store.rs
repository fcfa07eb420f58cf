//! Typed entity access over a ledger transaction.

use crate::entity::Entity;
use crate::error::{ContractError, ContractResult};
use marquee_ledger::{LedgerStub, QueryIter};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// Provides typed reads and writes within one ledger transaction.
///
/// The `EntityStore` is a convenience layer over a [`LedgerStub`]: it maps
/// entities to their namespaced keys and handles JSON encoding. It adds no
/// caching, so every read reflects the transaction's own writes plus the
/// last committed state.
pub struct EntityStore<'s, S: LedgerStub + ?Sized> {
    stub: &'s mut S,
}

impl<'s, S: LedgerStub + ?Sized> EntityStore<'s, S> {
    /// Creates a store over a transaction.
    pub fn new(stub: &'s mut S) -> Self {
        Self { stub }
    }

    /// Returns the current transaction id.
    pub fn tx_id(&self) -> &str {
        self.stub.tx_id()
    }

    /// Loads an entity by id.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::NotFound`] if the key is absent, or a storage
    /// error if the read or decode fails.
    pub fn load<E: Entity>(&mut self, id: E::Id) -> ContractResult<E> {
        let key = E::key_for(id);
        match self.stub.get_state(&key)? {
            Some(bytes) => E::decode(&key, &bytes),
            None => Err(ContractError::not_found(key)),
        }
    }

    /// Loads an entity by id, returning `None` if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the read or decode fails.
    pub fn try_load<E: Entity>(&mut self, id: E::Id) -> ContractResult<Option<E>> {
        let key = E::key_for(id);
        self.stub
            .get_state(&key)?
            .map(|bytes| E::decode(&key, &bytes))
            .transpose()
    }

    /// Checks if an entity exists.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the read fails.
    pub fn exists<E: Entity>(&mut self, id: E::Id) -> ContractResult<bool> {
        Ok(self.stub.get_state(&E::key_for(id))?.is_some())
    }

    /// Writes an entity under its key.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the write fails.
    pub fn save<E: Entity>(&mut self, entity: &E) -> ContractResult<()> {
        let key = entity.key();
        let bytes = entity.encode()?;
        debug!(%key, bytes = bytes.len(), "put");
        self.stub.put_state(&key, bytes)?;
        Ok(())
    }

    /// Reads an arbitrary JSON record at `key`.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the read or decode fails.
    pub fn get_json<T: DeserializeOwned>(&mut self, key: &str) -> ContractResult<Option<T>> {
        let Some(bytes) = self.stub.get_state(key)? else {
            return Ok(None);
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| ContractError::CorruptRecord {
                key: key.to_string(),
                source,
            })
    }

    /// Writes an arbitrary JSON record at `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the write fails.
    pub fn put_json<T: Serialize>(&mut self, key: &str, value: &T) -> ContractResult<()> {
        let bytes = serde_json::to_vec(value).map_err(|source| ContractError::Encode {
            key: key.to_string(),
            source,
        })?;
        debug!(%key, bytes = bytes.len(), "put");
        self.stub.put_state(key, bytes)?;
        Ok(())
    }

    /// Runs a rich query against the ledger.
    ///
    /// # Errors
    ///
    /// Returns the query engine's error unchanged.
    pub fn query(&self, query: &str) -> ContractResult<QueryIter<'_>> {
        Ok(self.stub.query(query)?)
    }
}

impl<S: LedgerStub + ?Sized> std::fmt::Debug for EntityStore<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityStore")
            .field("tx_id", &self.tx_id())
            .finish_non_exhaustive()
    }
}
