//! Entity records and their JSON encoding.

pub(crate) mod amount;
mod show;
mod theatre;
mod ticket;
mod window;

pub use show::Show;
pub use theatre::Theatre;
pub use ticket::{Ticket, TicketStage};
pub use window::Window;

use crate::error::{ContractError, ContractResult};
use crate::types::DocType;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

/// Trait for records stored under a `<DOCTYPE><id>` key.
///
/// Implementors provide the document type and the identifier; encoding is
/// JSON with camelCase field names and a `docType` discriminator.
pub trait Entity: Serialize + DeserializeOwned {
    /// Document type and key prefix.
    const DOC_TYPE: DocType;

    /// Identifier type.
    type Id: fmt::Display + Copy;

    /// Returns the entity's identifier.
    fn id(&self) -> Self::Id;

    /// Returns the ledger key for `id`.
    fn key_for(id: Self::Id) -> String {
        Self::DOC_TYPE.key(id)
    }

    /// Returns this entity's ledger key.
    fn key(&self) -> String {
        Self::key_for(self.id())
    }

    /// Encodes the entity as JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn encode(&self) -> ContractResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|source| ContractError::Encode {
            key: self.key(),
            source,
        })
    }

    /// Decodes an entity read from `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a valid record.
    fn decode(key: &str, bytes: &[u8]) -> ContractResult<Self> {
        serde_json::from_slice(bytes).map_err(|source| ContractError::CorruptRecord {
            key: key.to_string(),
            source,
        })
    }
}
