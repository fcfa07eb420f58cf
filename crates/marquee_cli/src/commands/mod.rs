//! CLI command implementations.

pub mod dump;
pub mod init;
pub mod invoke;
pub mod query;

use marquee_core::{Config, Contract, ContractError};
use marquee_ledger::{new_tx_id, InMemoryLedger, LedgerError};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The snapshot could not be read or written.
    #[error("snapshot {path}: {source}")]
    Snapshot {
        /// Snapshot path.
        path: PathBuf,
        /// Underlying ledger error.
        #[source]
        source: LedgerError,
    },

    /// The contract rejected the invocation.
    #[error(transparent)]
    Contract(#[from] ContractError),

    /// Unsupported output format.
    #[error("unknown output format: {0}")]
    Format(String),

    /// Output could not be encoded.
    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result type for CLI commands.
pub type CliResult<T> = Result<T, CliError>;

/// A snapshot file plus the contract configuration to run against it.
#[derive(Debug, Clone)]
pub struct Session {
    state: PathBuf,
    contract: Contract,
}

impl Session {
    /// Creates a session over the snapshot at `state`.
    pub fn new(state: PathBuf, config: Config) -> Self {
        Self {
            state,
            contract: Contract::new(config),
        }
    }

    /// Snapshot path.
    pub fn state(&self) -> &Path {
        &self.state
    }

    /// Opens the snapshot, or an empty ledger if the file does not exist.
    pub fn open(&self) -> CliResult<InMemoryLedger> {
        InMemoryLedger::open(&self.state).map_err(|source| self.snapshot_error(source))
    }

    /// Runs `f` in one transaction and saves the snapshot if it commits.
    pub fn execute<T, F>(&self, tx_id: Option<String>, f: F) -> CliResult<T>
    where
        F: FnOnce(&Contract, &mut marquee_ledger::LedgerTransaction<'_>) -> Result<T, ContractError>,
    {
        let ledger = self.open()?;
        let tx_id = tx_id.unwrap_or_else(new_tx_id);
        let result = ledger.transaction(tx_id.as_str(), |txn| f(&self.contract, txn))?;
        ledger
            .save(&self.state)
            .map_err(|source| self.snapshot_error(source))?;
        info!(%tx_id, height = ledger.height(), state = %self.state.display(), "transaction committed");
        Ok(result)
    }

    fn snapshot_error(&self, source: LedgerError) -> CliError {
        CliError::Snapshot {
            path: self.state.clone(),
            source,
        }
    }
}
