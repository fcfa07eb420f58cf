//! Dump command implementation.

use super::{CliError, CliResult, Session};
use serde::Serialize;

/// One ledger record.
#[derive(Debug, Serialize)]
pub struct DumpRecord {
    /// Ledger key.
    pub key: String,
    /// Stored document.
    pub value: serde_json::Value,
}

/// Reads every record in the snapshot, in key order.
pub fn collect(session: &Session) -> CliResult<Vec<DumpRecord>> {
    let ledger = session.open()?;
    ledger
        .entries()
        .into_iter()
        .map(|(key, bytes)| -> CliResult<DumpRecord> {
            let value = serde_json::from_slice(&bytes)?;
            Ok(DumpRecord { key, value })
        })
        .collect()
}

/// Runs the dump command.
pub fn run(session: &Session, format: &str) -> CliResult<()> {
    let records = collect(session)?;
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        "text" => {
            println!("Ledger: {}", session.state().display());
            println!("Records: {}", records.len());
            for record in &records {
                println!("  {} = {}", record.key, record.value);
            }
        }
        other => return Err(CliError::Format(other.to_string())),
    }
    Ok(())
}
