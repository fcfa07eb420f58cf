//! Init command implementation.

use super::{CliResult, Session};

/// Runs the init command.
pub fn run(session: &Session, tx_id: Option<String>) -> CliResult<()> {
    session.execute(tx_id, |contract, txn| contract.init(txn))?;
    println!("initialized {}", session.state().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_core::{Config, Counter};

    #[test]
    fn init_writes_counters_to_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::new(dir.path().join("state.json"), Config::default());

        run(&session, Some("deploy".into())).unwrap();

        let ledger = session.open().unwrap();
        for counter in Counter::ALL {
            let bytes = ledger.get(counter.key()).unwrap();
            let property: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(property["value"], "0");
        }
    }
}
