//! Invoke command implementation.

use super::{CliResult, Session};

/// Invokes `function` in a fresh transaction and returns the payload.
pub fn execute(
    session: &Session,
    function: &str,
    args: &[String],
    tx_id: Option<String>,
) -> CliResult<Vec<u8>> {
    session.execute(tx_id, |contract, txn| contract.invoke(txn, function, args))
}

/// Runs the invoke command.
pub fn run(
    session: &Session,
    function: &str,
    args: &[String],
    tx_id: Option<String>,
) -> CliResult<()> {
    let payload = execute(session, function, args, tx_id)?;
    println!("{}", String::from_utf8_lossy(&payload));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CliError;
    use marquee_core::{Config, ErrorKind, IdScheme};

    fn session(dir: &tempfile::TempDir) -> Session {
        let session = Session::new(
            dir.path().join("state.json"),
            Config::new().id_scheme(IdScheme::CharSum),
        );
        crate::commands::init::run(&session, Some("deploy".into())).unwrap();
        session
    }

    #[test]
    fn committed_invocation_persists() {
        let dir = tempfile::tempdir().unwrap();
        let session = session(&dir);

        let payload = execute(
            &session,
            "registerTheatre",
            &[r#"{"theatreName":"Rex","windows":1,"ticketsPerShow":10,"showsDaily":1,"sodaStock":5,"halls":1}"#.to_string()],
            Some("abc".into()),
        )
        .unwrap();
        assert_eq!(payload, b"MovieTheatre Number:294");

        let ledger = session.open().unwrap();
        assert!(ledger.get("THEATRE294").is_some());
        assert!(ledger.get("WINDOW1").is_some());
    }

    #[test]
    fn rejected_invocation_leaves_snapshot_alone() {
        let dir = tempfile::tempdir().unwrap();
        let session = session(&dir);
        let before = std::fs::read_to_string(session.state()).unwrap();

        let err = execute(&session, "issueCoupon", &[r#"{"ticketNo":9}"#.to_string()], None)
            .unwrap_err();
        assert!(matches!(err, CliError::Contract(ref e) if e.kind() == ErrorKind::NotFound));
        assert_eq!(std::fs::read_to_string(session.state()).unwrap(), before);
    }
}
