//! Query command implementation.

use super::{invoke, CliResult, Session};

/// Runs the query command.
pub fn run(session: &Session, query: &str) -> CliResult<()> {
    invoke::run(session, "queryByString", &[query.to_string()], None)
}
