//! Failed operations leave no partial writes behind.

use marquee_core::{ContractError, ErrorKind, ShowId, TicketNo};
use marquee_testkit::prelude::*;

/// Runs `function` with writes failing after `budget`, and returns the error.
fn fail_after(ledger: &TestLedger, budget: usize, function: &str, arg: &str) -> ContractError {
    let tx_id = ledger.next_tx_id();
    ledger
        .ledger
        .transaction(tx_id.as_str(), |txn| {
            let mut stub = FailingStub::new(txn, budget);
            ledger.contract.invoke(&mut stub, function, &[arg])
        })
        .unwrap_err()
}

#[test]
fn partial_registration_is_discarded() {
    let ledger = TestLedger::new();
    let before = ledger.entries();

    let body = serde_json::to_string(&theatre_spec(3, 1, 1)).unwrap();
    let err = fail_after(&ledger, 2, "registerTheatre", &body);

    assert_eq!(err.kind(), ErrorKind::Storage);
    assert_eq!(ledger.entries(), before);
}

#[test]
fn partial_purchase_is_discarded() {
    let ledger = TestLedger::new();
    let theatre_no = scenarios::registered_theatre(&ledger, &theatre_spec(1, 1, 1));
    let show_id = scenarios::scheduled_show(&ledger, theatre_no, "Heat");
    let before = ledger.entries();

    // Show and window go through, the ticket counter does not.
    fail_after(&ledger, 2, "purchaseTicket", &scenarios::purchase_body(show_id, 1, 10));

    assert_eq!(ledger.entries(), before);
    assert_eq!(ledger.show(show_id).quantity, 100);
}

#[test]
fn aborted_allocations_are_not_observed() {
    let ledger = TestLedger::new();
    let theatre_no = scenarios::registered_theatre(&ledger, &theatre_spec(1, 1, 1));
    let show_id = scenarios::scheduled_show(&ledger, theatre_no, "Heat");

    let first = scenarios::sold_ticket(&ledger, show_id, 1);
    fail_after(&ledger, 3, "purchaseTicket", &scenarios::purchase_body(show_id, 1, 1));
    let second = scenarios::sold_ticket(&ledger, show_id, 1);

    assert_eq!(first, TicketNo::new(1));
    assert_eq!(second, TicketNo::new(2));
    assert!(ledger.try_load::<marquee_core::Ticket>(TicketNo::new(3)).is_none());
    assert_eq!(ledger.show(show_id).quantity, 98);
}

#[test]
fn partial_schedule_is_discarded() {
    let ledger = TestLedger::new();
    let theatre_no = scenarios::registered_theatre(&ledger, &theatre_spec(1, 3, 1));
    let before = ledger.entries();

    let body = serde_json::json!({ "theatreNo": theatre_no, "shows": [{ "movie": "Heat" }] });
    fail_after(&ledger, 3, "createShow", &body.to_string());

    assert_eq!(ledger.entries(), before);
    assert!(ledger.try_load::<marquee_core::Show>(ShowId::new(1)).is_none());
}
