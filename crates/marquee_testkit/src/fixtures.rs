//! Test fixtures and ledger helpers.
//!
//! Provides a deployed contract over an in-memory ledger and builders for
//! the common starting states.

use marquee_core::registry::RegisterTheatre;
use marquee_core::{
    Config, Contract, ContractResult, Entity, Show, ShowId, Theatre, TheatreNo, Ticket, TicketNo,
    Window, WindowNo,
};
use marquee_ledger::InMemoryLedger;
use std::cell::Cell;

/// A deployed contract over an in-memory ledger.
///
/// Every call runs in its own committed-or-aborted transaction. Transaction
/// ids are `tx-1`, `tx-2`, ... unless given explicitly.
pub struct TestLedger {
    /// The ledger.
    pub ledger: InMemoryLedger,
    /// The contract under test.
    pub contract: Contract,
    next_tx: Cell<u64>,
}

impl TestLedger {
    /// Creates a ledger with the default configuration and seeded counters.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates a ledger with the given configuration and seeded counters.
    pub fn with_config(config: Config) -> Self {
        let fixture = Self {
            ledger: InMemoryLedger::new(),
            contract: Contract::new(config),
            next_tx: Cell::new(0),
        };
        fixture
            .ledger
            .transaction("deploy", |txn| fixture.contract.init(txn))
            .expect("Failed to seed counters");
        fixture
    }

    /// Returns a fresh transaction id.
    pub fn next_tx_id(&self) -> String {
        let n = self.next_tx.get() + 1;
        self.next_tx.set(n);
        format!("tx-{n}")
    }

    /// Invokes `function` with one argument under a fresh transaction id.
    pub fn invoke(&self, function: &str, arg: &str) -> ContractResult<String> {
        let tx_id = self.next_tx_id();
        self.invoke_as(&tx_id, function, arg)
    }

    /// Invokes `function` with one argument under `tx_id`.
    pub fn invoke_as(&self, tx_id: &str, function: &str, arg: &str) -> ContractResult<String> {
        self.ledger
            .transaction(tx_id, |txn| self.contract.invoke(txn, function, &[arg]))
            .map(|payload| String::from_utf8_lossy(&payload).into_owned())
    }

    /// Loads a committed entity, if present.
    pub fn try_load<E: Entity>(&self, id: E::Id) -> Option<E> {
        let key = E::key_for(id);
        self.ledger
            .get(&key)
            .map(|bytes| E::decode(&key, &bytes).expect("Corrupt record"))
    }

    /// Loads a committed entity.
    pub fn load<E: Entity>(&self, id: E::Id) -> E {
        self.try_load(id)
            .unwrap_or_else(|| panic!("{} not found", E::key_for(id)))
    }

    /// Loads a committed theatre.
    pub fn theatre(&self, theatre_no: TheatreNo) -> Theatre {
        self.load(theatre_no)
    }

    /// Loads a committed window.
    pub fn window(&self, window_no: u32) -> Window {
        self.load(WindowNo::new(window_no))
    }

    /// Loads a committed show.
    pub fn show(&self, show_id: ShowId) -> Show {
        self.load(show_id)
    }

    /// Loads a committed ticket.
    pub fn ticket(&self, ticket_no: TicketNo) -> Ticket {
        self.load(ticket_no)
    }

    /// Reads a committed counter value.
    pub fn counter(&self, key: &str) -> u64 {
        let bytes = self.ledger.get(key).expect("Counter not found");
        let property: serde_json::Value = serde_json::from_slice(&bytes).expect("Corrupt counter");
        property["value"]
            .as_str()
            .and_then(|v| v.parse().ok())
            .expect("Counter is not an integer string")
    }
}

impl Default for TestLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for TestLedger {
    type Target = InMemoryLedger;

    fn deref(&self) -> &Self::Target {
        &self.ledger
    }
}

/// Builds a registration request for "Rex" with 100 seats per show and
/// 500 sodas.
pub fn theatre_spec(windows: i64, shows_daily: i64, halls: i64) -> RegisterTheatre {
    RegisterTheatre {
        theatre_name: "Rex".to_string(),
        windows,
        tickets_per_show: 100,
        shows_daily,
        soda_stock: 500,
        halls,
    }
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;
    use serde_json::json;

    /// Registers a theatre and returns its number.
    pub fn registered_theatre(ledger: &TestLedger, spec: &RegisterTheatre) -> TheatreNo {
        let body = serde_json::to_string(spec).expect("Failed to encode request");
        let payload = ledger
            .invoke("registerTheatre", &body)
            .expect("Failed to register theatre");
        let number = payload
            .strip_prefix("MovieTheatre Number:")
            .and_then(|n| n.parse().ok())
            .expect("Unexpected registration payload");
        TheatreNo::new(number)
    }

    /// Schedules one movie and returns the id of its first show.
    pub fn scheduled_show(ledger: &TestLedger, theatre_no: TheatreNo, movie: &str) -> ShowId {
        let first = ledger.counter("NEXT_SHOW_ID") + 1;
        let body = json!({ "theatreNo": theatre_no, "shows": [{ "movie": movie }] });
        ledger
            .invoke("createShow", &body.to_string())
            .expect("Failed to schedule show");
        ShowId::new(first)
    }

    /// Sells `quantity` seats through window 1 and returns the ticket number.
    pub fn sold_ticket(ledger: &TestLedger, show_id: ShowId, quantity: i64) -> TicketNo {
        let body = purchase_body(show_id, 1, quantity);
        ledger
            .invoke("purchaseTicket", &body)
            .expect("Failed to sell ticket");
        TicketNo::new(ledger.counter("NEXT_TICKET_ID"))
    }

    /// Builds a `purchaseTicket` body.
    pub fn purchase_body(show_id: ShowId, window_no: u32, quantity: i64) -> String {
        json!({
            "show": { "showID": show_id },
            "window": { "windowNo": window_no },
            "quantity": quantity,
            "amount": quantity * 15,
        })
        .to_string()
    }

    /// Builds a `{"ticketNo": n}` body.
    pub fn ticket_body(ticket_no: TicketNo) -> String {
        json!({ "ticketNo": ticket_no }).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tx_ids_are_sequential() {
        let ledger = TestLedger::new();
        assert_eq!(ledger.next_tx_id(), "tx-1");
        assert_eq!(ledger.next_tx_id(), "tx-2");
    }

    #[test]
    fn sold_ticket_builds_full_chain() {
        let ledger = TestLedger::new();
        let theatre_no = scenarios::registered_theatre(&ledger, &theatre_spec(1, 2, 1));
        let show_id = scenarios::scheduled_show(&ledger, theatre_no, "Heat");
        let ticket_no = scenarios::sold_ticket(&ledger, show_id, 4);

        let ticket = ledger.ticket(ticket_no);
        assert_eq!(ticket.show.show_id, show_id);
        assert_eq!(ticket.show.quantity, 96);
        assert_eq!(ledger.counter("NEXT_SHOW_ID"), 2);
    }
}
