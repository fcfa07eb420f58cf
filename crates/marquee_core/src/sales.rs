//! Ticket sales against finite seat inventory.

use crate::entity::{amount, Entity, Show, Ticket, Window};
use crate::error::{ContractError, ContractResult};
use crate::sequence::{Counter, SequenceAllocator};
use crate::store::EntityStore;
use crate::types::{ShowId, TicketNo, WindowNo};
use marquee_ledger::LedgerStub;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Reference to a show by id. Other fields in the body are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowRef {
    /// Show id.
    #[serde(rename = "showID")]
    pub show_id: ShowId,
}

/// Reference to a window by number. Other fields in the body are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowRef {
    /// Window number.
    pub window_no: WindowNo,
}

/// Request body for `purchaseTicket`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    /// Show to seat.
    pub show: ShowRef,
    /// Window selling the ticket.
    pub window: WindowRef,
    /// Seats wanted.
    pub quantity: i64,
    /// Amount paid.
    #[serde(default, with = "amount")]
    pub amount: f64,
}

/// Sells tickets.
#[derive(Debug, Clone, Copy, Default)]
pub struct TicketSalesEngine;

impl TicketSalesEngine {
    /// Sells `quantity` seats of a show through a window.
    ///
    /// Show and window are re-read from the ledger; the request only names
    /// them. On success the show loses and the window gains `quantity`, and a
    /// ticket is written carrying both records as they stand after the sale.
    /// Writes go out in the order show, window, `NEXT_TICKET_ID`, ticket.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a non-positive quantity,
    /// [`ContractError::NotFound`] for an unknown show, window or counter,
    /// [`ContractError::InsufficientSeats`] if the show cannot seat the
    /// request, or a storage error.
    pub fn purchase<S: LedgerStub + ?Sized>(
        &self,
        store: &mut EntityStore<'_, S>,
        request: &PurchaseRequest,
    ) -> ContractResult<Ticket> {
        let quantity = request.quantity;
        if quantity <= 0 {
            return Err(ContractError::invalid_request(format!(
                "quantity must be positive, got {quantity}"
            )));
        }

        let mut show: Show = store.load(request.show.show_id)?;
        let mut window: Window = store.load(request.window.window_no)?;

        // A negative count cannot arise through this engine; treat it as full.
        if show.quantity < 0 || show.quantity < quantity {
            warn!(show_id = %show.show_id, requested = quantity, available = show.quantity, "not enough seats");
            return Err(ContractError::InsufficientSeats {
                show_id: show.show_id,
                requested: quantity,
                available: show.quantity,
            });
        }

        show.quantity -= quantity;
        window.tickets_sold = window
            .tickets_sold
            .checked_add(quantity)
            .ok_or_else(|| ContractError::FieldOverflow {
                key: window.key(),
                field: "ticketsSold",
            })?;

        store.save(&show)?;
        store.save(&window)?;
        let ticket_no = TicketNo::new(SequenceAllocator::next(store, Counter::NextTicketId)?);
        let ticket = Ticket::sold(ticket_no, show, window, quantity, request.amount);
        store.save(&ticket)?;

        info!(
            %ticket_no,
            show_id = %ticket.show.show_id,
            window_no = %ticket.window.window_no,
            quantity,
            remaining = ticket.show.quantity,
            "ticket sold"
        );
        Ok(ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DocType, TheatreNo};
    use crate::ErrorKind;
    use marquee_ledger::InMemoryLedger;

    fn ledger_with_show(seats: i64) -> InMemoryLedger {
        let show = format!(
            r#"{{"showID":1,"movie":"Heat","showSlot":"1","quantity":{seats},"hallNo":1,"theatreNo":7,"docType":"SHOW"}}"#
        );
        InMemoryLedger::with_entries(vec![
            ("SHOW1".to_string(), show.into_bytes()),
            (
                "WINDOW1".to_string(),
                br#"{"windowNo":1,"ticketsSold":5,"docType":"WINDOW"}"#.to_vec(),
            ),
            (
                "NEXT_TICKET_ID".to_string(),
                br#"{"key":"NEXT_TICKET_ID","value":"0"}"#.to_vec(),
            ),
        ])
    }

    fn request(quantity: i64) -> PurchaseRequest {
        PurchaseRequest {
            show: ShowRef {
                show_id: ShowId::new(1),
            },
            window: WindowRef {
                window_no: WindowNo::new(1),
            },
            quantity,
            amount: 12.5,
        }
    }

    #[test]
    fn sale_updates_show_window_and_writes_ticket() {
        let ledger = ledger_with_show(100);
        let mut txn = ledger.begin("tx");
        let mut store = EntityStore::new(&mut txn);

        let ticket = TicketSalesEngine.purchase(&mut store, &request(30)).unwrap();

        assert_eq!(ticket.ticket_no, TicketNo::new(1));
        assert_eq!(ticket.show.quantity, 70);
        assert_eq!(ticket.window.tickets_sold, 35);
        assert_eq!(ticket.show.theatre_no, TheatreNo::new(7));
        assert_eq!(ticket.doc_type, DocType::Ticket);
        assert!(!ticket.coupon_availed && !ticket.exchange_availed);

        let show: Show = store.load(ShowId::new(1)).unwrap();
        assert_eq!(show.quantity, 70);
        drop(store);
        assert_eq!(
            txn.written_keys().collect::<Vec<_>>(),
            vec!["SHOW1", "WINDOW1", "NEXT_TICKET_ID", "TICKET1"]
        );
    }

    #[test]
    fn exact_remaining_seats_can_be_sold() {
        let ledger = ledger_with_show(10);
        let mut txn = ledger.begin("tx");
        let ticket = TicketSalesEngine
            .purchase(&mut EntityStore::new(&mut txn), &request(10))
            .unwrap();
        assert_eq!(ticket.show.quantity, 0);
    }

    #[test]
    fn oversell_is_rejected_without_writes() {
        let ledger = ledger_with_show(70);
        let mut txn = ledger.begin("tx");
        let err = TicketSalesEngine
            .purchase(&mut EntityStore::new(&mut txn), &request(80))
            .unwrap_err();

        assert!(matches!(
            err,
            ContractError::InsufficientSeats {
                available: 70,
                requested: 80,
                ..
            }
        ));
        assert_eq!(err.kind(), ErrorKind::BusinessRule);
        assert_eq!(txn.write_count(), 0);
    }

    #[test]
    fn window_count_overflow_is_storage_error() {
        let ledger = InMemoryLedger::with_entries(vec![
            (
                "SHOW1".to_string(),
                br#"{"showID":1,"movie":"Heat","showSlot":"1","quantity":10,"hallNo":1,"theatreNo":7,"docType":"SHOW"}"#.to_vec(),
            ),
            (
                "WINDOW1".to_string(),
                br#"{"windowNo":1,"ticketsSold":9223372036854775807,"docType":"WINDOW"}"#.to_vec(),
            ),
            (
                "NEXT_TICKET_ID".to_string(),
                br#"{"key":"NEXT_TICKET_ID","value":"0"}"#.to_vec(),
            ),
        ]);
        let mut txn = ledger.begin("tx");
        let err = TicketSalesEngine
            .purchase(&mut EntityStore::new(&mut txn), &request(1))
            .unwrap_err();

        assert!(matches!(err, ContractError::FieldOverflow { ref key, .. } if key == "WINDOW1"));
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert_eq!(txn.write_count(), 0);
    }

    #[test]
    fn negative_inventory_counts_as_full() {
        let ledger = ledger_with_show(-1);
        let mut txn = ledger.begin("tx");
        let err = TicketSalesEngine
            .purchase(&mut EntityStore::new(&mut txn), &request(1))
            .unwrap_err();
        assert!(matches!(err, ContractError::InsufficientSeats { available: -1, .. }));
    }

    #[test]
    fn non_positive_quantity_is_invalid() {
        let ledger = ledger_with_show(10);
        let mut txn = ledger.begin("tx");
        for q in [0, -3] {
            let err = TicketSalesEngine
                .purchase(&mut EntityStore::new(&mut txn), &request(q))
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
    }

    #[test]
    fn unknown_window_is_not_found() {
        let ledger = ledger_with_show(10);
        let mut txn = ledger.begin("tx");
        let mut req = request(1);
        req.window.window_no = WindowNo::new(9);
        let err = TicketSalesEngine
            .purchase(&mut EntityStore::new(&mut txn), &req)
            .unwrap_err();
        assert!(matches!(err, ContractError::NotFound { ref key } if key == "WINDOW9"));
    }

    #[test]
    fn request_uses_only_reference_keys() {
        let parsed: PurchaseRequest = serde_json::from_str(
            r#"{"show":{"showID":1,"quantity":999,"movie":"stale"},"window":{"windowNo":2,"ticketsSold":0},"quantity":2,"amount":"20.00"}"#,
        )
        .unwrap();
        assert_eq!(parsed.show.show_id, ShowId::new(1));
        assert_eq!(parsed.window.window_no, WindowNo::new(2));
        assert_eq!(parsed.amount, 20.0);
    }
}
