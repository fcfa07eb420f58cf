//! Soda exchange redemption.

use crate::coupon::TicketRef;
use crate::entity::{Entity, Theatre, Ticket};
use crate::error::{ContractError, ContractResult};
use crate::store::EntityStore;
use marquee_ledger::LedgerStub;
use tracing::{info, warn};

/// Outcome of a successful exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct Redemption {
    /// The ticket, now marked redeemed.
    pub ticket: Ticket,
    /// The theatre after its stock was drawn down.
    pub theatre: Theatre,
}

/// Redeems coupons for sodas.
///
/// Only tickets whose coupon number is an even integer qualify.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExchangeService {
    enforce_soda_floor: bool,
}

impl ExchangeService {
    /// Creates a service. With `enforce_soda_floor`, exchanges that would
    /// take the theatre's soda stock below zero are refused.
    #[must_use]
    pub const fn new(enforce_soda_floor: bool) -> Self {
        Self { enforce_soda_floor }
    }

    /// Redeems the soda exchange on a ticket.
    ///
    /// Marks the ticket redeemed and writes it, then draws the ticket's
    /// quantity from the soda stock of the theatre in its show snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::ExchangeAlreadyRedeemed`],
    /// [`ContractError::NotEligible`] for a missing, non-integer or odd
    /// coupon number, [`ContractError::SodaStockExhausted`] when the floor is
    /// enforced, [`ContractError::NotFound`], or a storage error.
    pub fn redeem<S: LedgerStub + ?Sized>(
        &self,
        store: &mut EntityStore<'_, S>,
        request: &TicketRef,
    ) -> ContractResult<Redemption> {
        let mut ticket: Ticket = store.load(request.ticket_no)?;
        if ticket.exchange_availed {
            warn!(ticket_no = %ticket.ticket_no, "exchange already redeemed");
            return Err(ContractError::ExchangeAlreadyRedeemed {
                ticket_no: ticket.ticket_no,
            });
        }
        if !Self::eligible(&ticket) {
            warn!(ticket_no = %ticket.ticket_no, coupon = %ticket.coupon_number, "not eligible for exchange");
            return Err(ContractError::NotEligible {
                ticket_no: ticket.ticket_no,
                coupon_number: ticket.coupon_number,
            });
        }

        ticket.exchange_availed = true;
        store.save(&ticket)?;

        let mut theatre: Theatre = store.load(ticket.show.theatre_no)?;
        if self.enforce_soda_floor && theatre.soda_stock < ticket.quantity {
            return Err(ContractError::SodaStockExhausted {
                theatre_no: theatre.theatre_no,
                available: theatre.soda_stock,
                requested: ticket.quantity,
            });
        }
        theatre.soda_stock = theatre
            .soda_stock
            .checked_sub(ticket.quantity)
            .ok_or_else(|| ContractError::FieldOverflow {
                key: theatre.key(),
                field: "sodaStock",
            })?;
        store.save(&theatre)?;

        info!(
            ticket_no = %ticket.ticket_no,
            theatre_no = %theatre.theatre_no,
            drawn = ticket.quantity,
            soda_stock = theatre.soda_stock,
            "exchange redeemed"
        );
        Ok(Redemption { ticket, theatre })
    }

    /// Coupon parity rule: an issued coupon whose number is an even integer.
    fn eligible(ticket: &Ticket) -> bool {
        ticket.coupon_availed
            && ticket
                .coupon_number
                .parse::<i64>()
                .is_ok_and(|n| n % 2 == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::TicketStage;
    use crate::types::{TheatreNo, TicketNo};
    use crate::ErrorKind;
    use marquee_ledger::InMemoryLedger;

    fn ticket_json(coupon: &str, availed: bool) -> Vec<u8> {
        format!(
            r#"{{"ticketNo":1,"show":{{"showID":1,"movie":"Heat","showSlot":"1","quantity":70,"hallNo":1,"theatreNo":7,"docType":"SHOW"}},"window":{{"windowNo":1,"ticketsSold":30,"docType":"WINDOW"}},"quantity":30,"amount":"450","couponNumber":"{coupon}","couponAvailed":{availed},"exchangeAvailed":false,"docType":"TICKET"}}"#
        )
        .into_bytes()
    }

    fn ledger(coupon: &str, availed: bool, soda: i64) -> InMemoryLedger {
        let theatre = format!(
            r#"{{"theatreNo":7,"theatreName":"Rex","windows":1,"ticketsPerShow":100,"showsDaily":1,"sodaStock":{soda},"halls":1,"docType":"THEATRE"}}"#
        );
        InMemoryLedger::with_entries(vec![
            ("TICKET1".to_string(), ticket_json(coupon, availed)),
            ("THEATRE7".to_string(), theatre.into_bytes()),
        ])
    }

    fn redeem(ledger: &InMemoryLedger, service: ExchangeService) -> ContractResult<Redemption> {
        ledger.transaction("tx", |txn| {
            service.redeem(
                &mut EntityStore::new(txn),
                &TicketRef {
                    ticket_no: TicketNo::new(1),
                },
            )
        })
    }

    #[test]
    fn even_coupon_redeems_and_draws_stock() {
        let ledger = ledger("2214", true, 100);
        let redemption = redeem(&ledger, ExchangeService::default()).unwrap();

        assert_eq!(redemption.ticket.stage(), TicketStage::ExchangeRedeemed);
        assert_eq!(redemption.theatre.theatre_no, TheatreNo::new(7));
        assert_eq!(redemption.theatre.soda_stock, 70);
    }

    #[test]
    fn second_redemption_fails() {
        let ledger = ledger("2214", true, 100);
        redeem(&ledger, ExchangeService::default()).unwrap();

        let err = redeem(&ledger, ExchangeService::default()).unwrap_err();
        assert!(matches!(err, ContractError::ExchangeAlreadyRedeemed { .. }));

        let theatre: serde_json::Value =
            serde_json::from_slice(&ledger.get("THEATRE7").unwrap()).unwrap();
        assert_eq!(theatre["sodaStock"], 70);
    }

    #[test]
    fn odd_or_garbage_coupons_are_ineligible() {
        for coupon in ["2215", "", "abc", "22.0"] {
            let ledger = ledger(coupon, true, 100);
            let err = redeem(&ledger, ExchangeService::default()).unwrap_err();
            assert!(
                matches!(err, ContractError::NotEligible { .. }),
                "coupon {coupon:?} should be ineligible"
            );
            assert_eq!(err.kind(), ErrorKind::BusinessRule);
        }
    }

    #[test]
    fn coupon_must_be_issued() {
        let ledger = ledger("2214", false, 100);
        let err = redeem(&ledger, ExchangeService::default()).unwrap_err();
        assert!(matches!(err, ContractError::NotEligible { .. }));
    }

    #[test]
    fn stock_may_go_negative_by_default() {
        let ledger = ledger("2214", true, 10);
        let redemption = redeem(&ledger, ExchangeService::default()).unwrap();
        assert_eq!(redemption.theatre.soda_stock, -20);
    }

    #[test]
    fn stock_underflow_is_storage_error() {
        let ledger = ledger("2214", true, i64::MIN);
        let err = redeem(&ledger, ExchangeService::default()).unwrap_err();
        assert!(matches!(
            err,
            ContractError::FieldOverflow {
                field: "sodaStock",
                ..
            }
        ));
        assert_eq!(err.kind(), ErrorKind::Storage);

        let ticket: serde_json::Value =
            serde_json::from_slice(&ledger.get("TICKET1").unwrap()).unwrap();
        assert_eq!(ticket["exchangeAvailed"], false);
    }

    #[test]
    fn floor_rejects_and_rolls_back_ticket() {
        let ledger = ledger("2214", true, 10);
        let err = redeem(&ledger, ExchangeService::new(true)).unwrap_err();
        assert!(matches!(
            err,
            ContractError::SodaStockExhausted {
                available: 10,
                requested: 30,
                ..
            }
        ));

        let ticket: serde_json::Value =
            serde_json::from_slice(&ledger.get("TICKET1").unwrap()).unwrap();
        assert_eq!(ticket["exchangeAvailed"], false);
    }
}
