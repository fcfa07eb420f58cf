//! Loyalty coupon issuance.

use crate::derive::IdScheme;
use crate::entity::Ticket;
use crate::error::{ContractError, ContractResult};
use crate::store::EntityStore;
use crate::types::TicketNo;
use marquee_ledger::LedgerStub;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Request body naming a ticket. Other fields are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketRef {
    /// Ticket number.
    pub ticket_no: TicketNo,
}

/// Issues one coupon per ticket.
#[derive(Debug, Clone, Copy, Default)]
pub struct CouponService {
    id_scheme: IdScheme,
}

impl CouponService {
    /// Creates a service deriving coupon numbers with `id_scheme`.
    #[must_use]
    pub const fn new(id_scheme: IdScheme) -> Self {
        Self { id_scheme }
    }

    /// Issues a coupon for a ticket and returns the updated ticket.
    ///
    /// The coupon number is derived from the transaction id and stored as a
    /// decimal string.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::NotFound`] for an unknown ticket,
    /// [`ContractError::CouponAlreadyIssued`] if the ticket already has one,
    /// or a storage error.
    pub fn issue<S: LedgerStub + ?Sized>(
        &self,
        store: &mut EntityStore<'_, S>,
        request: &TicketRef,
    ) -> ContractResult<Ticket> {
        let mut ticket: Ticket = store.load(request.ticket_no)?;
        if ticket.coupon_availed {
            warn!(ticket_no = %ticket.ticket_no, "coupon already issued");
            return Err(ContractError::CouponAlreadyIssued {
                ticket_no: ticket.ticket_no,
            });
        }

        ticket.coupon_number = self.id_scheme.derive(store.tx_id()).to_string();
        ticket.coupon_availed = true;
        ticket.exchange_availed = false;
        store.save(&ticket)?;

        info!(ticket_no = %ticket.ticket_no, coupon = %ticket.coupon_number, "coupon issued");
        Ok(ticket)
    }
}
