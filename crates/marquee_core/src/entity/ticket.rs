//! Ticket record and its coupon/exchange lifecycle.

use crate::entity::{amount, Entity, Show, Window};
use crate::types::{DocType, TicketNo};
use serde::{Deserialize, Serialize};

/// Where a ticket is in its coupon lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketStage {
    /// Sold, no coupon yet.
    Created,
    /// Coupon issued, exchange not redeemed.
    CouponIssued,
    /// Soda exchange redeemed.
    ExchangeRedeemed,
}

/// A sold ticket.
///
/// `show` and `window` are snapshots taken right after the sale was applied;
/// they are not kept in sync with the live records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// Ticket number.
    pub ticket_no: TicketNo,
    /// Show as of the sale.
    pub show: Show,
    /// Window as of the sale.
    pub window: Window,
    /// Seats bought.
    pub quantity: i64,
    /// Amount paid, recorded as given.
    #[serde(with = "amount")]
    pub amount: f64,
    /// Coupon number, empty until issued.
    #[serde(default)]
    pub coupon_number: String,
    /// Set once a coupon has been issued.
    #[serde(default)]
    pub coupon_availed: bool,
    /// Set once the soda exchange has been redeemed.
    #[serde(default)]
    pub exchange_availed: bool,
    /// Always [`DocType::Ticket`].
    pub doc_type: DocType,
}

impl Ticket {
    /// Creates a freshly sold ticket with no coupon.
    #[must_use]
    pub fn sold(ticket_no: TicketNo, show: Show, window: Window, quantity: i64, amount: f64) -> Self {
        Self {
            ticket_no,
            show,
            window,
            quantity,
            amount,
            coupon_number: String::new(),
            coupon_availed: false,
            exchange_availed: false,
            doc_type: DocType::Ticket,
        }
    }

    /// Returns the lifecycle stage implied by the flags.
    #[must_use]
    pub fn stage(&self) -> TicketStage {
        if self.exchange_availed {
            TicketStage::ExchangeRedeemed
        } else if self.coupon_availed {
            TicketStage::CouponIssued
        } else {
            TicketStage::Created
        }
    }
}

impl Entity for Ticket {
    const DOC_TYPE: DocType = DocType::Ticket;
    type Id = TicketNo;

    fn id(&self) -> TicketNo {
        self.ticket_no
    }
}
