//! Error types for Marquee operations.

use crate::types::{ShowId, TheatreNo, TicketNo};
use marquee_ledger::LedgerError;
use thiserror::Error;

/// Result type for contract operations.
pub type ContractResult<T> = Result<T, ContractError>;

/// Coarse classification of a [`ContractError`].
///
/// Callers branch on the kind rather than on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The invocation itself is malformed.
    Validation,
    /// A referenced record does not exist.
    NotFound,
    /// The request is well-formed but violates a business rule.
    BusinessRule,
    /// The ledger failed, or stored data is unreadable.
    Storage,
}

/// Errors that can occur while executing a contract operation.
///
/// Any error aborts the whole transaction.
#[derive(Debug, Error)]
pub enum ContractError {
    /// Wrong number of invocation arguments.
    #[error("incorrect number of arguments: expecting {expected}, got {actual}")]
    ArgumentCount {
        /// Number of arguments the function takes.
        expected: usize,
        /// Number of arguments supplied.
        actual: usize,
    },

    /// Function name is not part of the contract.
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    /// The request body is not valid JSON for the operation.
    #[error("malformed {operation} request: {source}")]
    MalformedRequest {
        /// Operation whose body failed to parse.
        operation: &'static str,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The request parsed but carries unusable values.
    #[error("invalid request: {message}")]
    InvalidRequest {
        /// What is wrong with the request.
        message: String,
    },

    /// A referenced key is absent from the ledger.
    #[error("record not found: {key}")]
    NotFound {
        /// The missing key.
        key: String,
    },

    /// A theatre with the derived number is already registered.
    #[error("theatre {theatre_no} is already registered")]
    TheatreExists {
        /// The colliding theatre number.
        theatre_no: TheatreNo,
    },

    /// More movies requested than the theatre has halls.
    #[error("number of movies ({requested}) cannot exceed {halls} halls")]
    TooManyMovies {
        /// Movies in the request.
        requested: usize,
        /// Halls in the theatre.
        halls: i64,
    },

    /// The show cannot seat the requested quantity.
    #[error(
        "seats full for show {show_id} or not enough seats as requested ({requested}). Available: {available}"
    )]
    InsufficientSeats {
        /// The show.
        show_id: ShowId,
        /// Seats requested.
        requested: i64,
        /// Seats remaining.
        available: i64,
    },

    /// The ticket's coupon was already issued.
    #[error("coupon availed already for ticket {ticket_no}")]
    CouponAlreadyIssued {
        /// The ticket.
        ticket_no: TicketNo,
    },

    /// The ticket's exchange was already redeemed.
    #[error("exchange availed already for ticket {ticket_no}")]
    ExchangeAlreadyRedeemed {
        /// The ticket.
        ticket_no: TicketNo,
    },

    /// The ticket's coupon does not qualify for an exchange.
    #[error("ticket {ticket_no} not eligible for exchange (coupon {coupon_number:?})")]
    NotEligible {
        /// The ticket.
        ticket_no: TicketNo,
        /// The coupon number on the ticket.
        coupon_number: String,
    },

    /// Redeeming would drive soda stock below zero.
    #[error("soda stock exhausted at theatre {theatre_no}: {available} left, {requested} requested")]
    SodaStockExhausted {
        /// The theatre.
        theatre_no: TheatreNo,
        /// Stock on hand.
        available: i64,
        /// Stock the exchange needs.
        requested: i64,
    },

    /// Ledger operation failed.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// A sequence counter holds a value that is not an integer.
    #[error("failed to get next sequence number: {key} holds {value:?}")]
    CorruptCounter {
        /// Counter key.
        key: String,
        /// Stored value.
        value: String,
    },

    /// A stored record could not be decoded.
    #[error("corrupt record at {key}: {source}")]
    CorruptRecord {
        /// Record key.
        key: String,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// A stored counter field would leave the range of its type.
    #[error("{field} of {key} out of range")]
    FieldOverflow {
        /// Record key.
        key: String,
        /// Field that would overflow.
        field: &'static str,
    },

    /// A record could not be encoded.
    #[error("failed to encode {key}: {source}")]
    Encode {
        /// Record key.
        key: String,
        /// Underlying encode error.
        #[source]
        source: serde_json::Error,
    },
}

impl ContractError {
    /// Creates an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Creates a malformed request error.
    pub fn malformed(operation: &'static str, source: serde_json::Error) -> Self {
        Self::MalformedRequest { operation, source }
    }

    /// Returns the error's kind.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ArgumentCount { .. }
            | Self::UnknownFunction(_)
            | Self::MalformedRequest { .. }
            | Self::InvalidRequest { .. } => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::TheatreExists { .. }
            | Self::TooManyMovies { .. }
            | Self::InsufficientSeats { .. }
            | Self::CouponAlreadyIssued { .. }
            | Self::ExchangeAlreadyRedeemed { .. }
            | Self::NotEligible { .. }
            | Self::SodaStockExhausted { .. } => ErrorKind::BusinessRule,
            Self::Ledger(_)
            | Self::CorruptCounter { .. }
            | Self::CorruptRecord { .. }
            | Self::FieldOverflow { .. }
            | Self::Encode { .. } => ErrorKind::Storage,
        }
    }

    /// Returns true if the caller may retry the invocation unchanged.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Ledger(e) if e.is_retryable())
    }
}
