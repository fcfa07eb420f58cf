//! # Marquee Core
//!
//! Transactional business logic for a movie-theatre ticketing ledger.
//!
//! This crate provides:
//! - Entity records (theatres, windows, shows, tickets) stored as JSON
//! - A typed entity store over any [`LedgerStub`]
//! - Ledger-resident sequence counters
//! - Theatre registration, show scheduling, ticket sales, coupon issuance
//!   and soda exchange
//! - A rich-query pass-through
//! - The invocation surface ([`Contract`]) that dispatches one operation per
//!   transaction
//!
//! Every operation runs inside exactly one ledger transaction. Operations
//! never lock: they read what they need, check their rules, and write back.
//! Atomicity and conflict detection belong to the ledger.
//!
//! ## Example
//!
//! ```rust
//! use marquee_core::{Config, Contract};
//! use marquee_ledger::InMemoryLedger;
//!
//! let ledger = InMemoryLedger::new();
//! let contract = Contract::new(Config::default());
//!
//! ledger.transaction("setup", |txn| contract.init(txn)).unwrap();
//! let payload = ledger
//!     .transaction("tx-register", |txn| {
//!         contract.invoke(
//!             txn,
//!             "registerTheatre",
//!             &[r#"{"theatreName":"Rex","windows":2,"ticketsPerShow":100,"showsDaily":1,"sodaStock":500,"halls":1}"#],
//!         )
//!     })
//!     .unwrap();
//! assert!(String::from_utf8(payload).unwrap().starts_with("MovieTheatre Number:"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod contract;
pub mod coupon;
pub mod derive;
pub mod entity;
pub mod error;
pub mod exchange;
pub mod query;
pub mod registry;
pub mod sales;
pub mod scheduler;
pub mod sequence;
pub mod store;
pub mod types;

pub use config::Config;
pub use contract::{Contract, Function};
pub use coupon::CouponService;
pub use derive::IdScheme;
pub use entity::{Entity, Show, Theatre, Ticket, TicketStage, Window};
pub use error::{ContractError, ContractResult, ErrorKind};
pub use exchange::{ExchangeService, Redemption};
pub use query::QueryGateway;
pub use registry::TheatreRegistry;
pub use sales::TicketSalesEngine;
pub use scheduler::ShowScheduler;
pub use sequence::{Counter, Property, SequenceAllocator};
pub use store::EntityStore;
pub use types::{DocType, ShowId, TheatreNo, TicketNo, WindowNo};

pub use marquee_ledger::LedgerStub;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
