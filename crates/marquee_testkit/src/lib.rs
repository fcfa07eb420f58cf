//! # Marquee Testkit
//!
//! Test utilities for Marquee.
//!
//! This crate provides:
//! - A ledger-plus-contract fixture and scenario builders
//! - Property-based test generators using proptest
//! - A fault-injecting ledger stub for atomicity tests
//!
//! ## Usage
//!
//! ```rust
//! use marquee_testkit::prelude::*;
//!
//! let ledger = TestLedger::new();
//! let theatre_no = scenarios::registered_theatre(&ledger, &theatre_spec(2, 1, 1));
//! let show_id = scenarios::scheduled_show(&ledger, theatre_no, "Heat");
//! assert_eq!(ledger.show(show_id).quantity, 100);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod faults;
pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::faults::*;
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use faults::*;
pub use fixtures::*;
pub use generators::*;
