//! Property-based test generators using proptest.
//!
//! Provides strategies for generating request bodies that pass validation.

use marquee_core::registry::RegisterTheatre;
use marquee_core::scheduler::MovieRequest;
use proptest::prelude::*;

/// Strategy for generating valid theatre registrations.
///
/// Sizes stay small so a generated theatre can be fully scheduled in a test.
pub fn theatre_spec_strategy() -> impl Strategy<Value = RegisterTheatre> {
    (
        "[A-Z][a-z]{0,15}",
        0i64..6,
        1i64..200,
        0i64..4,
        0i64..1000,
        0i64..5,
    )
        .prop_map(
            |(theatre_name, windows, tickets_per_show, shows_daily, soda_stock, halls)| {
                RegisterTheatre {
                    theatre_name,
                    windows,
                    tickets_per_show,
                    shows_daily,
                    soda_stock,
                    halls,
                }
            },
        )
}

/// Strategy for generating movie lists of up to `max` entries.
///
/// Hall numbers are left unset so they are assigned by position.
pub fn movie_list_strategy(max: usize) -> impl Strategy<Value = Vec<MovieRequest>> {
    prop::collection::vec(
        "[A-Z][a-z]{1,10}".prop_map(|movie| MovieRequest { movie, hall_no: 0 }),
        0..=max,
    )
}

/// Strategy for generating transaction ids.
pub fn tx_id_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[0-9a-f]{8,64}").expect("Invalid regex")
}

/// Strategy for generating purchase sizes, including invalid ones.
pub fn purchase_size_strategy() -> impl Strategy<Value = i64> {
    prop_oneof![
        8 => 1i64..150,
        1 => -5i64..=0,
    ]
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
