//! Contract configuration.

use crate::derive::IdScheme;

/// Configuration for a [`crate::Contract`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// How theatre and coupon numbers are derived from transaction ids.
    pub id_scheme: IdScheme,

    /// Reject soda exchanges that would drive theatre stock below zero.
    ///
    /// Off by default: stock is allowed to go negative.
    pub enforce_soda_floor: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            id_scheme: IdScheme::Sha256,
            enforce_soda_floor: false,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number derivation scheme.
    #[must_use]
    pub const fn id_scheme(mut self, scheme: IdScheme) -> Self {
        self.id_scheme = scheme;
        self
    }

    /// Sets whether soda stock may go negative.
    #[must_use]
    pub const fn enforce_soda_floor(mut self, value: bool) -> Self {
        self.enforce_soda_floor = value;
        self
    }
}
