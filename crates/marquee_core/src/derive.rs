//! Numbers derived from the transaction identifier.
//!
//! Theatre numbers and coupon numbers are not drawn from a sequence: they are
//! a pure function of the invoking transaction's id, so every endorser of the
//! same proposal computes the same value without touching shared counters.

use sha2::{Digest, Sha256};

/// Largest integer every JSON consumer can represent exactly.
const JSON_SAFE_MASK: u64 = (1 << 53) - 1;

/// Scheme for deriving a number from a transaction id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IdScheme {
    /// First 8 bytes of SHA-256 over the id, big-endian, masked to 53 bits.
    #[default]
    Sha256,
    /// Sum of the id's character code points.
    ///
    /// Compatible with ledgers written by earlier deployments. Any two ids
    /// with the same character multiset collide.
    CharSum,
}

impl IdScheme {
    /// Derives a number from a transaction id.
    #[must_use]
    pub fn derive(self, tx_id: &str) -> u64 {
        match self {
            Self::Sha256 => {
                let digest = Sha256::digest(tx_id.as_bytes());
                let mut prefix = [0u8; 8];
                prefix.copy_from_slice(&digest[..8]);
                u64::from_be_bytes(prefix) & JSON_SAFE_MASK
            }
            Self::CharSum => tx_id.chars().map(|c| u64::from(u32::from(c))).sum(),
        }
    }
}
