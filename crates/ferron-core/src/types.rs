// Consensus-critical. Changes here require a coordinated network upgrade.
//! Canonical value types shared across the protocol.

use crate::constants::HASH32_LEN;
use borsh::{BorshDeserialize, BorshSerialize};
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Errors related to parsing or construction of core protocol types.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Hash hex strings carry exactly 64 digits, no prefix.
    #[error("expected 64 hex digits, got {0}")]
    BadHashHexLength(usize),

    /// Hex decoding failed.
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

/// Fixed-size 32-byte hash used throughout the protocol.
///
/// Wherever a hash is compared against a difficulty target, its bytes are
/// interpreted as a big-endian 256-bit unsigned integer.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, BorshSerialize, BorshDeserialize)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Hash32(pub [u8; HASH32_LEN]);

impl Hash32 {
    /// The all-zero hash.
    pub const ZERO: Self = Self([0u8; HASH32_LEN]);

    /// Parses a hash from exactly 64 big-endian hex digits.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        if s.len() != 2 * HASH32_LEN {
            return Err(CoreError::BadHashHexLength(s.len()));
        }
        let mut bytes = [0u8; HASH32_LEN];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }

    /// The raw big-endian bytes.
    pub const fn as_bytes(&self) -> &[u8; HASH32_LEN] {
        &self.0
    }
}

impl AsRef<[u8]> for Hash32 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash32({self})")
    }
}

/// Block hash type.
pub type BlockHash = Hash32;

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT_HEX: &str = "00000000ffff0000000000000000000000000000000000000000000000000000";

    #[test]
    fn from_hex_roundtrips_through_display() {
        let hash = Hash32::from_hex(LIMIT_HEX).unwrap();
        assert_eq!(hash.as_bytes()[4], 0xff);
        assert_eq!(hash.to_string(), LIMIT_HEX);
    }

    #[test]
    fn from_hex_demands_exactly_64_digits() {
        assert!(matches!(
            Hash32::from_hex("ff00"),
            Err(CoreError::BadHashHexLength(4))
        ));
        // Prefixes are not part of the convention.
        let prefixed = format!("0x{LIMIT_HEX}");
        assert!(matches!(
            Hash32::from_hex(&prefixed),
            Err(CoreError::BadHashHexLength(66))
        ));
    }

    #[test]
    fn from_hex_rejects_non_hex_digits() {
        assert!(matches!(
            Hash32::from_hex(&"zz".repeat(32)),
            Err(CoreError::InvalidHex(_))
        ));
    }

    #[test]
    fn zero_is_all_zero_bytes() {
        assert_eq!(Hash32::ZERO, Hash32::default());
        assert!(Hash32::ZERO.as_bytes().iter().all(|b| *b == 0));
    }
}
