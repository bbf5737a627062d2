// Consensus-critical. Changes here require a coordinated network upgrade.
//! Compact (`bits`) difficulty target codec.
//!
//! A compact value encodes a 256-bit target in signed base-256 scientific
//! notation: byte 3 is the exponent (the value's size in bytes), bytes 2..0
//! are a 24-bit mantissa, and bit 23 of the mantissa doubles as the sign
//! bit. Retargeting multiplies and divides decoded values and re-encodes
//! the result, so encode and decode must stay exact inverses up to the
//! 24-bit mantissa precision: any asymmetry drifts difficulty permanently.

use crate::error::ConsensusError;
use ferron_core::ConsensusParams;
use num_bigint::BigUint;
use num_traits::Zero;

/// Sign bit of the 24-bit mantissa.
const SIGN_BIT: u32 = 0x0080_0000;

/// Mask selecting the unsigned mantissa.
const MANTISSA_MASK: u32 = 0x007f_ffff;

/// Result of decoding a compact value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBits {
    /// The decoded target, disregarding sign.
    pub target: BigUint,
    /// The sign bit was set on a non-zero mantissa.
    pub negative: bool,
    /// The value, disregarding sign, would exceed 256 bits.
    pub overflow: bool,
}

/// Decode a compact value into a target plus `negative`/`overflow` flags.
///
/// Total: every 32-bit input decodes. Callers that require a usable target
/// must inspect the flags, or use [`expand_bits`] for a hard error.
pub fn decode_bits(bits: u32) -> DecodedBits {
    let exponent = bits >> 24;
    let mut mantissa = bits & MANTISSA_MASK;

    let target = if exponent <= 3 {
        mantissa >>= 8 * (3 - exponent);
        BigUint::from(mantissa)
    } else {
        BigUint::from(mantissa) << (8 * (exponent - 3))
    };

    // Both flags read the post-shift mantissa: a mantissa whose set bits
    // all shift out is neither negative nor overflowing.
    let negative = mantissa != 0 && (bits & SIGN_BIT) != 0;
    let overflow = mantissa != 0
        && (exponent > 34
            || (mantissa > 0xff && exponent > 33)
            || (mantissa > 0xffff && exponent > 32));

    DecodedBits {
        target,
        negative,
        overflow,
    }
}

/// Encode a target into its compact form.
///
/// Inverse of [`decode_bits`] up to the 24-bit mantissa precision. If the
/// top mantissa byte would collide with the sign bit, the mantissa is
/// shifted right one byte and the exponent grows instead; the sign bit is
/// always emitted clear. `encode_bits(&0u32.into()) == 0`. Panics on values
/// wider than 256 bits, which no clamped target can produce.
pub fn encode_bits(target: &BigUint) -> u32 {
    assert!(target.bits() <= 256, "target wider than 256 bits");

    let mut size = target.bits().div_ceil(8) as u32;
    let mut compact = if size <= 3 {
        low_u32(target) << (8 * (3 - size))
    } else {
        low_u32(&(target >> (8 * (size - 3))))
    };

    if compact & SIGN_BIT != 0 {
        compact >>= 8;
        size += 1;
    }

    compact | (size << 24)
}

/// Decode a compact value, rejecting encodings unusable as a target.
pub fn expand_bits(bits: u32) -> Result<BigUint, ConsensusError> {
    let decoded = decode_bits(bits);
    if decoded.negative || decoded.overflow {
        return Err(ConsensusError::InvalidBits);
    }
    if decoded.target.is_zero() {
        return Err(ConsensusError::InvalidTarget);
    }
    Ok(decoded.target)
}

/// The network's `pow_limit` hash as a 256-bit integer.
pub fn pow_limit_target(params: &ConsensusParams) -> BigUint {
    BigUint::from_bytes_be(params.pow_limit.as_bytes())
}

/// Low 32 bits of a value known to fit in the mantissa.
fn low_u32(value: &BigUint) -> u32 {
    value.iter_u32_digits().next().unwrap_or(0)
}
