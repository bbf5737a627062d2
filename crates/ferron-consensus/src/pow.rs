// Consensus-critical. Changes here require a coordinated network upgrade.
//! Proof-of-work validation.

use crate::compact::{decode_bits, pow_limit_target};
use ferron_core::{ConsensusParams, Hash32};
use num_bigint::BigUint;
use num_traits::Zero;

/// Compare a block hash, interpreted as a big-endian 256-bit integer,
/// against a target. Returns `true` if `hash <= target`.
pub fn hash_meets_target(hash: &Hash32, target: &BigUint) -> bool {
    BigUint::from_bytes_be(hash.as_bytes()) <= *target
}

/// Validate that `hash` satisfies the compact target `bits`.
///
/// Accepts iff the decoded target is non-negative, non-zero,
/// non-overflowing, at most `pow_limit`, and the hash orders at or below
/// it. Total: a malformed encoding is a normal rejection, not an error.
pub fn check_proof_of_work(hash: &Hash32, bits: u32, params: &ConsensusParams) -> bool {
    let decoded = decode_bits(bits);

    if decoded.negative || decoded.target.is_zero() || decoded.overflow {
        return false;
    }
    if decoded.target > pow_limit_target(params) {
        return false;
    }

    hash_meets_target(hash, &decoded.target)
}
