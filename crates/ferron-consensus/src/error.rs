//! Consensus error types.

use thiserror::Error;

/// Errors returned by difficulty conversion and work calculation code.
#[derive(Debug, Error)]
pub enum ConsensusError {
    /// Compact target had the sign bit set or overflowed 256 bits.
    #[error("invalid compact target bits")]
    InvalidBits,

    /// Target decoded to zero or otherwise unusable.
    #[error("invalid difficulty target")]
    InvalidTarget,
}
