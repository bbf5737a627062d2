// Consensus-critical. Changes here require a coordinated network upgrade.
//! Per-network proof-of-work policy.

use crate::constants::{POW_TARGET_SPACING_SECS, POW_TARGET_TIMESPAN_SECS};
use crate::types::Hash32;

/// Easiest permissible target on mainnet and testnet (compact `0x1d00ffff`).
const POW_LIMIT_MAIN: [u8; 32] = [
    0x00, 0x00, 0x00, 0x00, 0xff, 0xff, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00,
];

/// Easiest permissible target on regtest (compact `0x207fffff`).
const POW_LIMIT_REGTEST: [u8; 32] = [
    0x7f, 0xff, 0xff, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00,
];

/// Static per-network consensus parameters consumed by the difficulty core.
#[derive(Debug, Clone)]
pub struct ConsensusParams {
    /// Easiest permissible target; an upper bound on every computed target.
    pub pow_limit: Hash32,
    /// Expected duration of one legacy retarget window, in seconds.
    pub pow_target_timespan: i64,
    /// Expected spacing between blocks, in seconds.
    pub pow_target_spacing: i64,
    /// Permit min-difficulty blocks when the chain stalls.
    pub allow_min_difficulty_blocks: bool,
    /// Disable retargeting entirely.
    pub no_retargeting: bool,
}

impl ConsensusParams {
    /// Parameters for the main network.
    pub fn mainnet() -> Self {
        Self {
            pow_limit: Hash32(POW_LIMIT_MAIN),
            pow_target_timespan: POW_TARGET_TIMESPAN_SECS,
            pow_target_spacing: POW_TARGET_SPACING_SECS,
            allow_min_difficulty_blocks: false,
            no_retargeting: false,
        }
    }

    /// Parameters for the public test network.
    pub fn testnet() -> Self {
        Self {
            allow_min_difficulty_blocks: true,
            ..Self::mainnet()
        }
    }

    /// Parameters for local regression testing.
    pub fn regtest() -> Self {
        Self {
            pow_limit: Hash32(POW_LIMIT_REGTEST),
            pow_target_timespan: POW_TARGET_TIMESPAN_SECS,
            pow_target_spacing: POW_TARGET_SPACING_SECS,
            allow_min_difficulty_blocks: true,
            no_retargeting: true,
        }
    }

    /// Number of blocks between legacy difficulty recalculations.
    ///
    /// Panics if `pow_target_spacing` is not positive; a node configured
    /// that way is broken and must not proceed.
    pub fn difficulty_adjustment_interval(&self) -> i64 {
        assert!(
            self.pow_target_spacing > 0,
            "pow_target_spacing must be positive"
        );
        self.pow_target_timespan / self.pow_target_spacing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mainnet_interval_is_2016() {
        let params = ConsensusParams::mainnet();
        assert_eq!(params.difficulty_adjustment_interval(), 2016);
        assert_eq!(params.pow_target_timespan, 14 * 24 * 60 * 60);
        assert_eq!(params.pow_target_spacing, 600);
        assert!(!params.allow_min_difficulty_blocks);
        assert!(!params.no_retargeting);
    }

    #[test]
    fn testnet_allows_min_difficulty() {
        let params = ConsensusParams::testnet();
        assert!(params.allow_min_difficulty_blocks);
        assert!(!params.no_retargeting);
        assert_eq!(params.pow_limit, ConsensusParams::mainnet().pow_limit);
    }

    #[test]
    fn regtest_disables_retargeting() {
        let params = ConsensusParams::regtest();
        assert!(params.no_retargeting);
        assert_eq!(params.pow_limit.as_bytes()[0], 0x7f);
    }

    #[test]
    #[should_panic(expected = "pow_target_spacing must be positive")]
    fn zero_spacing_is_a_contract_violation() {
        let mut params = ConsensusParams::mainnet();
        params.pow_target_spacing = 0;
        let _ = params.difficulty_adjustment_interval();
    }
}
