//! Protocol-wide constants for the Ferron chain.

/// Length in bytes of a 32-byte hash.
pub const HASH32_LEN: usize = 32;

/// Expected spacing between blocks, in seconds.
pub const POW_TARGET_SPACING_SECS: i64 = 10 * 60;

/// Expected duration of one legacy retarget window, in seconds (14 days).
pub const POW_TARGET_TIMESPAN_SECS: i64 = 14 * 24 * 60 * 60;

/// First tip height governed by the MC retargeting rules.
pub const MC_ERA_HEIGHT: i32 = 26_000;

/// Default activation height of the MC2 retargeting rules.
///
/// Deployments may override this; the consensus core takes the effective
/// height as an explicit argument rather than reading global configuration.
pub const DEFAULT_MC2_FORK_HEIGHT: i32 = 88_000;

/// Height at which the legacy era permanently enables the min-difficulty
/// stall rule, independent of `allow_min_difficulty_blocks`.
pub const LEGACY_MIN_DIFFICULTY_HEIGHT: i32 = 16_200;

/// Number of blocks the MC era looks back to measure elapsed time.
pub const MC_WINDOW: i32 = 18;
