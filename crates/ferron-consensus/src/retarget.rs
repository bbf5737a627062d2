// Consensus-critical. Changes here require a coordinated network upgrade.
//! Difficulty retargeting.
//!
//! The required target for the block after `tip` depends on the tip height:
//! the legacy one-shot rules apply below height 26 000, the MC rolling
//! window from there up to the MC2 fork height, and the MC2 piecewise
//! rules beyond it. Every branch clamps its result to the network's
//! `pow_limit`.
//!
//! All computations are pure over one chain snapshot. Preconditions
//! (ancestor availability, positive heights, a positive timespan) are
//! contracts; a violating view aborts instead of returning a wrong target.

use crate::chain::{BlockIndex, ChainView};
use crate::compact::{decode_bits, encode_bits, pow_limit_target};
use ferron_core::{ConsensusParams, LEGACY_MIN_DIFFICULTY_HEIGHT, MC_ERA_HEIGHT, MC_WINDOW};
use num_bigint::BigUint;
use num_traits::Zero;
use tracing::debug;

/// Compute the compact target the block after `tip` must satisfy.
///
/// `candidate_time` is the candidate header's timestamp. `fork_height` is
/// the deployment height of the MC2 rules
/// ([`ferron_core::DEFAULT_MC2_FORK_HEIGHT`] unless overridden by the
/// configuration layer).
pub fn next_work_required<C: ChainView>(
    chain: &C,
    tip: &BlockIndex,
    candidate_time: i64,
    params: &ConsensusParams,
    fork_height: i32,
) -> u32 {
    if tip.height >= fork_height {
        return next_work_mc2(chain, tip, params);
    }
    if tip.height >= MC_ERA_HEIGHT {
        return next_work_mc(chain, tip, candidate_time, params);
    }
    next_work_legacy(chain, tip, candidate_time, params)
}

fn next_work_legacy<C: ChainView>(
    chain: &C,
    tip: &BlockIndex,
    candidate_time: i64,
    params: &ConsensusParams,
) -> u32 {
    let limit_bits = encode_bits(&pow_limit_target(params));
    let interval = params.difficulty_adjustment_interval();

    // Only change once per adjustment interval. Height 16 200 keeps the
    // old target even when it lands on a boundary.
    if i64::from(tip.height + 1) % interval != 0 || tip.height == LEGACY_MIN_DIFFICULTY_HEIGHT {
        if params.allow_min_difficulty_blocks || tip.height >= LEGACY_MIN_DIFFICULTY_HEIGHT {
            // A block arriving more than two spacings after the tip may be
            // mined at the minimum difficulty.
            if candidate_time > tip.time + params.pow_target_spacing * 2 {
                return limit_bits;
            }
            // Otherwise inherit the last target that was not itself such a
            // min-difficulty stopgap.
            let mut index = *tip;
            while i64::from(index.height) % interval != 0 && index.bits == limit_bits {
                match chain.prev(&index) {
                    Some(prev) => index = prev,
                    None => break,
                }
            }
            return index.bits;
        }
        return tip.bits;
    }

    let first_height = i64::from(tip.height) - (interval - 1);
    assert!(first_height >= 0, "legacy retarget before a full interval");
    let first = chain.ancestor(tip, first_height as i32);

    calculate_legacy(tip, first.time, params)
}

/// One-shot retarget: scale the tip target by the ratio of actual to
/// expected window duration, limited to a factor of four per step.
fn calculate_legacy(tip: &BlockIndex, first_time: i64, params: &ConsensusParams) -> u32 {
    if params.no_retargeting {
        return tip.bits;
    }

    let timespan = params.pow_target_timespan;
    assert!(timespan > 0, "pow_target_timespan must be positive");
    let actual = (tip.time - first_time).clamp(timespan / 4, timespan * 4);

    let mut target = decode_bits(tip.bits).target * actual as u64 / timespan as u64;

    let limit = pow_limit_target(params);
    if target > limit {
        target = limit;
    }
    encode_bits(&target)
}

fn next_work_mc<C: ChainView>(
    chain: &C,
    tip: &BlockIndex,
    candidate_time: i64,
    params: &ConsensusParams,
) -> u32 {
    let limit_bits = encode_bits(&pow_limit_target(params));

    // Emergency reset: after four spacings of silence the next block may
    // be mined at the minimum difficulty.
    if candidate_time > tip.time + params.pow_target_spacing * 4 {
        return limit_bits;
    }

    let first_height = tip.height - MC_WINDOW;
    assert!(first_height >= 0, "MC retarget needs a full lookback window");
    let first = chain.ancestor(tip, first_height);

    // Scale from the newest block whose target is not the pow limit,
    // unless that walks out past the start of the window.
    let mut base = *tip;
    while base.bits == limit_bits {
        match chain.prev(&base) {
            Some(prev) => base = prev,
            None => break,
        }
    }
    if base.time < first.time {
        base = *tip;
    }

    calculate_mc(chain, &base, tip, first.time, params)
}

/// Rolling-window retarget over a tripled timespan, with a dead band that
/// keeps the current target when a fast block closes out a slow window.
fn calculate_mc<C: ChainView>(
    chain: &C,
    base: &BlockIndex,
    tip: &BlockIndex,
    first_time: i64,
    params: &ConsensusParams,
) -> u32 {
    if params.no_retargeting {
        return base.bits;
    }

    let timespan = params.pow_target_timespan * 3;
    assert!(timespan > 0, "pow_target_timespan must be positive");
    let actual = (tip.time - first_time).clamp(timespan / 4, timespan * 4);

    let target = decode_bits(base.bits).target;

    let prev = match chain.prev(tip) {
        Some(prev) => prev,
        None => panic!("MC retarget tip has no predecessor"),
    };
    if tip.time - prev.time < (7 * params.pow_target_spacing) / 10 && actual > timespan {
        return encode_bits(&target);
    }

    let mut target = target * actual as u64 / timespan as u64;
    let limit = pow_limit_target(params);
    if target > limit {
        target = limit;
    }
    encode_bits(&target)
}

/// Absolute time between the tip and its ancestor `lookback` blocks down,
/// stepping the ancestor further back until the delta is non-zero.
fn delta_time<C: ChainView>(chain: &C, tip: &BlockIndex, lookback: i64) -> i64 {
    let mut height_first = i64::from(tip.height) - lookback;
    loop {
        assert!(height_first > 0, "delta-time probe ran out of chain");
        let first = chain.ancestor(tip, height_first as i32);
        debug!(
            height_last = tip.height,
            height_first = first.height,
            time_last = tip.time,
            time_first = first.time,
            "delta-time probe"
        );

        let delta = (tip.time - first.time).abs();
        if delta == 0 {
            height_first -= 1;
            continue;
        }
        return delta;
    }
}

/// Windowed piecewise retarget reacting to a short (6-block) and a medium
/// (144-block) lookback.
fn next_work_mc2<C: ChainView>(chain: &C, tip: &BlockIndex, params: &ConsensusParams) -> u32 {
    let mut avg_time: i64 = 0;
    let mut avg_bits = BigUint::zero();

    let mut cursor = *tip;
    for _ in 0..6 {
        let prev = match chain.prev(&cursor) {
            Some(prev) => prev,
            None => panic!("MC2 retarget needs six predecessors"),
        };
        avg_bits += decode_bits(cursor.bits).target;
        avg_time += (cursor.time - prev.time).abs();
        cursor = prev;
    }
    avg_time /= 6;
    avg_bits = avg_bits / 6u32;

    let d6 = delta_time(chain, tip, 6);
    let d144 = delta_time(chain, tip, 144);
    debug!(avg_time, d6, d144, "mc2 window");

    // Blocks arriving too fast: raise difficulty, sharply below a 300 s
    // average and gently below the 600 s goal.
    if avg_time < 300 {
        avg_bits = avg_bits * (d6 + 5 * 600 * 6) as u64 / (6 * 600 * 6) as u64;
    } else if avg_time < 600 {
        avg_bits = avg_bits * (d144 + 49 * 600 * 144) as u64 / (50 * 600 * 144) as u64;
    }

    // Blocks arriving too slow: lower difficulty. Evaluated after the
    // branch above on the already-adjusted value, not as its `else`.
    if avg_time > 900 {
        avg_bits = avg_bits * d6 as u64 / (600 * 6) as u64;
    } else if avg_time > 630 {
        avg_bits = avg_bits * (d6 + 5 * 600 * 6) as u64 / (6 * 600 * 6) as u64;
    }

    // Inside the dead band the tip's target carries over unchanged,
    // overriding anything computed above.
    if (600..=630).contains(&avg_time) {
        return tip.bits;
    }

    let limit = pow_limit_target(params);
    if avg_bits > limit {
        avg_bits = limit;
    }
    encode_bits(&avg_bits)
}
