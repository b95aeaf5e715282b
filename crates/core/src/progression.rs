//! Level progression - target generation
//!
//! A new target must be reachable by doubling the current peak tile and must
//! at least double the previous target.

use crate::types::FALLBACK_MAX_VALUE;

/// Smallest power of two strictly greater than `value` (saturates at 2^31).
pub fn next_power_of_two_above(value: u32) -> u32 {
    let mut p: u32 = 2;
    while p <= value {
        match p.checked_mul(2) {
            Some(next) => p = next,
            None => break,
        }
    }
    p
}

/// Target for the next level.
///
/// `max_value` is the highest tile on the board. An empty board counts as a
/// peak of [`FALLBACK_MAX_VALUE`], so it suggests the next power of two above
/// that (256).
///
/// ```
/// use tile_merger_core::progression::next_target;
///
/// // Peak 50 suggests 64, but doubling the previous target (64) wins.
/// assert_eq!(next_target(Some(50), 64), 128);
/// // A large peak pulls the target further up.
/// assert_eq!(next_target(Some(300), 128), 512);
/// ```
pub fn next_target(max_value: Option<u32>, current_target: u32) -> u32 {
    let by_peak = next_power_of_two_above(max_value.unwrap_or(FALLBACK_MAX_VALUE));
    by_peak.max(current_target.saturating_mul(2))
}
