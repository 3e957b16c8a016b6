//! Static work partitioning.
//!
//! Worker `id` of `workers` owns `[floor(id*T/N), floor((id+1)*T/N))` of an index space of
//! `T` items. Ranges are contiguous, cover `[0, T)` exactly once and differ in length by at
//! most one. Every phase partitions its own index space, so one worker owns differently sized
//! ranges in different phases.

use std::ops::Range;

/// Range of `0..total` owned by worker `id` out of `workers`.
///
/// Returns an empty range when `workers` is zero or `id` is out of range.
pub fn partition(id: usize, workers: usize, total: usize) -> Range<usize> {
    if workers == 0 || id >= workers {
        return 0..0;
    }
    // widened so id * total cannot overflow
    let bound = |k: usize| ((k as u128 * total as u128) / workers as u128) as usize;
    let start = bound(id);
    let end = bound(id + 1).min(total);
    start..end
}
