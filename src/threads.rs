//! Per-item thread count heuristic
//!
//! Picks how many parallel part requests one item gets, from its size alone.
//! The table is a static default; there is no throughput feedback.

/// Ascending `(threads, size threshold in bytes)` levels.
///
/// TODO: revisit these thresholds once there are throughput measurements from
/// real batches to compare against.
pub const THREAD_LEVELS: [(usize, u64); 4] = [
    (1, 1 << 20),
    (2, 5 << 20),
    (4, 20 << 20),
    (8, 50 << 20),
];

/// Best thread count for an item of `size` bytes, never above `max_threads`.
///
/// Returns the level of the first threshold strictly greater than `size`,
/// or `max_threads` when the item is larger than every threshold. The result
/// is always at least 1.
pub fn best_threads(size: u64, max_threads: usize) -> usize {
    let max_threads = max_threads.max(1);
    THREAD_LEVELS
        .iter()
        .find(|(_, threshold)| size < *threshold)
        .map_or(max_threads, |(threads, _)| (*threads).min(max_threads))
}
