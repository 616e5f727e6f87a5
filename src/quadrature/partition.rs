//! Even, contiguous split of `[0, num_steps)` across workers.
use std::ops::Range;

/// Index range owned by worker `my_id` of `num_procs`.
///
/// `[my_id · num_steps / num_procs, (my_id + 1) · num_steps / num_procs)`
/// with integer division. The products are formed in 128 bits, so the
/// bounds are exact for every `u64` step count.
///
/// # Panics
/// In debug builds, unless `my_id < num_procs` (which also rules out
/// `num_procs == 0`). Release builds skip the check; a zero `num_procs`
/// then divides by zero.
pub fn partition(my_id: usize, num_procs: usize, num_steps: u64) -> Range<u64> {
    debug_assert!(my_id < num_procs, "worker {my_id} out of range for {num_procs} workers");
    let bound = |id: usize| (id as u128 * num_steps as u128 / num_procs as u128) as u64;
    bound(my_id)..bound(my_id + 1)
}

/// All ranges in worker order.
pub fn partitions(num_procs: usize, num_steps: u64) -> impl Iterator<Item = Range<u64>> {
    (0..num_procs).map(move |id| partition(id, num_procs, num_steps))
}
