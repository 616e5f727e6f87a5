//! Shared-memory variant: partitions evaluated on a rayon pool.
use rayon::prelude::*;

use crate::quadrature::{
    errors::QuadratureResult,
    options::QuadratureOptions,
    partition::partition,
    serial::partial_sum,
};

/// Partial sums of every partition, in worker order, computed on a pool of
/// `opts.num_procs` threads.
///
/// # Errors
/// `ThreadPool` if the pool cannot be built.
pub fn threaded_partial_sums(opts: &QuadratureOptions) -> QuadratureResult<Vec<f64>> {
    let pool = rayon::ThreadPoolBuilder::new().num_threads(opts.num_procs).build()?;
    let step = opts.step();
    let (num_procs, num_steps) = (opts.num_procs, opts.num_steps);
    Ok(pool.install(|| {
        (0..num_procs)
            .into_par_iter()
            .map(|id| partial_sum(partition(id, num_procs, num_steps), step))
            .collect::<Vec<f64>>()
    }))
}

/// π estimate with the partial sums combined in worker order.
pub fn compute_pi_threads(opts: &QuadratureOptions) -> QuadratureResult<f64> {
    let total: f64 = threaded_partial_sums(opts)?.iter().sum();
    Ok(opts.step() * total)
}
