//! quadrature — numerical π estimators used to exercise parallel backends.
//!
//! Purpose
//! -------
//! Estimate π by the midpoint rule on `∫₀¹ 4 / (1 + x²) dx` in three
//! flavors sharing one partition scheme, plus a Monte-Carlo estimator:
//!
//! - [`serial`]: one thread over all steps.
//! - [`shared`]: partitions evaluated on a rayon thread pool.
//! - [`distributed`]: a fixed world of ranks reducing onto rank 0, in
//!   process or (feature `mpi`) over MPI.
//! - [`monte_carlo`]: hit-or-miss sampling, single or pooled.
//!
//! Conventions
//! -----------
//! - `step = 1 / num_steps`, midpoints `x_i = (i + 0.5) · step`.
//! - Worker `k` of `n` owns `[k · N / n, (k + 1) · N / n)`.
//! - Partial sums are combined in worker order.
pub mod distributed;
pub mod errors;
pub mod monte_carlo;
#[cfg(feature = "mpi")]
pub mod mpi;
pub mod options;
pub mod partition;
pub mod report;
pub mod serial;
pub mod shared;

pub use self::{
    distributed::{Collective, Communicator, ROOT, World, compute_pi_ranks, rank_pi},
    errors::{QuadratureError, QuadratureResult},
    monte_carlo::{monte_carlo_pi, monte_carlo_pi_pooled, pi_each},
    options::{DEFAULT_NUM_STEPS, NUM_PROCS_ENV, NUM_STEPS_ENV, QuadratureOptions},
    partition::{partition, partitions},
    report::{PiReport, report, timed},
    serial::{compute_pi, integrand, partial_sum, serial_sum},
    shared::{compute_pi_threads, threaded_partial_sums},
};

pub mod prelude {
    pub use super::{
        Collective, Communicator, PiReport, QuadratureError, QuadratureOptions, QuadratureResult, World,
        compute_pi, compute_pi_ranks, compute_pi_threads, monte_carlo_pi, monte_carlo_pi_pooled,
        partition, rank_pi,
    };
}
