//! Monte-Carlo π: the fraction of uniform points in `[-1, 1]²` that land
//! inside the unit circle approaches `π / 4`.
//!
//! Each pooled worker owns an `StdRng` seeded from the base seed and its
//! worker index, so a run is reproducible for a fixed `(seed, workers)`.
use rand::{Rng, SeedableRng, rngs::StdRng};
use rayon::prelude::*;

use crate::quadrature::errors::{QuadratureError, QuadratureResult};

/// `4 · hits / trials` for `trials` points drawn from `rng`.
///
/// Returns `0.0` for zero trials.
pub fn pi_each<R: Rng + ?Sized>(trials: u64, rng: &mut R) -> f64 {
    if trials == 0 {
        return 0.0;
    }
    let mut hits: u64 = 0;
    for _ in 0..trials {
        let x: f64 = rng.gen_range(-1.0..=1.0);
        let y: f64 = rng.gen_range(-1.0..=1.0);
        if x * x + y * y <= 1.0 {
            hits += 1;
        }
    }
    4.0 * hits as f64 / trials as f64
}

/// Single-threaded estimate from `trials` points.
///
/// # Errors
/// `TooFewTrials` for `trials == 0`.
pub fn monte_carlo_pi(trials: u64, seed: u64) -> QuadratureResult<f64> {
    if trials == 0 {
        return Err(QuadratureError::TooFewTrials { trials, workers: 1 });
    }
    let mut rng = StdRng::seed_from_u64(seed);
    Ok(pi_each(trials, &mut rng))
}

/// Mean of `workers` independent estimates, each over `trials / workers`
/// points, evaluated on a rayon pool of `workers` threads.
///
/// # Errors
/// - `ZeroWorkers` for `workers == 0`.
/// - `TooFewTrials` when `trials / workers == 0`.
/// - `ThreadPool` if the pool cannot be built.
pub fn monte_carlo_pi_pooled(trials: u64, workers: usize, seed: u64) -> QuadratureResult<f64> {
    if workers == 0 {
        return Err(QuadratureError::ZeroWorkers);
    }
    let per_worker = trials / workers as u64;
    if per_worker == 0 {
        return Err(QuadratureError::TooFewTrials { trials, workers });
    }
    let pool = rayon::ThreadPoolBuilder::new().num_threads(workers).build()?;
    let estimates = pool.install(|| {
        (0..workers)
            .into_par_iter()
            .map(|id| {
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(id as u64));
                pi_each(per_worker, &mut rng)
            })
            .collect::<Vec<f64>>()
    });
    Ok(estimates.iter().sum::<f64>() / workers as f64)
}
