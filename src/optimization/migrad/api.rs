//! High-level entry point for minimizing a user-provided `FCN`.
//!
//! This selects an L-BFGS solver with either Hager–Zhang or More–Thuente line
//! search, wraps the objective in an `ArgMinAdapter`, and delegates the run to
//! `run_lbfgs`. A stationary start is only accepted as a minimum when the
//! curvature there is not negative; saddles are left along the most
//! negative eigendirection first.
use std::cell::Cell;

use crate::optimization::{
    errors::{OptError, OptResult},
    migrad::{
        OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        finite_diff::cost_hessian,
        run::run_lbfgs,
        traits::{FCN, LineSearcher, MigradOptions},
    },
};
use argmin::core::{CostFunction, Gradient};
use argmin_math::ArgminL2Norm;
use nalgebra::DMatrix;

/// Minimize `f(θ)` from `theta0` using L-BFGS with the chosen line search.
///
/// Convenience wrapper around [`minimize_counted`] with a fresh call counter.
///
/// # Example
/// ```no_run
/// use ndarray::array;
/// use rust_minuit::optimization::{
///     errors::OptResult,
///     migrad::{minimize, MigradOptions, Theta, FCN},
/// };
///
/// struct Bowl;
/// impl FCN for Bowl {
///     fn value(&self, theta: &Theta) -> OptResult<f64> {
///         Ok(theta.dot(theta))
///     }
/// }
///
/// let out = minimize(&Bowl, array![0.1, -0.2, 0.3], &MigradOptions::default())?;
/// println!("θ̂ = {:?}", out.theta_hat);
/// # Ok::<(), rust_minuit::optimization::errors::OptError>(())
/// ```
pub fn minimize<F: FCN>(f: &F, theta0: Theta, opts: &MigradOptions) -> OptResult<OptimOutcome> {
    let nfcn = Cell::new(0);
    minimize_counted(f, theta0, opts, &nfcn)
}

/// Minimize `f(θ)` from `theta0`, accumulating objective calls in `nfcn`.
///
/// # Behavior
/// - Rejects non-finite starting values.
/// - An empty `theta0` is evaluated once and returned as its own minimum.
/// - If the starting gradient norm is already below `opts.tols.tol_grad`
///   (or exactly zero) the Hessian at the start is checked. Without a
///   negative eigenvalue the start is returned as the minimum and the
///   solver is skipped, since line searches need a descent direction.
///   With one, the run starts from the first lower point along that
///   eigendirection instead (see [`escape_saddle`]).
/// - Otherwise builds the solver for `opts.line_searcher` and runs it.
///
/// # Errors
/// - `OptError::InvalidThetaHat` for non-finite starting values.
/// - Objective errors from the first evaluation or the saddle check.
/// - Builder and runtime errors from the solver.
pub fn minimize_counted<F: FCN>(
    f: &F, theta0: Theta, opts: &MigradOptions, nfcn: &Cell<usize>,
) -> OptResult<OptimOutcome> {
    if let Some((index, &value)) = theta0.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(OptError::InvalidThetaHat {
            index,
            value,
            reason: "Starting values must be finite.",
        });
    }
    let problem = ArgMinAdapter::new(f, nfcn);
    let f0 = problem.cost(&theta0)?;
    let g0 = problem.gradient(&theta0)?;
    let g0_norm = g0.l2_norm();
    let flat = opts.tols.tol_grad.is_some_and(|tol| g0_norm < tol);
    if theta0.is_empty() {
        return OptimOutcome::at_start(theta0, f0, nfcn.get(), &g0);
    }
    let mut theta0 = theta0;
    if flat || g0_norm == 0.0 {
        match escape_saddle(&problem, &theta0, f0)? {
            Some(lower) => theta0 = lower,
            None => return OptimOutcome::at_start(theta0, f0, nfcn.get(), &g0),
        }
    }
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }
}

// ---- Helper methods ----

/// Relative size below which a negative eigenvalue counts as rounding noise.
const NEG_CURVATURE_TOL: f64 = 1e-6;

/// Step lengths tried along the escape direction: `1, 0.1, …, 1e-5`.
const ESCAPE_TRIES: usize = 6;

/// Leave a stationary point with negative curvature.
///
/// Takes the value-based Hessian at `theta0`. When its smallest eigenvalue
/// is clearly negative, returns the first point along that eigenvector
/// (both signs, lengths `1, 0.1, …`) whose objective is below `f0`.
/// Returns `None` for a positive semi-definite Hessian, for a Hessian that
/// cannot be formed, or when no trial point improves.
///
/// # Errors
/// Objective errors other than non-finite values, which only reject the
/// trial point.
fn escape_saddle<F: FCN>(
    problem: &ArgMinAdapter<'_, F>, theta0: &Theta, f0: f64,
) -> OptResult<Option<Theta>> {
    let cost = |t: &Theta| problem.cost(t).map_err(OptError::from);
    let hess = match cost_hessian(&cost, theta0) {
        Ok(hess) => hess,
        Err(
            OptError::InvalidHessian { .. }
            | OptError::HessianDimMismatch { .. }
            | OptError::NonFiniteCost { .. },
        ) => {
            return Ok(None);
        }
        Err(err) => return Err(err),
    };
    let n = theta0.len();
    let eigen = DMatrix::from_fn(n, n, |i, j| hess[[i, j]]).symmetric_eigen();
    let scale = eigen.eigenvalues.iter().fold(1.0_f64, |m, v| m.max(v.abs()));
    let lowest = eigen.eigenvalues.iter().copied().enumerate().min_by(|a, b| a.1.total_cmp(&b.1));
    let k = match lowest {
        Some((k, lambda)) if lambda < -NEG_CURVATURE_TOL * scale => k,
        _ => return Ok(None),
    };
    let dir: Theta = eigen.eigenvectors.column(k).iter().copied().collect();

    let mut len = 1.0;
    for _ in 0..ESCAPE_TRIES {
        for sign in [1.0, -1.0] {
            let trial = theta0 + &(&dir * (sign * len));
            match cost(&trial) {
                Ok(value) if value < f0 => return Ok(Some(trial)),
                Ok(_) | Err(OptError::NonFiniteCost { .. }) => {}
                Err(err) => return Err(err),
            }
        }
        len *= 0.1;
    }
    Ok(None)
}
