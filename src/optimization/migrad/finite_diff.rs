//! migrad::finite_diff — finite-difference gradient and Hessian helpers.
//!
//! Purpose
//! -------
//! Provide finite-difference derivatives around an internal parameter
//! vector with validation and symmetry cleanup, so the adapter and the
//! covariance step never touch the `finitediff` API directly.
//!
//! Key behaviors
//! -------------
//! - [`run_fd_diff`]: forward-difference gradient with error capture.
//! - [`compute_hessian`]: central-difference Hessian of a gradient map,
//!   falling back to forward differences when validation fails, then
//!   symmetrized.
//! - [`cost_hessian`]: second differences of the objective itself, for
//!   objectives without an analytic gradient.
//!
//! Invariants & assumptions
//! ------------------------
//! - Errors raised by the objective while differencing are routed into a
//!   shared `closure_err` cell and treated as hard failures.
//! - Everything returned from here has passed [`validate_grad`] or
//!   [`validate_hessian`].
//!
//! Testing notes
//! -------------
//! - Unit tests cover success and failure paths for both helpers and the
//!   in-place symmetrization.
use crate::optimization::{
    errors::OptResult,
    migrad::{
        Grad, Theta,
        types::Hessian,
        validation::{validate_grad, validate_hessian},
    },
};
use argmin::core::Error;
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// run_fd_diff — forward-difference gradient with error capture.
///
/// Purpose
/// -------
/// Difference a scalar objective at `theta` while keeping any error the
/// objective raised, then check the gradient's shape and finiteness.
///
/// Parameters
/// ----------
/// - `theta`: `&Theta`
///   Point at which to difference; its length is the expected gradient
///   dimension.
/// - `func`: `&G`
///   Objective closure handed to `forward_diff`. It parks evaluation
///   errors in `closure_err` and returns `NaN` for them.
/// - `closure_err`: `&RefCell<Option<Error>>`
///   Error slot shared with `func`; cleared on entry, inspected after
///   differencing.
///
/// Returns
/// -------
/// `OptResult<Grad>`
///   - `Ok(grad)` when no error was parked and the gradient validates.
///   - `Err(e)` otherwise.
///
/// Errors
/// ------
/// - Any error parked by `func` (via `From<Error> for OptError`).
/// - `OptError::GradientDimMismatch` / `OptError::InvalidGradient` from
///   [`validate_grad`].
///
/// Panics
/// ------
/// - Never panics.
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    validate_grad(&fd_grad, theta.len())?;
    Ok(fd_grad)
}

/// compute_hessian — Hessian of a gradient map by finite differences.
///
/// Purpose
/// -------
/// Difference the gradient map `f` at `theta` for the covariance step of
/// objectives with an analytic gradient.
///
/// Parameters
/// ----------
/// - `f`: `&F`
///   Gradient map `θ ↦ ∇f(θ)`. Failures should surface as non-finite
///   entries, which validation then rejects.
/// - `theta`: `&Theta`
///   Point at which the Hessian is taken.
///
/// Returns
/// -------
/// `OptResult<Hessian>`
///   The central-difference Hessian, or the forward-difference one when
///   the central result does not validate; symmetrized either way.
///
/// Errors
/// ------
/// - `OptError::HessianDimMismatch` / `OptError::InvalidHessian` when the
///   forward fallback is also unusable. Only that error is reported.
///
/// Panics
/// ------
/// - Never panics.
pub fn compute_hessian<F: Fn(&Theta) -> Grad>(f: &F, theta: &Theta) -> OptResult<Hessian> {
    let dim = theta.len();
    let mut hess = theta.central_hessian(f);
    if validate_hessian(&hess, dim).is_err() {
        hess = theta.forward_hessian(f);
        validate_hessian(&hess, dim)?;
    }
    symmetrize_hess(&mut hess);
    Ok(hess)
}

/// cost_hessian — Hessian from second differences of objective values.
///
/// Purpose
/// -------
/// Curvature for objectives without an analytic gradient. Differencing a
/// finite-difference gradient would put the rounding noise of `f` over
/// `h²` with `h ≈ √ε`, i.e. noise of order `|f|` in every entry; here
/// `h_i = ε^¼ · max(1, |θ_i|)`.
///
/// Parameters
/// ----------
/// - `f`: `&G`
///   Fallible objective; each call counts as one evaluation.
/// - `theta`: `&Theta`
///   Point at which the Hessian is taken.
///
/// Returns
/// -------
/// `OptResult<Hessian>`
///   Symmetric by construction, from `1 + 2n²` evaluations.
///
/// Errors
/// ------
/// - The first error `f` returns; no further evaluations are made.
/// - `OptError::HessianDimMismatch` / `OptError::InvalidHessian` from
///   [`validate_hessian`].
///
/// Panics
/// ------
/// - Never panics.
pub fn cost_hessian<G: Fn(&Theta) -> OptResult<f64>>(f: &G, theta: &Theta) -> OptResult<Hessian> {
    let n = theta.len();
    let steps: Grad = theta.mapv(|t| HESSIAN_STEP * t.abs().max(1.0));
    let f0 = f(theta)?;
    let mut x = theta.clone();
    let mut eval_at = |shifts: &[(usize, f64)]| -> OptResult<f64> {
        for &(i, d) in shifts {
            x[i] = theta[i] + d;
        }
        let val = f(&x);
        for &(i, _) in shifts {
            x[i] = theta[i];
        }
        val
    };

    let mut hess = Hessian::zeros((n, n));
    for i in 0..n {
        let hi = steps[i];
        let plus = eval_at(&[(i, hi)])?;
        let minus = eval_at(&[(i, -hi)])?;
        hess[[i, i]] = (plus - 2.0 * f0 + minus) / (hi * hi);
        for j in 0..i {
            let hj = steps[j];
            let pp = eval_at(&[(i, hi), (j, hj)])?;
            let pm = eval_at(&[(i, hi), (j, -hj)])?;
            let mp = eval_at(&[(i, -hi), (j, hj)])?;
            let mm = eval_at(&[(i, -hi), (j, -hj)])?;
            let hij = (pp - pm - mp + mm) / (4.0 * hi * hj);
            hess[[i, j]] = hij;
            hess[[j, i]] = hij;
        }
    }
    validate_hessian(&hess, n)?;
    Ok(hess)
}

// ---- Helper methods ----

/// `ε^¼`, the relative step for second differences of function values.
const HESSIAN_STEP: f64 = 1.220_703_125e-4;

/// Replace each off-diagonal pair with its average; the diagonal is kept.
fn symmetrize_hess(hess: &mut Hessian) {
    for i in 0..hess.nrows() {
        for j in 0..i {
            let avg = 0.5 * (hess[[i, j]] + hess[[j, i]]);
            hess[[i, j]] = avg;
            hess[[j, i]] = avg;
        }
    }
}
