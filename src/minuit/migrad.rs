//! minuit::migrad — the Migrad application.
//!
//! Purpose
//! -------
//! Minimize a user [`FCN`] over an [`MnUserParameters`] set and report a
//! [`FunctionMinimum`] with parabolic errors, covariance and EDM.
//!
//! Key behaviors
//! -------------
//! - Free parameters are mapped into an unbounded internal vector
//!   ([`ParameterTransform`]); constants and fixed parameters stay put.
//! - Each pass runs L-BFGS on the internal objective, then takes a
//!   finite-difference Hessian at the best point for covariance and EDM.
//! - A pass that misses the EDM target is followed by another one from the
//!   best point with a ten times tighter gradient tolerance, up to the
//!   strategy's pass count or the call budget.
//! - No free parameters: the objective is evaluated once.
//!
//! Invariants & assumptions
//! ------------------------
//! - The call budget bounds each pass's iteration count and is checked
//!   again after the fact; `nfcn` above `maxfcn` sets
//!   `reached_call_limit` rather than aborting mid-iteration.
//! - A solver failure in a later pass keeps the result of the previous
//!   one; a failure in the first pass is returned to the caller. Errors
//!   raised by the objective itself are always returned.
use std::cell::{Cell, RefCell};

use argmin::core::{CostFunction, Gradient};
use ndarray::Array2;

use crate::{
    inference::hessian::{CovarianceEstimate, calc_covariance, calc_covariance_from_cost},
    minuit::{
        application::{MnApplication, default_max_fcn, edm_target},
        errors::{MinuitError, MinuitResult},
        minimum::FunctionMinimum,
        parameters::MnUserParameters,
        strategy::MnStrategy,
        transform::{InternalFcn, ParameterTransform},
    },
    optimization::{
        errors::{OptError, OptResult},
        migrad::{
            FCN, Grad, MigradOptions, Theta, Tolerances, adapter::ArgMinAdapter, minimize_counted,
        },
    },
};

/// Variable-metric minimizer bound to an objective.
pub struct MnMigrad<'a, F: FCN + ?Sized> {
    fcn: &'a F,
    params: MnUserParameters,
    strategy: MnStrategy,
    verbose: bool,
}

struct PassState {
    theta: Theta,
    fval: f64,
    est: CovarianceEstimate,
}

impl<'a, F: FCN + ?Sized> MnMigrad<'a, F> {
    pub fn new(fcn: &'a F, params: MnUserParameters, strategy: MnStrategy) -> Self {
        Self { fcn, params, strategy, verbose: false }
    }

    /// Build with a raw strategy level (0, 1 or 2).
    pub fn with_level(fcn: &'a F, params: MnUserParameters, level: u32) -> MinuitResult<Self> {
        Ok(Self::new(fcn, params, MnStrategy::new(level)?))
    }

    /// Attach the solver observer (with the `obs_slog` feature).
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn pass_options(&self, tol_grad: f64, max_iter: usize) -> OptResult<MigradOptions> {
        let tols = Tolerances::new(Some(tol_grad), None, Some(max_iter))?;
        let opts = MigradOptions::new(
            tols,
            self.strategy.line_searcher(),
            Some(self.strategy.lbfgs_mem()),
        )?;
        Ok(opts.with_verbose(self.verbose))
    }
}

impl<F: FCN + ?Sized> MnApplication for MnMigrad<'_, F> {
    fn minimize(&mut self, maxfcn: usize, tolerance: f64) -> MinuitResult<FunctionMinimum> {
        let up = self.fcn.up();
        let edm_target = edm_target(tolerance, up)?;
        let transform = ParameterTransform::new(&self.params);
        let n = transform.n_int();
        let maxfcn = if maxfcn == 0 { default_max_fcn(n) } else { maxfcn };
        let internal = InternalFcn::new(self.fcn, &transform);
        let nfcn = Cell::new(0);

        if n == 0 {
            let fval =
                ArgMinAdapter::new(&internal, &nfcn).cost(&Theta::zeros(0)).map_err(OptError::from)?;
            return Ok(FunctionMinimum {
                params: self.params.clone(),
                fval,
                edm: 0.0,
                edm_target,
                nfcn: nfcn.get(),
                iterations: 0,
                up,
                covariance: Array2::zeros((0, 0)),
                reached_call_limit: false,
                covariance_pos_def: true,
            });
        }

        let steps = transform.initial_steps(&self.params);
        let mut start = transform.initial_internal();
        let mut iterations = 0;
        let mut tol_grad = edm_target;
        let mut state: Option<PassState> = None;
        for _ in 0..self.strategy.max_passes() {
            let remaining = maxfcn.saturating_sub(nfcn.get());
            if remaining == 0 && state.is_some() {
                break;
            }
            let opts = self.pass_options(tol_grad, iteration_cap(remaining, n))?;
            let outcome = match minimize_counted(&internal, start.clone(), &opts, &nfcn) {
                Ok(outcome) => outcome,
                Err(err) if state.is_some() && !is_objective_failure(&err) => break,
                Err(err) => return Err(err.into()),
            };
            iterations += outcome.iterations;
            let est = curvature(&internal, &outcome.theta_hat, &nfcn, up, &steps)?;
            let done = est.edm < edm_target || nfcn.get() >= maxfcn;
            start = outcome.theta_hat.clone();
            state = Some(PassState { theta: outcome.theta_hat, fval: outcome.value, est });
            if done {
                break;
            }
            tol_grad *= 0.1;
        }
        let PassState { theta, fval, est } =
            state.ok_or(MinuitError::Optimization(OptError::MissingThetaHat))?;

        let ext = transform.to_external(&theta);
        let mut params = self.params.clone();
        for k in 0..n {
            let i = transform.ext_index(k);
            let err_int = est.covariance[[k, k]].max(0.0).sqrt();
            let err = transform.external_error(k, theta[k], err_int);
            if let Some(p) = params.get_index_mut(i) {
                let err = if err > 0.0 && err.is_finite() { err } else { p.error() };
                p.set_state(ext[i], err);
            }
        }
        self.params = params.clone();

        Ok(FunctionMinimum {
            params,
            fval,
            edm: est.edm,
            edm_target,
            nfcn: nfcn.get(),
            iterations,
            up,
            covariance: transform.external_covariance(&theta, &est.covariance),
            reached_call_limit: nfcn.get() > maxfcn,
            covariance_pos_def: est.pos_def,
        })
    }

    fn parameters(&self) -> &MnUserParameters {
        &self.params
    }

    fn parameters_mut(&mut self) -> &mut MnUserParameters {
        &mut self.params
    }

    fn strategy(&self) -> MnStrategy {
        self.strategy
    }
}

// ---- Helper methods ----

/// Iterations one pass may take from the `remaining` call budget.
///
/// An iteration costs about one finite-difference gradient (`2n` calls)
/// plus two line-search evaluations. Always at least one.
fn iteration_cap(remaining: usize, n: usize) -> usize {
    (remaining / (2 * n + 2)).max(1)
}

/// Whether `err` came from the objective rather than the solver.
fn is_objective_failure(err: &OptError) -> bool {
    matches!(err, OptError::ObjectiveFailed { .. })
}

/// Covariance and EDM at `theta`, counting every call in `nfcn`.
///
/// When the Hessian cannot be formed the squared step sizes stand in for
/// the covariance, the EDM is unknown (`∞`) and the estimate is flagged as
/// not positive definite.
///
/// Objectives without an analytic gradient get their Hessian from second
/// differences of the objective values.
///
/// # Errors
/// `ObjectiveFailed` raised by the objective while differencing; every
/// other failure falls back to the step-size estimate.
fn curvature<F: FCN>(
    internal: &F, theta: &Theta, nfcn: &Cell<usize>, up: f64, steps: &Grad,
) -> OptResult<CovarianceEstimate> {
    let adapter = ArgMinAdapter::new(internal, nfcn);
    let n = theta.len();
    let analytic = !matches!(internal.grad(theta), Err(OptError::GradientNotImplemented));
    let raised: RefCell<Option<OptError>> = RefCell::new(None);
    let estimate = adapter.gradient(theta).map_err(OptError::from).and_then(|grad| {
        if analytic {
            let grad_map = |t: &Theta| match adapter.gradient(t).map_err(OptError::from) {
                Ok(g) => g,
                Err(err) => {
                    let mut slot = raised.borrow_mut();
                    if slot.is_none() {
                        *slot = Some(err);
                    }
                    Grad::from_elem(n, f64::NAN)
                }
            };
            calc_covariance(&grad_map, theta, &grad, up)
        } else {
            let cost = |t: &Theta| adapter.cost(t).map_err(OptError::from);
            calc_covariance_from_cost(&cost, theta, &grad, up)
        }
    });
    let estimate = match raised.into_inner() {
        Some(err) if is_objective_failure(&err) => Err(err),
        _ => estimate,
    };
    match estimate {
        Ok(est) => Ok(est),
        Err(err) if is_objective_failure(&err) => Err(err),
        Err(_) => Ok(CovarianceEstimate {
            covariance: Array2::from_diag(&steps.mapv(|s| s * s)),
            edm: f64::INFINITY,
            pos_def: false,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::migrad::Cost;
    use approx::assert_relative_eq;

    struct Parabola {
        up: f64,
    }

    impl FCN for Parabola {
        fn value(&self, p: &Theta) -> OptResult<Cost> {
            Ok(p[0] * p[0])
        }

        fn up(&self) -> f64 {
            self.up
        }
    }

    struct Chi2;

    impl FCN for Chi2 {
        // Two independent Gaussian measurements: μ₀ = 1 ± 0.5, μ₁ = −2 ± 2.
        fn value(&self, p: &Theta) -> OptResult<Cost> {
            Ok(((p[0] - 1.0) / 0.5).powi(2) + ((p[1] + 2.0) / 2.0).powi(2))
        }
    }

    struct Offset;

    impl FCN for Offset {
        fn value(&self, p: &Theta) -> OptResult<Cost> {
            Ok((p[0] - p[1]).powi(2))
        }
    }

    #[test]
    // Purpose
    // -------
    // The single-parameter parabola with `up = 0.5` converges to 0 with
    // the likelihood-scale error.
    //
    // Given
    // -----
    // - `f = x²`, `up = 0.5`, `x₀ = 1`, step 0.1, default call.
    //
    // Expect
    // ------
    // - Valid minimum at `x ≈ 0` with error `√(2 · 0.5 / 2) = √0.5`.
    fn migrad_minimizes_parabola_with_half_up() {
        // Arrange
        let fcn = Parabola { up: 0.5 };
        let mut upar = MnUserParameters::new();
        upar.add_with_step("x", 1.0, 0.1).expect("x");
        let mut migrad = MnMigrad::new(&fcn, upar, MnStrategy::default());

        // Act
        let min = migrad.minimize_default().expect("minimization succeeds");

        // Assert
        assert!(min.is_valid(), "{min}");
        let x = min.user_parameters().parameter("x").expect("x");
        assert!(x.value().abs() < 1e-2);
        assert_relative_eq!(x.error(), 0.5_f64.sqrt(), epsilon = 1e-3);
        assert_eq!(migrad.parameters().value("x").expect("x"), x.value());
    }

    #[test]
    // Purpose
    // -------
    // χ² errors and covariance match the measurement widths.
    //
    // Given
    // -----
    // - Two independent measurements with σ = (0.5, 2), `up = 1`.
    //
    // Expect
    // ------
    // - Values `(1, −2)`, errors `(0.5, 2)`, vanishing correlation.
    fn migrad_recovers_chi2_errors() {
        // Arrange
        let mut upar = MnUserParameters::new();
        upar.add_with_step("a", 0.0, 0.1).expect("a");
        upar.add_with_step("b", 0.0, 0.1).expect("b");
        let mut migrad = MnMigrad::new(&Chi2, upar, MnStrategy::default());

        // Act
        let min = migrad.minimize(0, 0.01).expect("minimization succeeds");

        // Assert
        assert!(min.is_valid(), "{min}");
        let upar = min.user_parameters();
        assert_relative_eq!(upar.value("a").expect("a"), 1.0, epsilon = 1e-3);
        assert_relative_eq!(upar.value("b").expect("b"), -2.0, epsilon = 1e-2);
        assert_relative_eq!(upar.error("a").expect("a"), 0.5, epsilon = 1e-3);
        assert_relative_eq!(upar.error("b").expect("b"), 2.0, epsilon = 1e-2);
        assert!(min.covariance()[[0, 1]].abs() < 1e-3);
    }

    #[test]
    // Purpose
    // -------
    // Constant and fixed parameters are passed to the objective unchanged.
    //
    // Given
    // -----
    // - `f = (x − c)²` with constant `c = 3`; then `x` fixed at 5.
    //
    // Expect
    // ------
    // - `x → 3`; with `x` fixed a single evaluation returning 4.
    fn migrad_respects_constants_and_fixed_parameters() {
        // Arrange
        let mut upar = MnUserParameters::new();
        upar.add_with_step("x", 0.0, 0.5).expect("x");
        upar.add("c", 3.0).expect("c");
        let mut migrad = MnMigrad::new(&Offset, upar.clone(), MnStrategy::default());

        // Act
        let min = migrad.minimize_default().expect("free run");
        upar.set_value("x", 5.0).expect("set");
        upar.fix("x").expect("fix");
        let mut frozen = MnMigrad::new(&Offset, upar, MnStrategy::default());
        let frozen_min = frozen.minimize_default().expect("frozen run");

        // Assert
        assert_relative_eq!(min.user_parameters().value("x").expect("x"), 3.0, epsilon = 1e-2);
        assert_eq!(min.user_parameters().value("c").expect("c"), 3.0);
        assert_eq!(frozen_min.nfcn(), 1);
        assert_eq!(frozen_min.fval(), 4.0);
        assert!(frozen_min.covariance().is_empty());
        assert!(frozen_min.is_valid());
    }

    #[test]
    // Purpose
    // -------
    // A limited parameter whose unconstrained minimum lies outside the
    // range ends on the boundary and never leaves it.
    //
    // Given
    // -----
    // - `f = (x − c)²`, `c = 3`, `x ∈ [−1, 1]`.
    //
    // Expect
    // ------
    // - `x` close to 1 and within the limits.
    fn migrad_keeps_limited_parameter_in_range() {
        // Arrange
        let mut upar = MnUserParameters::new();
        upar.add_with_step("x", 0.0, 0.1).expect("x");
        upar.set_limits("x", -1.0, 1.0).expect("limits");
        upar.add("c", 3.0).expect("c");
        let mut migrad = MnMigrad::new(&Offset, upar, MnStrategy::new(0).expect("low"));

        // Act
        let min = migrad.minimize_default().expect("minimization succeeds");

        // Assert
        let x = min.user_parameters().value("x").expect("x");
        assert!(x <= 1.0 && x > 0.95, "x = {x}");
    }

    /// `x²` that starts failing after `ok_calls` evaluations.
    struct FailsAfter {
        ok_calls: usize,
        calls: Cell<usize>,
    }

    impl FCN for FailsAfter {
        fn value(&self, p: &Theta) -> OptResult<Cost> {
            self.calls.set(self.calls.get() + 1);
            if self.calls.get() > self.ok_calls {
                return Err(OptError::ObjectiveFailed { text: "objective gave up".to_string() });
            }
            Ok(p[0] * p[0] + 0.5 * p[1] * p[1])
        }
    }

    struct HalfWell;

    impl FCN for HalfWell {
        fn value(&self, p: &Theta) -> OptResult<Cost> {
            Ok((p[0] - 0.5).powi(2))
        }
    }

    #[test]
    // Purpose
    // -------
    // A limited parameter that starts exactly on its limit still moves to
    // the interior minimum, for every kind of limit.
    //
    // Given
    // -----
    // - `f = (x − 0.5)²` with `x` placed on the bound: `[0, 1]` at 1, a
    //   lower limit 0 clamping a start of −3, an upper limit 1 clamping a
    //   start of 3.
    //
    // Expect
    // ------
    // - A valid minimum with `x ≈ 0.5` and `f ≈ 0` in each case.
    fn migrad_leaves_limit_when_started_on_it() {
        let cases: [(f64, &dyn Fn(&mut MnUserParameters)); 3] = [
            (1.0, &|u: &mut MnUserParameters| u.set_limits("x", 0.0, 1.0).expect("limits")),
            (-3.0, &|u: &mut MnUserParameters| u.set_lower_limit("x", 0.0).expect("lower")),
            (3.0, &|u: &mut MnUserParameters| u.set_upper_limit("x", 1.0).expect("upper")),
        ];
        for (start, limit) in cases {
            // Arrange
            let mut upar = MnUserParameters::new();
            upar.add_with_step("x", start, 0.1).expect("x");
            limit(&mut upar);
            let mut migrad = MnMigrad::new(&HalfWell, upar, MnStrategy::default());

            // Act
            let min = migrad.minimize_default().expect("minimization succeeds");

            // Assert
            let x = min.user_parameters().value("x").expect("x");
            assert!((x - 0.5).abs() < 1e-2, "start {start}: x = {x}");
            assert!(min.fval() < 1e-4, "start {start}: {min}");
            assert!(min.is_valid(), "start {start}: {min}");
        }
    }

    #[test]
    // Purpose
    // -------
    // An objective failure is returned to the caller whenever it happens:
    // first pass, later passes, or the curvature step.
    //
    // Given
    // -----
    // - A two-parameter bowl that fails from call `k + 1` on, for every
    //   `k` below the call count of a clean run (strategy 2, three passes).
    //
    // Expect
    // ------
    // - `ObjectiveFailed` for every `k`; the clean run succeeds.
    fn migrad_returns_objective_failure_from_any_stage() {
        // Arrange
        let params = || {
            let mut upar = MnUserParameters::new();
            upar.add_with_step("x", 1.0, 0.1).expect("x");
            upar.add_with_step("y", -2.0, 0.1).expect("y");
            upar
        };
        let strategy = MnStrategy::new(2).expect("high");
        let clean = FailsAfter { ok_calls: usize::MAX, calls: Cell::new(0) };
        let total = MnMigrad::new(&clean, params(), strategy)
            .minimize(0, 0.001)
            .expect("clean run succeeds")
            .nfcn();

        for ok_calls in 0..total {
            let fcn = FailsAfter { ok_calls, calls: Cell::new(0) };
            let mut migrad = MnMigrad::new(&fcn, params(), strategy);

            // Act
            let res = migrad.minimize(0, 0.001);

            // Assert
            assert!(
                matches!(
                    res,
                    Err(MinuitError::Optimization(OptError::ObjectiveFailed { .. }))
                ),
                "ok_calls = {ok_calls}: {res:?}"
            );
        }
    }

    #[test]
    // Purpose
    // -------
    // Invalid tolerances and strategy levels are rejected up front.
    //
    // Given
    // -----
    // - `tolerance = −1`, and `with_level(..., 5)`.
    //
    // Expect
    // ------
    // - `InvalidTolerance` and `InvalidStrategy`.
    fn migrad_rejects_invalid_configuration() {
        // Arrange
        let fcn = Parabola { up: 1.0 };
        let mut upar = MnUserParameters::new();
        upar.add_with_step("x", 1.0, 0.1).expect("x");
        let mut migrad = MnMigrad::new(&fcn, upar.clone(), MnStrategy::default());

        // Act / Assert
        assert!(matches!(migrad.minimize(0, -1.0), Err(MinuitError::InvalidTolerance { .. })));
        assert!(matches!(
            MnMigrad::with_level(&fcn, upar, 5),
            Err(MinuitError::InvalidStrategy { level: 5 })
        ));
    }

    #[test]
    // Purpose
    // -------
    // The per-pass iteration cap shrinks with the remaining budget but
    // never reaches zero.
    //
    // Given
    // -----
    // - Budgets 600, 5 and 0 for `n = 2`.
    //
    // Expect
    // ------
    // - Caps 100, 1, 1.
    fn iteration_cap_follows_remaining_budget() {
        // Act / Assert
        assert_eq!(iteration_cap(600, 2), 100);
        assert_eq!(iteration_cap(5, 2), 1);
        assert_eq!(iteration_cap(0, 2), 1);
    }
}
