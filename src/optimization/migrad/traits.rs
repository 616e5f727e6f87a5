//! Public API surface for Migrad-style minimization.
//!
//! - [`FCN`]: trait users implement for their objective.
//! - [`MigradOptions`] and [`Tolerances`]: configuration for the optimizer.
//! - [`LineSearcher`]: choice of line search used by L-BFGS.
//! - [`OptimOutcome`]: normalized result returned by the low-level `minimize` API.
//!
//! Convention: the objective is minimized as-is. `up()` is the change in the
//! objective that corresponds to one standard deviation; it only matters for
//! error estimates and the convergence target, never for the solver itself.
use crate::optimization::{
    errors::{OptError, OptResult},
    migrad::{
        Cost, FnEvalMap, Grad, Theta,
        validation::{validate_theta_hat, validate_value, verify_tol_cost, verify_tol_grad},
    },
};
use argmin::core::TerminationStatus;
use argmin_math::ArgminL2Norm;
use std::str::FromStr;

/// User-implemented objective function.
///
/// Required:
/// - `value(&Theta) -> OptResult<Cost>`: evaluate `f(θ)` for the full
///   parameter vector (constants and fixed parameters included).
///   - Errors: return `OptError::ObjectiveFailed` for inputs the objective
///     cannot evaluate. It ends the minimization and is returned to the
///     caller from any pass.
///   - Must not panic; a panic unwinds through the minimizer.
///
/// Provided:
/// - `up() -> f64`: error definition. `1.0` for χ² fits (the default),
///   `0.5` for negative log-likelihood fits.
/// - `grad(&Theta) -> OptResult<Grad>`: analytic gradient `∇f(θ)`.
///   If not implemented, finite differences are used automatically.
///   - Errors: `GradientNotImplemented` selects finite differences; any
///     other error is propagated like a `value` error.
pub trait FCN {
    fn value(&self, par: &Theta) -> OptResult<Cost>;

    fn up(&self) -> f64 {
        1.0
    }

    fn grad(&self, _par: &Theta) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }
}

impl<F: FCN + ?Sized> FCN for &F {
    fn value(&self, par: &Theta) -> OptResult<Cost> {
        (**self).value(par)
    }

    fn up(&self) -> f64 {
        (**self).up()
    }

    fn grad(&self, par: &Theta) -> OptResult<Grad> {
        (**self).grad(par)
    }
}

/// Choice of line search used inside the L-BFGS solver.
///
/// Parsing accepts case-insensitive names (`"MoreThuente"`,
/// `"HagerZhang"`). Unknown names return `OptError::InvalidLineSearch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSearcher {
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearcher {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morethuente" => Ok(LineSearcher::MoreThuente),
            "hagerzhang" => Ok(LineSearcher::HagerZhang),
            _ => Err(OptError::InvalidLineSearch {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'MoreThuente' or 'HagerZhang'.",
            }),
        }
    }
}

/// Optimizer-level configuration.
///
/// Fields:
/// - `tols: Tolerances` — numerical tolerances and iteration limits.
/// - `line_searcher: LineSearcher` — line-search algorithm used by L-BFGS.
/// - `verbose: bool` — if `true`, attaches an observer (behind the `obs_slog`
///   feature) and prints progress.
/// - `lbfgs_mem: Option<usize>` — history size; `None` uses the default of 7.
///
/// Default:
/// - `tols`: `tol_grad = 1e-6`, `tol_cost = None`, `max_iter = 300`
/// - `line_searcher`: `MoreThuente`
/// - `verbose`: `false`
#[derive(Debug, Clone, PartialEq)]
pub struct MigradOptions {
    pub tols: Tolerances,
    pub line_searcher: LineSearcher,
    pub verbose: bool,
    pub lbfgs_mem: Option<usize>,
}

impl MigradOptions {
    /// Create a new set of optimizer options.
    ///
    /// Numeric tolerances are validated by [`Tolerances::new`]; this
    /// constructor only rejects a zero L-BFGS memory.
    ///
    /// # Errors
    /// - [`OptError::InvalidLBFGSMem`] for `lbfgs_mem == Some(0)`.
    pub fn new(
        tols: Tolerances, line_searcher: LineSearcher, lbfgs_mem: Option<usize>,
    ) -> OptResult<Self> {
        if let Some(m) = lbfgs_mem {
            if m == 0 {
                return Err(OptError::InvalidLBFGSMem {
                    mem: m,
                    reason: "L-BFGS memory must be greater than zero.",
                });
            }
        }
        Ok(Self { tols, line_searcher, verbose: false, lbfgs_mem })
    }

    /// Same options with progress reporting switched on or off.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

impl Default for MigradOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances { tol_grad: Some(1e-6), tol_cost: None, max_iter: Some(300) },
            line_searcher: LineSearcher::MoreThuente,
            verbose: false,
            lbfgs_mem: None,
        }
    }
}

/// Numerical tolerances and iteration limits used by the optimizer.
///
/// - `tol_grad`: terminate when the gradient norm falls below this threshold.
/// - `tol_cost`: terminate when the change in cost falls below this threshold.
/// - `max_iter`: hard cap on the number of iterations.
///
/// Any field can be `None` but **at least one** of the three must be provided
/// (see [`Tolerances::new`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Rules
    /// - At least one of `tol_grad`, `tol_cost`, or `max_iter` must be `Some`.
    /// - If provided, tolerances must be **finite and strictly positive**.
    /// - If provided, `max_iter` must be `> 0`.
    ///
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] if all three are `None`.
    /// - [`OptError::InvalidTolGrad`] / [`OptError::InvalidTolCost`] for non-finite or non-positive tolerances.
    /// - [`OptError::InvalidMaxIter`] if `max_iter == 0`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_cost(tol_cost)?;
        verify_tol_grad(tol_grad)?;
        if let Some(max_iter) = max_iter {
            if max_iter == 0 {
                return Err(OptError::InvalidMaxIter {
                    max_iter,
                    reason: "Maximum iterations must be greater than zero.",
                });
            }
        }
        Ok(Self { tol_grad, tol_cost, max_iter })
    }
}

/// Canonical result returned by `minimize`.
///
/// - `theta_hat`: best internal parameter vector found.
/// - `value`: objective value at `theta_hat`.
/// - `converged`: `true` if the solver reported a terminating status other
///   than `NotTerminated`.
/// - `status`: human-readable termination status string.
/// - `iterations`: number of optimizer iterations performed.
/// - `fn_evals`: function-evaluation counters reported by `argmin`.
/// - `nfcn`: number of calls into the user objective, finite-difference
///   evaluations included.
/// - `grad_norm`: norm of the last available gradient, if present.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub nfcn: usize,
    pub grad_norm: Option<f64>,
}

impl OptimOutcome {
    /// Build a validated [`OptimOutcome`] from raw solver state.
    ///
    /// # Errors
    /// - Propagates any validation errors for `theta_hat` or `value`.
    pub fn new(
        theta_hat_opt: Option<Theta>, value: f64, converged: TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap, nfcn: usize, grad: Option<Grad>,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(value)?;
        let (converged, status) = match converged {
            TerminationStatus::NotTerminated => (false, "Not terminated".to_string()),
            other => (true, format!("{other:?}")),
        };
        let iterations = iterations as usize;
        let grad_norm = grad.map(|g| g.l2_norm());
        Ok(Self { theta_hat, value, converged, status, iterations, fn_evals, nfcn, grad_norm })
    }

    /// Outcome for a start point that already satisfies the gradient
    /// tolerance; no solver iteration is run.
    ///
    /// # Errors
    /// - [`OptError::InvalidThetaHat`] for non-finite entries in `theta0`.
    /// - [`OptError::NonFiniteCost`] for a non-finite `value`.
    pub fn at_start(theta0: Theta, value: f64, nfcn: usize, grad: &Grad) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(Some(theta0))?;
        validate_value(value)?;
        Ok(Self {
            theta_hat,
            value,
            converged: true,
            status: "Initial gradient below tolerance".to_string(),
            iterations: 0,
            fn_evals: FnEvalMap::new(),
            nfcn,
            grad_norm: Some(grad.l2_norm()),
        })
    }
}
