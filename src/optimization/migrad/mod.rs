//! migrad — argmin-powered variable-metric minimizer for user objectives.
//!
//! Purpose
//! -------
//! Provide the numerical core behind `minuit::MnMigrad`: given a user
//! objective implementing [`FCN`] and a starting point in the internal
//! (unbounded) parameter space, run L-BFGS with a configurable line search
//! and report the best point found together with call counts.
//!
//! Key behaviors
//! -------------
//! - Bridge any [`FCN`] into Argmin through [`adapter::ArgMinAdapter`],
//!   counting every objective call (finite-difference evaluations included).
//! - Expose [`minimize`] / [`api::minimize_counted`], which:
//!   - reject non-finite starting values,
//!   - return the start point when its gradient is already negligible,
//!   - select an L-BFGS solver via [`builders`] based on [`LineSearcher`],
//!   - execute it via [`run::run_lbfgs`] and normalize the result into an
//!     [`OptimOutcome`].
//! - Provide finite-difference gradients and Hessians in [`finite_diff`]
//!   for objectives without analytic derivatives.
//!
//! Invariants & assumptions
//! ------------------------
//! - The objective is minimized as-is; no sign convention is imposed.
//! - [`FCN::value`] and [`FCN::grad`] report invalid inputs as [`OptError`]
//!   values, never panics.
//! - [`Tolerances`] and [`MigradOptions`] are validated on construction.
//!
//! Conventions
//! -----------
//! - Vectors and matrices use the aliases in [`types`].
//! - Errors bubble up as [`OptResult<T>`]; raw Argmin errors never escape.
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover call counting and analytic gradients in
//!   [`adapter`], solver wiring in [`builders`], finite differences and
//!   validation, and configuration invariants in [`traits`].
//! - [`api`] tests run full minimizations on quadratic and Rosenbrock
//!   objectives; the Minuit layer and tests/ cover limits and covariance.
//!
//! [`OptError`]: crate::optimization::errors::OptError
//! [`OptResult<T>`]: crate::optimization::errors::OptResult

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::{minimize, minimize_counted};
pub use self::traits::{FCN, LineSearcher, MigradOptions, OptimOutcome, Tolerances};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Hessian, Theta};

pub mod prelude {
    pub use super::api::minimize;
    pub use super::traits::{FCN, LineSearcher, MigradOptions, OptimOutcome, Tolerances};
    pub use super::types::{Cost, Grad, Theta};
}
