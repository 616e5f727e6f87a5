//! optimization — Migrad numerical core, parameter transforms, and errors.
//!
//! Purpose
//! -------
//! Provide the optimization layer underneath the Minuit-style front end:
//! an Argmin-backed minimizer for user objectives, the bounded-parameter
//! transforms Minuit uses to keep limited parameters inside their range,
//! and a single error/result surface.
//!
//! Key behaviors
//! -------------
//! - [`migrad`]: minimize an [`migrad::FCN`] from a starting point with
//!   L-BFGS, reporting the best point, status and call counts.
//! - [`numerical_stability`]: internal ↔ external transforms for
//!   double-sided and one-sided limits, plus shared tolerances.
//! - [`errors`]: normalize configuration issues, numerical failures, and
//!   backend solver errors into `OptError` / `OptResult<T>`.
//!
//! Conventions
//! -----------
//! - The optimizer works on the *internal* vector of free parameters only;
//!   fixed and constant parameters never reach it.
//! - This module and its submodules do not log except through the
//!   `obs_slog` observer; reporting is left to front-ends.

pub mod errors;
pub mod migrad;
pub mod numerical_stability;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_minuit::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::migrad::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
