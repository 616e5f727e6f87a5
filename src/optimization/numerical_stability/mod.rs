//! numerical_stability — bounded-parameter transforms and shared tolerances.
//!
//! Purpose
//! -------
//! Collect the transforms that map Minuit's unbounded internal parameters
//! onto limited external ones, together with the small tolerances the
//! optimizer and covariance layers share.
//!
//! Key behaviors
//! -------------
//! - [`Limits`] describes a parameter's range and provides `int2ext`,
//!   `ext2int`, the derivative `dint2ext`, and step conversion.
//! - [`EIGEN_EPS`] and [`GENERAL_TOL`] are the shared guards for
//!   eigenvalue truncation and near-zero denominators.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are finite `f64`; validation of user values happens in
//!   `minuit::parameters`.
//! - `ext2int` clamps into range first and never returns `NaN` for finite
//!   input.
//!
//! Conventions
//! -----------
//! - Pure numerical helpers: no I/O, no logging, no global state.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{EIGEN_EPS, GENERAL_TOL, Limits};

pub mod prelude {
    pub use super::transformations::{EIGEN_EPS, GENERAL_TOL, Limits};
}
