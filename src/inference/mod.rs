//! inference — uncertainty at a minimum.
//!
//! Purpose
//! -------
//! Provide the curvature-based uncertainty quantities Migrad reports once
//! the optimizer has stopped: covariance matrix, estimated distance to
//! minimum, and a positive-definiteness check of the Hessian.
//!
//! Key behaviors
//! -------------
//! - [`hessian::calc_covariance`] builds a finite-difference Hessian of
//!   the objective's gradient map and pseudo-inverts it with an eigen
//!   decomposition (`nalgebra`), returning a [`CovarianceEstimate`].
//! - [`hessian::calc_covariance_from_cost`] does the same from second
//!   differences of the objective values.
//!
//! Conventions
//! -----------
//! - Inputs and outputs live in the internal parameter space.
//! - Errors are reported as `OptResult<T>`.

pub mod hessian;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::hessian::{
    CovarianceEstimate, calc_covariance, calc_covariance_from_cost, covariance_from_hessian,
};

pub mod prelude {
    pub use super::hessian::{CovarianceEstimate, calc_covariance, calc_covariance_from_cost};
}
