//! minuit — Minuit-style front end over the Migrad numerical core.
//!
//! Purpose
//! -------
//! Give callers the familiar Minuit workflow: describe parameters by name
//! in an [`MnUserParameters`] set, bind an objective implementing
//! [`FCN`](crate::optimization::migrad::FCN) to an [`MnMigrad`]
//! application, call it, and read the [`FunctionMinimum`].
//!
//! Key behaviors
//! -------------
//! - [`parameters`]: constants, free, fixed, and limited parameters with
//!   validated values and step sizes.
//! - [`transform`]: mapping between the user parameters and the unbounded
//!   internal vector the optimizer works on.
//! - [`strategy`]: levels 0/1/2 selecting memory, passes and line search.
//! - [`application`]: the [`MnApplication`] trait with the default call
//!   budget and the EDM convergence target.
//! - [`migrad`]: the multi-pass L-BFGS + Hessian driver.
//! - [`minimum`]: the read-only, printable result.
//!
//! Conventions
//! -----------
//! - Errors are [`MinuitError`]; optimizer failures are wrapped, not
//!   flattened.
//! - A successful call updates the application's parameter set to the
//!   minimum.
//!
//! Example
//! -------
//! ```rust
//! use rust_minuit::minuit::{MnApplication, MnMigrad, MnStrategy, MnUserParameters};
//! use rust_minuit::optimization::{errors::OptResult, migrad::{FCN, Theta}};
//!
//! struct SimpleFcn;
//! impl FCN for SimpleFcn {
//!     fn value(&self, v: &Theta) -> OptResult<f64> {
//!         Ok(v[0] * v[0])
//!     }
//!     fn up(&self) -> f64 {
//!         0.5
//!     }
//! }
//!
//! let mut upar = MnUserParameters::new();
//! upar.add_with_step("x", 1.0, 0.1)?;
//! let mut migrad = MnMigrad::new(&SimpleFcn, upar, MnStrategy::default());
//! let minimum = migrad.minimize_default()?;
//! assert!(minimum.is_valid());
//! println!("{minimum}");
//! # Ok::<(), rust_minuit::minuit::MinuitError>(())
//! ```

pub mod application;
pub mod errors;
pub mod migrad;
pub mod minimum;
pub mod parameters;
pub mod strategy;
pub mod transform;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::application::{DEFAULT_TOLERANCE, MnApplication, default_max_fcn};
pub use self::errors::{MinuitError, MinuitResult};
pub use self::migrad::MnMigrad;
pub use self::minimum::FunctionMinimum;
pub use self::parameters::{MinuitParameter, MnUserParameters};
pub use self::strategy::MnStrategy;

pub mod prelude {
    pub use super::application::MnApplication;
    pub use super::errors::{MinuitError, MinuitResult};
    pub use super::migrad::MnMigrad;
    pub use super::minimum::FunctionMinimum;
    pub use super::parameters::MnUserParameters;
    pub use super::strategy::MnStrategy;
}
