//! minuit::transform — user parameters ↔ internal optimizer vector.
//!
//! The optimizer only sees free parameters, each in an unbounded internal
//! coordinate. [`ParameterTransform`] records which external slot every
//! internal coordinate drives and the limits used to map it, and
//! [`InternalFcn`] wraps the user objective so it can be called with an
//! internal vector.
use ndarray::{Array1, Array2};

use crate::{
    minuit::parameters::MnUserParameters,
    optimization::{
        errors::{OptError, OptResult},
        migrad::{Cost, FCN, Grad, Theta},
        numerical_stability::Limits,
    },
};

/// Mapping between the full external vector and the free-only internal one.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterTransform {
    base: Array1<f64>,
    ext_of_int: Vec<usize>,
    limits: Vec<Limits>,
}

impl ParameterTransform {
    pub fn new(params: &MnUserParameters) -> Self {
        let base = Array1::from(params.values());
        let (ext_of_int, limits) =
            params.iter().enumerate().filter(|(_, p)| p.is_free()).map(|(i, p)| (i, p.limits())).unzip();
        Self { base, ext_of_int, limits }
    }

    /// Number of internal (free) coordinates.
    pub fn n_int(&self) -> usize {
        self.ext_of_int.len()
    }

    /// Number of external parameters.
    pub fn n_ext(&self) -> usize {
        self.base.len()
    }

    /// External index driven by internal coordinate `k`.
    pub fn ext_index(&self, k: usize) -> usize {
        self.ext_of_int[k]
    }

    /// Internal starting vector for the current external values.
    pub fn initial_internal(&self) -> Theta {
        self.ext_of_int
            .iter()
            .zip(&self.limits)
            .map(|(&i, limits)| limits.ext2int(self.base[i]))
            .collect()
    }

    /// Internal step sizes from the external errors.
    pub fn initial_steps(&self, params: &MnUserParameters) -> Array1<f64> {
        let errors = params.errors();
        self.ext_of_int
            .iter()
            .zip(&self.limits)
            .map(|(&i, limits)| limits.ext2int_step(self.base[i], errors[i]))
            .collect()
    }

    /// Full external vector for an internal one.
    pub fn to_external(&self, theta: &Theta) -> Array1<f64> {
        let mut ext = self.base.clone();
        for (k, (&i, limits)) in self.ext_of_int.iter().zip(&self.limits).enumerate() {
            ext[i] = limits.int2ext(theta[k]);
        }
        ext
    }

    /// Diagonal of `d ext / d int` at `theta`.
    pub fn jacobian(&self, theta: &Theta) -> Array1<f64> {
        self.limits.iter().enumerate().map(|(k, limits)| limits.dint2ext(theta[k])).collect()
    }

    /// External parabolic error of internal coordinate `k`.
    ///
    /// Unlimited coordinates pass through. Limited ones average the
    /// distance moved by stepping `±err` internally, capped at the width
    /// of a double-sided range.
    pub fn external_error(&self, k: usize, int: f64, err: f64) -> f64 {
        let limits = self.limits[k];
        if !limits.is_bounded() {
            return err;
        }
        let ext = limits.int2ext(int);
        let up = (limits.int2ext(int + err) - ext).abs();
        let down = (limits.int2ext(int - err) - ext).abs();
        let avg = 0.5 * (up + down);
        match limits {
            Limits::Both(a, b) => avg.min(b - a),
            _ => avg,
        }
    }

    /// External covariance `J V J` of the free parameters.
    pub fn external_covariance(&self, theta: &Theta, cov_int: &Array2<f64>) -> Array2<f64> {
        let jac = self.jacobian(theta);
        let n = self.n_int();
        Array2::from_shape_fn((n, n), |(i, j)| jac[i] * cov_int[[i, j]] * jac[j])
    }

    fn check_len(&self, theta: &Theta) -> OptResult<()> {
        if theta.len() != self.n_int() {
            return Err(OptError::ThetaLengthMismatch {
                expected: self.n_int(),
                actual: theta.len(),
            });
        }
        Ok(())
    }
}

/// User objective seen through a [`ParameterTransform`].
///
/// `value` maps the internal vector out to the full external one first.
/// An analytic external gradient is pulled back with the chain rule.
pub struct InternalFcn<'a, F: FCN + ?Sized> {
    fcn: &'a F,
    transform: &'a ParameterTransform,
}

impl<'a, F: FCN + ?Sized> InternalFcn<'a, F> {
    pub fn new(fcn: &'a F, transform: &'a ParameterTransform) -> Self {
        Self { fcn, transform }
    }
}

impl<F: FCN + ?Sized> FCN for InternalFcn<'_, F> {
    fn value(&self, theta: &Theta) -> OptResult<Cost> {
        self.transform.check_len(theta)?;
        self.fcn.value(&self.transform.to_external(theta))
    }

    fn up(&self) -> f64 {
        self.fcn.up()
    }

    fn grad(&self, theta: &Theta) -> OptResult<Grad> {
        self.transform.check_len(theta)?;
        let g_ext = self.fcn.grad(&self.transform.to_external(theta))?;
        if g_ext.len() != self.transform.n_ext() {
            return Err(OptError::GradientDimMismatch {
                expected: self.transform.n_ext(),
                found: g_ext.len(),
            });
        }
        let jac = self.transform.jacobian(theta);
        Ok((0..self.transform.n_int()).map(|k| g_ext[self.transform.ext_index(k)] * jac[k]).collect())
    }
}
