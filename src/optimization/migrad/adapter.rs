//! Adapter that exposes a user `FCN` as an `argmin` problem.
//!
//! The objective is minimized as-is. Analytic gradients (if provided by the
//! user) are validated and passed through; otherwise the adapter
//! finite-differences its own `cost`, so every evaluation lands in the call
//! counter.
use std::cell::{Cell, RefCell};

use crate::optimization::{
    errors::OptError,
    migrad::{
        finite_diff::run_fd_diff,
        traits::FCN,
        types::{Cost, Grad, Theta},
        validation::validate_grad,
    },
};
use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;

/// Bridges a user [`FCN`] to `argmin`'s `CostFunction` and `Gradient`.
///
/// `nfcn` counts every call into `FCN::value`, including those made while
/// finite-differencing, which is what Migrad reports as "function calls".
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: FCN> {
    pub f: &'a F,
    nfcn: &'a Cell<usize>,
}

impl<'a, F: FCN> ArgMinAdapter<'a, F> {
    /// Construct a new adapter over a user objective and a call counter.
    pub fn new(f: &'a F, nfcn: &'a Cell<usize>) -> Self {
        Self { f, nfcn }
    }

    /// Calls made into the objective so far.
    pub fn calls(&self) -> usize {
        self.nfcn.get()
    }

    /// Shared call counter, still readable after the adapter has been
    /// moved into an executor.
    pub fn counter(&self) -> &'a Cell<usize> {
        self.nfcn
    }
}

impl<'a, F: FCN> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate `f(θ)` and reject non-finite values.
    ///
    /// # Errors
    /// Propagates any `OptError` from the user's `value`, or
    /// `NonFiniteCost` for `NaN`/`±∞`. The call is counted either way.
    ///
    /// # Panics
    /// Never panics.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        self.nfcn.set(self.nfcn.get() + 1);
        let output = self.f.value(theta)?;
        if !output.is_finite() {
            return Err((OptError::NonFiniteCost { value: output }).into());
        }
        Ok(output)
    }
}

impl<'a, F: FCN> Gradient for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// Evaluate the gradient of the objective at `θ`.
    ///
    /// - An analytic gradient is validated and returned unchanged.
    /// - Otherwise a central-difference gradient of `cost` is tried first;
    ///   if a cost evaluation failed or the result is not finite, forward
    ///   differences are tried once.
    ///
    /// The FD closure must return `f64`, so errors raised inside it are
    /// parked in `closure_err` and turned back into real errors afterwards.
    ///
    /// # Errors
    /// - User errors from `grad` other than `GradientNotImplemented`.
    /// - The first error raised by a cost evaluation of the forward-difference
    ///   retry (each evaluation also counts in `nfcn`).
    /// - `GradientDimMismatch` / `InvalidGradient` when the gradient has the
    ///   wrong length or non-finite entries.
    ///
    /// # Panics
    /// Never panics.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        let dim = theta.len();
        match self.f.grad(theta) {
            Ok(g) => {
                validate_grad(&g, dim)?;
                Ok(g)
            }
            Err(OptError::GradientNotImplemented) => {
                let closure_err: RefCell<Option<Error>> = RefCell::new(None);
                let cost_func = |theta: &Theta| -> f64 {
                    match self.cost(theta) {
                        Ok(val) => val,
                        Err(e) => {
                            let mut slot = closure_err.borrow_mut();
                            if slot.is_none() {
                                *slot = Some(e);
                            }
                            f64::NAN
                        }
                    }
                };
                let fd_grad = theta.central_diff(&cost_func);
                if closure_err.borrow().is_none() && validate_grad(&fd_grad, dim).is_ok() {
                    return Ok(fd_grad);
                }
                Ok(run_fd_diff(theta, &cost_func, &closure_err)?)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptResult;
    use ndarray::array;

    struct Quadratic;

    impl FCN for Quadratic {
        fn value(&self, par: &Theta) -> OptResult<Cost> {
            Ok(par.dot(par))
        }
    }

    struct WithGrad;

    impl FCN for WithGrad {
        fn value(&self, par: &Theta) -> OptResult<Cost> {
            Ok(par.dot(par))
        }

        fn grad(&self, par: &Theta) -> OptResult<Grad> {
            Ok(par.mapv(|x| 2.0 * x))
        }
    }

    struct Infinite;

    impl FCN for Infinite {
        fn value(&self, _par: &Theta) -> OptResult<Cost> {
            Ok(f64::INFINITY)
        }
    }

    #[test]
    // Purpose
    // -------
    // Every cost evaluation, including FD evaluations, increments the counter.
    //
    // Given
    // -----
    // - `f(θ) = θᵀθ` in ℝ² without an analytic gradient.
    //
    // Expect
    // ------
    // - One `cost` call counts 1; a central-difference gradient adds 4.
    fn adapter_counts_cost_and_fd_calls() {
        // Arrange
        let nfcn = Cell::new(0);
        let adapter = ArgMinAdapter::new(&Quadratic, &nfcn);
        let theta = array![1.0, -2.0];

        // Act
        let value = adapter.cost(&theta).expect("cost should evaluate");
        let grad = adapter.gradient(&theta).expect("FD gradient should evaluate");

        // Assert
        assert_eq!(value, 5.0);
        assert_eq!(adapter.calls(), 1 + 2 * theta.len());
        assert!((grad[0] - 2.0).abs() < 1e-6);
        assert!((grad[1] + 4.0).abs() < 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // An analytic gradient bypasses finite differences entirely.
    //
    // Given
    // -----
    // - An objective that implements `grad`.
    //
    // Expect
    // ------
    // - The gradient is returned as-is and the call counter stays at 0.
    fn adapter_uses_analytic_gradient() {
        // Arrange
        let nfcn = Cell::new(0);
        let adapter = ArgMinAdapter::new(&WithGrad, &nfcn);

        // Act
        let grad = adapter.gradient(&array![0.5, 1.0]).expect("analytic gradient");

        // Assert
        assert_eq!(grad, array![1.0, 2.0]);
        assert_eq!(adapter.calls(), 0);
    }

    #[test]
    // Purpose
    // -------
    // Non-finite objective values surface as `NonFiniteCost`.
    //
    // Given
    // -----
    // - An objective that always returns `+∞`.
    //
    // Expect
    // ------
    // - `cost` fails and converts back into `OptError::NonFiniteCost`.
    fn adapter_rejects_non_finite_cost() {
        // Arrange
        let nfcn = Cell::new(0);
        let adapter = ArgMinAdapter::new(&Infinite, &nfcn);

        // Act
        let err = adapter.cost(&array![0.0]).expect_err("infinite cost must fail");

        // Assert
        assert!(matches!(OptError::from(err), OptError::NonFiniteCost { .. }));
    }
}
