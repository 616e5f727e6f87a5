//! The callable application interface shared by Minuit minimizers.
use crate::minuit::{
    errors::{MinuitError, MinuitResult},
    minimum::FunctionMinimum,
    parameters::MnUserParameters,
    strategy::MnStrategy,
};

/// Tolerance used when the caller does not pass one.
pub const DEFAULT_TOLERANCE: f64 = 0.1;

/// A minimizer bound to an objective, a parameter set and a strategy.
///
/// After a successful call the application's parameter set is replaced by
/// the state at the minimum, so calling again continues from there.
pub trait MnApplication {
    /// Run the minimization.
    ///
    /// - `maxfcn`: call budget; `0` selects [`default_max_fcn`].
    /// - `tolerance`: convergence when `EDM < 0.002 · tolerance · up`.
    fn minimize(&mut self, maxfcn: usize, tolerance: f64) -> MinuitResult<FunctionMinimum>;

    /// `minimize(0, DEFAULT_TOLERANCE)`.
    fn minimize_default(&mut self) -> MinuitResult<FunctionMinimum> {
        self.minimize(0, DEFAULT_TOLERANCE)
    }

    fn parameters(&self) -> &MnUserParameters;

    fn parameters_mut(&mut self) -> &mut MnUserParameters;

    fn strategy(&self) -> MnStrategy;

    fn fix(&mut self, name: &str) -> MinuitResult<()> {
        self.parameters_mut().fix(name)
    }

    fn release(&mut self, name: &str) -> MinuitResult<()> {
        self.parameters_mut().release(name)
    }

    fn set_value(&mut self, name: &str, value: f64) -> MinuitResult<()> {
        self.parameters_mut().set_value(name, value)
    }
}

/// Minuit's default call budget for `n` free parameters.
pub fn default_max_fcn(n: usize) -> usize {
    200 + 100 * n + 5 * n * n
}

/// Largest EDM accepted as converged.
///
/// # Errors
/// `InvalidTolerance` unless `tolerance` is finite and > 0, `InvalidUp`
/// unless `up` is.
pub fn edm_target(tolerance: f64, up: f64) -> MinuitResult<f64> {
    if !tolerance.is_finite() || tolerance <= 0.0 {
        return Err(MinuitError::InvalidTolerance { tolerance });
    }
    if !up.is_finite() || up <= 0.0 {
        return Err(MinuitError::InvalidUp { up });
    }
    Ok(0.002 * tolerance * up)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // The default budget follows `200 + 100 n + 5 n²`.
    //
    // Given
    // -----
    // - `n ∈ {0, 1, 3}`.
    //
    // Expect
    // ------
    // - 200, 305, 545.
    fn default_max_fcn_matches_formula() {
        // Act / Assert
        assert_eq!(default_max_fcn(0), 200);
        assert_eq!(default_max_fcn(1), 305);
        assert_eq!(default_max_fcn(3), 545);
    }

    #[test]
    // Purpose
    // -------
    // The EDM target scales with tolerance and `up` and validates both.
    //
    // Given
    // -----
    // - `(0.1, 0.5)`, a zero tolerance, and a negative `up`.
    //
    // Expect
    // ------
    // - `1e-4`, `InvalidTolerance`, `InvalidUp`.
    fn edm_target_scales_and_validates() {
        // Act / Assert
        assert!((edm_target(0.1, 0.5).expect("valid") - 1e-4).abs() < 1e-18);
        assert!(matches!(edm_target(0.0, 1.0), Err(MinuitError::InvalidTolerance { .. })));
        assert!(matches!(edm_target(0.1, -1.0), Err(MinuitError::InvalidUp { .. })));
    }
}
