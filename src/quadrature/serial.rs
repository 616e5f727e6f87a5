//! Midpoint-rule integration of `4 / (1 + x²)` over `[0, 1]`.
use std::ops::Range;

use crate::quadrature::errors::{QuadratureError, QuadratureResult};

#[inline]
pub fn integrand(x: f64) -> f64 {
    4.0 / (1.0 + x * x)
}

/// Unscaled sum of the integrand at the midpoints `(i + 0.5) · step` for
/// `i` in `range`.
pub fn partial_sum(range: Range<u64>, step: f64) -> f64 {
    range.map(|i| integrand((i as f64 + 0.5) * step)).sum()
}

/// Unscaled sum over all `num_steps` midpoints.
pub fn serial_sum(num_steps: u64) -> f64 {
    partial_sum(0..num_steps, 1.0 / num_steps as f64)
}

/// π estimate `step · Σ 4 / (1 + x_i²)` on one thread.
///
/// # Errors
/// `ZeroSteps` for `num_steps == 0`.
pub fn compute_pi(num_steps: u64) -> QuadratureResult<f64> {
    if num_steps == 0 {
        return Err(QuadratureError::ZeroSteps);
    }
    let step = 1.0 / num_steps as f64;
    Ok(step * partial_sum(0..num_steps, step))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    #[test]
    // Purpose
    // -------
    // A modest step count already gets close to π.
    //
    // Given
    // -----
    // - `num_steps = 10_000`.
    //
    // Expect
    // ------
    // - Error below `1e-8` (midpoint rule error is O(step²)).
    fn compute_pi_converges_with_step_count() {
        // Act
        let pi = compute_pi(10_000).expect("positive steps");

        // Assert
        assert_abs_diff_eq!(pi, PI, epsilon = 1e-8);
    }

    #[test]
    // Purpose
    // -------
    // One step evaluates the integrand at the single midpoint.
    //
    // Given
    // -----
    // - `num_steps = 1`, and `0`.
    //
    // Expect
    // ------
    // - `4 / 1.25 = 3.2`; zero steps are rejected.
    fn compute_pi_single_step_and_zero_steps() {
        // Act / Assert
        assert_abs_diff_eq!(compute_pi(1).expect("one step"), 3.2, epsilon = 1e-15);
        assert_eq!(compute_pi(0), Err(QuadratureError::ZeroSteps));
    }
}
