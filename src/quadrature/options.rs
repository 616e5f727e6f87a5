//! Launch configuration for the π estimators.
//!
//! The binaries take no arguments; the worker count and step count come
//! from the launcher through [`NUM_PROCS_ENV`] and [`NUM_STEPS_ENV`].
use crate::quadrature::errors::{QuadratureError, QuadratureResult};

/// Number of workers (threads or ranks).
pub const NUM_PROCS_ENV: &str = "PI_NUM_PROCS";

/// Number of midpoint-rule steps.
pub const NUM_STEPS_ENV: &str = "PI_NUM_STEPS";

pub const DEFAULT_NUM_STEPS: u64 = 100_000_000;

/// Validated step and worker counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuadratureOptions {
    pub num_steps: u64,
    pub num_procs: usize,
}

impl QuadratureOptions {
    /// # Errors
    /// `ZeroSteps` or `ZeroWorkers`.
    pub fn new(num_steps: u64, num_procs: usize) -> QuadratureResult<Self> {
        if num_steps == 0 {
            return Err(QuadratureError::ZeroSteps);
        }
        if num_procs == 0 {
            return Err(QuadratureError::ZeroWorkers);
        }
        Ok(Self { num_steps, num_procs })
    }

    /// Read [`NUM_PROCS_ENV`] and [`NUM_STEPS_ENV`], falling back to the
    /// defaults for unset variables.
    ///
    /// # Errors
    /// `InvalidEnv` when a variable is set but is not a positive integer.
    pub fn from_env() -> QuadratureResult<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary lookup.
    pub fn from_lookup<L: Fn(&'static str) -> Option<String>>(lookup: L) -> QuadratureResult<Self> {
        let defaults = Self::default();
        let num_steps = match lookup(NUM_STEPS_ENV) {
            Some(raw) => parse_positive(NUM_STEPS_ENV, &raw)?,
            None => defaults.num_steps,
        };
        let num_procs = match lookup(NUM_PROCS_ENV) {
            Some(raw) => parse_positive::<usize>(NUM_PROCS_ENV, &raw)?,
            None => defaults.num_procs,
        };
        Self::new(num_steps, num_procs)
    }

    /// Width of one integration step.
    pub fn step(&self) -> f64 {
        1.0 / self.num_steps as f64
    }
}

impl Default for QuadratureOptions {
    fn default() -> Self {
        let num_procs = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        Self { num_steps: DEFAULT_NUM_STEPS, num_procs }
    }
}

fn parse_positive<T>(var: &'static str, raw: &str) -> QuadratureResult<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match raw.trim().parse::<T>() {
        Ok(v) if v > T::default() => Ok(v),
        _ => Err(QuadratureError::InvalidEnv { var, value: raw.to_string() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Unset variables fall back to the defaults; set ones are parsed.
    //
    // Given
    // -----
    // - A lookup with only `PI_NUM_PROCS = " 4 "`.
    //
    // Expect
    // ------
    // - 4 workers and the default step count.
    fn from_lookup_parses_and_defaults() {
        // Act
        let opts = QuadratureOptions::from_lookup(|var| {
            (var == NUM_PROCS_ENV).then(|| " 4 ".to_string())
        })
        .expect("valid lookup");

        // Assert
        assert_eq!(opts.num_procs, 4);
        assert_eq!(opts.num_steps, DEFAULT_NUM_STEPS);
    }

    #[test]
    // Purpose
    // -------
    // Zero and non-numeric values are rejected with the variable name.
    //
    // Given
    // -----
    // - `PI_NUM_STEPS = "0"` and `PI_NUM_PROCS = "many"`.
    //
    // Expect
    // ------
    // - `InvalidEnv` naming each variable.
    fn from_lookup_rejects_invalid_values() {
        // Act
        let zero_steps = QuadratureOptions::from_lookup(|var| {
            (var == NUM_STEPS_ENV).then(|| "0".to_string())
        });
        let bad_procs = QuadratureOptions::from_lookup(|var| {
            (var == NUM_PROCS_ENV).then(|| "many".to_string())
        });

        // Assert
        assert!(matches!(zero_steps, Err(QuadratureError::InvalidEnv { var: NUM_STEPS_ENV, .. })));
        assert!(matches!(bad_procs, Err(QuadratureError::InvalidEnv { var: NUM_PROCS_ENV, .. })));
    }

    #[test]
    // Purpose
    // -------
    // `new` refuses empty configurations.
    //
    // Given
    // -----
    // - Zero steps, then zero workers.
    //
    // Expect
    // ------
    // - `ZeroSteps`, `ZeroWorkers`.
    fn new_rejects_zero_counts() {
        // Act / Assert
        assert_eq!(QuadratureOptions::new(0, 1), Err(QuadratureError::ZeroSteps));
        assert_eq!(QuadratureOptions::new(10, 0), Err(QuadratureError::ZeroWorkers));
        assert_eq!(QuadratureOptions::new(10, 2).expect("valid").step(), 0.1);
    }
}
