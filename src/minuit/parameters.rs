//! minuit::parameters — named, ordered parameter set.
//!
//! Purpose
//! -------
//! Hold the user's parameters the way Minuit does: each has a name, a
//! value, an error (initial step size), and a state that is one of free,
//! fixed, or constant, plus optional limits.
//!
//! Key behaviors
//! -------------
//! - [`MnUserParameters::add`] adds a *constant* (no step size); it never
//!   takes part in the minimization and cannot be released.
//! - [`MnUserParameters::add_with_step`] adds a free parameter whose step
//!   size seeds the error estimate.
//! - Free parameters may be fixed and released again, limited on either
//!   or both sides, or have their limits removed.
//!
//! Invariants & assumptions
//! ------------------------
//! - Names are unique; insertion order is preserved and is the external
//!   parameter order handed to the objective.
//! - Values are finite and steps are finite and > 0.
//! - A value always lies within its limits; setting limits clamps it.
use std::collections::HashMap;

use crate::{
    minuit::errors::{MinuitError, MinuitResult},
    optimization::numerical_stability::Limits,
};

/// One user parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct MinuitParameter {
    name: String,
    value: f64,
    error: f64,
    fixed: bool,
    constant: bool,
    limits: Limits,
}

impl MinuitParameter {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Current error; the step size until a minimization has run.
    pub fn error(&self) -> f64 {
        self.error
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    pub fn is_const(&self) -> bool {
        self.constant
    }

    /// Free parameters are the ones the minimizer varies.
    pub fn is_free(&self) -> bool {
        !self.fixed && !self.constant
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    pub fn has_limits(&self) -> bool {
        self.limits.is_bounded()
    }

    pub fn lower_limit(&self) -> Option<f64> {
        self.limits.lower()
    }

    pub fn upper_limit(&self) -> Option<f64> {
        self.limits.upper()
    }

    pub(crate) fn set_state(&mut self, value: f64, error: f64) {
        self.value = self.limits.clamp(value);
        self.error = error;
    }
}

/// Named, ordered collection of [`MinuitParameter`]s.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MnUserParameters {
    params: Vec<MinuitParameter>,
    index: HashMap<String, usize>,
}

impl MnUserParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a constant parameter.
    ///
    /// # Errors
    /// `DuplicateParameter` or `NonFiniteValue`.
    pub fn add(&mut self, name: impl Into<String>, value: f64) -> MinuitResult<()> {
        let name = name.into();
        self.check_new(&name, value)?;
        self.push(MinuitParameter {
            name,
            value,
            error: 0.0,
            fixed: false,
            constant: true,
            limits: Limits::Unbounded,
        });
        Ok(())
    }

    /// Add a free parameter with a step size.
    ///
    /// # Errors
    /// `DuplicateParameter`, `NonFiniteValue` or `InvalidStep`.
    pub fn add_with_step(
        &mut self, name: impl Into<String>, value: f64, step: f64,
    ) -> MinuitResult<()> {
        let name = name.into();
        self.check_new(&name, value)?;
        if !step.is_finite() || step <= 0.0 {
            return Err(MinuitError::InvalidStep { name, step });
        }
        self.push(MinuitParameter {
            name,
            value,
            error: step,
            fixed: false,
            constant: false,
            limits: Limits::Unbounded,
        });
        Ok(())
    }

    /// Add a free parameter restricted to `[lower, upper]`.
    pub fn add_limited(
        &mut self, name: impl Into<String>, value: f64, step: f64, lower: f64, upper: f64,
    ) -> MinuitResult<()> {
        let name = name.into();
        self.add_with_step(name.clone(), value, step)?;
        let applied = self.set_limits(&name, lower, upper);
        if applied.is_err() {
            self.pop();
        }
        applied
    }

    /// Keep a free parameter at its current value during minimization.
    pub fn fix(&mut self, name: &str) -> MinuitResult<()> {
        let p = self.free_or_fixed_mut(name)?;
        p.fixed = true;
        Ok(())
    }

    /// Let a fixed parameter vary again.
    pub fn release(&mut self, name: &str) -> MinuitResult<()> {
        let p = self.free_or_fixed_mut(name)?;
        p.fixed = false;
        Ok(())
    }

    pub fn set_value(&mut self, name: &str, value: f64) -> MinuitResult<()> {
        if !value.is_finite() {
            return Err(MinuitError::NonFiniteValue { name: name.to_string(), value });
        }
        let p = self.get_mut(name)?;
        p.value = p.limits.clamp(value);
        Ok(())
    }

    pub fn set_error(&mut self, name: &str, error: f64) -> MinuitResult<()> {
        if !error.is_finite() || error <= 0.0 {
            return Err(MinuitError::InvalidStep { name: name.to_string(), step: error });
        }
        let p = self.free_or_fixed_mut(name)?;
        p.error = error;
        Ok(())
    }

    pub fn set_limits(&mut self, name: &str, lower: f64, upper: f64) -> MinuitResult<()> {
        self.apply_limits(name, Some(lower), Some(upper))
    }

    pub fn set_lower_limit(&mut self, name: &str, lower: f64) -> MinuitResult<()> {
        self.apply_limits(name, Some(lower), None)
    }

    pub fn set_upper_limit(&mut self, name: &str, upper: f64) -> MinuitResult<()> {
        self.apply_limits(name, None, Some(upper))
    }

    pub fn remove_limits(&mut self, name: &str) -> MinuitResult<()> {
        self.apply_limits(name, None, None)
    }

    pub fn parameter(&self, name: &str) -> MinuitResult<&MinuitParameter> {
        self.index_of(name)
            .map(|i| &self.params[i])
            .ok_or_else(|| MinuitError::UnknownParameter { name: name.to_string() })
    }

    pub fn get(&self, index: usize) -> MinuitResult<&MinuitParameter> {
        self.params
            .get(index)
            .ok_or(MinuitError::IndexOutOfRange { index, len: self.params.len() })
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn value(&self, name: &str) -> MinuitResult<f64> {
        self.parameter(name).map(MinuitParameter::value)
    }

    pub fn error(&self, name: &str) -> MinuitResult<f64> {
        self.parameter(name).map(MinuitParameter::error)
    }

    /// External values in insertion order.
    pub fn values(&self) -> Vec<f64> {
        self.params.iter().map(|p| p.value).collect()
    }

    /// Errors in insertion order; constants report 0.
    pub fn errors(&self) -> Vec<f64> {
        self.params.iter().map(|p| p.error).collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|p| p.name.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MinuitParameter> {
        self.params.iter()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Number of parameters the minimizer varies.
    pub fn n_free(&self) -> usize {
        self.params.iter().filter(|p| p.is_free()).count()
    }

    pub(crate) fn get_index_mut(&mut self, index: usize) -> Option<&mut MinuitParameter> {
        self.params.get_mut(index)
    }

    // ---- Helper methods ----

    fn check_new(&self, name: &str, value: f64) -> MinuitResult<()> {
        if self.index.contains_key(name) {
            return Err(MinuitError::DuplicateParameter { name: name.to_string() });
        }
        if !value.is_finite() {
            return Err(MinuitError::NonFiniteValue { name: name.to_string(), value });
        }
        Ok(())
    }

    fn push(&mut self, p: MinuitParameter) {
        self.index.insert(p.name.clone(), self.params.len());
        self.params.push(p);
    }

    fn pop(&mut self) {
        if let Some(p) = self.params.pop() {
            self.index.remove(&p.name);
        }
    }

    fn get_mut(&mut self, name: &str) -> MinuitResult<&mut MinuitParameter> {
        match self.index.get(name) {
            Some(&i) => Ok(&mut self.params[i]),
            None => Err(MinuitError::UnknownParameter { name: name.to_string() }),
        }
    }

    fn free_or_fixed_mut(&mut self, name: &str) -> MinuitResult<&mut MinuitParameter> {
        let p = self.get_mut(name)?;
        if p.constant {
            return Err(MinuitError::ConstantParameter { name: name.to_string() });
        }
        Ok(p)
    }

    fn apply_limits(
        &mut self, name: &str, lower: Option<f64>, upper: Option<f64>,
    ) -> MinuitResult<()> {
        let limits = Limits::from_bounds(lower, upper).ok_or_else(|| {
            MinuitError::InvalidLimits { name: name.to_string(), lower, upper }
        })?;
        let p = self.free_or_fixed_mut(name)?;
        p.limits = limits;
        p.value = limits.clamp(p.value);
        Ok(())
    }
}

impl<'a> IntoIterator for &'a MnUserParameters {
    type Item = &'a MinuitParameter;
    type IntoIter = std::slice::Iter<'a, MinuitParameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}
