//! rust_minuit — Migrad-style minimization with Python bindings, plus
//! serial and parallel π quadrature.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the minimizer to Python as the `minuit2` extension module.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules: [`optimization`] (argmin-backed
//!   L-BFGS core and limit transforms), [`inference`] (Hessian,
//!   covariance and EDM), [`minuit`] (parameter sets, `MnMigrad`,
//!   `FunctionMinimum`), and [`quadrature`] (π estimators).
//! - With `python-bindings`, define `FCNBase`, `MnUserParameters`,
//!   `MnApplication`, `MnMigrad` and `FunctionMinimum` under `minuit2`.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner modules; this file performs
//!   only FFI glue, argument defaults, and error mapping.
//! - Python objectives receive a fresh 1-D `numpy.ndarray` on every call.
//!
//! Conventions
//! -----------
//! - Python method names follow Minuit (`Add`, `Up`, `Fval`, ...).
//! - Errors from core Rust code become `ValueError`; exceptions raised by a
//!   Python objective propagate unchanged.
//!
//! Testing notes
//! -------------
//! - Core behavior is covered by unit tests in the inner modules and by the
//!   integration tests in `tests/`.

pub mod inference;
pub mod minuit;
pub mod optimization;
pub mod quadrature;

#[cfg(feature = "python-bindings")]
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::{PyArray2, ToPyArray};

#[cfg(feature = "python-bindings")]
use pyo3::{
    exceptions::PyNotImplementedError,
    prelude::*,
    types::{PyAny, PyDict, PyTuple},
};

#[cfg(feature = "python-bindings")]
use crate::{
    minuit::{
        DEFAULT_TOLERANCE, FunctionMinimum, MinuitError, MnApplication, MnMigrad, MnStrategy,
        MnUserParameters,
    },
    utils::PyObjective,
};

/// FCNBase — base class for Python objectives.
///
/// Subclasses implement `__call__(self, v)` returning a float for the
/// parameter array `v`, and `Up(self)` returning the error definition
/// (`1.0` for χ², `0.5` for negative log-likelihood).
#[cfg(feature = "python-bindings")]
#[pyclass(subclass, name = "FCNBase", module = "minuit2")]
pub struct PyFCNBase;

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyFCNBase {
    #[new]
    #[pyo3(signature = (*_args, **_kwargs))]
    fn new(_args: &Bound<'_, PyTuple>, _kwargs: Option<&Bound<'_, PyDict>>) -> Self {
        PyFCNBase
    }

    fn __call__(&self, _v: &Bound<'_, PyAny>) -> PyResult<f64> {
        Err(PyNotImplementedError::new_err("FCNBase subclasses must implement __call__"))
    }

    #[pyo3(name = "Up")]
    fn up(&self) -> PyResult<f64> {
        Err(PyNotImplementedError::new_err("FCNBase subclasses must implement Up"))
    }
}

/// MnUserParameters — named parameter set handed to a minimizer.
#[cfg(feature = "python-bindings")]
#[pyclass(name = "MnUserParameters", module = "minuit2")]
#[derive(Clone, Default)]
pub struct PyMnUserParameters {
    inner: MnUserParameters,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyMnUserParameters {
    #[new]
    fn new() -> Self {
        Self::default()
    }

    /// `Add(name, value)` adds a constant; `Add(name, value, error)` adds a
    /// free parameter with initial step `error`.
    ///
    /// Returns `False` if the name is already taken.
    #[pyo3(name = "Add", signature = (name, value, error = None))]
    fn add(&mut self, name: &str, value: f64, error: Option<f64>) -> PyResult<bool> {
        let added = match error {
            Some(step) => self.inner.add_with_step(name, value, step),
            None => self.inner.add(name, value),
        };
        match added {
            Ok(()) => Ok(true),
            Err(MinuitError::DuplicateParameter { .. }) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    #[pyo3(name = "Fix")]
    fn fix(&mut self, name: &str) -> PyResult<()> {
        Ok(self.inner.fix(name)?)
    }

    #[pyo3(name = "Release")]
    fn release(&mut self, name: &str) -> PyResult<()> {
        Ok(self.inner.release(name)?)
    }

    #[pyo3(name = "SetValue")]
    fn set_value(&mut self, name: &str, value: f64) -> PyResult<()> {
        Ok(self.inner.set_value(name, value)?)
    }

    #[pyo3(name = "SetError")]
    fn set_error(&mut self, name: &str, error: f64) -> PyResult<()> {
        Ok(self.inner.set_error(name, error)?)
    }

    #[pyo3(name = "SetLimits")]
    fn set_limits(&mut self, name: &str, lower: f64, upper: f64) -> PyResult<()> {
        Ok(self.inner.set_limits(name, lower, upper)?)
    }

    #[pyo3(name = "SetLowerLimit")]
    fn set_lower_limit(&mut self, name: &str, lower: f64) -> PyResult<()> {
        Ok(self.inner.set_lower_limit(name, lower)?)
    }

    #[pyo3(name = "SetUpperLimit")]
    fn set_upper_limit(&mut self, name: &str, upper: f64) -> PyResult<()> {
        Ok(self.inner.set_upper_limit(name, upper)?)
    }

    #[pyo3(name = "RemoveLimits")]
    fn remove_limits(&mut self, name: &str) -> PyResult<()> {
        Ok(self.inner.remove_limits(name)?)
    }

    #[pyo3(name = "Value")]
    fn value(&self, name: &str) -> PyResult<f64> {
        Ok(self.inner.value(name)?)
    }

    #[pyo3(name = "Error")]
    fn error(&self, name: &str) -> PyResult<f64> {
        Ok(self.inner.error(name)?)
    }

    #[pyo3(name = "Params")]
    fn params(&self) -> Vec<f64> {
        self.inner.values()
    }

    #[pyo3(name = "Errors")]
    fn errors(&self) -> Vec<f64> {
        self.inner.errors()
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }
}

/// MnApplication — callable base of the minimizers.
///
/// `app(maxfcn=0, tolerance=0.1)` runs the minimization and returns a
/// `FunctionMinimum`; the application's parameters move to the minimum so
/// a second call continues from there.
#[cfg(feature = "python-bindings")]
#[pyclass(subclass, name = "MnApplication", module = "minuit2")]
pub struct PyMnApplication {
    fcn: Py<PyAny>,
    params: MnUserParameters,
    strategy: MnStrategy,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyMnApplication {
    #[pyo3(signature = (maxfcn = 0, tolerance = DEFAULT_TOLERANCE))]
    fn __call__(
        &mut self, py: Python<'_>, maxfcn: usize, tolerance: f64,
    ) -> PyResult<PyFunctionMinimum> {
        let objective = PyObjective::new(py, self.fcn.clone_ref(py))?;
        let mut migrad = MnMigrad::new(&objective, self.params.clone(), self.strategy);
        let minimum = objective.finish(migrad.minimize(maxfcn, tolerance))?;
        self.params = migrad.parameters().clone();
        Ok(PyFunctionMinimum { inner: minimum })
    }

    #[pyo3(name = "Parameters")]
    fn parameters(&self) -> PyMnUserParameters {
        PyMnUserParameters { inner: self.params.clone() }
    }

    #[pyo3(name = "Strategy")]
    fn strategy(&self) -> u32 {
        self.strategy.level()
    }

    #[pyo3(name = "Fix")]
    fn fix(&mut self, name: &str) -> PyResult<()> {
        Ok(self.params.fix(name)?)
    }

    #[pyo3(name = "Release")]
    fn release(&mut self, name: &str) -> PyResult<()> {
        Ok(self.params.release(name)?)
    }

    #[pyo3(name = "SetValue")]
    fn set_value(&mut self, name: &str, value: f64) -> PyResult<()> {
        Ok(self.params.set_value(name, value)?)
    }
}

/// MnMigrad — variable-metric minimizer, `MnMigrad(fcn, par, stra=1)`.
#[cfg(feature = "python-bindings")]
#[pyclass(extends = PyMnApplication, name = "MnMigrad", module = "minuit2")]
pub struct PyMnMigrad;

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyMnMigrad {
    #[new]
    #[pyo3(signature = (fcn, par, stra = 1))]
    fn new(
        py: Python<'_>, fcn: Py<PyAny>, par: PyRef<'_, PyMnUserParameters>, stra: u32,
    ) -> PyResult<(Self, PyMnApplication)> {
        // Fail at construction rather than on the first call.
        PyObjective::new(py, fcn.clone_ref(py))?;
        let strategy = MnStrategy::new(stra)?;
        Ok((PyMnMigrad, PyMnApplication { fcn, params: par.inner.clone(), strategy }))
    }
}

/// FunctionMinimum — result of a minimization; `str()` gives the report.
#[cfg(feature = "python-bindings")]
#[pyclass(name = "FunctionMinimum", module = "minuit2")]
pub struct PyFunctionMinimum {
    inner: FunctionMinimum,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyFunctionMinimum {
    fn __str__(&self) -> String {
        self.inner.to_string()
    }

    fn __repr__(&self) -> String {
        self.inner.to_string()
    }

    #[pyo3(name = "Fval")]
    fn fval(&self) -> f64 {
        self.inner.fval()
    }

    #[pyo3(name = "Edm")]
    fn edm(&self) -> f64 {
        self.inner.edm()
    }

    #[pyo3(name = "NFcn")]
    fn nfcn(&self) -> usize {
        self.inner.nfcn()
    }

    #[pyo3(name = "Up")]
    fn up(&self) -> f64 {
        self.inner.up()
    }

    #[pyo3(name = "IsValid")]
    fn is_valid(&self) -> bool {
        self.inner.is_valid()
    }

    #[pyo3(name = "IsAboveMaxEdm")]
    fn is_above_max_edm(&self) -> bool {
        self.inner.is_above_max_edm()
    }

    #[pyo3(name = "HasReachedCallLimit")]
    fn has_reached_call_limit(&self) -> bool {
        self.inner.has_reached_call_limit()
    }

    #[pyo3(name = "HasPosDefCovar")]
    fn has_pos_def_covar(&self) -> bool {
        self.inner.has_pos_def_covar()
    }

    #[pyo3(name = "UserParameters")]
    fn user_parameters(&self) -> PyMnUserParameters {
        PyMnUserParameters { inner: self.inner.user_parameters().clone() }
    }

    /// Covariance of the free parameters as a 2-D `numpy.ndarray`.
    #[pyo3(name = "Covariance")]
    fn covariance<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<f64>> {
        self.inner.covariance().to_pyarray(py)
    }
}

/// minuit2 — PyO3 module initializer.
///
/// Registers `FCNBase`, `MnUserParameters`, `MnApplication`, `MnMigrad`
/// and `FunctionMinimum`. Invoked by Python on import.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn minuit2(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyFCNBase>()?;
    m.add_class::<PyMnUserParameters>()?;
    m.add_class::<PyMnApplication>()?;
    m.add_class::<PyMnMigrad>()?;
    m.add_class::<PyFunctionMinimum>()?;
    Ok(())
}
