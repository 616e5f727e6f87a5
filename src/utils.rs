//! PyO3 glue: Python objectives as [`FCN`] implementations.
//!
//! A Python objective is any callable taking a 1-D `numpy.ndarray` of
//! parameter values and returning a float; `Up()` is read once when the
//! wrapper is built. Exceptions raised by the callable are kept and handed
//! back unmodified once the minimizer has unwound.
use std::cell::RefCell;

use numpy::ToPyArray;
use pyo3::{exceptions::PyTypeError, prelude::*, types::PyAny};

use crate::{
    minuit::MinuitResult,
    optimization::{
        errors::{OptError, OptResult},
        migrad::{Cost, FCN, Theta},
    },
};

/// Name of the error-definition method on Python objectives.
pub const UP_METHOD: &str = "Up";

pub struct PyObjective {
    obj: Py<PyAny>,
    up: f64,
    raised: RefCell<Option<PyErr>>,
}

impl PyObjective {
    /// Wrap `obj`, reading its error definition.
    ///
    /// # Errors
    /// `TypeError` if `obj` is not callable or `Up()` does not return a float;
    /// any exception raised by `Up()` itself.
    pub fn new(py: Python<'_>, obj: Py<PyAny>) -> PyResult<Self> {
        let bound = obj.bind(py);
        if !bound.is_callable() {
            return Err(PyTypeError::new_err("fcn must be callable"));
        }
        let up: f64 = bound.call_method0(UP_METHOD)?.extract()?;
        Ok(Self { obj, up, raised: RefCell::new(None) })
    }

    /// The first exception raised by the objective, if any.
    pub fn take_error(&self) -> Option<PyErr> {
        self.raised.borrow_mut().take()
    }

    /// Turn a minimizer result into a Python one.
    ///
    /// An exception raised by the objective wins even when the minimizer
    /// recovered from the failed evaluation and returned `Ok`.
    pub fn finish<T>(&self, res: MinuitResult<T>) -> PyResult<T> {
        match (self.take_error(), res) {
            (Some(raised), _) => Err(raised),
            (None, res) => Ok(res?),
        }
    }

    fn call(&self, par: &Theta) -> PyResult<f64> {
        Python::with_gil(|py| self.obj.bind(py).call1((par.to_pyarray(py),))?.extract::<f64>())
    }
}

impl FCN for PyObjective {
    fn value(&self, par: &Theta) -> OptResult<Cost> {
        self.call(par).map_err(|err| {
            let text = err.to_string();
            let mut slot = self.raised.borrow_mut();
            if slot.is_none() {
                *slot = Some(err);
            }
            OptError::ObjectiveFailed { text }
        })
    }

    fn up(&self) -> f64 {
        self.up
    }
}
