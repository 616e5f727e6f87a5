//! Errors for the Minuit-style front end (parameter bookkeeping, strategy
//! and application checks, and optimizer failures).
//!
//! [`MinuitError`] is used across the Python-facing API and the Rust core.
//! It implements `Display`/`Error` and converts to `PyErr` for PyO3.
//!
//! ## Conventions
//! - Parameter indices are 0-based and refer to the order of insertion.
//! - Optimizer/backend errors are wrapped unchanged in
//!   [`MinuitError::Optimization`].
use crate::optimization::errors::OptError;

/// Result alias for parameter and application operations.
pub type MinuitResult<T> = Result<T, MinuitError>;

#[derive(Debug, Clone, PartialEq)]
pub enum MinuitError {
    // ---- Parameters ----
    /// A parameter with this name already exists.
    DuplicateParameter { name: String },

    /// No parameter with this name.
    UnknownParameter { name: String },

    /// Index past the end of the parameter list.
    IndexOutOfRange { index: usize, len: usize },

    /// Parameter values must be finite.
    NonFiniteValue { name: String, value: f64 },

    /// Step sizes must be finite and > 0.
    InvalidStep { name: String, step: f64 },

    /// Limits must be finite with lower < upper.
    InvalidLimits { name: String, lower: Option<f64>, upper: Option<f64> },

    /// Constants were added without a step and cannot be released or limited.
    ConstantParameter { name: String },

    // ---- Strategy / application ----
    /// Strategy level must be 0, 1 or 2.
    InvalidStrategy { level: u32 },

    /// Tolerance must be finite and > 0.
    InvalidTolerance { tolerance: f64 },

    /// Error definition returned by the objective must be finite and > 0.
    InvalidUp { up: f64 },

    // ---- Optimizer ----
    /// Failure inside the numerical core.
    Optimization(OptError),
}

impl std::error::Error for MinuitError {}

impl std::fmt::Display for MinuitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Parameters ----
            MinuitError::DuplicateParameter { name } => {
                write!(f, "Parameter '{name}' already exists.")
            }
            MinuitError::UnknownParameter { name } => {
                write!(f, "Unknown parameter '{name}'.")
            }
            MinuitError::IndexOutOfRange { index, len } => {
                write!(f, "Parameter index {index} out of range for {len} parameters.")
            }
            MinuitError::NonFiniteValue { name, value } => {
                write!(f, "Parameter '{name}' must be finite; got: {value}")
            }
            MinuitError::InvalidStep { name, step } => {
                write!(f, "Step size of parameter '{name}' must be finite and > 0; got: {step}")
            }
            MinuitError::InvalidLimits { name, lower, upper } => {
                write!(
                    f,
                    "Limits of parameter '{name}' must be finite with lower < upper; got: {lower:?}, {upper:?}"
                )
            }
            MinuitError::ConstantParameter { name } => {
                write!(f, "Parameter '{name}' is a constant.")
            }
            // ---- Strategy / application ----
            MinuitError::InvalidStrategy { level } => {
                write!(f, "Strategy level must be 0, 1 or 2; got: {level}")
            }
            MinuitError::InvalidTolerance { tolerance } => {
                write!(f, "Tolerance must be finite and > 0; got: {tolerance}")
            }
            MinuitError::InvalidUp { up } => {
                write!(f, "Error definition (Up) must be finite and > 0; got: {up}")
            }
            // ---- Optimizer ----
            MinuitError::Optimization(err) => {
                write!(f, "Optimizer failed: {err}")
            }
        }
    }
}

impl From<OptError> for MinuitError {
    fn from(err: OptError) -> Self {
        MinuitError::Optimization(err)
    }
}

/// Convert a [`MinuitError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl From<MinuitError> for pyo3::PyErr {
    fn from(err: MinuitError) -> pyo3::PyErr {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
