//! minuit::minimum — read-only result of a minimization.
//!
//! Purpose
//! -------
//! Carry everything a caller needs after Migrad stops: the updated
//! parameter set (values and errors), the function value, EDM, call and
//! iteration counts, the covariance of the free parameters, and the
//! validity flags.
//!
//! Key behaviors
//! -------------
//! - [`FunctionMinimum::is_valid`] holds iff the EDM is below target, the
//!   call limit was not exceeded, and the covariance is positive definite.
//! - `Display` renders a compact table; the Python `__str__` returns the
//!   same text.
use ndarray::Array2;
use std::fmt;

use crate::minuit::parameters::MnUserParameters;

/// Result of [`MnApplication::minimize`](crate::minuit::MnApplication::minimize).
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionMinimum {
    pub(crate) params: MnUserParameters,
    pub(crate) fval: f64,
    pub(crate) edm: f64,
    pub(crate) edm_target: f64,
    pub(crate) nfcn: usize,
    pub(crate) iterations: usize,
    pub(crate) up: f64,
    pub(crate) covariance: Array2<f64>,
    pub(crate) reached_call_limit: bool,
    pub(crate) covariance_pos_def: bool,
}

impl FunctionMinimum {
    /// Parameter set at the minimum; errors are the parabolic errors.
    pub fn user_parameters(&self) -> &MnUserParameters {
        &self.params
    }

    pub fn fval(&self) -> f64 {
        self.fval
    }

    pub fn edm(&self) -> f64 {
        self.edm
    }

    /// Largest EDM accepted as converged, `0.002 · tolerance · up`.
    pub fn edm_target(&self) -> f64 {
        self.edm_target
    }

    pub fn nfcn(&self) -> usize {
        self.nfcn
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn up(&self) -> f64 {
        self.up
    }

    /// Covariance of the free parameters in external coordinates, ordered
    /// as the free parameters appear in the set. Empty (`0 × 0`) when there
    /// were no free parameters.
    pub fn covariance(&self) -> &Array2<f64> {
        &self.covariance
    }

    pub fn has_reached_call_limit(&self) -> bool {
        self.reached_call_limit
    }

    pub fn is_above_max_edm(&self) -> bool {
        self.edm >= self.edm_target
    }

    pub fn has_pos_def_covar(&self) -> bool {
        self.covariance_pos_def
    }

    pub fn is_valid(&self) -> bool {
        !self.is_above_max_edm() && !self.reached_call_limit && self.covariance_pos_def
    }
}

impl fmt::Display for FunctionMinimum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let yes_no = |b: bool| if b { "yes" } else { "no" };
        writeln!(f, "Minuit FunctionMinimum")?;
        writeln!(f, "  Valid         : {}", yes_no(self.is_valid()))?;
        writeln!(f, "  Function calls: {}", self.nfcn)?;
        writeln!(f, "  Iterations    : {}", self.iterations)?;
        writeln!(f, "  Minimum value : {:.8e}", self.fval)?;
        writeln!(f, "  Edm           : {:.8e} (target {:.3e})", self.edm, self.edm_target)?;
        writeln!(f, "  Error def     : {}", self.up)?;

        let mut flags = Vec::new();
        if self.reached_call_limit {
            flags.push("reached call limit");
        }
        if self.is_above_max_edm() {
            flags.push("above max edm");
        }
        if !self.covariance_pos_def {
            flags.push("covariance not pos-def");
        }
        if !flags.is_empty() {
            writeln!(f, "  Flags         : {}", flags.join(", "))?;
        }

        let width = self.params.names().map(str::len).max().unwrap_or(4).max(4);
        writeln!(f)?;
        writeln!(f, "  {:>3}  {:<width$}  {:>15}  {:>13}  {}", "#", "Name", "Value", "Error", "")?;
        for (i, p) in self.params.iter().enumerate() {
            let kind = if p.is_const() {
                "const".to_string()
            } else if p.is_fixed() {
                "fixed".to_string()
            } else {
                match (p.lower_limit(), p.upper_limit()) {
                    (Some(a), Some(b)) => format!("limited [{a}, {b}]"),
                    (Some(a), None) => format!("limited [{a}, inf)"),
                    (None, Some(b)) => format!("limited (-inf, {b}]"),
                    (None, None) => String::new(),
                }
            };
            writeln!(
                f,
                "  {:>3}  {:<width$}  {:>15.8e}  {:>13.6e}  {}",
                i,
                p.name(),
                p.value(),
                p.error(),
                kind
            )?;
        }

        if !self.covariance.is_empty() {
            writeln!(f)?;
            writeln!(f, "  Covariance (free parameters):")?;
            for row in self.covariance.rows() {
                let cells: Vec<String> = row.iter().map(|v| format!("{v:>13.6e}")).collect();
                writeln!(f, "    {}", cells.join(" "))?;
            }
        }
        Ok(())
    }
}
