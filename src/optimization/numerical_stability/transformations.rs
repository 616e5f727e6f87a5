//! Bounded-parameter transforms.
//!
//! Minuit keeps limited parameters inside their range by minimizing over an
//! unbounded *internal* value and mapping it onto the *external* value the
//! objective sees:
//!
//! - double-sided `[a, b]`: `ext = a + (b − a)/2 · (sin(int) + 1)`,
//! - lower only `[a, ∞)`: `ext = a − 1 + √(int² + 1)`,
//! - upper only `(−∞, b]`: `ext = b + 1 − √(int² + 1)`.
//!
//! The maps are smooth and surjective onto the allowed range, so the
//! optimizer never has to handle a constraint. Their derivatives
//! `d ext / d int` are used for the chain rule on gradients and to push
//! internal covariances out to external ones.

/// Eigenvalues with magnitude at or below this are treated as zero when a
/// Hessian is pseudo-inverted.
pub const EIGEN_EPS: f64 = 1e-12;

/// Generic small tolerance for clamping and denominators.
pub const GENERAL_TOL: f64 = 1e-10;

/// Internal distance kept from the stationary points of the limit
/// transforms (`±π/2` for double-sided, `0` for one-sided limits): `8√ε`.
pub const LIMIT_OFFSET: f64 = 8.0 * 1.490_116_119_384_765_6e-8;

/// Range constraint attached to one parameter.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Limits {
    #[default]
    Unbounded,
    Lower(f64),
    Upper(f64),
    Both(f64, f64),
}

impl Limits {
    /// Build limits from optional bounds.
    ///
    /// Returns `None` when both bounds are present and `lower >= upper`, or
    /// when a bound is not finite.
    pub fn from_bounds(lower: Option<f64>, upper: Option<f64>) -> Option<Self> {
        if lower.is_some_and(|a| !a.is_finite()) || upper.is_some_and(|b| !b.is_finite()) {
            return None;
        }
        match (lower, upper) {
            (None, None) => Some(Limits::Unbounded),
            (Some(a), None) => Some(Limits::Lower(a)),
            (None, Some(b)) => Some(Limits::Upper(b)),
            (Some(a), Some(b)) if a < b => Some(Limits::Both(a, b)),
            _ => None,
        }
    }

    pub fn lower(&self) -> Option<f64> {
        match *self {
            Limits::Lower(a) | Limits::Both(a, _) => Some(a),
            _ => None,
        }
    }

    pub fn upper(&self) -> Option<f64> {
        match *self {
            Limits::Upper(b) | Limits::Both(_, b) => Some(b),
            _ => None,
        }
    }

    pub fn is_bounded(&self) -> bool {
        !matches!(self, Limits::Unbounded)
    }

    /// Clamp an external value into the allowed range.
    pub fn clamp(&self, ext: f64) -> f64 {
        match *self {
            Limits::Unbounded => ext,
            Limits::Lower(a) => ext.max(a),
            Limits::Upper(b) => ext.min(b),
            Limits::Both(a, b) => ext.clamp(a, b),
        }
    }

    /// Internal → external.
    pub fn int2ext(&self, int: f64) -> f64 {
        match *self {
            Limits::Unbounded => int,
            Limits::Lower(a) => a - 1.0 + (int * int + 1.0).sqrt(),
            Limits::Upper(b) => b + 1.0 - (int * int + 1.0).sqrt(),
            Limits::Both(a, b) => a + 0.5 * (b - a) * (int.sin() + 1.0),
        }
    }

    /// External → internal.
    ///
    /// Values outside the range are clamped first, so the result is always
    /// finite. For one-sided limits the non-negative branch is returned.
    ///
    /// A value on a limit maps [`LIMIT_OFFSET`] away from the stationary
    /// point of the transform, where `d ext / d int` would vanish.
    pub fn ext2int(&self, ext: f64) -> f64 {
        let ext = self.clamp(ext);
        match *self {
            Limits::Unbounded => ext,
            Limits::Lower(a) => {
                let d = ext - a + 1.0;
                (d * d - 1.0).max(0.0).sqrt().max(LIMIT_OFFSET)
            }
            Limits::Upper(b) => {
                let d = b - ext + 1.0;
                (d * d - 1.0).max(0.0).sqrt().max(LIMIT_OFFSET)
            }
            Limits::Both(a, b) => {
                let y = (2.0 * (ext - a) / (b - a) - 1.0).clamp(-1.0, 1.0);
                let edge = std::f64::consts::FRAC_PI_2 - LIMIT_OFFSET;
                y.asin().clamp(-edge, edge)
            }
        }
    }

    /// Derivative `d ext / d int` at the internal value `int`.
    pub fn dint2ext(&self, int: f64) -> f64 {
        match *self {
            Limits::Unbounded => 1.0,
            Limits::Lower(_) => int / (int * int + 1.0).sqrt(),
            Limits::Upper(_) => -int / (int * int + 1.0).sqrt(),
            Limits::Both(a, b) => 0.5 * (b - a) * int.cos(),
        }
    }

    /// Convert an external step (error) at `ext` into an internal one.
    ///
    /// Takes the larger internal displacement of `ext ± step`, so a value on
    /// a limit (where one side is clamped away) still gets a usable step.
    /// Falls back to the external step when both sides collapse.
    pub fn ext2int_step(&self, ext: f64, step: f64) -> f64 {
        let int = self.ext2int(ext);
        let up = (self.ext2int(ext + step) - int).abs();
        let down = (int - self.ext2int(ext - step)).abs();
        let d = up.max(down);
        if d > GENERAL_TOL && d.is_finite() { d } else { step }
    }
}
