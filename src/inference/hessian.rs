//! inference::hessian — covariance and EDM from the Hessian at a minimum.
//!
//! Purpose
//! -------
//! Turn a finite-difference Hessian of the objective at `θ̂` into the
//! quantities Migrad reports: the parameter covariance matrix, the
//! estimated distance to minimum (EDM), and whether the Hessian was
//! positive definite. This module handles the conversion between `ndarray`
//! and `nalgebra` types and keeps all inversion eigen-based.
//!
//! Key behaviors
//! -------------
//! - Get `H(θ̂)` either from the gradient map ([`compute_hessian`]) or,
//!   for objectives without analytic gradients, from second differences
//!   of the objective values ([`cost_hessian`]).
//! - Copy it into a `nalgebra::DMatrix` ([`fill_dmatrix`]) and take the
//!   Moore–Penrose pseudoinverse `H⁺` via `symmetric_eigen`.
//! - Report `V = 2 · up · H⁺` and `EDM = ½ gᵀ H⁺ g`.
//!
//! Invariants & assumptions
//! ------------------------
//! - [`compute_hessian`] returns a finite, symmetric `n×n` matrix.
//! - Eigenvalues at or below `EIGEN_EPS · max(1, max|λ|)` are treated as
//!   zero; any such eigenvalue (or a negative one) clears the
//!   positive-definite flag and inflates nothing.
//!
//! Conventions
//! -----------
//! - `up` is the objective's error definition: 1 for χ², 0.5 for a negative
//!   log-likelihood. With that scaling `V` is the usual covariance in both
//!   cases.
//! - Everything is in the *internal* parameter space; mapping to external
//!   parameters is done by `minuit::parameters`.
//!
//! Testing notes
//! -------------
//! - Unit tests cover copying into `DMatrix`, covariance and EDM on
//!   quadratics with known Hessians, and the indefinite case.
use crate::optimization::{
    errors::OptResult,
    migrad::{
        Grad, Hessian, Theta,
        finite_diff::{compute_hessian, cost_hessian},
    },
    numerical_stability::transformations::EIGEN_EPS,
};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

/// Curvature summary at a candidate minimum.
///
/// - `covariance`: `2 · up · H⁺` in internal coordinates.
/// - `edm`: `½ gᵀ H⁺ g`, Migrad's estimated vertical distance to minimum.
/// - `pos_def`: whether every eigenvalue of `H` was safely positive.
#[derive(Debug, Clone, PartialEq)]
pub struct CovarianceEstimate {
    pub covariance: Array2<f64>,
    pub edm: f64,
    pub pos_def: bool,
}

impl CovarianceEstimate {
    /// Square roots of the diagonal of the covariance.
    pub fn errors(&self) -> Array1<f64> {
        self.covariance.diag().mapv(|v| v.max(0.0).sqrt())
    }
}

/// Covariance, EDM and positive-definiteness at `theta_hat`.
///
/// Parameters
/// ----------
/// - `f`: gradient map of the objective, `θ ↦ ∇f(θ)`, C¹ near `theta_hat`.
/// - `theta_hat`: internal parameter vector at the candidate minimum.
/// - `grad`: gradient at `theta_hat`, used for the EDM.
/// - `up`: error definition of the objective.
///
/// Errors
/// ------
/// - Any error [`compute_hessian`] returns (dimension mismatch,
///   non-finite entries).
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use rust_minuit::inference::hessian::calc_covariance;
/// // f(θ) = 2 θ₀² + ½ θ₁², so H = diag(4, 1).
/// let a = array![[4.0, 0.0], [0.0, 1.0]];
/// let f = |theta: &ndarray::Array1<f64>| a.dot(theta);
/// let theta_hat = array![0.0, 0.0];
/// let est = calc_covariance(&f, &theta_hat, &array![0.0, 0.0], 1.0).unwrap();
/// assert!((est.covariance[[0, 0]] - 0.5).abs() < 1e-6);
/// assert!((est.covariance[[1, 1]] - 2.0).abs() < 1e-6);
/// assert!(est.pos_def);
/// ```
pub fn calc_covariance<F: Fn(&Theta) -> Grad>(
    f: &F, theta_hat: &Theta, grad: &Grad, up: f64,
) -> OptResult<CovarianceEstimate> {
    let hess = compute_hessian(f, theta_hat)?;
    Ok(covariance_from_hessian(&hess, grad, up))
}

/// Same as [`calc_covariance`], with the Hessian taken from second
/// differences of the objective values (see [`cost_hessian`]).
///
/// Preferred when no analytic gradient exists: differencing a
/// finite-difference gradient amplifies rounding in `f` far more.
pub fn calc_covariance_from_cost<G: Fn(&Theta) -> OptResult<f64>>(
    f: &G, theta_hat: &Theta, grad: &Grad, up: f64,
) -> OptResult<CovarianceEstimate> {
    let hess = cost_hessian(f, theta_hat)?;
    Ok(covariance_from_hessian(&hess, grad, up))
}

/// Covariance `2 · up · H⁺`, EDM `½ gᵀ H⁺ g`, and the positive-definite
/// flag for a finite, symmetric Hessian.
pub fn covariance_from_hessian(hess: &Hessian, grad: &Grad, up: f64) -> CovarianceEstimate {
    let mut hess_nalg = DMatrix::<f64>::zeros(hess.nrows(), hess.ncols());
    fill_dmatrix(hess, &mut hess_nalg);
    let (h_inv, pos_def) = pseudo_inverse(hess_nalg, hess.nrows());
    let edm = 0.5 * grad.dot(&h_inv.dot(grad));
    let covariance = h_inv * (2.0 * up);
    CovarianceEstimate { covariance, edm: edm.max(0.0), pos_def }
}

// ---- Helper methods ----

/// Copy an `ndarray` Hessian into a preallocated `nalgebra::DMatrix`.
///
/// Column-major traversal to match `DMatrix` storage. No symmetrization.
fn fill_dmatrix(hess: &Array2<f64>, hess_nalg: &mut DMatrix<f64>) {
    let n = hess.ncols();
    for j in 0..n {
        for i in 0..hess.nrows() {
            hess_nalg[(i, j)] = hess[[i, j]];
        }
    }
}

/// Pseudoinverse `H⁺ = Σ_{λ_k > cut} q_k q_kᵀ / λ_k` and a flag telling
/// whether no eigenvalue fell at or below the cut.
///
/// The cut is `EIGEN_EPS · max(1, max|λ|)`.
fn pseudo_inverse(hess_nalg: DMatrix<f64>, n: usize) -> (Array2<f64>, bool) {
    let eigen_decomp = hess_nalg.symmetric_eigen();
    let q = eigen_decomp.eigenvectors;
    let eigenvals = eigen_decomp.eigenvalues;
    let scale = eigenvals.iter().fold(1.0_f64, |acc, l| acc.max(l.abs()));
    let cut = EIGEN_EPS * scale;
    let pos_def = eigenvals.iter().all(|&l| l > cut);
    let mut h_inv = Array2::<f64>::zeros((n, n));
    for (k, &lambda) in eigenvals.iter().enumerate() {
        if lambda <= cut {
            continue;
        }
        for i in 0..n {
            let coeff = q[(i, k)] / lambda;
            for j in 0..n {
                h_inv[[i, j]] += coeff * q[(j, k)];
            }
        }
    }
    (h_inv, pos_def)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::DVector;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Copying Hessians from `ndarray` into `DMatrix`.
    // - Covariance and EDM for quadratics with known Hessians, for both
    //   χ² (up = 1) and negative log-likelihood (up = 0.5) scaling.
    // - The indefinite / singular case.
    //
    // They intentionally DO NOT cover:
    // - Limit transforms; those live in `minuit::parameters`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // `fill_dmatrix` copies every entry unchanged.
    //
    // Given
    // -----
    // - A 2×2 symmetric matrix with distinct entries.
    //
    // Expect
    // ------
    // - Identical entries in the `DMatrix`.
    fn fill_dmatrix_copies_ndarray_into_dmatrix_without_modification() {
        // Arrange
        let hess: Array2<f64> = array![[2.0, 0.5], [0.5, 1.0]];
        let mut hess_nalg = DMatrix::<f64>::zeros(2, 2);

        // Act
        fill_dmatrix(&hess, &mut hess_nalg);

        // Assert
        assert_eq!(hess_nalg[(0, 0)], 2.0);
        assert_eq!(hess_nalg[(0, 1)], 0.5);
        assert_eq!(hess_nalg[(1, 0)], 0.5);
        assert_eq!(hess_nalg[(1, 1)], 1.0);
    }

    #[test]
    // Purpose
    // -------
    // With `up = 0.5` the covariance is the plain inverse Hessian, and the
    // EDM follows `½ gᵀ H⁻¹ g`.
    //
    // Given
    // -----
    // - `H = [[4, 1], [1, 2]]` via the linear gradient map `g(θ) = H θ`.
    // - `g = (1, 0)` as the gradient at the reported point.
    //
    // Expect
    // ------
    // - `V ≈ H⁻¹ = 1/7 · [[2, −1], [−1, 4]]`.
    // - `EDM ≈ ½ · 2/7 = 1/7`.
    fn calc_covariance_matches_inverse_hessian_for_half_up() {
        // Arrange
        let h = array![[4.0, 1.0], [1.0, 2.0]];
        let f = |theta: &Theta| h.dot(theta);
        let theta_hat = array![0.2, -0.1];
        let grad = array![1.0, 0.0];

        // Act
        let est = calc_covariance(&f, &theta_hat, &grad, 0.5).expect("covariance");

        // Assert
        assert!(est.pos_def);
        assert_relative_eq!(est.covariance[[0, 0]], 2.0 / 7.0, epsilon = 1e-6);
        assert_relative_eq!(est.covariance[[0, 1]], -1.0 / 7.0, epsilon = 1e-6);
        assert_relative_eq!(est.covariance[[1, 1]], 4.0 / 7.0, epsilon = 1e-6);
        assert_relative_eq!(est.edm, 1.0 / 7.0, epsilon = 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // χ² scaling doubles the inverse Hessian and `errors()` takes square
    // roots of the diagonal.
    //
    // Given
    // -----
    // - `H = diag(2, 8)` and `up = 1`.
    //
    // Expect
    // ------
    // - `V = diag(1, 0.25)` and errors `(1, 0.5)`.
    fn calc_covariance_scales_with_up() {
        // Arrange
        let h = array![[2.0, 0.0], [0.0, 8.0]];
        let f = |theta: &Theta| h.dot(theta);

        // Act
        let est =
            calc_covariance(&f, &array![0.0, 0.0], &array![0.0, 0.0], 1.0).expect("covariance");

        // Assert
        let errs = est.errors();
        assert_relative_eq!(errs[0], 1.0, epsilon = 1e-6);
        assert_relative_eq!(errs[1], 0.5, epsilon = 1e-6);
        assert_eq!(est.edm, 0.0);
    }

    #[test]
    // Purpose
    // -------
    // A singular Hessian clears the positive-definite flag and the null
    // direction is dropped from the pseudoinverse.
    //
    // Given
    // -----
    // - `H = diag(2, 0)` as a `DMatrix`.
    //
    // Expect
    // ------
    // - `pos_def == false`, `H⁺ = diag(0.5, 0)`.
    fn pseudo_inverse_flags_singular_hessian() {
        // Arrange
        let h = DMatrix::<f64>::from_diagonal(&DVector::from_vec(vec![2.0, 0.0]));

        // Act
        let (h_inv, pos_def) = pseudo_inverse(h, 2);

        // Assert
        assert!(!pos_def);
        assert_relative_eq!(h_inv[[0, 0]], 0.5, epsilon = 1e-12);
        assert_relative_eq!(h_inv[[1, 1]], 0.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // The value-based path gives the same covariance as the gradient path
    // for a Gaussian negative log-likelihood with a large constant term.
    //
    // Given
    // -----
    // - `f(μ) = 500 + ½ (μ − 2)² / 0.3²` at `μ = 2`, `up = 0.5`.
    //
    // Expect
    // ------
    // - `V = 0.09` (so the error is 0.3) and EDM ≈ 0.
    fn calc_covariance_from_cost_handles_offset_nll() {
        // Arrange
        let f = |theta: &Theta| -> OptResult<f64> {
            Ok(500.0 + 0.5 * ((theta[0] - 2.0) / 0.3).powi(2))
        };

        // Act
        let est = calc_covariance_from_cost(&f, &array![2.0], &array![0.0], 0.5)
            .expect("covariance");

        // Assert
        assert_relative_eq!(est.covariance[[0, 0]], 0.09, max_relative = 1e-4);
        assert!(est.pos_def);
        assert_eq!(est.edm, 0.0);
    }
}
