//! Integration tests for the Minuit front end.
//!
//! Purpose
//! -------
//! - Drive the public API end to end: build an `MnUserParameters` set, bind
//!   an objective to `MnMigrad`, minimize, and read the `FunctionMinimum`.
//! - Use realistic objectives (χ² straight-line fit, Gaussian negative
//!   log-likelihood with a limited width) rather than only toy parabolas.
//!
//! Coverage
//! --------
//! - `minuit::parameters`: free, constant, fixed and limited parameters.
//! - `minuit::migrad`: multi-pass minimization, call budget, restarts from
//!   the updated parameter set.
//! - `minuit::minimum`: validity flags, errors, covariance, `Display`.
//!
//! Exclusions
//! ----------
//! - Python bindings; they need an interpreter and are exercised from
//!   Python.
//! - Low-level solver wiring and finite differences, covered by unit tests.
use approx::assert_relative_eq;
use rust_minuit::{
    minuit::{MnApplication, MnMigrad, MnStrategy, MnUserParameters},
    optimization::{
        errors::OptResult,
        migrad::{Cost, FCN, Theta},
    },
};

struct SimpleFcn;

impl FCN for SimpleFcn {
    fn value(&self, v: &Theta) -> OptResult<Cost> {
        Ok(v[0] * v[0])
    }

    fn up(&self) -> f64 {
        0.5
    }
}

/// χ² of a straight line `a + b x` through points with unit errors.
struct LineChi2 {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl FCN for LineChi2 {
    fn value(&self, p: &Theta) -> OptResult<Cost> {
        Ok(self.x.iter().zip(&self.y).map(|(x, y)| (y - p[0] - p[1] * x).powi(2)).sum())
    }
}

/// Gaussian negative log-likelihood over fixed samples; parameters
/// `(mu, sigma)`.
struct GaussNll {
    samples: Vec<f64>,
}

impl FCN for GaussNll {
    fn value(&self, p: &Theta) -> OptResult<Cost> {
        let (mu, sigma) = (p[0], p[1]);
        Ok(self
            .samples
            .iter()
            .map(|x| sigma.ln() + 0.5 * ((x - mu) / sigma).powi(2) + 0.5 * std::f64::consts::TAU.ln())
            .sum())
    }

    fn up(&self) -> f64 {
        0.5
    }
}

fn gauss_samples() -> Vec<f64> {
    (0..200).map(|i| 3.0 + 1.5 * ((i as f64) * 0.7).sin() + 0.2 * ((i as f64) * 1.3).cos()).collect()
}

#[test]
// Purpose
// -------
// Binding-level smoke test: one parameter with a step, one Migrad call, and
// a minimum that stringifies.
//
// Given
// -----
// - `f(x) = x²`, `up = 0.5`, start `x = 1` with step `0.1`.
//
// Expect
// ------
// - A valid minimum at `x ≈ 0` whose text contains the parameter row.
fn simple_objective_minimum_stringifies() {
    // Arrange
    let mut upar = MnUserParameters::new();
    upar.add_with_step("x", 1.0, 0.1).expect("valid parameter");
    let mut migrad = MnMigrad::new(&SimpleFcn, upar, MnStrategy::default());

    // Act
    let minimum = migrad.minimize_default().expect("minimization succeeds");
    let text = minimum.to_string();

    // Assert
    assert!(minimum.is_valid());
    assert!(minimum.user_parameters().value("x").expect("known").abs() < 1e-3);
    assert!(!text.is_empty());
    assert!(text.contains('x'));
}

#[test]
// Purpose
// -------
// A straight-line χ² fit returns the least-squares solution and the
// textbook parameter errors.
//
// Given
// -----
// - Points `x = 0..10`, `y = 1 + 2x` plus a small alternating offset.
// - Parameters `a = 0 ± 1`, `b = 0 ± 1`; default strategy.
//
// Expect
// ------
// - `(a, b)` match the normal-equation solution to 1e-4.
// - Errors match `sqrt(diag((XᵀX)⁻¹))` to 1e-3 relative.
fn line_fit_matches_least_squares() {
    // Arrange
    let x: Vec<f64> = (0..10).map(f64::from).collect();
    let y: Vec<f64> =
        x.iter().enumerate().map(|(i, x)| 1.0 + 2.0 * x + if i % 2 == 0 { 0.1 } else { -0.1 }).collect();
    let n = x.len() as f64;
    let (sx, sy) = (x.iter().sum::<f64>(), y.iter().sum::<f64>());
    let sxx = x.iter().map(|v| v * v).sum::<f64>();
    let sxy = x.iter().zip(&y).map(|(a, b)| a * b).sum::<f64>();
    let det = n * sxx - sx * sx;
    let b_hat = (n * sxy - sx * sy) / det;
    let a_hat = (sy - b_hat * sx) / n;
    let (err_a, err_b) = ((sxx / det).sqrt(), (n / det).sqrt());

    let fcn = LineChi2 { x, y };
    let mut upar = MnUserParameters::new();
    upar.add_with_step("a", 0.0, 1.0).expect("valid");
    upar.add_with_step("b", 0.0, 1.0).expect("valid");
    let mut migrad = MnMigrad::new(&fcn, upar, MnStrategy::default());

    // Act
    let minimum = migrad.minimize(0, 0.01).expect("fit succeeds");

    // Assert
    let params = minimum.user_parameters();
    assert!(minimum.is_valid());
    assert_relative_eq!(params.value("a").expect("a"), a_hat, epsilon = 1e-4);
    assert_relative_eq!(params.value("b").expect("b"), b_hat, epsilon = 1e-4);
    assert_relative_eq!(params.error("a").expect("a"), err_a, max_relative = 1e-3);
    assert_relative_eq!(params.error("b").expect("b"), err_b, max_relative = 1e-3);
    assert_eq!(minimum.covariance().dim(), (2, 2));
}

#[test]
// Purpose
// -------
// A likelihood fit with a lower-limited width recovers the sample mean and
// standard deviation, with the usual `σ / √n` error on the mean.
//
// Given
// -----
// - 200 deterministic samples; `mu = 2.5 ± 0.5` free, `sigma = 1 ± 0.1`
//   limited to `[0.01, 100]`; `up = 0.5`; default call budget and
//   tolerance.
//
// Expect
// ------
// - `mu` and `sigma` equal the sample mean and (population) standard
//   deviation to 1e-3, sigma stays within its limits.
// - Error on `mu` is `σ̂ / √n` to 2% relative.
fn gaussian_likelihood_fit_with_limits() {
    // Arrange
    let samples = gauss_samples();
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let sd = (samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n).sqrt();

    let fcn = GaussNll { samples };
    let mut upar = MnUserParameters::new();
    upar.add_with_step("mu", 2.5, 0.5).expect("valid");
    upar.add_limited("sigma", 1.0, 0.1, 0.01, 100.0).expect("valid");
    let mut migrad = MnMigrad::new(&fcn, upar, MnStrategy::default());

    // Act
    let minimum = migrad.minimize_default().expect("fit succeeds");

    // Assert
    let params = minimum.user_parameters();
    let sigma = params.value("sigma").expect("sigma");
    assert!(!minimum.has_reached_call_limit());
    assert_relative_eq!(params.value("mu").expect("mu"), mean, epsilon = 1e-3);
    assert_relative_eq!(sigma, sd, epsilon = 1e-3);
    assert!((0.01..=100.0).contains(&sigma));
    assert_relative_eq!(params.error("mu").expect("mu"), sd / n.sqrt(), max_relative = 0.02);
}

#[test]
// Purpose
// -------
// Constants and fixed parameters are passed to the objective unchanged and
// the application keeps the minimum for the next call.
//
// Given
// -----
// - Line fit with `a` fixed at 1 and `b` free; an extra constant `c`.
//
// Expect
// ------
// - `a` and `c` keep their values and zero/initial errors; `b` moves.
// - Releasing `a` through the application and minimizing again frees it.
fn fixed_and_constant_parameters_round_trip_through_application() {
    // Arrange
    let fcn = LineChi2 { x: vec![0.0, 1.0, 2.0, 3.0], y: vec![2.0, 4.0, 6.0, 8.0] };
    let mut upar = MnUserParameters::new();
    upar.add_with_step("a", 1.0, 0.5).expect("valid");
    upar.add_with_step("b", 0.0, 0.5).expect("valid");
    upar.add("c", 42.0).expect("valid");
    upar.fix("a").expect("known");
    let mut migrad = MnMigrad::new(&fcn, upar, MnStrategy::default());

    // Act
    let first = migrad.minimize_default().expect("first fit");
    migrad.release("a").expect("known");
    let second = migrad.minimize_default().expect("second fit");

    // Assert
    let p1 = first.user_parameters();
    assert_eq!(p1.value("a").expect("a"), 1.0);
    assert_eq!(p1.value("c").expect("c"), 42.0);
    assert!(p1.parameter("c").expect("c").is_const());
    assert_eq!(first.covariance().dim(), (1, 1));

    let p2 = second.user_parameters();
    assert_relative_eq!(p2.value("a").expect("a"), 2.0, epsilon = 1e-3);
    assert_relative_eq!(p2.value("b").expect("b"), 2.0, epsilon = 1e-3);
    assert_eq!(second.covariance().dim(), (2, 2));
}

#[test]
// Purpose
// -------
// A tiny call budget is reported instead of silently claiming success.
//
// Given
// -----
// - Two-parameter line fit from a far start with `maxfcn = 5`.
//
// Expect
// ------
// - The minimum is flagged as having reached the call limit and is not
//   valid.
fn tiny_call_budget_is_flagged() {
    // Arrange
    let fcn = LineChi2 { x: vec![0.0, 1.0, 2.0], y: vec![10.0, 20.0, 30.0] };
    let mut upar = MnUserParameters::new();
    upar.add_with_step("a", -50.0, 1.0).expect("valid");
    upar.add_with_step("b", 50.0, 1.0).expect("valid");
    let mut migrad = MnMigrad::new(&fcn, upar, MnStrategy::new(0).expect("level 0"));

    // Act
    let minimum = migrad.minimize(5, 0.1).expect("runs");

    // Assert
    assert!(minimum.has_reached_call_limit());
    assert!(!minimum.is_valid());
}
