//! migrad::builders — L-BFGS solver construction helpers.
//!
//! Purpose
//! -------
//! Build L-BFGS solvers for the Migrad driver with the crate's numeric
//! types, applying the memory size and tolerances from [`MigradOptions`].
//! The initial point and the iteration cap are runtime concerns and are
//! applied by the runner, so these builders stay side-effect free.
//!
//! Conventions
//! -----------
//! - `opts.lbfgs_mem` falls back to [`DEFAULT_LBFGS_MEM`].
//! - Argmin rejections of a tolerance surface as [`OptError`] through the
//!   crate's `From<Error>` conversion.
//!
//! [`OptError`]: crate::optimization::errors::OptError
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    errors::OptResult,
    migrad::{
        traits::MigradOptions,
        types::{
            Cost, DEFAULT_LBFGS_MEM, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente,
            MoreThuenteLS, Theta,
        },
    },
};

/// L-BFGS with Hager–Zhang line search, configured from `opts`.
///
/// # Errors
/// Returned when Argmin rejects one of the configured tolerances.
pub fn build_optimizer_hager_zhang(opts: &MigradOptions) -> OptResult<LbfgsHagerZhang> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    configure_lbfgs(LbfgsHagerZhang::new(HagerZhangLS::new(), mem), opts)
}

/// L-BFGS with More–Thuente line search, configured from `opts`.
///
/// # Errors
/// Returned when Argmin rejects one of the configured tolerances.
pub fn build_optimizer_more_thuente(opts: &MigradOptions) -> OptResult<LbfgsMoreThuente> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    configure_lbfgs(LbfgsMoreThuente::new(MoreThuenteLS::new(), mem), opts)
}

/// Apply the optional gradient and cost-change tolerances to any L-BFGS
/// solver regardless of its line search. `None` keeps Argmin's default.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MigradOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}
