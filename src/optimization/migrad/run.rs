//! Drive one L-BFGS pass through `argmin` and normalize its final state.
use crate::optimization::{
    errors::OptResult,
    migrad::{FCN, Grad, MigradOptions, OptimOutcome, Theta, adapter::ArgMinAdapter},
};
#[cfg(feature = "obs_slog")]
use argmin::core::{CostFunction, Gradient};
use argmin::core::{Executor, IterState, Solver, State};
#[cfg(feature = "obs_slog")]
use argmin_math::ArgminL2Norm;

/// Final solver state for the crate's numeric types.
type PassState = IterState<Theta, Grad, (), (), (), f64>;

/// Run `solver` on `problem` from `theta0`.
///
/// `opts.tols.max_iter` caps the iteration count; the objective call count
/// is taken from the adapter's shared counter, so it includes every call
/// made before this pass as well.
///
/// With `obs_slog` and `opts.verbose`, the start point is printed to stderr
/// and a slog terminal observer follows every iteration.
///
/// # Errors
/// - Any `argmin` runtime error (line-search failure, objective error, ...)
///   via `From<argmin::core::Error>`.
/// - Validation errors while building the [`OptimOutcome`].
pub fn run_lbfgs<'a, F, S>(
    theta0: Theta, opts: &MigradOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: FCN,
    S: Solver<ArgMinAdapter<'a, F>, PassState> + Send + 'static,
{
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        print_start(&theta0, &problem)?;
    }
    let calls = problem.counter();
    let iter_cap = opts.tols.max_iter.map(|n| n as u64);
    let executor = Executor::new(problem, solver).configure(|state| {
        let state = state.param(theta0);
        match iter_cap {
            Some(cap) => state.max_iters(cap),
            None => state,
        }
    });
    #[cfg(feature = "obs_slog")]
    let executor = if opts.verbose {
        executor.add_observer(
            argmin_observer_slog::SlogLogger::term_noblock(),
            argmin::core::observers::ObserverMode::Always,
        )
    } else {
        executor
    };

    let state = executor.run()?.state().clone();
    into_outcome(state, calls.get())
}

// ---- Helper Methods ----

fn into_outcome(mut state: PassState, nfcn: usize) -> OptResult<OptimOutcome> {
    let grad = state.take_gradient();
    let iterations = state.get_iter();
    let counts = state.get_func_counts().clone();
    let status = state.get_termination_status().clone();
    let value = state.get_best_cost();
    OptimOutcome::new(state.take_best_param(), value, status, iterations, counts, nfcn, grad)
}

#[cfg(feature = "obs_slog")]
fn print_start<F: FCN>(theta0: &Theta, problem: &ArgMinAdapter<'_, F>) -> OptResult<()> {
    let f0 = problem.cost(theta0)?;
    match problem.gradient(theta0) {
        Ok(g) => eprintln!("start: f = {f0:.6}, |g| = {:.6}", g.l2_norm()),
        Err(_) => eprintln!("start: f = {f0:.6}"),
    }
    Ok(())
}
