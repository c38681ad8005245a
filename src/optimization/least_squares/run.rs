//! least_squares::run — execute the bounded solver through Argmin.
//!
//! Purpose
//! -------
//! Wire a problem adapter and a configured solver into an Argmin
//! `Executor`, apply the iteration cap and optional observer, and convert
//! the final state into a validated [`FitOutcome`].
//!
//! Key behaviors
//! -------------
//! - The best parameters are taken from the Argmin state (falling back to
//!   the last parameters); residuals and Jacobian are then recomputed there
//!   so the outcome is self-consistent.
//! - With the `obs_slog` feature and `verbose = true`, a terminal slog
//!   observer reports every iteration.
use crate::optimization::{
    errors::OptResult,
    least_squares::{
        adapter::ArgMinAdapter,
        solver::{BoundedLevenbergMarquardt, half_sum_squares},
        traits::{FitOptions, FitOutcome, LeastSquares},
        types::Theta,
        validation::validate_theta_hat,
    },
};
use argmin::core::{Executor, State};

/// Run the bounded Levenberg–Marquardt solver on `problem` from `theta0`.
///
/// # Errors
/// - Any `OptError` raised by the problem during the run (these pass through
///   Argmin unchanged).
/// - Argmin runtime errors, mapped through `From<argmin::core::Error>`.
/// - Validation errors while building the [`FitOutcome`].
pub fn run_bounded_lm<'a, F>(
    theta0: Theta, opts: &FitOptions, problem: ArgMinAdapter<'a, F>,
    solver: BoundedLevenbergMarquardt,
) -> OptResult<FitOutcome>
where
    F: LeastSquares,
{
    let evaluator = problem.clone();
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let r0 = evaluator.residuals_at(&theta0)?;
        eprintln!("init: cost(theta0) = {:.6}", half_sum_squares(&r0));
    }
    let mut optimizer = Executor::new(problem, solver);
    optimizer = optimizer.configure(|state| state.param(theta0));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    let theta_hat = validate_theta_hat(result.take_best_param().or_else(|| result.take_param()))?;
    let residuals = evaluator.residuals_at(&theta_hat)?;
    let jacobian = evaluator.jacobian_at(&theta_hat)?;
    tracing::debug!(
        iterations,
        cost = half_sum_squares(&residuals),
        status = ?termination,
        "least-squares run finished"
    );
    FitOutcome::new(Some(theta_hat), residuals, jacobian, termination, iterations, function_counts)
}
