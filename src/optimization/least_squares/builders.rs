//! least_squares::builders — construct a configured bounded LM solver.
//!
//! Purpose
//! -------
//! Translate [`FitOptions`] and [`Bounds`] into a ready-to-run
//! [`BoundedLevenbergMarquardt`], keeping tolerance wiring in one place.
use crate::optimization::{
    errors::OptResult,
    least_squares::{bounds::Bounds, solver::BoundedLevenbergMarquardt, traits::FitOptions},
};

/// Build a bounded Levenberg–Marquardt solver from options.
///
/// `max_iter` is not a solver setting; the runner applies it to the Argmin
/// state.
///
/// # Errors
/// Propagates tolerance and damping validation errors.
pub fn build_bounded_lm(opts: &FitOptions, bounds: Bounds) -> OptResult<BoundedLevenbergMarquardt> {
    BoundedLevenbergMarquardt::new(bounds)
        .with_tolerance_grad(opts.tols.tol_grad)?
        .with_tolerance_cost(opts.tols.tol_cost)?
        .with_tolerance_step(opts.tols.tol_step)?
        .with_initial_damping(opts.initial_damping)
}
