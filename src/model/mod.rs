//! model — the signal-plus-background peak model.
//!
//! Purpose
//! -------
//! Define the six fit parameters, evaluate expected bin counts and their
//! derivatives, and expose the weighted residual problem to the optimizer.
//!
//! Key behaviors
//! -------------
//! - [`ModelParams`] names the slots of the optimizer vector.
//! - [`evaluator`] computes the Gaussian kernel, expected counts, analytic
//!   gradients, and full-grid model surfaces for the report.
//! - [`GaussianPeakModel`] implements `LeastSquares` with a constant penalty
//!   for non-positive widths.
//!
//! Downstream usage
//! ----------------
//! - `pipeline` fits [`GaussianPeakModel`] and renders [`model_grid`].

pub mod evaluator;
pub mod params;
pub mod residual;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::evaluator::{expected_count, model_grid, signal_grid, signal_kernel};
pub use self::params::{ModelParams, N_PARAMS, PARAM_NAMES};
pub use self::residual::{GaussianPeakModel, PENALTY_RESIDUAL};
