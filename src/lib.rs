//! peakfit2d — bounded 2D Gaussian signal-plus-background histogram fits.
//!
//! Purpose
//! -------
//! Fit a single separable 2D Gaussian peak over a scaled background template
//! to binned data, propagate the fit covariance into the signal yield, and
//! render the result as a two-page PDF of lego plots and fit results.
//!
//! Key behaviors
//! -------------
//! - `histogram`: validated [`histogram::Histogram2D`] values behind the
//!   [`histogram::HistogramSource`] trait, with a JSON file backend.
//! - `dataset`: flatten a data/background pair into weighted samples,
//!   dropping bins whose uncertainty is not finite.
//! - `model`: expected counts, analytic derivatives, and the weighted
//!   residual problem.
//! - `optimization`: an Argmin-backed bounded Levenberg–Marquardt engine.
//! - `inference`: covariance, standard errors, delta-method yield error, and
//!   chi-square goodness of fit.
//! - `report`: the [`report::ReportRenderer`] trait and its PDF backend.
//! - `pipeline`: [`pipeline::FitPipeline`] wiring all of the above together.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every fallible operation returns a module-specific error enum; none of
//!   the library code panics on bad input.
//! - Library code only emits `tracing` events; installing a subscriber is
//!   left to the binary or the embedding application.
//!
//! Conventions
//! -----------
//! - Parameter order is `(A, μ1, μ2, σ1, σ2, B)` everywhere.
//! - Histogram contents are indexed `[[x_bin, y_bin]]` and flattened x-major.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each module; `tests/integration_fit_pipeline.rs`
//!   covers recovery, calibration, filtering, and report output end to end.

pub mod dataset;
pub mod histogram;
pub mod inference;
pub mod model;
pub mod optimization;
pub mod pipeline;
pub mod report;
pub mod utils;
