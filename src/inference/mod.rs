//! inference — covariance, derived-quantity errors, and fit quality.
//!
//! Purpose
//! -------
//! Turn the optimizer's Jacobian and residuals at the optimum into
//! uncertainty statements: the parameter covariance and standard errors,
//! the delta-method error of the signal yield, and a chi-square summary.
//!
//! Key behaviors
//! -------------
//! - [`CovarianceEstimate::from_jacobian`] computes `(JᵀJ)⁻¹·χ²/ndof` by
//!   symmetric eigendecomposition and refuses rank-deficient curvature.
//! - [`delta_method`] propagates a covariance into any scalar function
//!   given its gradient; [`SignalYield`] applies it to `π·A·σ1·σ2`.
//! - [`GoodnessOfFit`] adds the `χ²(ndof)` upper-tail probability.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are finite (guaranteed by `FitOutcome` validation).
//! - Singular curvature is reported as its own error variant, never
//!   silently pseudo-inverted.
//!
//! Testing notes
//! -------------
//! - Hand-computed designs check the covariance formula; closed forms check
//!   the delta method and the p-value.

pub mod covariance;
pub mod delta;
pub mod errors;
pub mod goodness;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::covariance::CovarianceEstimate;
pub use self::delta::{SignalYield, delta_method};
pub use self::errors::{InferenceError, InferenceResult};
pub use self::goodness::GoodnessOfFit;
