//! inference::delta — delta-method propagation and the signal yield.
//!
//! Purpose
//! -------
//! Propagate parameter covariance into a derived scalar `g(θ)` with the
//! first-order delta method, `Var[g] ≈ ∇gᵀ C ∇g`, and apply it to the
//! integrated signal yield `N = π·A·σ1·σ2`.
//!
//! Conventions
//! -----------
//! - Gradients are given only on the parameters `g` depends on, together
//!   with their indices in the full parameter vector.
//! - Tiny negative variances from round-off are clamped to zero.
use crate::{
    inference::{
        covariance::CovarianceEstimate,
        errors::{InferenceError, InferenceResult},
    },
    model::params::{IDX_AMPLITUDE, IDX_WIDTH_X, IDX_WIDTH_Y, ModelParams},
};
use ndarray::Array2;
use std::f64::consts::PI;

/// Delta-method standard error of a derived quantity.
///
/// Parameters
/// ----------
/// - `cov`: full parameter covariance.
/// - `indices`: parameter indices the quantity depends on.
/// - `gradient`: partial derivatives, aligned with `indices`.
///
/// Returns `sqrt(Σ_ab g_a g_b C[i_a, i_b])`.
///
/// Errors
/// ------
/// - `DimensionMismatch` if `indices` and `gradient` differ in length.
/// - `IndexOutOfRange` for an index outside the covariance.
/// - `NonFiniteCovariance` if the propagated variance is not finite.
pub fn delta_method(cov: &Array2<f64>, indices: &[usize], gradient: &[f64]) -> InferenceResult<f64> {
    if indices.len() != gradient.len() {
        return Err(InferenceError::DimensionMismatch {
            what: "delta-method gradient",
            expected: indices.len(),
            found: gradient.len(),
        });
    }
    let dim = cov.nrows();
    if let Some(&index) = indices.iter().find(|&&i| i >= dim || i >= cov.ncols()) {
        return Err(InferenceError::IndexOutOfRange { index, dim });
    }
    let mut variance = 0.0;
    for (a, &ia) in indices.iter().enumerate() {
        for (b, &ib) in indices.iter().enumerate() {
            variance += gradient[a] * gradient[b] * cov[[ia, ib]];
        }
    }
    if !variance.is_finite() {
        let (row, col) = (indices[0], indices[0]);
        return Err(InferenceError::NonFiniteCovariance { row, col, value: variance });
    }
    Ok(variance.max(0.0).sqrt())
}

/// Integrated signal yield and its uncertainty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalYield {
    pub value: f64,
    pub std_error: f64,
}

impl SignalYield {
    /// `N = π·A·σ1·σ2`, the integral of the un-normalized Gaussian.
    pub fn integral(p: &ModelParams) -> f64 {
        PI * p.amplitude * p.width_x * p.width_y
    }

    /// Yield at `p` with delta-method error from `cov`, using the gradient
    /// `(πσ1σ2, πAσ2, πAσ1)` on `(A, σ1, σ2)`.
    ///
    /// # Errors
    /// Propagates [`delta_method`] errors.
    pub fn from_fit(p: &ModelParams, cov: &CovarianceEstimate) -> InferenceResult<Self> {
        let gradient = [
            PI * p.width_x * p.width_y,
            PI * p.amplitude * p.width_y,
            PI * p.amplitude * p.width_x,
        ];
        let std_error =
            delta_method(cov.matrix(), &[IDX_AMPLITUDE, IDX_WIDTH_X, IDX_WIDTH_Y], &gradient)?;
        Ok(Self { value: Self::integral(p), std_error })
    }
}
