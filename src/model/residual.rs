//! model::residual — weighted residuals and Jacobian of the peak model.
//!
//! Purpose
//! -------
//! Implement [`LeastSquares`] for the Gaussian-peak-over-background model so
//! the bounded least-squares engine can fit it to a [`BinnedDataset`].
//!
//! Key behaviors
//! -------------
//! - For valid widths, `rᵢ = (observedᵢ − expectedᵢ(θ)) / sigmaᵢ`.
//! - For `σ1 ≤ 0` or `σ2 ≤ 0`, every residual is the constant penalty
//!   (`1e6` by default) and the Jacobian is zero; the kernel is never
//!   evaluated there.
//! - The analytic Jacobian row is `−∂expected/∂θ / sigmaᵢ`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Residual length equals the retained sample count for every `θ`.
//! - Sample order matches [`BinnedDataset::samples`].
use crate::{
    dataset::BinnedDataset,
    model::{
        evaluator::{expected_count, expected_count_gradient},
        params::{ModelParams, N_PARAMS},
    },
    optimization::{
        errors::{OptError, OptResult},
        least_squares::{JacobianMatrix, LeastSquares, Residuals, Theta},
    },
};
use ndarray::Array1;

/// Residual returned for every sample when a width is not positive.
pub const PENALTY_RESIDUAL: f64 = 1e6;

/// Single separable 2D Gaussian over a scaled background template.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianPeakModel {
    penalty: f64,
}

impl GaussianPeakModel {
    pub fn new() -> Self {
        Self { penalty: PENALTY_RESIDUAL }
    }

    pub fn penalty(&self) -> f64 {
        self.penalty
    }
}

impl Default for GaussianPeakModel {
    fn default() -> Self {
        Self::new()
    }
}

impl LeastSquares for GaussianPeakModel {
    type Data = BinnedDataset;

    fn residuals(&self, theta: &Theta, data: &BinnedDataset) -> OptResult<Residuals> {
        let p = ModelParams::from_theta(theta)?;
        if !p.widths_valid() {
            return Ok(Array1::from_elem(data.len(), self.penalty));
        }
        let area = data.grid().bin_area();
        Ok(data
            .samples()
            .iter()
            .map(|s| (s.observed - expected_count(&p, s.x, s.y, s.background, area)) / s.sigma)
            .collect())
    }

    fn n_residuals(&self, data: &BinnedDataset) -> usize {
        data.len()
    }

    fn check(&self, theta: &Theta, _data: &BinnedDataset) -> OptResult<()> {
        if theta.len() != N_PARAMS {
            return Err(OptError::ThetaLengthMismatch { expected: N_PARAMS, actual: theta.len() });
        }
        Ok(())
    }

    fn jacobian(&self, theta: &Theta, data: &BinnedDataset) -> OptResult<JacobianMatrix> {
        let p = ModelParams::from_theta(theta)?;
        let mut jac = JacobianMatrix::zeros((data.len(), N_PARAMS));
        if !p.widths_valid() {
            return Ok(jac);
        }
        let area = data.grid().bin_area();
        for (mut row, s) in jac.rows_mut().into_iter().zip(data.samples()) {
            let grad = expected_count_gradient(&p, s.x, s.y, s.background, area);
            for (dst, g) in row.iter_mut().zip(grad) {
                *dst = -g / s.sigma;
            }
        }
        Ok(jac)
    }
}
