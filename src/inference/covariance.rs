//! inference::covariance — parameter covariance from the fit Jacobian.
//!
//! Purpose
//! -------
//! Estimate the covariance of the fitted parameters as
//! `C = (JᵀJ)⁻¹ · χ²/ndof`, with `J` the weighted-residual Jacobian at the
//! optimum, and derive standard errors and correlations from it.
//!
//! Key behaviors
//! -------------
//! - `ndof = n_samples − n_params`; `ndof ≤ 0` is
//!   `InferenceError::DegenerateFit`.
//! - `JᵀJ` is inverted through its symmetric eigendecomposition
//!   (`nalgebra::SymmetricEigen`). Any eigenvalue `≤ EIGEN_EPS·λ_max`, or a
//!   non-finite one, is `InferenceError::SingularCovariance`; no
//!   pseudoinverse is substituted.
//! - The result is symmetrized and checked for finite entries.
//!
//! Invariants & assumptions
//! ------------------------
//! - For a full-rank Jacobian the returned matrix is symmetric and positive
//!   semi-definite (positive definite unless `χ² = 0`).
//! - Standard errors are `sqrt(diag(C))`.
//!
//! Testing notes
//! -------------
//! - Unit tests use hand-computed designs for the exact inverse, and check
//!   degeneracy, singularity, symmetry, and correlations.
use crate::{
    inference::errors::{InferenceError, InferenceResult},
    optimization::least_squares::{EIGEN_EPS, JacobianMatrix, Residuals},
    utils::{symmetrize, to_array2, to_dmatrix},
};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

/// Scaled covariance estimate with fit statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct CovarianceEstimate {
    matrix: Array2<f64>,
    std_errors: Array1<f64>,
    chi2: f64,
    ndof: usize,
}

impl CovarianceEstimate {
    /// Estimate the covariance from the Jacobian and residuals at the optimum.
    ///
    /// Errors
    /// ------
    /// - `DimensionMismatch` if `residuals.len() != jacobian.nrows()`.
    /// - `DegenerateFit` if `n_samples ≤ n_params`.
    /// - `NonFiniteChi2` if `Σ r²` is not finite.
    /// - `SingularCovariance` if `JᵀJ` is rank-deficient at the relative
    ///   floor `EIGEN_EPS`.
    /// - `NonFiniteCovariance` for any NaN/inf entry in the result.
    pub fn from_jacobian(jacobian: &JacobianMatrix, residuals: &Residuals) -> InferenceResult<Self> {
        let (n_samples, n_params) = jacobian.dim();
        if residuals.len() != n_samples {
            return Err(InferenceError::DimensionMismatch {
                what: "residual vector",
                expected: n_samples,
                found: residuals.len(),
            });
        }
        if n_samples <= n_params {
            return Err(InferenceError::DegenerateFit { n_samples, n_params });
        }
        let ndof = n_samples - n_params;
        let chi2 = residuals.dot(residuals);
        if !chi2.is_finite() {
            return Err(InferenceError::NonFiniteChi2 { value: chi2 });
        }

        let inverse = invert_gram(&jacobian.t().dot(jacobian))?;
        let mut matrix = inverse * (chi2 / ndof as f64);
        symmetrize(&mut matrix);
        for ((row, col), &value) in matrix.indexed_iter() {
            if !value.is_finite() {
                return Err(InferenceError::NonFiniteCovariance { row, col, value });
            }
        }
        let std_errors = matrix.diag().mapv(|v| v.max(0.0).sqrt());
        Ok(Self { matrix, std_errors, chi2, ndof })
    }

    /// Covariance matrix, `n_params × n_params`.
    pub fn matrix(&self) -> &Array2<f64> {
        &self.matrix
    }

    pub fn std_errors(&self) -> &Array1<f64> {
        &self.std_errors
    }

    /// `Σ r²` at the optimum.
    pub fn chi2(&self) -> f64 {
        self.chi2
    }

    pub fn ndof(&self) -> usize {
        self.ndof
    }

    /// `χ² / ndof`.
    pub fn reduced_chi2(&self) -> f64 {
        self.chi2 / self.ndof as f64
    }

    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }

    /// Correlation matrix `C_ij / (se_i·se_j)`.
    ///
    /// Rows and columns of parameters with zero standard error are zero
    /// off the diagonal; the diagonal is always one.
    pub fn correlation(&self) -> Array2<f64> {
        let se = &self.std_errors;
        Array2::from_shape_fn(self.matrix.dim(), |(i, j)| {
            if i == j {
                1.0
            } else if se[i] > 0.0 && se[j] > 0.0 {
                self.matrix[[i, j]] / (se[i] * se[j])
            } else {
                0.0
            }
        })
    }
}

/// `(JᵀJ)⁻¹` via symmetric eigendecomposition, refusing rank deficiency.
fn invert_gram(gram: &Array2<f64>) -> InferenceResult<Array2<f64>> {
    let eigen = to_dmatrix(gram).symmetric_eigen();
    let eigenvalues = eigen.eigenvalues;
    let q = eigen.eigenvectors;

    let max_eigenvalue = eigenvalues.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min_eigenvalue = eigenvalues.iter().copied().fold(f64::INFINITY, f64::min);
    let singular = !max_eigenvalue.is_finite()
        || max_eigenvalue <= 0.0
        || eigenvalues.iter().any(|l| !l.is_finite() || *l <= EIGEN_EPS * max_eigenvalue);
    if singular {
        return Err(InferenceError::SingularCovariance { min_eigenvalue, max_eigenvalue });
    }

    let inv_diag = DMatrix::from_diagonal(&eigenvalues.map(|lambda| 1.0 / lambda));
    Ok(to_array2(&(&q * inv_diag * q.transpose())))
}
