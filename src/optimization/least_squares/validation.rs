//! least_squares::validation — option, residual, and Jacobian checks.
//!
//! Purpose
//! -------
//! Keep every "is this value acceptable" rule of the least-squares engine in
//! one place, so adapters and outcome constructors can call a single helper
//! and return a precise [`OptError`].
//!
//! Conventions
//! -----------
//! - Optional tolerances accept `None`; present values must be finite and
//!   strictly positive.
//! - The first offending element is reported with its index.
use crate::optimization::{
    errors::{OptError, OptResult},
    least_squares::types::{JacobianMatrix, Residuals, Theta},
};

/// Validate the optional projected-gradient tolerance.
///
/// # Errors
/// Returns [`OptError::InvalidTolGrad`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate the optional relative cost-reduction tolerance.
///
/// # Errors
/// Returns [`OptError::InvalidTolCost`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate the optional relative step tolerance.
///
/// # Errors
/// Returns [`OptError::InvalidTolStep`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_step(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolStep { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolStep { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate the initial damping factor.
///
/// # Errors
/// Returns [`OptError::InvalidDamping`] if the value is non-finite or ≤ 0.0.
pub fn verify_damping(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::InvalidDamping { value, reason: "Damping must be finite." });
    }
    if value <= 0.0 {
        return Err(OptError::InvalidDamping { value, reason: "Damping must be positive." });
    }
    Ok(())
}

/// Validate that an input parameter vector is finite.
///
/// # Errors
/// Returns [`OptError::InvalidThetaInput`] for the first non-finite entry.
pub fn validate_theta_input(theta: &Theta) -> OptResult<()> {
    for (index, &value) in theta.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidThetaInput { index, value });
        }
    }
    Ok(())
}

/// Validate a residual vector against length and finiteness.
///
/// # Errors
/// - [`OptError::ResidualDimMismatch`] if `residuals.len() != n`.
/// - [`OptError::NonFiniteResidual`] for the first NaN/±∞ element.
pub fn validate_residuals(residuals: &Residuals, n: usize) -> OptResult<()> {
    if residuals.len() != n {
        return Err(OptError::ResidualDimMismatch { expected: n, found: residuals.len() });
    }
    for (index, &value) in residuals.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::NonFiniteResidual { index, value });
        }
    }
    Ok(())
}

/// Validate the shape and entries of a Jacobian.
///
/// # Errors
/// - [`OptError::JacobianDimMismatch`] if the shape is not `(n, dim)`.
/// - [`OptError::InvalidJacobian`] for the first non-finite entry.
pub fn validate_jacobian(jacobian: &JacobianMatrix, n: usize, dim: usize) -> OptResult<()> {
    if jacobian.dim() != (n, dim) {
        return Err(OptError::JacobianDimMismatch { expected: (n, dim), found: jacobian.dim() });
    }
    for ((row, col), &value) in jacobian.indexed_iter() {
        if !value.is_finite() {
            return Err(OptError::InvalidJacobian { row, col, value });
        }
    }
    Ok(())
}

/// Validate and unwrap an estimated parameter vector (`theta_hat`).
///
/// # Errors
/// - [`OptError::MissingThetaHat`] if no vector was provided.
/// - [`OptError::InvalidThetaHat`] if any element is non-finite.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    match theta_hat {
        Some(t) => {
            for (index, &value) in t.iter().enumerate() {
                if !value.is_finite() {
                    return Err(OptError::InvalidThetaHat {
                        index,
                        value,
                        reason: "Parameter estimates must be finite.",
                    });
                }
            }
            Ok(t)
        }
        None => Err(OptError::MissingThetaHat),
    }
}

/// Validate that a scalar cost is finite.
///
/// # Errors
/// Returns [`OptError::NonFiniteCost`] if the value is `NaN` or infinite.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}
