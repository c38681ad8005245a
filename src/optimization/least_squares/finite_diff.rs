//! least_squares::finite_diff — finite-difference Jacobians of residuals.
//!
//! Purpose
//! -------
//! Approximate `∂r/∂θ` when a problem has no analytic Jacobian or the caller
//! asks for finite differences, without exposing the `finitediff` API to the
//! rest of the optimizer.
//!
//! Key behaviors
//! -------------
//! - [`compute_jacobian`] tries central differences first and falls back to
//!   forward differences when the central result fails validation.
//! - Errors raised by the residual closure are captured in a shared cell
//!   (the `finitediff` closure cannot return `Result`) and surfaced after the
//!   difference routine returns.
//! - [`orient_jacobian`] returns the matrix as `n_residuals × n_params`
//!   whichever way the backend stacked the partial derivatives.
//!
//! Invariants & assumptions
//! ------------------------
//! - Jacobians returned from this module satisfy `validate_jacobian`.
//! - A failing residual evaluation is a hard error; it is not retried.
//!
//! Testing notes
//! -------------
//! - Unit tests cover a linear map (exact), error capture, and orientation
//!   of square and rectangular inputs.
use crate::optimization::{
    errors::{OptError, OptResult},
    least_squares::{
        types::{JacobianMatrix, Residuals, Theta},
        validation::validate_jacobian,
    },
};
use argmin::core::Error;
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// Finite-difference Jacobian of `func` at `theta`.
///
/// Parameters
/// ----------
/// - `theta`: point of evaluation; its length is the parameter count.
/// - `n`: residual length.
/// - `func`: residual map, routing any failure into `closure_err` and
///   returning a NaN-filled vector in that case.
/// - `closure_err`: error slot shared with `func`; cleared on entry.
///
/// Errors
/// ------
/// - The first error captured from `func`.
/// - `OptError::JacobianDimMismatch` / `OptError::InvalidJacobian` when
///   neither the central nor the forward approximation validates.
pub fn compute_jacobian<G: Fn(&Theta) -> Residuals>(
    theta: &Theta, n: usize, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<JacobianMatrix> {
    closure_err.replace(None);
    let central = theta.central_jacobian(func);
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    let central = orient_jacobian(central, n, theta.len())?;
    if validate_jacobian(&central, n, theta.len()).is_ok() {
        return Ok(central);
    }

    let forward = theta.forward_jacobian(func);
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    let forward = orient_jacobian(forward, n, theta.len())?;
    validate_jacobian(&forward, n, theta.len())?;
    Ok(forward)
}

/// Return `raw` as `n × dim`, transposing a `dim × n` layout.
///
/// The `ndarray` backend of `finitediff` already returns `n × dim`; a square
/// matrix is taken as-is.
///
/// # Errors
/// Returns `OptError::JacobianDimMismatch` for any other shape.
pub fn orient_jacobian(raw: JacobianMatrix, n: usize, dim: usize) -> OptResult<JacobianMatrix> {
    let found = raw.dim();
    if found == (n, dim) {
        Ok(raw)
    } else if found == (dim, n) {
        Ok(raw.reversed_axes())
    } else {
        Err(OptError::JacobianDimMismatch { expected: (n, dim), found })
    }
}
