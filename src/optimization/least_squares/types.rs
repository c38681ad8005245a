//! least_squares::types — shared numeric aliases and solver defaults.
//!
//! Purpose
//! -------
//! Centralize the numeric types used by the bounded least-squares engine so
//! the rest of the optimization code stays agnostic to `ndarray` and Argmin
//! generics.
//!
//! Key behaviors
//! -------------
//! - Define canonical aliases for parameter vectors, gradients, residual
//!   vectors, Jacobians, and scalar costs (`Theta`, `Grad`, `Residuals`,
//!   `JacobianMatrix`, `Cost`).
//! - Provide the Argmin state alias used by the solver ([`LmState`]) and the
//!   map type for function-evaluation counters ([`FnEvalMap`]).
//! - Hold the default stopping rules and damping constants.
//!
//! Invariants & assumptions
//! ------------------------
//! - `Cost` is always `½·Σ rᵢ²`; the χ² statistic reported to users is
//!   `2·Cost`.
//! - `JacobianMatrix` is `n_residuals × n_params`, row `i` holding
//!   `∂rᵢ/∂θ`.
//!
//! Testing notes
//! -------------
//! - Aliases and constants only; exercised by the surrounding solver tests.
use argmin::core::IterState;
use ndarray::{Array1, Array2};
use std::collections::HashMap;

/// Parameter vector `θ`.
pub type Theta = Array1<f64>;

/// Gradient of the cost, `Jᵀr`.
pub type Grad = Array1<f64>;

/// Weighted residual vector `r(θ)`.
pub type Residuals = Array1<f64>;

/// Dense Jacobian `∂r/∂θ`, `n_residuals × n_params`.
pub type JacobianMatrix = Array2<f64>;

/// Scalar objective `½·‖r‖²`.
pub type Cost = f64;

/// Function-evaluation counters reported by Argmin (e.g. `operator_count`,
/// `jacobian_count`).
pub type FnEvalMap = HashMap<String, u64>;

/// Argmin iteration state carried by the bounded Levenberg–Marquardt solver.
pub type LmState = IterState<Theta, Grad, (), (), (), f64>;

/// Default projected-gradient tolerance.
pub const DEFAULT_TOL_GRAD: f64 = 1e-10;

/// Default relative cost-reduction tolerance.
pub const DEFAULT_TOL_COST: f64 = 1e-10;

/// Default relative step tolerance.
pub const DEFAULT_TOL_STEP: f64 = 1e-10;

/// Default iteration cap.
pub const DEFAULT_MAX_ITER: usize = 1000;

/// Default initial damping `λ₀` relative to the Marquardt scaling.
pub const DEFAULT_INITIAL_DAMPING: f64 = 1e-3;

/// Damping above which the solver gives up on finding a descent step.
pub const MAX_DAMPING: f64 = 1e32;

/// Floor for the Marquardt scaling diagonal, so parameters with a vanishing
/// Jacobian column still receive damping.
pub const MIN_SCALE: f64 = 1e-12;

/// Relative eigenvalue floor used when inverting `JᵀJ`.
pub const EIGEN_EPS: f64 = 1e-12;
