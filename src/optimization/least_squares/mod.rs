//! least_squares — argmin-powered bounded nonlinear least squares.
//!
//! Purpose
//! -------
//! Provide a small, Argmin-backed engine for **minimizing weighted sums of
//! squared residuals** under box constraints. Callers implement a single
//! trait, [`LeastSquares`], and invoke [`minimize`] with a starting point,
//! [`Bounds`], and [`FitOptions`].
//!
//! Key behaviors
//! -------------
//! - Bridge user residual functions into Argmin's `Operator`/`Jacobian`
//!   traits via [`adapter::ArgMinAdapter`], validating every value.
//! - Solve with [`BoundedLevenbergMarquardt`], a custom Argmin `Solver`
//!   combining Marquardt scaling, Nielsen damping, projection onto the box,
//!   and active-set pinning.
//! - Fall back to `finitediff` Jacobians when no analytic Jacobian exists
//!   or when [`JacobianMethod::CentralDifference`] is requested.
//! - Return a [`FitOutcome`] whose residuals, Jacobian, and `chi2` are all
//!   evaluated at the reported best parameters.
//!
//! Invariants & assumptions
//! ------------------------
//! - Residual vectors have a fixed length per problem and must be finite;
//!   models express invalid regions with large finite penalties.
//! - All evaluated parameters lie inside the bounds.
//!
//! Conventions
//! -----------
//! - Cost is `½·‖r‖²` internally; the user-facing statistic is
//!   `chi2 = ‖r‖²`.
//! - Jacobians are `n_residuals × n_params`.
//! - Errors bubble up as [`OptResult<T>`]; only `trace!`/`debug!` events are
//!   emitted from here.
//!
//! Testing notes
//! -------------
//! - Solver tests drive [`BoundedLevenbergMarquardt`] through `Executor`
//!   on linear, bounded, Rosenbrock, and no-descent problems.
//! - API tests fit an exponential decay with analytic and finite-difference
//!   Jacobians and check validation and iteration-cap reporting.

pub mod adapter;
pub mod api;
pub mod bounds;
pub mod builders;
pub mod finite_diff;
pub mod run;
pub mod solver;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::api::minimize;
pub use self::bounds::Bounds;
pub use self::solver::BoundedLevenbergMarquardt;
pub use self::traits::{FitOptions, FitOutcome, JacobianMethod, LeastSquares, Tolerances};
pub use self::types::{Cost, EIGEN_EPS, FnEvalMap, Grad, JacobianMatrix, Residuals, Theta};

pub mod prelude {
    pub use super::{
        Bounds, FitOptions, FitOutcome, JacobianMatrix, JacobianMethod, LeastSquares, Residuals,
        Theta, Tolerances, minimize,
    };
}
