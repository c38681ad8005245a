//! optimization — bounded least-squares engine and unified error surface.
//!
//! Purpose
//! -------
//! Provide the fitting layer of the crate: an Argmin-backed bounded
//! Levenberg–Marquardt solver for weighted residual problems, plus a single
//! error/result surface for configuration, numerical, and backend failures.
//!
//! Key behaviors
//! -------------
//! - Expose [`least_squares::minimize`] and the [`least_squares::LeastSquares`]
//!   trait that models implement.
//! - Normalize option validation, non-finite residuals, Jacobian problems,
//!   and Argmin errors into [`errors::OptError`] with the alias
//!   [`errors::OptResult`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Invalid inputs are reported as `OptError`, never as panics.
//! - Argmin errors that wrap an `OptError` raised by a model are unwrapped
//!   back to the original variant.
//!
//! Downstream usage
//! ----------------
//! - `model::GaussianPeakModel` implements `LeastSquares`.
//! - `pipeline` calls `minimize` and hands the `FitOutcome` to `inference`.

pub mod errors;
pub mod least_squares;

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::least_squares::prelude::*;
}
