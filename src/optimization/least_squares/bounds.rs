//! least_squares::bounds — box constraints `lower ≤ θ ≤ upper`.
//!
//! Purpose
//! -------
//! Represent per-parameter box constraints and the geometric operations the
//! bounded solver needs: projection onto the box, detection of the active
//! set, and the projected-gradient stationarity measure.
//!
//! Key behaviors
//! -------------
//! - [`Bounds::new`] validates ordering and rejects NaN limits; infinite
//!   limits are allowed on either side.
//! - [`Bounds::project`] clamps a point into the box component-wise.
//! - [`Bounds::active_set`] marks components sitting on a bound while the
//!   cost gradient points out of the box; the solver pins them for a step.
//! - [`Bounds::projected_gradient_norm`] is `‖P(θ − g) − θ‖∞`, zero exactly
//!   at a first-order stationary point of the bounded problem.
//!
//! Invariants & assumptions
//! ------------------------
//! - `lower[k] ≤ upper[k]` for every `k` and both vectors share a length.
//! - A component counts as "on a bound" within [`BOUND_EPS`] (absolute).
use crate::optimization::{
    errors::{OptError, OptResult},
    least_squares::types::{Grad, Theta},
};
use ndarray::{Array1, Zip};

/// Absolute slack used when deciding that a component sits on a bound.
pub const BOUND_EPS: f64 = 1e-12;

/// Per-parameter box constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    lower: Theta,
    upper: Theta,
}

impl Bounds {
    /// Construct validated bounds.
    ///
    /// # Errors
    /// - [`OptError::BoundsLengthMismatch`] if the vectors differ in length.
    /// - [`OptError::InvalidBounds`] if a limit is NaN or `lower > upper`.
    pub fn new(lower: Theta, upper: Theta) -> OptResult<Self> {
        if lower.len() != upper.len() {
            return Err(OptError::BoundsLengthMismatch {
                expected: lower.len(),
                found: upper.len(),
            });
        }
        for (index, (&lo, &hi)) in lower.iter().zip(upper.iter()).enumerate() {
            if lo.is_nan() || hi.is_nan() || lo > hi {
                return Err(OptError::InvalidBounds { index, lower: lo, upper: hi });
            }
        }
        Ok(Self { lower, upper })
    }

    /// Bounds that constrain nothing.
    pub fn unbounded(dim: usize) -> Self {
        Self {
            lower: Array1::from_elem(dim, f64::NEG_INFINITY),
            upper: Array1::from_elem(dim, f64::INFINITY),
        }
    }

    pub fn len(&self) -> usize {
        self.lower.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    pub fn lower(&self) -> &Theta {
        &self.lower
    }

    pub fn upper(&self) -> &Theta {
        &self.upper
    }

    /// Check that `theta` has the same dimension as the bounds.
    ///
    /// # Errors
    /// Returns [`OptError::BoundsLengthMismatch`] otherwise.
    pub fn check_dim(&self, theta: &Theta) -> OptResult<()> {
        if theta.len() != self.len() {
            return Err(OptError::BoundsLengthMismatch { expected: theta.len(), found: self.len() });
        }
        Ok(())
    }

    /// Clamp `theta` into the box.
    pub fn project(&self, theta: &Theta) -> Theta {
        Zip::from(theta)
            .and(&self.lower)
            .and(&self.upper)
            .map_collect(|&x, &lo, &hi| x.clamp(lo, hi))
    }

    /// `true` if every component lies inside the box.
    pub fn contains(&self, theta: &Theta) -> bool {
        Zip::from(theta).and(&self.lower).and(&self.upper).all(|&x, &lo, &hi| lo <= x && x <= hi)
    }

    /// Components at a bound whose descent direction `-grad` leaves the box.
    pub fn active_set(&self, theta: &Theta, grad: &Grad) -> Vec<bool> {
        theta
            .iter()
            .zip(grad.iter())
            .zip(self.lower.iter().zip(self.upper.iter()))
            .map(|((&x, &g), (&lo, &hi))| {
                (x <= lo + BOUND_EPS && g > 0.0) || (x >= hi - BOUND_EPS && g < 0.0)
            })
            .collect()
    }

    /// Infinity norm of the projected gradient step `P(θ − g) − θ`.
    pub fn projected_gradient_norm(&self, theta: &Theta, grad: &Grad) -> f64 {
        let moved = self.project(&(theta - grad));
        (&moved - theta).iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
    }
}
