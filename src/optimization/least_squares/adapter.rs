//! least_squares::adapter — bridge from [`LeastSquares`] to Argmin.
//!
//! Purpose
//! -------
//! Expose a user least-squares problem to Argmin as an `Operator` (residuals)
//! and a `Jacobian`, validating every value that crosses the boundary.
//!
//! Key behaviors
//! -------------
//! - [`ArgMinAdapter::residuals_at`] and [`ArgMinAdapter::jacobian_at`] are
//!   the `OptResult` entry points; the Argmin trait impls forward to them.
//! - The Jacobian comes from [`LeastSquares::jacobian`] unless the options
//!   select finite differences or the problem does not implement one.
//!
//! Invariants & assumptions
//! ------------------------
//! - Residuals returned to the solver have length `n_residuals` and are
//!   finite; Jacobians are `n_residuals × θ.len()` and finite.
use crate::optimization::{
    errors::{OptError, OptResult},
    least_squares::{
        finite_diff::compute_jacobian,
        traits::{JacobianMethod, LeastSquares},
        types::{JacobianMatrix, Residuals, Theta},
        validation::{validate_jacobian, validate_residuals},
    },
};
use argmin::core::{Error, Jacobian, Operator};
use ndarray::Array1;
use std::cell::RefCell;

/// Bridges a user `LeastSquares` problem to `argmin`'s `Operator` and
/// `Jacobian` traits.
#[derive(Debug)]
pub struct ArgMinAdapter<'a, F: LeastSquares> {
    pub f: &'a F,
    pub data: &'a F::Data,
    pub method: JacobianMethod,
}

// Manual impl: `derive(Clone)` would demand `F: Clone`.
impl<'a, F: LeastSquares> Clone for ArgMinAdapter<'a, F> {
    fn clone(&self) -> Self {
        Self { f: self.f, data: self.data, method: self.method }
    }
}

impl<'a, F: LeastSquares> ArgMinAdapter<'a, F> {
    /// Construct a new adapter over a user problem and its data.
    pub fn new(f: &'a F, data: &'a F::Data, method: JacobianMethod) -> Self {
        Self { f, data, method }
    }

    pub fn n_residuals(&self) -> usize {
        self.f.n_residuals(self.data)
    }

    /// Validated residuals at `theta`.
    ///
    /// # Errors
    /// Propagates user errors, plus `ResidualDimMismatch` /
    /// `NonFiniteResidual` from validation.
    pub fn residuals_at(&self, theta: &Theta) -> OptResult<Residuals> {
        let r = self.f.residuals(theta, self.data)?;
        validate_residuals(&r, self.n_residuals())?;
        Ok(r)
    }

    /// Validated Jacobian at `theta`.
    ///
    /// Behavior:
    /// - `Analytic`: use the problem's Jacobian; on
    ///   `OptError::JacobianNotImplemented` fall back to finite differences.
    /// - `CentralDifference`: always use finite differences.
    ///
    /// # Errors
    /// Propagates user errors other than `JacobianNotImplemented`, errors
    /// from residual evaluations during differencing, and validation errors.
    pub fn jacobian_at(&self, theta: &Theta) -> OptResult<JacobianMatrix> {
        let n = self.n_residuals();
        if self.method == JacobianMethod::Analytic {
            match self.f.jacobian(theta, self.data) {
                Ok(j) => {
                    validate_jacobian(&j, n, theta.len())?;
                    return Ok(j);
                }
                Err(OptError::JacobianNotImplemented) => {}
                Err(e) => return Err(e),
            }
        }
        self.finite_difference_jacobian(theta, n)
    }

    fn finite_difference_jacobian(&self, theta: &Theta, n: usize) -> OptResult<JacobianMatrix> {
        let closure_err: RefCell<Option<Error>> = RefCell::new(None);
        let residual_fn = |theta: &Theta| -> Residuals {
            match self.f.residuals(theta, self.data) {
                Ok(r) => r,
                Err(e) => {
                    let mut slot = closure_err.borrow_mut();
                    if slot.is_none() {
                        *slot = Some(e.into());
                    }
                    Array1::from_elem(n, f64::NAN)
                }
            }
        };
        compute_jacobian(theta, n, &residual_fn, &closure_err)
    }
}

impl<'a, F: LeastSquares> Operator for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Residuals;

    fn apply(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        Ok(self.residuals_at(theta)?)
    }
}

impl<'a, F: LeastSquares> Jacobian for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Jacobian = JacobianMatrix;

    fn jacobian(&self, theta: &Self::Param) -> Result<Self::Jacobian, Error> {
        Ok(self.jacobian_at(theta)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Residual validation at the Argmin boundary.
    // - Analytic Jacobian use, finite-difference fallback, and forced
    //   finite differences.
    // -------------------------------------------------------------------------

    /// `r = (t0 - 1, 2·t1 - t0, t1²)`; analytic Jacobian only when `analytic`.
    struct Toy {
        analytic: bool,
    }

    impl LeastSquares for Toy {
        type Data = ();

        fn residuals(&self, t: &Theta, _: &()) -> OptResult<Residuals> {
            Ok(array![t[0] - 1.0, 2.0 * t[1] - t[0], t[1] * t[1]])
        }
        fn n_residuals(&self, _: &()) -> usize {
            3
        }
        fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
            Ok(())
        }
        fn jacobian(&self, t: &Theta, _: &()) -> OptResult<JacobianMatrix> {
            if self.analytic {
                Ok(array![[1.0, 0.0], [-1.0, 2.0], [0.0, 2.0 * t[1]]])
            } else {
                Err(OptError::JacobianNotImplemented)
            }
        }
    }

    /// Returns a NaN residual whenever `t0 < 0`.
    struct NanBelowZero;

    impl LeastSquares for NanBelowZero {
        type Data = ();

        fn residuals(&self, t: &Theta, _: &()) -> OptResult<Residuals> {
            Ok(array![if t[0] < 0.0 { f64::NAN } else { t[0] }])
        }
        fn n_residuals(&self, _: &()) -> usize {
            1
        }
        fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
            Ok(())
        }
    }

    #[test]
    // Purpose
    // -------
    // Finite-difference fallback and forced finite differences both agree
    // with the analytic Jacobian.
    fn jacobian_sources_agree() {
        // Arrange
        let theta = array![0.3, 1.7];
        let analytic = Toy { analytic: true };
        let missing = Toy { analytic: false };

        // Act
        let exact = ArgMinAdapter::new(&analytic, &(), JacobianMethod::Analytic)
            .jacobian_at(&theta)
            .unwrap();
        let fallback = ArgMinAdapter::new(&missing, &(), JacobianMethod::Analytic)
            .jacobian_at(&theta)
            .unwrap();
        let forced = ArgMinAdapter::new(&analytic, &(), JacobianMethod::CentralDifference)
            .jacobian_at(&theta)
            .unwrap();

        // Assert
        assert_eq!(exact.dim(), (3, 2));
        for other in [&fallback, &forced] {
            for (a, b) in exact.iter().zip(other.iter()) {
                assert_relative_eq!(*a, *b, epsilon = 1e-6);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Non-finite residuals are reported as `NonFiniteResidual`, both
    // directly and through the Argmin `Operator` impl.
    fn non_finite_residuals_are_rejected() {
        let adapter = ArgMinAdapter::new(&NanBelowZero, &(), JacobianMethod::Analytic);

        assert!(matches!(
            adapter.residuals_at(&array![-1.0]),
            Err(OptError::NonFiniteResidual { index: 0, .. })
        ));
        let via_argmin = adapter.apply(&array![-1.0]).unwrap_err();
        assert!(matches!(OptError::from(via_argmin), OptError::NonFiniteResidual { .. }));
        let j = adapter.jacobian_at(&array![2.0]).unwrap();
        assert_eq!(j.dim(), (1, 1));
        assert_relative_eq!(j[[0, 0]], 1.0, epsilon = 1e-8);
    }
}
