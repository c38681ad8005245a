//! least_squares::api — the `minimize` entry point.
use crate::optimization::{
    errors::{OptError, OptResult},
    least_squares::{
        adapter::ArgMinAdapter,
        bounds::Bounds,
        builders::build_bounded_lm,
        run::run_bounded_lm,
        traits::{FitOptions, FitOutcome, LeastSquares},
        types::Theta,
        validation::validate_theta_input,
    },
};

/// Minimize `½·‖r(θ)‖²` for a user least-squares problem inside `bounds`.
///
/// Steps:
/// - Validate `theta0` (finite, same length as `bounds`) and run
///   [`LeastSquares::check`].
/// - Project `theta0` into the box.
/// - Build the bounded solver from `opts` and execute it through Argmin.
///
/// # Errors
/// - [`OptError::EmptyProblem`] if the problem has no residuals.
/// - [`OptError::BoundsLengthMismatch`] / [`OptError::InvalidThetaInput`]
///   for a malformed `theta0`.
/// - Anything returned by `check`, the residual function, the Jacobian, or
///   the solver.
pub fn minimize<F: LeastSquares>(
    f: &F, theta0: Theta, bounds: Bounds, data: &F::Data, opts: &FitOptions,
) -> OptResult<FitOutcome> {
    if f.n_residuals(data) == 0 {
        return Err(OptError::EmptyProblem);
    }
    bounds.check_dim(&theta0)?;
    validate_theta_input(&theta0)?;
    let theta0 = bounds.project(&theta0);
    f.check(&theta0, data)?;

    let problem = ArgMinAdapter::new(f, data, opts.jacobian);
    let solver = build_bounded_lm(opts, bounds)?;
    run_bounded_lm(theta0, opts, problem, solver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::least_squares::types::{JacobianMatrix, Residuals};
    use approx::assert_relative_eq;
    use ndarray::{Array1, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - End-to-end exponential-decay fit with and without analytic Jacobian.
    // - Input validation before the solver runs.
    // - Non-convergence reporting under a tight iteration cap.
    // -------------------------------------------------------------------------

    /// `y = a·exp(-k·t)` sampled on a fixed grid, unit weights.
    struct Decay {
        analytic: bool,
    }

    struct DecayData {
        t: Array1<f64>,
        y: Array1<f64>,
    }

    impl DecayData {
        fn exact(a: f64, k: f64) -> Self {
            let t = Array1::linspace(0.0, 4.0, 21);
            let y = t.mapv(|ti| a * (-k * ti).exp());
            Self { t, y }
        }
    }

    impl LeastSquares for Decay {
        type Data = DecayData;

        fn residuals(&self, th: &Theta, d: &DecayData) -> OptResult<Residuals> {
            Ok(&d.y - &d.t.mapv(|ti| th[0] * (-th[1] * ti).exp()))
        }
        fn n_residuals(&self, d: &DecayData) -> usize {
            d.t.len()
        }
        fn check(&self, th: &Theta, _: &DecayData) -> OptResult<()> {
            if th.len() != 2 {
                return Err(OptError::ThetaLengthMismatch { expected: 2, actual: th.len() });
            }
            Ok(())
        }
        fn jacobian(&self, th: &Theta, d: &DecayData) -> OptResult<JacobianMatrix> {
            if !self.analytic {
                return Err(OptError::JacobianNotImplemented);
            }
            let mut j = JacobianMatrix::zeros((d.t.len(), 2));
            for (i, &ti) in d.t.iter().enumerate() {
                let e = (-th[1] * ti).exp();
                j[[i, 0]] = -e;
                j[[i, 1]] = th[0] * ti * e;
            }
            Ok(j)
        }
    }

    fn positive_bounds() -> Bounds {
        Bounds::new(array![0.0, 0.0], array![f64::INFINITY, 10.0]).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Noise-free data are fitted exactly whichever Jacobian source is used.
    fn minimize_recovers_noise_free_decay() {
        let data = DecayData::exact(3.0, 0.7);
        for analytic in [true, false] {
            // Act
            let out = minimize(
                &Decay { analytic },
                array![1.0, 2.0],
                positive_bounds(),
                &data,
                &FitOptions::default(),
            )
            .unwrap();

            // Assert
            assert!(out.converged, "status: {}", out.status);
            assert_relative_eq!(out.theta_hat[0], 3.0, max_relative = 1e-6);
            assert_relative_eq!(out.theta_hat[1], 0.7, max_relative = 1e-6);
            assert!(out.chi2 < 1e-12);
            assert_eq!(out.jacobian.dim(), (21, 2));
        }
    }

    #[test]
    // Purpose
    // -------
    // Malformed inputs fail before any solver iteration; a start outside
    // the box is projected rather than rejected.
    fn minimize_validates_inputs() {
        let data = DecayData::exact(3.0, 0.7);
        let model = Decay { analytic: true };
        let opts = FitOptions::default();

        assert!(matches!(
            minimize(&model, array![1.0, 2.0, 3.0], positive_bounds(), &data, &opts),
            Err(OptError::BoundsLengthMismatch { .. })
        ));
        assert!(matches!(
            minimize(&model, array![f64::NAN, 2.0], positive_bounds(), &data, &opts),
            Err(OptError::InvalidThetaInput { index: 0, .. })
        ));
        let empty = DecayData { t: Array1::zeros(0), y: Array1::zeros(0) };
        assert_eq!(
            minimize(&model, array![1.0, 1.0], positive_bounds(), &empty, &opts),
            Err(OptError::EmptyProblem)
        );
        let out = minimize(&model, array![-5.0, 20.0], positive_bounds(), &data, &opts).unwrap();
        assert!(positive_bounds().contains(&out.theta_hat));
    }

    #[test]
    // Purpose
    // -------
    // Hitting the iteration cap is reported as not converged, not as an
    // error.
    fn iteration_cap_is_not_convergence() {
        let data = DecayData::exact(3.0, 0.7);
        let mut opts = FitOptions::default();
        opts.tols.max_iter = Some(1);

        let out =
            minimize(&Decay { analytic: true }, array![0.1, 5.0], positive_bounds(), &data, &opts)
                .unwrap();

        assert!(!out.converged);
        assert_eq!(out.iterations, 1);
        assert!(out.status.contains("MaxIters"));
    }
}
