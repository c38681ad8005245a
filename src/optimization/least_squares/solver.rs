//! least_squares::solver — bounded Levenberg–Marquardt as an Argmin solver.
//!
//! Purpose
//! -------
//! Minimize `c(θ) = ½·‖r(θ)‖²` subject to `lower ≤ θ ≤ upper` using a
//! damped Gauss–Newton iteration that Argmin's `Executor` can drive,
//! observe, and cap.
//!
//! Key behaviors
//! -------------
//! - Each iteration solves
//!   `(JᵀJ + λ·diag(D)) δ = -Jᵀr` by Cholesky, with `D` the running maximum
//!   of `diag(JᵀJ)` (Marquardt scaling, floored at `MIN_SCALE`).
//! - Components on a bound whose descent direction leaves the box (the
//!   active set) are pinned for the step: their rows and columns are
//!   replaced by the identity and their right-hand side by zero.
//! - The trial point `P(θ + δ)` is projected onto the box and accepted when
//!   the gain ratio `ρ = (c(θ) − c(θ'))/pred` is positive; damping follows
//!   Nielsen's rule `λ ← λ·max(1/3, 1 − (2ρ − 1)³)` on acceptance and
//!   `λ ← λ·ν, ν ← 2ν` on rejection.
//!
//! Stopping rules
//! --------------
//! - Converged: cost exactly zero; projected-gradient ∞-norm `≤ tol_grad`;
//!   an accepted step with relative actual and predicted reduction
//!   `≤ tol_cost`; step norm `≤ tol_step·(tol_step + ‖θ‖)`.
//! - Not converged: damping above `MAX_DAMPING` (`SolverExit`); the
//!   Executor's `max_iters` cap.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every parameter handed to the problem lies inside the box.
//! - The Argmin state's `param`/`cost` always describe the last accepted
//!   iterate; rejected trials leave the state untouched.
//!
//! Testing notes
//! -------------
//! - Unit tests run the solver through `Executor` on a linear problem
//!   (unbounded and with an active bound) and on the Rosenbrock residual
//!   form, and check the damping-overflow exit.
use crate::optimization::{
    errors::OptResult,
    least_squares::{
        bounds::Bounds,
        types::{
            Cost, DEFAULT_INITIAL_DAMPING, DEFAULT_TOL_COST, DEFAULT_TOL_GRAD, DEFAULT_TOL_STEP,
            Grad, JacobianMatrix, LmState, MAX_DAMPING, MIN_SCALE, Residuals, Theta,
        },
        validation::{verify_damping, verify_tol_cost, verify_tol_grad, verify_tol_step},
    },
};
use argmin::core::{
    ArgminError, Error, Jacobian, KV, Operator, Problem, Solver, State, TerminationReason,
};
use argmin_math::ArgminL2Norm;
use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2};

/// Accepted iterate cached between `next_iter` calls.
#[derive(Debug, Clone)]
struct Iterate {
    theta: Theta,
    residuals: Residuals,
    jacobian: JacobianMatrix,
    cost: Cost,
}

/// Bounded Levenberg–Marquardt solver.
///
/// Built with [`BoundedLevenbergMarquardt::new`] and configured with the
/// `with_*` methods, which validate their inputs.
#[derive(Debug, Clone)]
pub struct BoundedLevenbergMarquardt {
    bounds: Bounds,
    tol_grad: Option<f64>,
    tol_cost: Option<f64>,
    tol_step: Option<f64>,
    initial_damping: f64,
    damping: f64,
    growth: f64,
    scale: Array1<f64>,
    current: Option<Iterate>,
}

impl BoundedLevenbergMarquardt {
    /// Solver over `bounds` with default tolerances and damping.
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            tol_grad: Some(DEFAULT_TOL_GRAD),
            tol_cost: Some(DEFAULT_TOL_COST),
            tol_step: Some(DEFAULT_TOL_STEP),
            initial_damping: DEFAULT_INITIAL_DAMPING,
            damping: DEFAULT_INITIAL_DAMPING,
            growth: 2.0,
            scale: Array1::zeros(0),
            current: None,
        }
    }

    /// Projected-gradient tolerance; `None` disables the rule.
    pub fn with_tolerance_grad(mut self, tol: Option<f64>) -> OptResult<Self> {
        verify_tol_grad(tol)?;
        self.tol_grad = tol;
        Ok(self)
    }

    /// Relative cost-reduction tolerance; `None` disables the rule.
    pub fn with_tolerance_cost(mut self, tol: Option<f64>) -> OptResult<Self> {
        verify_tol_cost(tol)?;
        self.tol_cost = tol;
        Ok(self)
    }

    /// Relative step tolerance; `None` disables the rule.
    pub fn with_tolerance_step(mut self, tol: Option<f64>) -> OptResult<Self> {
        verify_tol_step(tol)?;
        self.tol_step = tol;
        Ok(self)
    }

    /// Initial damping `λ₀`, relative to the scaling diagonal.
    pub fn with_initial_damping(mut self, value: f64) -> OptResult<Self> {
        verify_damping(value)?;
        self.initial_damping = value;
        self.damping = value;
        Ok(self)
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Current damping factor `λ`.
    pub fn damping(&self) -> f64 {
        self.damping
    }

    fn reject_step(&mut self) {
        self.damping *= self.growth;
        self.growth *= 2.0;
    }
}

impl<O> Solver<O, LmState> for BoundedLevenbergMarquardt
where
    O: Operator<Param = Theta, Output = Residuals> + Jacobian<Param = Theta, Jacobian = JacobianMatrix>,
{
    const NAME: &'static str = "Bounded Levenberg-Marquardt";

    fn init(
        &mut self, problem: &mut Problem<O>, state: LmState,
    ) -> Result<(LmState, Option<KV>), Error> {
        let theta0 = state.get_param().ok_or_else(|| ArgminError::NotInitialized {
            text: "Bounded Levenberg-Marquardt requires an initial parameter vector.".to_string(),
        })?;
        let theta = self.bounds.project(theta0);
        let residuals = problem.apply(&theta)?;
        let jacobian = problem.jacobian(&theta)?;
        let cost = half_sum_squares(&residuals);
        let grad = jacobian.t().dot(&residuals);

        self.scale = jacobian.map_axis(ndarray::Axis(0), |col| col.dot(&col).max(MIN_SCALE));
        self.damping = self.initial_damping;
        self.growth = 2.0;
        self.current = Some(Iterate { theta: theta.clone(), residuals, jacobian, cost });

        Ok((state.param(theta).cost(cost).gradient(grad), None))
    }

    fn next_iter(
        &mut self, problem: &mut Problem<O>, state: LmState,
    ) -> Result<(LmState, Option<KV>), Error> {
        let current = self.current.take().ok_or_else(|| ArgminError::NotInitialized {
            text: "Bounded Levenberg-Marquardt was not initialized.".to_string(),
        })?;

        if current.cost == 0.0 {
            self.current = Some(current);
            return Ok((state.terminate_with(TerminationReason::SolverConverged), None));
        }

        let gram = current.jacobian.t().dot(&current.jacobian);
        let grad = current.jacobian.t().dot(&current.residuals);
        let grad_norm = self.bounds.projected_gradient_norm(&current.theta, &grad);
        if self.tol_grad.is_some_and(|tol| grad_norm <= tol) {
            self.current = Some(current);
            return Ok((state.terminate_with(TerminationReason::SolverConverged), None));
        }

        for (s, &d) in self.scale.iter_mut().zip(gram.diag().iter()) {
            *s = s.max(d);
        }
        let active = self.bounds.active_set(&current.theta, &grad);

        let Some(raw_step) = solve_damped(&gram, &grad, &self.scale, self.damping, &active) else {
            self.reject_step();
            self.current = Some(current);
            return Ok((damping_guard(self.damping, state), None));
        };
        let candidate = self.bounds.project(&(&current.theta + &raw_step));
        let step = &candidate - &current.theta;

        let step_norm = step.l2_norm();
        let theta_norm = current.theta.l2_norm();
        if self.tol_step.is_some_and(|tol| step_norm <= tol * (tol + theta_norm)) {
            self.current = Some(current);
            return Ok((state.terminate_with(TerminationReason::SolverConverged), None));
        }

        let residuals = problem.apply(&candidate)?;
        let cost = half_sum_squares(&residuals);
        let predicted = -(grad.dot(&step) + 0.5 * step.dot(&gram.dot(&step)));
        let actual = current.cost - cost;
        let rho = if predicted > 0.0 && cost.is_finite() { actual / predicted } else { -1.0 };

        tracing::trace!(
            iter = state.get_iter(),
            cost = current.cost,
            trial_cost = cost,
            damping = self.damping,
            rho,
            "levenberg-marquardt step"
        );

        if rho <= 0.0 {
            self.reject_step();
            self.current = Some(current);
            return Ok((damping_guard(self.damping, state), None));
        }

        let jacobian = problem.jacobian(&candidate)?;
        let new_grad = jacobian.t().dot(&residuals);
        self.damping *= (1.0 - (2.0 * rho - 1.0).powi(3)).max(1.0 / 3.0);
        self.growth = 2.0;
        let small_reduction = self
            .tol_cost
            .is_some_and(|tol| actual <= tol * current.cost && predicted <= tol * current.cost);

        self.current =
            Some(Iterate { theta: candidate.clone(), residuals, jacobian, cost });
        let state = state.param(candidate).cost(cost).gradient(new_grad);
        if small_reduction {
            return Ok((state.terminate_with(TerminationReason::SolverConverged), None));
        }
        Ok((state, None))
    }
}

/// `½·Σ rᵢ²`.
pub fn half_sum_squares(residuals: &Residuals) -> Cost {
    0.5 * residuals.dot(residuals)
}

/// Terminate without convergence once damping has blown up.
fn damping_guard(damping: f64, state: LmState) -> LmState {
    if damping > MAX_DAMPING || !damping.is_finite() {
        state.terminate_with(TerminationReason::SolverExit(
            "Damping exceeded its limit without finding a descent step".to_string(),
        ))
    } else {
        state
    }
}

/// Solve the damped normal equations with active components pinned.
///
/// Returns `None` if the system is not positive definite or the solution
/// is not finite.
fn solve_damped(
    gram: &Array2<f64>, grad: &Grad, scale: &Array1<f64>, damping: f64, active: &[bool],
) -> Option<Array1<f64>> {
    let p = grad.len();
    let mut a = DMatrix::<f64>::zeros(p, p);
    let mut b = DVector::<f64>::zeros(p);
    for i in 0..p {
        if active[i] {
            a[(i, i)] = 1.0;
            continue;
        }
        b[i] = -grad[i];
        for j in 0..p {
            if !active[j] {
                a[(i, j)] = gram[[i, j]];
            }
        }
        a[(i, i)] += damping * scale[i];
    }
    let delta = a.cholesky()?.solve(&b);
    if delta.iter().all(|v| v.is_finite()) {
        Some(delta.iter().copied().collect())
    } else {
        None
    }
}
