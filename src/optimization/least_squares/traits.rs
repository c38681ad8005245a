//! least_squares::traits — problem trait, options, and fit outcome.
//!
//! Purpose
//! -------
//! Define the user-facing surface of the least-squares engine: the
//! [`LeastSquares`] trait implemented by models, the [`FitOptions`] and
//! [`Tolerances`] configuration, the [`JacobianMethod`] switch, and the
//! validated [`FitOutcome`] returned by `minimize`.
//!
//! Key behaviors
//! -------------
//! - Models return weighted residuals `r(θ)`; the engine minimizes
//!   `½·‖r‖²`.
//! - An analytic Jacobian is optional; without one the engine uses central
//!   finite differences.
//! - [`FitOutcome::new`] recomputes nothing but validates everything it is
//!   handed and maps Argmin's termination status to a `converged` flag.
//!
//! Conventions
//! -----------
//! - `converged` is `true` only for `SolverConverged` and
//!   `TargetCostReached`; hitting the iteration cap or giving up on damping
//!   is reported as not converged.
use crate::optimization::{
    errors::{OptError, OptResult},
    least_squares::{
        types::{
            DEFAULT_INITIAL_DAMPING, DEFAULT_MAX_ITER, DEFAULT_TOL_COST, DEFAULT_TOL_GRAD,
            DEFAULT_TOL_STEP, FnEvalMap, JacobianMatrix, Residuals, Theta,
        },
        validation::{
            validate_jacobian, validate_residuals, validate_theta_hat, verify_damping,
            verify_tol_cost, verify_tol_grad, verify_tol_step,
        },
    },
};
use argmin::core::{TerminationReason, TerminationStatus};

/// User-implemented weighted least-squares problem.
///
/// - `type Data`: per-model data carried into `residuals`/`jacobian`/`check`.
///
/// Required:
/// - `residuals(&Theta, &Data) -> OptResult<Residuals>`: weighted residuals,
///   one per retained observation.
/// - `n_residuals(&Data) -> usize`: the fixed residual length.
/// - `check(&Theta, &Data) -> OptResult<()>`: validation hook called once
///   before optimization.
///
/// Optional:
/// - `jacobian(&Theta, &Data) -> OptResult<JacobianMatrix>`: analytic
///   `∂r/∂θ`. If not implemented, central finite differences are used.
pub trait LeastSquares {
    type Data: 'static;

    // Required methods
    fn residuals(&self, theta: &Theta, data: &Self::Data) -> OptResult<Residuals>;
    fn n_residuals(&self, data: &Self::Data) -> usize;
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()>;

    // Optional methods
    fn jacobian(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<JacobianMatrix> {
        Err(OptError::JacobianNotImplemented)
    }
}

/// Source of the Jacobian used by the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JacobianMethod {
    /// Use [`LeastSquares::jacobian`], falling back to finite differences
    /// when the problem does not implement it.
    Analytic,
    /// Always use central finite differences of the residuals.
    CentralDifference,
}

/// Numerical tolerances and iteration limits.
///
/// - `tol_grad`: stop when the projected-gradient ∞-norm falls below this.
/// - `tol_cost`: stop when an accepted step reduces the cost by less than
///   this fraction.
/// - `tol_step`: stop when `‖Δθ‖ ≤ tol_step·(tol_step + ‖θ‖)`.
/// - `max_iter`: hard cap on iterations.
///
/// At least one field must be provided (see [`Tolerances::new`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub tol_step: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] if all four are `None`.
    /// - `InvalidTolGrad` / `InvalidTolCost` / `InvalidTolStep` for
    ///   non-finite or non-positive tolerances.
    /// - [`OptError::InvalidMaxIter`] if `max_iter == 0`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, tol_step: Option<f64>,
        max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if tol_grad.is_none() && tol_cost.is_none() && tol_step.is_none() && max_iter.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_grad(tol_grad)?;
        verify_tol_cost(tol_cost)?;
        verify_tol_step(tol_step)?;
        if let Some(max_iter) = max_iter {
            if max_iter == 0 {
                return Err(OptError::InvalidMaxIter {
                    max_iter,
                    reason: "Maximum iterations must be greater than zero.",
                });
            }
        }
        Ok(Self { tol_grad, tol_cost, tol_step, max_iter })
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            tol_grad: Some(DEFAULT_TOL_GRAD),
            tol_cost: Some(DEFAULT_TOL_COST),
            tol_step: Some(DEFAULT_TOL_STEP),
            max_iter: Some(DEFAULT_MAX_ITER),
        }
    }
}

/// Optimizer-level configuration.
///
/// Fields:
/// - `tols`: stopping rules.
/// - `jacobian`: analytic or finite-difference Jacobian.
/// - `initial_damping`: `λ₀`, relative to the Marquardt scaling diagonal.
/// - `verbose`: attach a terminal observer (behind the `obs_slog` feature).
///
/// Default: all tolerances `1e-10`, `max_iter = 1000`, analytic Jacobian,
/// `λ₀ = 1e-3`, not verbose.
#[derive(Debug, Clone, PartialEq)]
pub struct FitOptions {
    pub tols: Tolerances,
    pub jacobian: JacobianMethod,
    pub initial_damping: f64,
    pub verbose: bool,
}

impl FitOptions {
    /// Create validated options.
    ///
    /// # Errors
    /// Returns [`OptError::InvalidDamping`] for a non-finite or
    /// non-positive `initial_damping`.
    pub fn new(
        tols: Tolerances, jacobian: JacobianMethod, initial_damping: f64, verbose: bool,
    ) -> OptResult<Self> {
        verify_damping(initial_damping)?;
        Ok(Self { tols, jacobian, initial_damping, verbose })
    }
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances::default(),
            jacobian: JacobianMethod::Analytic,
            initial_damping: DEFAULT_INITIAL_DAMPING,
            verbose: false,
        }
    }
}

/// Canonical result returned by `minimize`.
///
/// - `theta_hat`: best parameter vector found.
/// - `residuals`: weighted residuals at `theta_hat`.
/// - `jacobian`: `∂r/∂θ` at `theta_hat`, `n_residuals × n_params`.
/// - `chi2`: `Σ rᵢ²` at `theta_hat`.
/// - `converged`: see the module conventions.
/// - `status`: human-readable termination status.
/// - `iterations`: solver iterations performed.
/// - `fn_evals`: Argmin evaluation counters (`operator_count`,
///   `jacobian_count`).
#[derive(Debug, Clone, PartialEq)]
pub struct FitOutcome {
    pub theta_hat: Theta,
    pub residuals: Residuals,
    pub jacobian: JacobianMatrix,
    pub chi2: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
}

impl FitOutcome {
    /// Build a validated [`FitOutcome`] from raw solver output.
    ///
    /// # Errors
    /// - Missing or non-finite `theta_hat`.
    /// - Residual or Jacobian dimension/finiteness violations.
    pub fn new(
        theta_hat_opt: Option<Theta>, residuals: Residuals, jacobian: JacobianMatrix,
        termination: TerminationStatus, iterations: u64, fn_evals: FnEvalMap,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_residuals(&residuals, residuals.len())?;
        validate_jacobian(&jacobian, residuals.len(), theta_hat.len())?;
        let chi2 = residuals.dot(&residuals);
        let (converged, status) = match &termination {
            TerminationStatus::NotTerminated => (false, "Not terminated".to_string()),
            TerminationStatus::Terminated(reason) => {
                let converged = matches!(
                    reason,
                    TerminationReason::SolverConverged | TerminationReason::TargetCostReached
                );
                (converged, format!("{reason:?}"))
            }
        };
        Ok(Self {
            theta_hat,
            residuals,
            jacobian,
            chi2,
            converged,
            status,
            iterations: iterations as usize,
            fn_evals,
        })
    }
}
