//! model::params — the six-parameter signal-plus-background vector.
//!
//! Purpose
//! -------
//! Give the optimizer's flat `Theta` a named, typed counterpart so model,
//! inference, and report code never index parameters by magic number.
//!
//! Conventions
//! -----------
//! - Optimizer layout: `θ = (A, μ1, μ2, σ1, σ2, B)`; the `IDX_*` constants
//!   name each slot and [`PARAM_NAMES`] gives the report labels.
//! - `A` is the peak height of the un-normalized Gaussian, not its integral.
use crate::optimization::{
    errors::{OptError, OptResult},
    least_squares::Theta,
};
use ndarray::Array1;

/// Number of free parameters of the model.
pub const N_PARAMS: usize = 6;

pub const IDX_AMPLITUDE: usize = 0;
pub const IDX_MEAN_X: usize = 1;
pub const IDX_MEAN_Y: usize = 2;
pub const IDX_WIDTH_X: usize = 3;
pub const IDX_WIDTH_Y: usize = 4;
pub const IDX_BKG_SCALE: usize = 5;

/// Report labels in `Theta` order.
pub const PARAM_NAMES: [&str; N_PARAMS] = ["A", "mu1", "mu2", "sigma1", "sigma2", "B"];

/// `ModelParams` — `(A, μ1, μ2, σ1, σ2, B)`.
///
/// Domain
/// ------
/// - `width_x > 0`, `width_y > 0` for a valid model; the residual function,
///   not this type, handles violations.
/// - `amplitude ≥ 0` and `background_scale ∈ [-10, 10]` are enforced by the
///   optimizer bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelParams {
    pub amplitude: f64,
    pub mean_x: f64,
    pub mean_y: f64,
    pub width_x: f64,
    pub width_y: f64,
    pub background_scale: f64,
}

impl ModelParams {
    pub fn new(
        amplitude: f64, mean_x: f64, mean_y: f64, width_x: f64, width_y: f64,
        background_scale: f64,
    ) -> Self {
        Self { amplitude, mean_x, mean_y, width_x, width_y, background_scale }
    }

    /// Read parameters from an optimizer vector.
    ///
    /// Errors
    /// ------
    /// - `OptError::ThetaLengthMismatch` if `theta.len() != N_PARAMS`.
    pub fn from_theta(theta: &Theta) -> OptResult<Self> {
        if theta.len() != N_PARAMS {
            return Err(OptError::ThetaLengthMismatch { expected: N_PARAMS, actual: theta.len() });
        }
        Ok(Self::from_array(&[
            theta[IDX_AMPLITUDE],
            theta[IDX_MEAN_X],
            theta[IDX_MEAN_Y],
            theta[IDX_WIDTH_X],
            theta[IDX_WIDTH_Y],
            theta[IDX_BKG_SCALE],
        ]))
    }

    pub fn from_array(values: &[f64; N_PARAMS]) -> Self {
        Self::new(values[0], values[1], values[2], values[3], values[4], values[5])
    }

    pub fn to_array(&self) -> [f64; N_PARAMS] {
        [
            self.amplitude,
            self.mean_x,
            self.mean_y,
            self.width_x,
            self.width_y,
            self.background_scale,
        ]
    }

    pub fn to_theta(&self) -> Theta {
        Array1::from(self.to_array().to_vec())
    }

    /// Both widths strictly positive.
    pub fn widths_valid(&self) -> bool {
        self.width_x > 0.0 && self.width_y > 0.0
    }
}
