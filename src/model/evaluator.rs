//! model::evaluator — expected counts of the signal-plus-background model.
//!
//! Purpose
//! -------
//! Evaluate the per-bin expectation
//!
//! ```text
//! S(x, y)  = A · exp(-(x-μ1)²/σ1²) · exp(-(y-μ2)²/σ2²)
//! m(x, y)  = S(x, y) · dA + B · b(x, y)
//! ```
//!
//! and its partial derivatives with respect to `(A, μ1, μ2, σ1, σ2, B)`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Callers only evaluate with strictly positive widths; the residual layer
//!   substitutes a penalty before reaching this module otherwise.
//! - The Gaussian is un-normalized and uses `σ²` rather than `2σ²` in the
//!   exponent, so its integral is `π·A·σ1·σ2`.
use crate::{
    dataset::BinGrid,
    model::params::{
        IDX_AMPLITUDE, IDX_BKG_SCALE, IDX_MEAN_X, IDX_MEAN_Y, IDX_WIDTH_X, IDX_WIDTH_Y,
        ModelParams, N_PARAMS,
    },
};
use ndarray::Array2;

/// Separable, un-normalized 2D Gaussian `A·exp(-(x-μ1)²/σ1²)·exp(-(y-μ2)²/σ2²)`.
pub fn signal_kernel(p: &ModelParams, x: f64, y: f64) -> f64 {
    let ux = (x - p.mean_x) / p.width_x;
    let uy = (y - p.mean_y) / p.width_y;
    p.amplitude * (-ux * ux).exp() * (-uy * uy).exp()
}

/// Expected count of one bin: `signal_kernel · bin_area + B · background`.
pub fn expected_count(p: &ModelParams, x: f64, y: f64, background: f64, bin_area: f64) -> f64 {
    signal_kernel(p, x, y) * bin_area + p.background_scale * background
}

/// Partial derivatives of [`expected_count`] in `Theta` order.
///
/// With `S` the kernel value, `dx = x - μ1`, `dy = y - μ2`:
/// `∂m/∂A = S/A·dA`, `∂m/∂μ1 = S·2dx/σ1²·dA`, `∂m/∂σ1 = S·2dx²/σ1³·dA`
/// (same for y), `∂m/∂B = b`. `S/A` is computed directly so `A = 0` is safe.
pub fn expected_count_gradient(
    p: &ModelParams, x: f64, y: f64, background: f64, bin_area: f64,
) -> [f64; N_PARAMS] {
    let dx = x - p.mean_x;
    let dy = y - p.mean_y;
    let sx2 = p.width_x * p.width_x;
    let sy2 = p.width_y * p.width_y;
    let shape = (-dx * dx / sx2).exp() * (-dy * dy / sy2).exp();
    let s = p.amplitude * shape;

    let mut grad = [0.0; N_PARAMS];
    grad[IDX_AMPLITUDE] = shape * bin_area;
    grad[IDX_MEAN_X] = s * 2.0 * dx / sx2 * bin_area;
    grad[IDX_MEAN_Y] = s * 2.0 * dy / sy2 * bin_area;
    grad[IDX_WIDTH_X] = s * 2.0 * dx * dx / (sx2 * p.width_x) * bin_area;
    grad[IDX_WIDTH_Y] = s * 2.0 * dy * dy / (sy2 * p.width_y) * bin_area;
    grad[IDX_BKG_SCALE] = background;
    grad
}

/// Evaluate the model on every bin of `grid`, including bins excluded from
/// the fit. `background` must have the grid's shape.
pub fn model_grid(p: &ModelParams, grid: &BinGrid, background: &Array2<f64>) -> Array2<f64> {
    let area = grid.bin_area();
    Array2::from_shape_fn(grid.shape(), |(i, j)| {
        expected_count(p, grid.x_centers[i], grid.y_centers[j], background[[i, j]], area)
    })
}

/// Signal component alone on every bin of `grid`, in counts per bin.
pub fn signal_grid(p: &ModelParams, grid: &BinGrid) -> Array2<f64> {
    let area = grid.bin_area();
    Array2::from_shape_fn(grid.shape(), |(i, j)| {
        signal_kernel(p, grid.x_centers[i], grid.y_centers[j]) * area
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{Array2, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Kernel peak height and separability.
    // - Expected count composition.
    // - Analytic gradient against central differences.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // The kernel equals `A` at the mean and decays by `e^{-1}` one width
    // away along either axis.
    fn kernel_peaks_at_mean_with_unit_exponent_per_width() {
        let p = ModelParams::new(500.0, 5.0, 4.0, 1.5, 0.5, 1.0);

        assert_relative_eq!(signal_kernel(&p, 5.0, 4.0), 500.0);
        assert_relative_eq!(signal_kernel(&p, 6.5, 4.0), 500.0 * (-1.0f64).exp());
        assert_relative_eq!(signal_kernel(&p, 5.0, 3.5), 500.0 * (-1.0f64).exp());
    }

    #[test]
    // Purpose
    // -------
    // Expected counts combine signal times bin area with scaled background.
    fn expected_count_adds_scaled_background() {
        let p = ModelParams::new(10.0, 0.0, 0.0, 1.0, 1.0, 0.5);
        assert_relative_eq!(expected_count(&p, 0.0, 0.0, 40.0, 0.25), 10.0 * 0.25 + 20.0);
    }

    #[test]
    // Purpose
    // -------
    // The analytic gradient agrees with central differences of
    // `expected_count` away from the peak.
    fn gradient_matches_central_differences() {
        // Arrange
        let base = [320.0, 4.7, 5.2, 1.1, 0.8, 1.3];
        let (x, y, b, area) = (5.5, 4.5, 90.0, 0.5);
        let analytic = expected_count_gradient(&ModelParams::from_array(&base), x, y, b, area);

        // Act / Assert
        for k in 0..N_PARAMS {
            let h = 1e-6 * base[k].abs().max(1.0);
            let mut up = base;
            let mut down = base;
            up[k] += h;
            down[k] -= h;
            let fd = (expected_count(&ModelParams::from_array(&up), x, y, b, area)
                - expected_count(&ModelParams::from_array(&down), x, y, b, area))
                / (2.0 * h);
            assert_relative_eq!(analytic[k], fd, epsilon = 1e-6, max_relative = 1e-6);
        }
    }

    #[test]
    // Purpose
    // -------
    // Grid evaluation follows the grid's x-major layout.
    fn model_grid_uses_grid_layout() {
        let grid = BinGrid {
            x_centers: array![0.5, 1.5],
            y_centers: array![0.5, 1.5, 2.5],
            dx: 1.0,
            dy: 1.0,
            x_range: (0.0, 2.0),
            y_range: (0.0, 3.0),
        };
        let p = ModelParams::new(0.0, 1.0, 1.0, 1.0, 1.0, 2.0);
        let bkg = Array2::from_shape_fn((2, 3), |(i, j)| (i * 3 + j) as f64);

        let m = model_grid(&p, &grid, &bkg);

        assert_eq!(m.dim(), (2, 3));
        assert_eq!(m, bkg.mapv(|v| 2.0 * v));
        assert_eq!(signal_grid(&p, &grid), Array2::<f64>::zeros((2, 3)));
    }
}
