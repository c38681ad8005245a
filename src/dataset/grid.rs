//! dataset::grid — bin geometry shared by the fit and the report.
use crate::histogram::{Axis, HistResult, Histogram2D};
use ndarray::Array1;

/// `BinGrid` — bin centers, uniform widths, and extents of a 2D binning.
///
/// Built once from the data histogram after the data/background binning
/// check; carried alongside the samples so the model can be re-evaluated on
/// the full grid for plotting.
#[derive(Debug, Clone, PartialEq)]
pub struct BinGrid {
    pub x_centers: Array1<f64>,
    pub y_centers: Array1<f64>,
    pub dx: f64,
    pub dy: f64,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
}

impl BinGrid {
    /// Derive the grid of `hist`.
    ///
    /// Errors
    /// ------
    /// - `HistError::NonUniformBinning` if either axis has irregular bins.
    pub fn from_histogram(hist: &Histogram2D) -> HistResult<Self> {
        let dx = hist.uniform_width(Axis::X)?;
        let dy = hist.uniform_width(Axis::Y)?;
        Ok(Self {
            x_centers: hist.centers(Axis::X),
            y_centers: hist.centers(Axis::Y),
            dx,
            dy,
            x_range: hist.range(Axis::X),
            y_range: hist.range(Axis::Y),
        })
    }

    /// Bin area `dA = dx · dy`.
    pub fn bin_area(&self) -> f64 {
        self.dx * self.dy
    }

    /// Number of bins along `(x, y)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.x_centers.len(), self.y_centers.len())
    }

    /// Total extent `(x_max - x_min, y_max - y_min)`.
    pub fn extent(&self) -> (f64, f64) {
        (self.x_range.1 - self.x_range.0, self.y_range.1 - self.y_range.0)
    }
}
