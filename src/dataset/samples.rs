//! dataset::samples — flattened per-bin samples for the weighted fit.
//!
//! Purpose
//! -------
//! Turn a data/background histogram pair into the immutable list of
//! per-bin samples consumed by the residual function, dropping bins whose
//! Poisson-like uncertainty is not finite.
//!
//! Key behaviors
//! -------------
//! - Check that both histograms share binning and that it is uniform.
//! - Flatten both grids x-major: bin `(i, j)` yields
//!   `(x_centers[i], y_centers[j], data[[i, j]], bkg[[i, j]])`.
//! - Attach `sigma = sqrt(max(observed, 1))` to each bin; a NaN count keeps
//!   a NaN sigma and an infinite count an infinite sigma.
//! - Exclude bins with non-finite sigma and record how many were dropped.
//!
//! Invariants & assumptions
//! ------------------------
//! - Retained samples always have a finite, `≥ 1` sigma.
//! - The background template must be finite everywhere; it carries no
//!   uncertainty of its own and a non-finite entry is an input error.
//!
//! Conventions
//! -----------
//! - Sample order is the flatten order above; it is irrelevant to the fit but
//!   identical for every per-bin quantity.
//! - Dropping bins is data cleaning, not an error. The count is exposed via
//!   [`BinnedDataset::dropped`] and logged by the pipeline.
//!
//! Testing notes
//! -------------
//! - Unit tests cover flatten order, the sigma floor, NaN/inf exclusion, and
//!   binning/background failures.
use crate::{
    dataset::grid::BinGrid,
    histogram::{HistError, HistResult, Histogram2D},
};
use ndarray::Array1;

/// One retained bin of the fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinnedSample {
    pub x: f64,
    pub y: f64,
    pub observed: f64,
    pub background: f64,
    pub sigma: f64,
}

/// Poisson-like per-bin uncertainty `sqrt(max(count, 1))`.
///
/// NaN propagates (so the bin is excluded later); `f64::max` alone would
/// silently turn NaN into 1.
pub fn poisson_uncertainty(count: f64) -> f64 {
    if count.is_nan() { f64::NAN } else { count.max(1.0).sqrt() }
}

/// `BinnedDataset` — retained samples plus the grid they were cut from.
///
/// Fields
/// ------
/// - `samples`: retained bins in x-major order.
/// - `grid`: geometry of the full binning.
/// - `dropped`: `(i, j)` indices of bins excluded for non-finite sigma.
#[derive(Debug, Clone, PartialEq)]
pub struct BinnedDataset {
    samples: Vec<BinnedSample>,
    grid: BinGrid,
    dropped: Vec<(usize, usize)>,
}

impl BinnedDataset {
    /// Build the dataset from a data histogram and background template.
    ///
    /// Errors
    /// ------
    /// - `HistError::BinningMismatch` if the histograms differ in binning.
    /// - `HistError::NonUniformBinning` if either axis is irregular.
    /// - `HistError::NonFiniteBackground` for a NaN/inf template entry.
    pub fn build(data: &Histogram2D, background: &Histogram2D) -> HistResult<Self> {
        data.same_binning(background)?;
        let grid = BinGrid::from_histogram(data)?;
        let (nx, ny) = grid.shape();
        let counts = data.contents();
        let bkg = background.contents();

        let mut samples = Vec::with_capacity(nx * ny);
        let mut dropped = Vec::new();
        for i in 0..nx {
            for j in 0..ny {
                let background = bkg[[i, j]];
                if !background.is_finite() {
                    return Err(HistError::NonFiniteBackground { row: i, col: j, value: background });
                }
                let observed = counts[[i, j]];
                let sigma = poisson_uncertainty(observed);
                if !sigma.is_finite() {
                    dropped.push((i, j));
                    continue;
                }
                samples.push(BinnedSample {
                    x: grid.x_centers[i],
                    y: grid.y_centers[j],
                    observed,
                    background,
                    sigma,
                });
            }
        }
        Ok(Self { samples, grid, dropped })
    }

    pub fn samples(&self) -> &[BinnedSample] {
        &self.samples
    }

    pub fn grid(&self) -> &BinGrid {
        &self.grid
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Indices of bins excluded for non-finite uncertainty.
    pub fn dropped(&self) -> &[(usize, usize)] {
        &self.dropped
    }

    /// Retained sample with the largest observed count (first on ties).
    pub fn max_sample(&self) -> Option<&BinnedSample> {
        self.samples.iter().fold(None, |best: Option<&BinnedSample>, s| match best {
            Some(b) if b.observed >= s.observed => Some(b),
            _ => Some(s),
        })
    }

    /// Observed counts as a column, in sample order.
    pub fn observed(&self) -> Array1<f64> {
        self.samples.iter().map(|s| s.observed).collect()
    }

    /// Uncertainties as a column, in sample order.
    pub fn sigmas(&self) -> Array1<f64> {
        self.samples.iter().map(|s| s.sigma).collect()
    }
}
