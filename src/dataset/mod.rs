//! dataset — flattened, weighted per-bin samples built from histogram pairs.
//!
//! Purpose
//! -------
//! Convert a data histogram and a background template into the immutable
//! sample list and bin geometry used by the model, the fit, and the report.
//!
//! Key behaviors
//! -------------
//! - [`BinGrid`] derives centers, uniform widths, bin area, and extents.
//! - [`BinnedDataset::build`] checks binning, flattens x-major, attaches
//!   Poisson-like uncertainties, and drops bins with non-finite uncertainty.
//!
//! Downstream usage
//! ----------------
//! - `model::GaussianPeakModel` evaluates residuals over
//!   [`BinnedDataset::samples`].
//! - `pipeline` derives the initial guess from [`BinnedDataset::max_sample`]
//!   and bounds from [`BinGrid`].

pub mod grid;
pub mod samples;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::grid::BinGrid;
pub use self::samples::{BinnedDataset, BinnedSample, poisson_uncertainty};
