//! histogram — validated 2D histograms and the stores that provide them.
//!
//! Purpose
//! -------
//! Supply the two input histograms of a fit (observed data and background
//! template) as immutable, validated values, independently of where they
//! are stored.
//!
//! Key behaviors
//! -------------
//! - [`Histogram2D`] holds bin contents and strictly increasing bin edges and
//!   offers the binning checks used by the dataset builder.
//! - [`HistogramSource`] abstracts named-histogram lookup; two backends are
//!   provided: [`InMemoryHistogramSource`] and [`JsonHistogramFile`].
//! - All failures surface as [`HistError`], which the pipeline treats as
//!   fatal input errors raised before fitting.
//!
//! Invariants & assumptions
//! ------------------------
//! - Edges are finite and strictly increasing; content shape matches edges.
//! - Contents are not required to be finite at this layer.
//!
//! Downstream usage
//! ----------------
//! - `dataset::BinnedDataset::build` consumes a data/background pair.
//! - `pipeline::FitPipeline` resolves both names through a `HistogramSource`.

pub mod errors;
pub mod hist2d;
pub mod json_store;
pub mod source;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::errors::{HistError, HistResult};
pub use self::hist2d::{Axis, Histogram2D};
pub use self::json_store::{HistogramRecord, JsonHistogramFile};
pub use self::source::{HistogramSource, InMemoryHistogramSource};
