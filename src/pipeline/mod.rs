//! pipeline — the end-to-end histogram fit.
//!
//! Purpose
//! -------
//! Wire histogram input, dataset construction, the bounded fit, inference,
//! and the report into a single run driven by [`FitConfig`].
//!
//! Key behaviors
//! -------------
//! - [`FitPipeline`] is generic over its `HistogramSource` and
//!   `ReportRenderer`, so tests run it on in-memory histograms.
//! - Per-module errors are wrapped unchanged in [`PipelineError`].
//! - Stage boundaries log through `tracing`; subscribers are installed only
//!   by the binary.
//!
//! Downstream usage
//! ----------------
//! - `src/main.rs` runs [`FitConfig::default`] against the JSON store and
//!   the PDF renderer.

pub mod config;
pub mod errors;
pub mod fit;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::config::FitConfig;
pub use self::errors::{PipelineError, PipelineResult};
pub use self::fit::{FitPipeline, FitReport, FitResult, initial_guess, parameter_bounds};
