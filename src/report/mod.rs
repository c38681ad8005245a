//! report — lego-plot PDF report of a finished fit.
//!
//! Purpose
//! -------
//! Turn fitted surfaces and the results summary into a two-page PDF:
//! four isometric lego panels on page 1 and the parameter table on page 2.
//!
//! Key behaviors
//! -------------
//! - [`ReportRenderer`] is the seam between the pipeline and the output
//!   format; [`PdfReportRenderer`] is the only implementation.
//! - Documents are written atomically via [`write_atomic`]; a failed render
//!   leaves no file at the destination.
//!
//! Conventions
//! -----------
//! - Numbers use printf `%.4g` for parameters and yield, `%.2f`/`%.3f` for
//!   the chi-square line.
//! - Text is set in Helvetica with WinAnsi encoding; characters outside it
//!   render as `?`.

pub mod document;
pub mod errors;
pub mod format;
pub mod lego;
pub mod renderer;
pub mod summary;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::document::{PdfDocument, write_atomic};
pub use self::errors::{ReportError, ReportResult};
pub use self::format::{format_fixed, format_g};
pub use self::lego::{Frame, LegoPanel, draw_lego};
pub use self::renderer::{
    PdfReportRenderer, RenderedReport, ReportInput, ReportRenderer, TITLE_BKG_SUBTRACTED,
    TITLE_DATA, TITLE_FIT, TITLE_RESIDUALS,
};
pub use self::summary::{FitSummary, ParameterLine};
