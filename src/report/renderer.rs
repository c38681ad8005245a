//! report::renderer — the report interface and its PDF implementation.
//!
//! Purpose
//! -------
//! Decouple the pipeline from the output format. The pipeline hands a
//! [`ReportInput`] to any [`ReportRenderer`]; [`PdfReportRenderer`] draws
//! the 2×2 lego page and the results page.
//!
//! Key behaviors
//! -------------
//! - Page 1: panels "Data", "Fit (Signal+Background)", "Residuals (Data−Fit)",
//!   and "Data − Best-fit Background" in reading order.
//! - Page 2: the lines of [`FitSummary::lines`].
//! - All panels are validated before any file is touched.
use crate::report::{
    document::{PAGE_HEIGHT, PAGE_WIDTH, PdfDocument, write_atomic},
    errors::{ReportError, ReportResult},
    lego::{Frame, LegoPanel, draw_lego, draw_text},
    summary::FitSummary,
};
use pdf_writer::Content;
use std::path::Path;

pub const TITLE_DATA: &str = "Data";
pub const TITLE_FIT: &str = "Fit (Signal+Background)";
pub const TITLE_RESIDUALS: &str = "Residuals (Data\u{2212}Fit)";
pub const TITLE_BKG_SUBTRACTED: &str = "Data \u{2212} Best-fit Background";

/// Surfaces and text for one report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportInput {
    /// Panels in reading order: top-left, top-right, bottom-left,
    /// bottom-right.
    pub panels: [LegoPanel; 4],
    pub summary: FitSummary,
}

impl ReportInput {
    /// # Errors
    /// - `EmptyGrid` for a panel without bins.
    /// - `PanelShapeMismatch` if panels disagree in shape.
    pub fn validate(&self) -> ReportResult<()> {
        let expected = self.panels[0].values.dim();
        for panel in &self.panels {
            panel.validate()?;
            if panel.values.dim() != expected {
                return Err(ReportError::PanelShapeMismatch {
                    panel: panel.title.clone(),
                    expected,
                    found: panel.values.dim(),
                });
            }
        }
        Ok(())
    }
}

/// What a renderer produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderedReport {
    pub pages: usize,
    pub bytes: usize,
}

/// Output backend for fit reports.
pub trait ReportRenderer {
    /// Render `input` to `path`.
    ///
    /// Implementations must not leave a partial file at `path` on error.
    fn render(&self, input: &ReportInput, path: &Path) -> ReportResult<RenderedReport>;
}

/// Two-page PDF report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdfReportRenderer {
    pub text_size: f32,
    pub line_spacing: f32,
}

impl Default for PdfReportRenderer {
    fn default() -> Self {
        Self { text_size: 14.0, line_spacing: 1.5 }
    }
}

impl PdfReportRenderer {
    fn panel_page(&self, input: &ReportInput) -> ReportResult<Content> {
        let mut content = Content::new();
        let margin = 24.0;
        let w = (PAGE_WIDTH - 2.0 * margin) / 2.0;
        let h = (PAGE_HEIGHT - 2.0 * margin) / 2.0;
        for (k, panel) in input.panels.iter().enumerate() {
            let (col, row) = ((k % 2) as f32, (k / 2) as f32);
            let frame = Frame {
                x: margin + col * w,
                y: PAGE_HEIGHT - margin - (row + 1.0) * h,
                width: w,
                height: h,
            };
            draw_lego(&mut content, panel, frame)?;
        }
        Ok(content)
    }

    fn text_page(&self, summary: &FitSummary) -> ReportResult<Content> {
        let lines = summary.lines();
        let leading = self.text_size * self.line_spacing;
        let top = PAGE_HEIGHT - 72.0;
        if top - leading * (lines.len() as f32) < 0.0 {
            return Err(ReportError::Layout {
                reason: format!("{} summary lines do not fit on one page", lines.len()),
            });
        }
        let mut content = Content::new();
        for (k, line) in lines.iter().enumerate() {
            if !line.is_empty() {
                draw_text(&mut content, line, 72.0, top - leading * k as f32, self.text_size);
            }
        }
        Ok(content)
    }
}

impl ReportRenderer for PdfReportRenderer {
    fn render(&self, input: &ReportInput, path: &Path) -> ReportResult<RenderedReport> {
        input.validate()?;
        let mut doc = PdfDocument::new();
        doc.push_page(self.panel_page(input)?);
        doc.push_page(self.text_page(&input.summary)?);
        let bytes = doc.to_bytes()?;
        write_atomic(path, &bytes)?;
        Ok(RenderedReport { pages: doc.page_count(), bytes: bytes.len() })
    }
}
