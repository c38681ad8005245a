//! report::document — multi-page PDF assembly and atomic file output.
//!
//! Purpose
//! -------
//! Collect finished page content streams, serialize them into a single PDF
//! with `pdf-writer`, and place the file at its destination in one step.
//!
//! Key behaviors
//! -------------
//! - All pages share one Type 1 Helvetica font (`/F1`, WinAnsi encoding)
//!   and an A4 landscape media box.
//! - [`write_atomic`] writes a hidden sibling temp file and renames it over
//!   the target. A drop guard deletes the temp file on every early return,
//!   so a failed write never leaves a partial document behind.
//!
//! Invariants & assumptions
//! ------------------------
//! - A document has at least one page before it is serialized.
//! - The rename happens at most once per document and only after the bytes
//!   were fully written.
use crate::report::{
    errors::{ReportError, ReportResult},
    lego::FONT_NAME,
};
use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// A4 landscape width in points.
pub const PAGE_WIDTH: f32 = 842.0;
/// A4 landscape height in points.
pub const PAGE_HEIGHT: f32 = 595.0;

/// Pages waiting to be serialized.
#[derive(Debug, Default)]
pub struct PdfDocument {
    pages: Vec<Vec<u8>>,
}

impl PdfDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finished page.
    pub fn push_page(&mut self, content: Content) {
        self.pages.push(content.finish());
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Serialize all pages into PDF bytes.
    ///
    /// # Errors
    /// Returns `ReportError::Layout` for a document without pages.
    pub fn to_bytes(&self) -> ReportResult<Vec<u8>> {
        if self.pages.is_empty() {
            return Err(ReportError::Layout { reason: "document has no pages".to_string() });
        }
        let mut alloc = Ref::new(1);
        let catalog_id = alloc.bump();
        let tree_id = alloc.bump();
        let font_id = alloc.bump();
        let ids: Vec<(Ref, Ref)> = self.pages.iter().map(|_| (alloc.bump(), alloc.bump())).collect();

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(tree_id);
        pdf.pages(tree_id)
            .kids(ids.iter().map(|&(page_id, _)| page_id))
            .count(ids.len() as i32);

        for (&(page_id, content_id), stream) in ids.iter().zip(&self.pages) {
            let mut page = pdf.page(page_id);
            page.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT));
            page.parent(tree_id);
            page.contents(content_id);
            page.resources().fonts().pair(FONT_NAME, font_id);
            page.finish();
            pdf.stream(content_id, stream);
        }

        pdf.type1_font(font_id)
            .base_font(Name(b"Helvetica"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
        Ok(pdf.finish())
    }
}

/// Removes the temp file unless disarmed after a successful rename.
struct TempFileGuard {
    path: PathBuf,
    armed: bool,
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if self.armed {
            let _ = fs::remove_file(&self.path);
        }
    }
}

/// Hidden sibling of `target` used while writing.
fn temp_path(target: &Path) -> PathBuf {
    let name = target.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    target.with_file_name(format!(".{name}.{}.tmp", std::process::id()))
}

/// Write `bytes` to `target` via a temp file and a single rename.
///
/// # Errors
/// Returns `ReportError::Io` if the temp file cannot be written or renamed;
/// the temp file is removed in both cases and `target` is left untouched.
pub fn write_atomic(target: &Path, bytes: &[u8]) -> ReportResult<()> {
    let tmp = temp_path(target);
    let mut guard = TempFileGuard { path: tmp.clone(), armed: true };
    fs::write(&tmp, bytes).map_err(|e| ReportError::io(&tmp, e))?;
    fs::rename(&tmp, target).map_err(|e| ReportError::io(target, e))?;
    guard.armed = false;
    Ok(())
}
