//! report::lego — isometric 3D bar ("lego") plots drawn into PDF content.
//!
//! Purpose
//! -------
//! Draw one binned surface as a block of bars seen from the front corner
//! of the grid, inside a rectangular frame on a PDF page.
//!
//! Key behaviors
//! -------------
//! - Bin `(i, j)` occupies `[i/nx, (i+1)/nx] × [j/ny, (j+1)/ny]` in unit
//!   ground coordinates; heights are mapped linearly from
//!   `[min(0, v_min), max(0, v_max)]` to `[0, 1]`, so bars rise from zero.
//! - Projection: `(u, w, z) ↦ (cx + (u − w)·half_width,
//!   base + (u + w)·depth + z·height)`; the viewer looks from the
//!   `(0, 0)` corner.
//! - Bars are painted back to front (descending `i + j`), each as its top
//!   and two front faces. Positive bars are blue, negative bars red.
//! - Non-finite values are drawn as zero-height bars.
//! - Each panel carries a title, `x`/`y` labels along the ground edges, and
//!   a `counts` axis with its end values.
use crate::report::{
    errors::{ReportError, ReportResult},
    format::{format_g, win_ansi},
};
use ndarray::Array2;
use pdf_writer::{Content, Name, Str};

/// Font resource name used for all report text.
pub const FONT_NAME: Name<'static> = Name(b"F1");

/// Axis-aligned rectangle on a page, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// One titled surface to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct LegoPanel {
    pub title: String,
    pub values: Array2<f64>,
}

impl LegoPanel {
    pub fn new(title: impl Into<String>, values: Array2<f64>) -> Self {
        Self { title: title.into(), values }
    }

    /// # Errors
    /// Returns `ReportError::EmptyGrid` for a panel without bins.
    pub fn validate(&self) -> ReportResult<()> {
        if self.values.is_empty() {
            return Err(ReportError::EmptyGrid { panel: self.title.clone() });
        }
        Ok(())
    }

    /// `(min, max)` over finite values, widened to include zero and made
    /// non-degenerate.
    pub fn value_range(&self) -> (f64, f64) {
        let (lo, hi) = self
            .values
            .iter()
            .filter(|v| v.is_finite())
            .fold((0.0_f64, 0.0_f64), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        if hi > lo { (lo, hi) } else { (lo, lo + 1.0) }
    }
}

/// Projection from unit grid coordinates into a frame.
struct Projection {
    cx: f32,
    base: f32,
    half_width: f32,
    depth: f32,
    height: f32,
}

impl Projection {
    fn new(plot: Frame) -> Self {
        Self {
            cx: plot.x + 0.5 * plot.width,
            base: plot.y,
            half_width: 0.5 * plot.width,
            depth: 0.25 * plot.height,
            height: 0.5 * plot.height,
        }
    }

    fn point(&self, u: f64, w: f64, z: f64) -> (f32, f32) {
        let (u, w, z) = (u as f32, w as f32, z as f32);
        (self.cx + (u - w) * self.half_width, self.base + (u + w) * self.depth + z * self.height)
    }
}

type Rgb = (f32, f32, f32);

const POSITIVE_TOP: Rgb = (0.55, 0.70, 0.95);
const POSITIVE_SIDE: Rgb = (0.25, 0.42, 0.78);
const POSITIVE_FRONT: Rgb = (0.35, 0.55, 0.88);
const NEGATIVE_TOP: Rgb = (0.97, 0.62, 0.58);
const NEGATIVE_SIDE: Rgb = (0.75, 0.25, 0.22);
const NEGATIVE_FRONT: Rgb = (0.87, 0.40, 0.36);
const EDGE: Rgb = (0.15, 0.15, 0.15);
const TITLE_SIZE: f32 = 12.0;
const LABEL_SIZE: f32 = 9.0;

/// Draw `panel` inside `frame`.
///
/// # Errors
/// Returns `ReportError::EmptyGrid` if the panel has no bins.
pub fn draw_lego(content: &mut Content, panel: &LegoPanel, frame: Frame) -> ReportResult<()> {
    panel.validate()?;
    let (nx, ny) = panel.values.dim();
    let (lo, hi) = panel.value_range();
    let scale = |v: f64| {
        let v = if v.is_finite() { v } else { 0.0 };
        (v - lo) / (hi - lo)
    };

    let plot = Frame {
        x: frame.x + 0.12 * frame.width,
        y: frame.y + 0.12 * frame.height,
        width: 0.76 * frame.width,
        height: 0.72 * frame.height,
    };
    let proj = Projection::new(plot);
    let zero = scale(0.0);

    draw_ground(content, &proj, zero);

    let mut order: Vec<(usize, usize)> =
        (0..nx).flat_map(|i| (0..ny).map(move |j| (i, j))).collect();
    order.sort_by(|a, b| (b.0 + b.1).cmp(&(a.0 + a.1)));

    content.set_line_width(0.3);
    set_stroke(content, EDGE);
    for (i, j) in order {
        let v = panel.values[[i, j]];
        let top = scale(v);
        let (z0, z1) = if top >= zero { (zero, top) } else { (top, zero) };
        let (top_c, side_c, front_c) = if v < 0.0 {
            (NEGATIVE_TOP, NEGATIVE_SIDE, NEGATIVE_FRONT)
        } else {
            (POSITIVE_TOP, POSITIVE_SIDE, POSITIVE_FRONT)
        };
        let (u0, u1) = (i as f64 / nx as f64, (i + 1) as f64 / nx as f64);
        let (w0, w1) = (j as f64 / ny as f64, (j + 1) as f64 / ny as f64);

        // Face at u = u0 (front left).
        quad(
            content,
            [proj.point(u0, w0, z0), proj.point(u0, w1, z0), proj.point(u0, w1, z1), proj.point(u0, w0, z1)],
            side_c,
        );
        // Face at w = w0 (front right).
        quad(
            content,
            [proj.point(u0, w0, z0), proj.point(u1, w0, z0), proj.point(u1, w0, z1), proj.point(u0, w0, z1)],
            front_c,
        );
        quad(
            content,
            [proj.point(u0, w0, z1), proj.point(u1, w0, z1), proj.point(u1, w1, z1), proj.point(u0, w1, z1)],
            top_c,
        );
    }

    draw_axes(content, &proj, (lo, hi));
    let title_x = frame.x + 0.5 * frame.width - text_width(&panel.title, TITLE_SIZE) / 2.0;
    draw_text(content, &panel.title, title_x, frame.y + frame.height - TITLE_SIZE, TITLE_SIZE);
    Ok(())
}

/// Outline of the ground plane at the zero level.
fn draw_ground(content: &mut Content, proj: &Projection, zero: f64) {
    content.set_line_width(0.5);
    set_stroke(content, (0.6, 0.6, 0.6));
    let corners = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
    let (x, y) = proj.point(corners[0].0, corners[0].1, zero);
    content.move_to(x, y);
    for &(u, w) in &corners[1..] {
        let (x, y) = proj.point(u, w, zero);
        content.line_to(x, y);
    }
    content.close_path();
    content.stroke();
}

/// Axis labels and the vertical value axis at the left corner.
fn draw_axes(content: &mut Content, proj: &Projection, (lo, hi): (f64, f64)) {
    content.set_line_width(0.6);
    set_stroke(content, EDGE);
    let (bx, by) = proj.point(0.0, 1.0, 0.0);
    let (tx, ty) = proj.point(0.0, 1.0, 1.0);
    content.move_to(bx, by);
    content.line_to(tx, ty);
    content.stroke();

    let lo_label = format_g(lo, 3);
    let hi_label = format_g(hi, 3);
    draw_text(content, &lo_label, bx - text_width(&lo_label, LABEL_SIZE) - 3.0, by - 3.0, LABEL_SIZE);
    draw_text(content, &hi_label, tx - text_width(&hi_label, LABEL_SIZE) - 3.0, ty - 3.0, LABEL_SIZE);
    draw_text(content, "counts", tx - text_width("counts", LABEL_SIZE) / 2.0, ty + 6.0, LABEL_SIZE);

    let (xx, xy) = proj.point(0.5, 0.0, 0.0);
    draw_text(content, "x", xx + 6.0, xy - 12.0, LABEL_SIZE);
    let (yx, yy) = proj.point(0.0, 0.5, 0.0);
    draw_text(content, "y", yx - 12.0, yy - 12.0, LABEL_SIZE);
}

fn quad(content: &mut Content, pts: [(f32, f32); 4], fill: Rgb) {
    content.set_fill_rgb(fill.0, fill.1, fill.2);
    content.move_to(pts[0].0, pts[0].1);
    for &(x, y) in &pts[1..] {
        content.line_to(x, y);
    }
    content.close_path();
    content.fill_nonzero_and_stroke();
}

fn set_stroke(content: &mut Content, c: Rgb) {
    content.set_stroke_rgb(c.0, c.1, c.2);
}

/// Draw one line of text with its baseline at `(x, y)`.
pub fn draw_text(content: &mut Content, text: &str, x: f32, y: f32, size: f32) {
    content.set_fill_rgb(0.0, 0.0, 0.0);
    content.begin_text();
    content.set_font(FONT_NAME, size);
    content.next_line(x, y);
    content.show(Str(&win_ansi(text)));
    content.end_text();
}

/// Rough Helvetica advance width.
pub fn text_width(text: &str, size: f32) -> f32 {
    0.5 * size * text.chars().count() as f32
}
