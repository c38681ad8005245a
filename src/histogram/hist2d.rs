//! histogram::hist2d — validated two-dimensional binned histograms.
//!
//! Purpose
//! -------
//! Provide the immutable [`Histogram2D`] container shared by the data and
//! background inputs of a fit, and centralize the binning checks that must
//! pass before any fitting begins.
//!
//! Key behaviors
//! -------------
//! - [`Histogram2D::new`] enforces edge finiteness, strict monotonicity, and
//!   the `(len(x_edges) - 1, len(y_edges) - 1)` content shape.
//! - [`Histogram2D::same_binning`] compares the edges of two histograms and
//!   reports the first disagreement as [`HistError::BinningMismatch`].
//! - [`Histogram2D::uniform_width`] returns the common bin width of an axis
//!   or fails with [`HistError::NonUniformBinning`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Contents may hold non-finite values; the dataset builder is responsible
//!   for excluding them. Only edges are required to be finite.
//! - Axis 0 of the content matrix is the x axis, axis 1 is the y axis:
//!   `contents[[i, j]]` is the bin spanning `x_edges[i..=i+1]` and
//!   `y_edges[j..=j+1]`.
//!
//! Conventions
//! -----------
//! - Edge comparisons use a relative tolerance of [`EDGE_RTOL`]; uniformity
//!   checks use [`UNIFORM_RTOL`].
//!
//! Testing notes
//! -------------
//! - Unit tests cover the happy path, shape mismatches, non-monotone edges,
//!   binning comparison, and uniform-width detection.
use crate::histogram::errors::{HistError, HistResult};
use ndarray::{Array1, Array2};

/// Relative tolerance used when comparing edges of two histograms.
pub const EDGE_RTOL: f64 = 1e-12;

/// Relative tolerance used when checking that bin widths are uniform.
pub const UNIFORM_RTOL: f64 = 1e-9;

/// Identifies one of the two histogram axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn label(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
        }
    }
}

/// `Histogram2D` — immutable grid of bin contents plus bin edges.
///
/// Fields
/// ------
/// - `contents`: `Array2<f64>` of shape `(nx, ny)`.
/// - `x_edges`: `Array1<f64>` of length `nx + 1`, strictly increasing.
/// - `y_edges`: `Array1<f64>` of length `ny + 1`, strictly increasing.
///
/// Invariants
/// ----------
/// - `nx ≥ 1`, `ny ≥ 1`.
/// - All edges finite and strictly increasing.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram2D {
    contents: Array2<f64>,
    x_edges: Array1<f64>,
    y_edges: Array1<f64>,
}

impl Histogram2D {
    /// Construct a validated histogram.
    ///
    /// Errors
    /// ------
    /// - `HistError::TooFewEdges` if an axis has fewer than two edges.
    /// - `HistError::NonFiniteEdge` / `HistError::NonIncreasingEdges` for
    ///   malformed edge sequences.
    /// - `HistError::ShapeMismatch` if the content shape disagrees with the
    ///   edges.
    /// - `HistError::EmptyHistogram` if the content matrix has no bins.
    pub fn new(
        contents: Array2<f64>, x_edges: Array1<f64>, y_edges: Array1<f64>,
    ) -> HistResult<Self> {
        validate_edges(&x_edges, Axis::X)?;
        validate_edges(&y_edges, Axis::Y)?;
        let expected = (x_edges.len() - 1, y_edges.len() - 1);
        if contents.dim() != expected {
            return Err(HistError::ShapeMismatch { expected, found: contents.dim() });
        }
        if contents.is_empty() {
            return Err(HistError::EmptyHistogram);
        }
        Ok(Self { contents, x_edges, y_edges })
    }

    /// Build a histogram from nested rows (`rows[i][j]` is bin `(x_i, y_j)`).
    ///
    /// Errors
    /// ------
    /// - `HistError::RaggedContents` if rows differ in length.
    /// - Any error of [`Histogram2D::new`].
    pub fn from_rows(
        rows: &[Vec<f64>], x_edges: Vec<f64>, y_edges: Vec<f64>,
    ) -> HistResult<Self> {
        let nx = rows.len();
        let ny = rows.first().map_or(0, Vec::len);
        let mut flat = Vec::with_capacity(nx * ny);
        for (row, values) in rows.iter().enumerate() {
            if values.len() != ny {
                return Err(HistError::RaggedContents { row, expected: ny, found: values.len() });
            }
            flat.extend_from_slice(values);
        }
        let contents = Array2::from_shape_vec((nx, ny), flat)
            .map_err(|_| HistError::ShapeMismatch { expected: (nx, ny), found: (nx, ny) })?;
        Self::new(contents, Array1::from(x_edges), Array1::from(y_edges))
    }

    pub fn contents(&self) -> &Array2<f64> {
        &self.contents
    }

    pub fn x_edges(&self) -> &Array1<f64> {
        &self.x_edges
    }

    pub fn y_edges(&self) -> &Array1<f64> {
        &self.y_edges
    }

    pub fn edges(&self, axis: Axis) -> &Array1<f64> {
        match axis {
            Axis::X => &self.x_edges,
            Axis::Y => &self.y_edges,
        }
    }

    /// Number of bins along `(x, y)`.
    pub fn shape(&self) -> (usize, usize) {
        self.contents.dim()
    }

    /// Bin centers along `axis`.
    pub fn centers(&self, axis: Axis) -> Array1<f64> {
        let edges = self.edges(axis);
        let n = edges.len() - 1;
        Array1::from_iter((0..n).map(|i| 0.5 * (edges[i] + edges[i + 1])))
    }

    /// Full extent `(first edge, last edge)` of `axis`.
    pub fn range(&self, axis: Axis) -> (f64, f64) {
        let edges = self.edges(axis);
        (edges[0], edges[edges.len() - 1])
    }

    /// Common bin width along `axis`.
    ///
    /// Errors
    /// ------
    /// - `HistError::NonUniformBinning` with the first bin whose width
    ///   deviates from the first bin width by more than [`UNIFORM_RTOL`].
    pub fn uniform_width(&self, axis: Axis) -> HistResult<f64> {
        let edges = self.edges(axis);
        let reference = edges[1] - edges[0];
        for index in 1..edges.len() - 1 {
            let width = edges[index + 1] - edges[index];
            if (width - reference).abs() > UNIFORM_RTOL * reference.abs() {
                return Err(HistError::NonUniformBinning {
                    axis: axis.label(),
                    index,
                    width,
                    reference,
                });
            }
        }
        Ok(reference)
    }

    /// Check that `other` has identical binning.
    ///
    /// Errors
    /// ------
    /// - `HistError::BinningMismatch` describing the first difference
    ///   (shape, or the first edge outside [`EDGE_RTOL`]).
    pub fn same_binning(&self, other: &Histogram2D) -> HistResult<()> {
        if self.shape() != other.shape() {
            return Err(HistError::BinningMismatch {
                reason: format!("shape {:?} vs {:?}", self.shape(), other.shape()),
            });
        }
        for axis in [Axis::X, Axis::Y] {
            let ours = self.edges(axis);
            let theirs = other.edges(axis);
            for (index, (&a, &b)) in ours.iter().zip(theirs.iter()).enumerate() {
                let scale = a.abs().max(b.abs()).max(1.0);
                if (a - b).abs() > EDGE_RTOL * scale {
                    return Err(HistError::BinningMismatch {
                        reason: format!("{} edge {index}: {a} vs {b}", axis.label()),
                    });
                }
            }
        }
        Ok(())
    }
}

fn validate_edges(edges: &Array1<f64>, axis: Axis) -> HistResult<()> {
    if edges.len() < 2 {
        return Err(HistError::TooFewEdges { axis: axis.label(), len: edges.len() });
    }
    for (index, &value) in edges.iter().enumerate() {
        if !value.is_finite() {
            return Err(HistError::NonFiniteEdge { axis: axis.label(), index, value });
        }
    }
    for index in 1..edges.len() {
        if edges[index] <= edges[index - 1] {
            return Err(HistError::NonIncreasingEdges { axis: axis.label(), index });
        }
    }
    Ok(())
}
