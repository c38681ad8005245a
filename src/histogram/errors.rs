//! Unified error handling for histogram input.
//!
//! This module defines `HistError`, the error type used when histograms are
//! constructed, loaded from a store, or compared for compatible binning. All
//! of these are input errors: they are raised before any fitting begins and
//! cannot be recovered locally. An alias `HistResult<T>` standardizes the
//! return type across histogram code.

/// Crate-wide result alias for histogram operations.
pub type HistResult<T> = Result<T, HistError>;

#[derive(Debug, Clone, PartialEq)]
pub enum HistError {
    // ---- Construction ----
    /// The content matrix has no bins.
    EmptyHistogram,

    /// An edge sequence has fewer than two entries.
    TooFewEdges {
        axis: &'static str,
        len: usize,
    },

    /// Edges must be finite.
    NonFiniteEdge {
        axis: &'static str,
        index: usize,
        value: f64,
    },

    /// Edges must be strictly increasing.
    NonIncreasingEdges {
        axis: &'static str,
        index: usize,
    },

    /// Content shape does not match the edge sequences.
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    /// Rows of a nested content array have different lengths.
    RaggedContents {
        row: usize,
        expected: usize,
        found: usize,
    },

    // ---- Binning ----
    /// Bin widths along an axis are not uniform.
    NonUniformBinning {
        axis: &'static str,
        index: usize,
        width: f64,
        reference: f64,
    },

    /// Data and background histograms do not share binning.
    BinningMismatch {
        reason: String,
    },

    /// Background template entries must be finite.
    NonFiniteBackground {
        row: usize,
        col: usize,
        value: f64,
    },

    // ---- Store ----
    /// Requested histogram is not present in the store.
    MissingHistogram {
        name: String,
    },

    /// Store could not be read.
    Io {
        path: String,
        text: String,
    },

    /// Store content could not be decoded.
    Parse {
        text: String,
    },
}

impl std::error::Error for HistError {}

impl std::fmt::Display for HistError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Construction ----
            HistError::EmptyHistogram => write!(f, "Histogram has no bins"),
            HistError::TooFewEdges { axis, len } => {
                write!(f, "Axis {axis} has {len} edges, at least 2 are required")
            }
            HistError::NonFiniteEdge { axis, index, value } => {
                write!(f, "Axis {axis} edge {index} is {value}, must be finite")
            }
            HistError::NonIncreasingEdges { axis, index } => {
                write!(f, "Axis {axis} edges are not strictly increasing at index {index}")
            }
            HistError::ShapeMismatch { expected, found } => {
                write!(f, "Content shape mismatch: expected {expected:?}, found {found:?}")
            }
            HistError::RaggedContents { row, expected, found } => {
                write!(f, "Content row {row} has {found} entries, expected {expected}")
            }

            // ---- Binning ----
            HistError::NonUniformBinning { axis, index, width, reference } => write!(
                f,
                "Axis {axis} bin {index} has width {width}, expected uniform width {reference}"
            ),
            HistError::BinningMismatch { reason } => {
                write!(f, "Data and background binning differ: {reason}")
            }
            HistError::NonFiniteBackground { row, col, value } => {
                write!(f, "Background bin ({row}, {col}) is {value}, must be finite")
            }

            // ---- Store ----
            HistError::MissingHistogram { name } => {
                write!(f, "Histogram '{name}' not found in input store")
            }
            HistError::Io { path, text } => write!(f, "Cannot read '{path}': {text}"),
            HistError::Parse { text } => write!(f, "Cannot decode histogram store: {text}"),
        }
    }
}

impl From<serde_json::Error> for HistError {
    fn from(err: serde_json::Error) -> Self {
        HistError::Parse { text: err.to_string() }
    }
}
