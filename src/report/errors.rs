use std::path::Path;

/// Result alias for report rendering.
pub type ReportResult<T> = Result<T, ReportError>;

#[derive(Debug, Clone, PartialEq)]
pub enum ReportError {
    // ---- Inputs ----
    /// A panel has no bins to draw.
    EmptyGrid {
        panel: String,
    },

    /// A panel's values do not match its bin edges.
    PanelShapeMismatch {
        panel: String,
        expected: (usize, usize),
        found: (usize, usize),
    },

    /// The page layout could not be satisfied.
    Layout {
        reason: String,
    },

    // ---- Output ----
    /// Writing or renaming the document failed.
    Io {
        path: String,
        text: String,
    },
}

impl ReportError {
    pub(crate) fn io(path: &Path, err: std::io::Error) -> Self {
        ReportError::Io { path: path.display().to_string(), text: err.to_string() }
    }
}

impl std::error::Error for ReportError {}

impl std::fmt::Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Inputs ----
            ReportError::EmptyGrid { panel } => write!(f, "Panel '{panel}' has no bins to draw"),
            ReportError::PanelShapeMismatch { panel, expected, found } => write!(
                f,
                "Panel '{panel}' shape mismatch: edges imply {expected:?}, values are {found:?}"
            ),
            ReportError::Layout { reason } => write!(f, "Report layout error: {reason}"),

            // ---- Output ----
            ReportError::Io { path, text } => write!(f, "Failed to write report '{path}': {text}"),
        }
    }
}
