//! Error surface of the end-to-end fit pipeline.
//!
//! `PipelineError` wraps the per-module errors unchanged so callers can still
//! match on the underlying variant, and adds the two failures that only exist
//! at pipeline level: an invalid configuration and a fit that did not
//! converge while convergence was required.
use crate::{
    histogram::HistError, inference::InferenceError, optimization::errors::OptError,
    report::ReportError,
};

/// Result alias for pipeline stages.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    // ---- Configuration ----
    /// A `FitConfig` field is unusable.
    InvalidConfig {
        field: &'static str,
        reason: String,
    },

    // ---- Stages ----
    /// Loading or validating the input histograms failed.
    Histogram(HistError),

    /// The optimizer rejected its inputs or failed.
    Optimization(OptError),

    /// Covariance or yield inference failed.
    Inference(InferenceError),

    /// Rendering or writing the report failed.
    Report(ReportError),

    // ---- Outcome ----
    /// The optimizer stopped without converging and convergence was required.
    NonConvergence {
        status: String,
        iterations: usize,
    },
}

impl PipelineError {
    /// The fit itself succeeded but its curvature is singular, so parameter
    /// uncertainties are undefined.
    pub fn is_singular_covariance(&self) -> bool {
        matches!(self, PipelineError::Inference(InferenceError::SingularCovariance { .. }))
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Histogram(e) => Some(e),
            PipelineError::Optimization(e) => Some(e),
            PipelineError::Inference(e) => Some(e),
            PipelineError::Report(e) => Some(e),
            _ => None,
        }
    }
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::InvalidConfig { field, reason } => {
                write!(f, "Invalid configuration field '{field}': {reason}")
            }
            PipelineError::Histogram(e) => write!(f, "Input error: {e}"),
            PipelineError::Optimization(e) => write!(f, "Fit error: {e}"),
            PipelineError::Inference(e) => write!(f, "Inference error: {e}"),
            PipelineError::Report(e) => write!(f, "Report error: {e}"),
            PipelineError::NonConvergence { status, iterations } => {
                write!(f, "Fit did not converge after {iterations} iterations: {status}")
            }
        }
    }
}

impl From<HistError> for PipelineError {
    fn from(err: HistError) -> Self {
        PipelineError::Histogram(err)
    }
}

impl From<OptError> for PipelineError {
    fn from(err: OptError) -> Self {
        PipelineError::Optimization(err)
    }
}

impl From<InferenceError> for PipelineError {
    fn from(err: InferenceError) -> Self {
        PipelineError::Inference(err)
    }
}

impl From<ReportError> for PipelineError {
    fn from(err: ReportError) -> Self {
        PipelineError::Report(err)
    }
}
