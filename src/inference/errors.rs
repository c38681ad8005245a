//! inference::errors — error surface for covariance and yield inference.
//!
//! `SingularCovariance` is kept distinct from the generic numerical
//! variants so callers can report "fit succeeded but uncertainties are
//! undefined" separately from outright failures.

/// Unified error type for inference routines.
///
/// Covers degenerate fits, rank-deficient curvature, non-finite results,
/// dimension mismatches, and reference-distribution failures.
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceError {
    // ---- Degrees of freedom ----
    /// Fewer retained samples than free parameters plus one.
    DegenerateFit {
        n_samples: usize,
        n_params: usize,
    },

    // ---- Covariance ----
    /// `JᵀJ` has an eigenvalue at or below the relative floor.
    SingularCovariance {
        min_eigenvalue: f64,
        max_eigenvalue: f64,
    },

    /// The covariance estimate contains a NaN or infinite entry.
    NonFiniteCovariance {
        row: usize,
        col: usize,
        value: f64,
    },

    /// The residual sum of squares is not finite.
    NonFiniteChi2 {
        value: f64,
    },

    // ---- Shapes ----
    /// Two inputs disagree in length.
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// A parameter index does not exist in the covariance matrix.
    IndexOutOfRange {
        index: usize,
        dim: usize,
    },

    // ---- Distributions ----
    /// A reference distribution could not be constructed.
    Distribution {
        text: String,
    },
}

pub type InferenceResult<T> = Result<T, InferenceError>;

impl std::error::Error for InferenceError {}

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Degrees of freedom ----
            InferenceError::DegenerateFit { n_samples, n_params } => write!(
                f,
                "Inference Error: Degenerate fit, {n_samples} samples for {n_params} parameters \
                 leaves no degrees of freedom"
            ),

            // ---- Covariance ----
            InferenceError::SingularCovariance { min_eigenvalue, max_eigenvalue } => write!(
                f,
                "Inference Error: Singular covariance, J^T J eigenvalues span [{min_eigenvalue:e}, \
                 {max_eigenvalue:e}]"
            ),
            InferenceError::NonFiniteCovariance { row, col, value } => {
                write!(f, "Inference Error: Non-finite covariance entry at ({row}, {col}): {value}")
            }
            InferenceError::NonFiniteChi2 { value } => {
                write!(f, "Inference Error: Non-finite chi-square: {value}")
            }

            // ---- Shapes ----
            InferenceError::DimensionMismatch { what, expected, found } => {
                write!(f, "Inference Error: {what} length mismatch, expected {expected}, found {found}")
            }
            InferenceError::IndexOutOfRange { index, dim } => {
                write!(f, "Inference Error: Parameter index {index} out of range for dimension {dim}")
            }

            // ---- Distributions ----
            InferenceError::Distribution { text } => {
                write!(f, "Inference Error: Distribution error: {text}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Messages name the failing quantity so the binary can print them as-is.
    fn display_names_the_failure() {
        let singular =
            InferenceError::SingularCovariance { min_eigenvalue: 0.0, max_eigenvalue: 4.0 };
        let degenerate = InferenceError::DegenerateFit { n_samples: 6, n_params: 6 };

        assert!(singular.to_string().contains("Singular covariance"));
        assert!(degenerate.to_string().contains("6 samples for 6 parameters"));
        assert_eq!(
            InferenceError::Distribution { text: "bad dof".to_string() }.to_string(),
            "Inference Error: Distribution error: bad dof"
        );
    }
}
