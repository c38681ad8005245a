//! inference::goodness — chi-square goodness-of-fit summary.
//!
//! Reports `χ²`, `ndof`, `χ²/ndof`, and the upper-tail probability
//! `P(X ≥ χ²)` for `X ~ χ²(ndof)` using `statrs`.
use crate::inference::{
    covariance::CovarianceEstimate,
    errors::{InferenceError, InferenceResult},
};
use statrs::distribution::{ChiSquared, ContinuousCDF};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoodnessOfFit {
    pub chi2: f64,
    pub ndof: usize,
    pub reduced_chi2: f64,
    pub p_value: f64,
}

impl GoodnessOfFit {
    /// # Errors
    /// - `Distribution` when `ndof == 0`.
    /// - `NonFiniteChi2` for a NaN/inf or negative statistic.
    /// - `Distribution` if `statrs` rejects the degrees of freedom.
    pub fn new(chi2: f64, ndof: usize) -> InferenceResult<Self> {
        if ndof == 0 {
            return Err(InferenceError::Distribution {
                text: "chi-square needs at least one degree of freedom".to_string(),
            });
        }
        if !chi2.is_finite() || chi2 < 0.0 {
            return Err(InferenceError::NonFiniteChi2 { value: chi2 });
        }
        let dist = ChiSquared::new(ndof as f64)
            .map_err(|e| InferenceError::Distribution { text: e.to_string() })?;
        Ok(Self { chi2, ndof, reduced_chi2: chi2 / ndof as f64, p_value: dist.sf(chi2) })
    }

    pub fn from_covariance(cov: &CovarianceEstimate) -> InferenceResult<Self> {
        Self::new(cov.chi2(), cov.ndof())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    // Purpose
    // -------
    // For 2 degrees of freedom the survival function is `exp(-χ²/2)`.
    fn p_value_matches_closed_form_for_two_dof() {
        let g = GoodnessOfFit::new(3.0, 2).unwrap();

        assert_relative_eq!(g.p_value, (-1.5f64).exp(), max_relative = 1e-10);
        assert_relative_eq!(g.reduced_chi2, 1.5);
        assert!(GoodnessOfFit::new(1.0, 0).is_err());
        assert!(GoodnessOfFit::new(f64::NAN, 3).is_err());
    }
}
