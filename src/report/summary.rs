//! report::summary — the plain-text results page.
//!
//! Layout
//! ------
//! ```text
//! Fit results:
//! A = 498.7 ± 23.1
//! ...                      (one line per parameter, %.4g)
//!
//! Chi2/ndof = 95.31/94 = 1.014
//! Signal yield = 1567 ± 71.2
//! ```
//! A warning line follows when the optimizer did not converge, and a note
//! when bins were excluded for non-finite uncertainty.
use crate::{
    inference::{CovarianceEstimate, SignalYield},
    model::params::{N_PARAMS, PARAM_NAMES},
    report::format::{format_fixed, format_g},
};
use ndarray::Array1;

/// One fitted parameter with its standard error.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterLine {
    pub name: String,
    pub value: f64,
    pub std_error: f64,
}

/// Everything printed on the results page.
#[derive(Debug, Clone, PartialEq)]
pub struct FitSummary {
    pub parameters: Vec<ParameterLine>,
    pub chi2: f64,
    pub ndof: usize,
    pub signal_yield: SignalYield,
    pub converged: bool,
    pub status: String,
    pub dropped_bins: usize,
}

impl FitSummary {
    /// Assemble the summary from fitted values and their covariance.
    pub fn new(
        theta_hat: &Array1<f64>, cov: &CovarianceEstimate, signal_yield: SignalYield,
        converged: bool, status: impl Into<String>, dropped_bins: usize,
    ) -> Self {
        let parameters = (0..N_PARAMS.min(theta_hat.len()))
            .map(|k| ParameterLine {
                name: PARAM_NAMES[k].to_string(),
                value: theta_hat[k],
                std_error: cov.std_errors()[k],
            })
            .collect();
        Self {
            parameters,
            chi2: cov.chi2(),
            ndof: cov.ndof(),
            signal_yield,
            converged,
            status: status.into(),
            dropped_bins,
        }
    }

    /// Lines of the results page, top to bottom.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec!["Fit results:".to_string()];
        for p in &self.parameters {
            lines.push(format!("{} = {} ± {}", p.name, format_g(p.value, 4), format_g(p.std_error, 4)));
        }
        lines.push(String::new());
        let ratio = self.chi2 / self.ndof as f64;
        lines.push(format!(
            "Chi2/ndof = {}/{} = {}",
            format_fixed(self.chi2, 2),
            self.ndof,
            format_fixed(ratio, 3)
        ));
        lines.push(format!(
            "Signal yield = {} ± {}",
            format_g(self.signal_yield.value, 4),
            format_g(self.signal_yield.std_error, 4)
        ));
        if !self.converged {
            lines.push(String::new());
            lines.push(format!("Warning: fit did not converge ({})", self.status));
        }
        if self.dropped_bins > 0 {
            lines.push(format!("Excluded bins (non-finite uncertainty): {}", self.dropped_bins));
        }
        lines
    }
}
