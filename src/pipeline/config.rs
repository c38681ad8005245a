//! pipeline::config — explicit configuration of one fit run.
//!
//! All inputs of a run live in [`FitConfig`] and are passed at construction;
//! nothing is read from the environment. [`FitConfig::default`] reproduces
//! the fixed analysis: `hdata` over `hbkg` from `fitInputs.json`, report to
//! `ex3.pdf`.
use crate::{
    optimization::least_squares::FitOptions,
    pipeline::errors::{PipelineError, PipelineResult},
};
use std::path::PathBuf;

pub const DEFAULT_INPUT_PATH: &str = "fitInputs.json";
pub const DEFAULT_DATA_NAME: &str = "hdata";
pub const DEFAULT_BACKGROUND_NAME: &str = "hbkg";
pub const DEFAULT_OUTPUT_PATH: &str = "ex3.pdf";

/// `FitConfig` — inputs and outputs of one run plus optimizer settings.
///
/// Fields
/// ------
/// - `input_path`: JSON histogram store.
/// - `data_name` / `background_name`: histogram names inside the store.
/// - `output_path`: destination of the PDF report.
/// - `options`: optimizer tolerances, Jacobian method, damping.
/// - `require_convergence`: fail with `PipelineError::NonConvergence`
///   instead of reporting a non-converged fit.
#[derive(Debug, Clone, PartialEq)]
pub struct FitConfig {
    pub input_path: PathBuf,
    pub data_name: String,
    pub background_name: String,
    pub output_path: PathBuf,
    pub options: FitOptions,
    pub require_convergence: bool,
}

impl FitConfig {
    /// Check that names and the output path are usable.
    ///
    /// # Errors
    /// `PipelineError::InvalidConfig` naming the offending field.
    pub fn validate(&self) -> PipelineResult<()> {
        if self.data_name.trim().is_empty() {
            return Err(invalid("data_name", "histogram name must not be empty"));
        }
        if self.background_name.trim().is_empty() {
            return Err(invalid("background_name", "histogram name must not be empty"));
        }
        if self.data_name == self.background_name {
            return Err(invalid("background_name", "must differ from data_name"));
        }
        if self.output_path.file_name().is_none() {
            return Err(invalid("output_path", "must name a file"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> PipelineError {
    PipelineError::InvalidConfig { field, reason: reason.to_string() }
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            data_name: DEFAULT_DATA_NAME.to_string(),
            background_name: DEFAULT_BACKGROUND_NAME.to_string(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            options: FitOptions::default(),
            require_convergence: false,
        }
    }
}
