//! pipeline::fit — load, fit, infer, and report in one pass.
//!
//! Purpose
//! -------
//! Orchestrate a complete analysis run: resolve the two histograms through a
//! [`HistogramSource`], build the [`BinnedDataset`], fit
//! [`GaussianPeakModel`] with the bounded least-squares engine, derive the
//! covariance and signal yield, and hand the surfaces to a
//! [`ReportRenderer`].
//!
//! Key behaviors
//! -------------
//! - [`initial_guess`]: peak height from the largest retained count, means
//!   at that bin's center, widths at a tenth of each axis range, `B = 1`.
//! - [`parameter_bounds`]: `A ≥ 0`, means inside the histogram extent,
//!   widths in `[1e-6, 10]`, `B ∈ [-10, 10]`.
//! - [`FitPipeline::fit`] stops before rendering; [`FitPipeline::run`]
//!   renders as well. Each stage boundary emits one `tracing` event.
//!
//! Invariants & assumptions
//! ------------------------
//! - Input errors are raised before the optimizer runs.
//! - Too few retained bins for six parameters fails with
//!   `InferenceError::DegenerateFit` before fitting.
//! - The report model surface covers every bin, including dropped ones.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the guess, the bounds, and report surfaces on small
//!   synthetic histograms; end-to-end behavior lives in
//!   `tests/integration_fit_pipeline.rs`.
use crate::{
    dataset::{BinGrid, BinnedDataset},
    histogram::{HistogramSource, Histogram2D},
    inference::{CovarianceEstimate, GoodnessOfFit, InferenceError, SignalYield},
    model::{GaussianPeakModel, ModelParams, N_PARAMS, model_grid},
    optimization::{
        errors::OptResult,
        least_squares::{Bounds, FitOutcome, minimize},
    },
    pipeline::{
        config::FitConfig,
        errors::{PipelineError, PipelineResult},
    },
    report::{
        FitSummary, LegoPanel, RenderedReport, ReportInput, ReportRenderer, TITLE_BKG_SUBTRACTED,
        TITLE_DATA, TITLE_FIT, TITLE_RESIDUALS,
    },
};
use ndarray::{Array1, Array2};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Lower bound on both widths.
pub const MIN_WIDTH: f64 = 1e-6;
/// Upper bound on both widths.
pub const MAX_WIDTH: f64 = 10.0;
/// Symmetric bound on the background scale.
pub const MAX_BKG_SCALE: f64 = 10.0;
/// Initial widths as a fraction of each axis range.
pub const INITIAL_WIDTH_FRACTION: f64 = 0.1;

/// Starting point for the fit.
///
/// Returns `None` when the dataset retains no samples.
pub fn initial_guess(dataset: &BinnedDataset) -> Option<ModelParams> {
    let peak = dataset.max_sample()?;
    let (x_extent, y_extent) = dataset.grid().extent();
    Some(ModelParams::new(
        peak.observed,
        peak.x,
        peak.y,
        INITIAL_WIDTH_FRACTION * x_extent,
        INITIAL_WIDTH_FRACTION * y_extent,
        1.0,
    ))
}

/// Box constraints for `(A, μ1, μ2, σ1, σ2, B)` on `grid`.
///
/// # Errors
/// Propagates [`Bounds::new`] validation.
pub fn parameter_bounds(grid: &BinGrid) -> OptResult<Bounds> {
    let lower = Array1::from(vec![
        0.0,
        grid.x_range.0,
        grid.y_range.0,
        MIN_WIDTH,
        MIN_WIDTH,
        -MAX_BKG_SCALE,
    ]);
    let upper = Array1::from(vec![
        f64::INFINITY,
        grid.x_range.1,
        grid.y_range.1,
        MAX_WIDTH,
        MAX_WIDTH,
        MAX_BKG_SCALE,
    ]);
    Bounds::new(lower, upper)
}

/// Everything known after fitting and inference, before rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct FitResult {
    pub data: Histogram2D,
    pub background: Histogram2D,
    pub dataset: BinnedDataset,
    pub outcome: FitOutcome,
    pub params: ModelParams,
    pub covariance: CovarianceEstimate,
    pub signal_yield: SignalYield,
    pub goodness: GoodnessOfFit,
}

impl FitResult {
    /// Best-fit expected counts on every bin.
    pub fn model_surface(&self) -> Array2<f64> {
        model_grid(&self.params, self.dataset.grid(), self.background.contents())
    }

    /// Results-page content.
    pub fn summary(&self) -> FitSummary {
        FitSummary::new(
            &self.outcome.theta_hat,
            &self.covariance,
            self.signal_yield,
            self.outcome.converged,
            self.outcome.status.clone(),
            self.dataset.dropped().len(),
        )
    }

    /// The four report surfaces: data, fit, `data − fit`, and
    /// `data − B·background`.
    pub fn report_input(&self) -> ReportInput {
        let data = self.data.contents();
        let model = self.model_surface();
        let residuals = data - &model;
        let bkg_subtracted =
            data - &self.background.contents().mapv(|b| b * self.params.background_scale);
        ReportInput {
            panels: [
                LegoPanel::new(TITLE_DATA, data.clone()),
                LegoPanel::new(TITLE_FIT, model),
                LegoPanel::new(TITLE_RESIDUALS, residuals),
                LegoPanel::new(TITLE_BKG_SUBTRACTED, bkg_subtracted),
            ],
            summary: self.summary(),
        }
    }
}

/// A finished run: the fit plus where and how the report was written.
#[derive(Debug, Clone, PartialEq)]
pub struct FitReport {
    pub fit: FitResult,
    pub output_path: PathBuf,
    pub rendered: RenderedReport,
}

/// `FitPipeline` — configuration plus its two collaborators.
#[derive(Debug, Clone)]
pub struct FitPipeline<S, R> {
    config: FitConfig,
    source: S,
    renderer: R,
}

impl<S: HistogramSource, R: ReportRenderer> FitPipeline<S, R> {
    /// # Errors
    /// `PipelineError::InvalidConfig` if `config` fails validation.
    pub fn new(config: FitConfig, source: S, renderer: R) -> PipelineResult<Self> {
        config.validate()?;
        Ok(Self { config, source, renderer })
    }

    pub fn config(&self) -> &FitConfig {
        &self.config
    }

    /// Resolve the data and background histograms.
    ///
    /// # Errors
    /// `PipelineError::Histogram` for a missing or malformed histogram.
    pub fn load(&self) -> PipelineResult<(Histogram2D, Histogram2D)> {
        let data = self.source.histogram(&self.config.data_name)?;
        let background = self.source.histogram(&self.config.background_name)?;
        let (nx, ny) = data.shape();
        info!(data = %self.config.data_name, background = %self.config.background_name, nx, ny,
            "histograms loaded");
        Ok((data, background))
    }

    /// Load, fit, and infer without rendering.
    ///
    /// # Errors
    /// - Input errors from loading or building the dataset.
    /// - `InferenceError::DegenerateFit` for fewer than seven retained bins.
    /// - Optimizer errors, and `NonConvergence` when required.
    /// - `InferenceError::SingularCovariance` for a rank-deficient fit.
    pub fn fit(&self) -> PipelineResult<FitResult> {
        let (data, background) = self.load()?;

        let dataset = BinnedDataset::build(&data, &background)?;
        if !dataset.dropped().is_empty() {
            warn!(dropped = dataset.dropped().len(), "bins excluded for non-finite uncertainty");
            debug!(indices = ?dataset.dropped(), "excluded bins");
        }
        info!(samples = dataset.len(), "dataset built");

        if dataset.len() <= N_PARAMS {
            return Err(InferenceError::DegenerateFit {
                n_samples: dataset.len(),
                n_params: N_PARAMS,
            }
            .into());
        }
        let guess = initial_guess(&dataset).ok_or(InferenceError::DegenerateFit {
            n_samples: 0,
            n_params: N_PARAMS,
        })?;
        let bounds = parameter_bounds(dataset.grid())?;
        debug!(theta0 = ?guess.to_array(), "initial guess");

        let outcome = minimize(
            &GaussianPeakModel::new(),
            guess.to_theta(),
            bounds,
            &dataset,
            &self.config.options,
        )?;
        if outcome.converged {
            info!(chi2 = outcome.chi2, iterations = outcome.iterations, status = %outcome.status,
                "fit converged");
        } else if self.config.require_convergence {
            return Err(PipelineError::NonConvergence {
                status: outcome.status,
                iterations: outcome.iterations,
            });
        } else {
            warn!(chi2 = outcome.chi2, iterations = outcome.iterations, status = %outcome.status,
                "fit did not converge; reporting last best parameters");
        }

        let params = ModelParams::from_theta(&outcome.theta_hat)?;
        let covariance = CovarianceEstimate::from_jacobian(&outcome.jacobian, &outcome.residuals)?;
        let signal_yield = SignalYield::from_fit(&params, &covariance)?;
        let goodness = GoodnessOfFit::from_covariance(&covariance)?;
        info!(
            signal_yield = signal_yield.value,
            yield_error = signal_yield.std_error,
            reduced_chi2 = goodness.reduced_chi2,
            p_value = goodness.p_value,
            "inference done"
        );

        Ok(FitResult {
            data,
            background,
            dataset,
            outcome,
            params,
            covariance,
            signal_yield,
            goodness,
        })
    }

    /// Fit and render the report to `config.output_path`.
    ///
    /// # Errors
    /// Anything from [`FitPipeline::fit`], plus `PipelineError::Report`.
    /// A failed render leaves no file at the output path.
    pub fn run(&self) -> PipelineResult<FitReport> {
        let fit = self.fit()?;
        let path = self.config.output_path.clone();
        let rendered = self.renderer.render(&fit.report_input(), &path)?;
        info!(path = %path.display(), pages = rendered.pages, bytes = rendered.bytes,
            "report written");
        Ok(FitReport { fit, output_path: path, rendered })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        histogram::InMemoryHistogramSource,
        report::{ReportError, ReportResult},
    };
    use approx::assert_relative_eq;
    use ndarray::{Array2, array};
    use std::path::Path;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Initial guess and parameter bounds.
    // - Early failures: degenerate datasets and unusable configuration.
    // - Report surfaces of a noise-free fit, through a recording renderer.
    // -------------------------------------------------------------------------

    fn hist(contents: Array2<f64>) -> Histogram2D {
        let (nx, ny) = contents.dim();
        let xe = Array1::linspace(0.0, nx as f64, nx + 1);
        let ye = Array1::linspace(0.0, ny as f64, ny + 1);
        Histogram2D::new(contents, xe, ye).unwrap()
    }

    fn truth() -> ModelParams {
        ModelParams::new(200.0, 3.6, 4.3, 1.1, 0.9, 1.0)
    }

    fn noise_free_source() -> InMemoryHistogramSource {
        let bkg = Array2::from_shape_fn((8, 8), |(i, j)| 10.0 + i as f64 + 0.5 * j as f64);
        let bkg_hist = hist(bkg.clone());
        let grid = BinGrid::from_histogram(&bkg_hist).unwrap();
        let data = model_grid(&truth(), &grid, &bkg);
        InMemoryHistogramSource::new().with("hdata", hist(data)).with("hbkg", bkg_hist)
    }

    /// Renderer that validates its input but never touches the filesystem.
    struct NullRenderer;

    impl ReportRenderer for NullRenderer {
        fn render(&self, input: &ReportInput, _path: &Path) -> ReportResult<RenderedReport> {
            input.validate()?;
            Ok(RenderedReport { pages: 2, bytes: 0 })
        }
    }

    #[test]
    // Purpose
    // -------
    // The guess starts at the largest retained bin with widths at a tenth
    // of the range, and the bounds follow the grid extent.
    fn guess_and_bounds_follow_dataset() {
        // Arrange
        let data = hist(array![[1.0, 2.0, 3.0], [9.0, 4.0, f64::NAN]]);
        let bkg = hist(Array2::ones((2, 3)));
        let ds = BinnedDataset::build(&data, &bkg).unwrap();

        // Act
        let guess = initial_guess(&ds).unwrap();
        let bounds = parameter_bounds(ds.grid()).unwrap();

        // Assert
        for (got, want) in guess.to_array().iter().zip([9.0, 1.5, 0.5, 0.2, 0.3, 1.0]) {
            assert_relative_eq!(*got, want, max_relative = 1e-12);
        }
        assert_eq!(bounds.lower(), &array![0.0, 0.0, 0.0, 1e-6, 1e-6, -10.0]);
        assert_eq!(bounds.upper(), &array![f64::INFINITY, 2.0, 3.0, 10.0, 10.0, 10.0]);
    }

    #[test]
    // Purpose
    // -------
    // Six or fewer retained bins fail as a degenerate fit before the
    // optimizer runs, and bad configuration is rejected at construction.
    fn degenerate_dataset_and_bad_config_fail_early() {
        let source = InMemoryHistogramSource::new()
            .with("hdata", hist(Array2::ones((2, 3))))
            .with("hbkg", hist(Array2::ones((2, 3))));
        let pipeline = FitPipeline::new(FitConfig::default(), source.clone(), NullRenderer).unwrap();

        assert!(matches!(
            pipeline.fit(),
            Err(PipelineError::Inference(InferenceError::DegenerateFit { n_samples: 6, n_params: 6 }))
        ));

        let bad = FitConfig { data_name: String::new(), ..FitConfig::default() };
        assert!(matches!(
            FitPipeline::new(bad, source, NullRenderer),
            Err(PipelineError::InvalidConfig { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // A noise-free fit reproduces the data surface, so the residual panel is
    // numerically zero and the background-subtracted panel equals the signal.
    fn report_surfaces_of_noise_free_fit() {
        // Arrange
        let pipeline = FitPipeline::new(FitConfig::default(), noise_free_source(), NullRenderer)
            .unwrap();

        // Act
        let report = pipeline.run().unwrap();
        let input = report.fit.report_input();

        // Assert
        assert!(report.fit.outcome.converged);
        assert_eq!(report.output_path, PathBuf::from("ex3.pdf"));
        let [data, fit, residuals, bkg_sub] = &input.panels;
        assert_eq!(data.title, TITLE_DATA);
        for ((d, m), r) in data.values.iter().zip(fit.values.iter()).zip(residuals.values.iter()) {
            assert_relative_eq!(*d, *m, max_relative = 1e-6);
            assert!(r.abs() < 1e-4);
        }
        let signal = crate::model::signal_grid(&truth(), report.fit.dataset.grid());
        for (b, s) in bkg_sub.values.iter().zip(signal.iter()) {
            assert_relative_eq!(*b, *s, epsilon = 1e-4);
        }
    }

    #[test]
    // Purpose
    // -------
    // Renderer failures surface as `PipelineError::Report`.
    fn renderer_errors_are_wrapped() {
        struct Failing;
        impl ReportRenderer for Failing {
            fn render(&self, _: &ReportInput, _: &Path) -> ReportResult<RenderedReport> {
                Err(ReportError::Layout { reason: "no room".to_string() })
            }
        }
        let pipeline =
            FitPipeline::new(FitConfig::default(), noise_free_source(), Failing).unwrap();

        assert_eq!(
            pipeline.run().unwrap_err(),
            PipelineError::Report(ReportError::Layout { reason: "no room".to_string() })
        );
    }
}
