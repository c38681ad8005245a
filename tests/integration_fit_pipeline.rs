//! End-to-end tests of the histogram fit pipeline.
//!
//! Scope
//! -----
//! - Noise-free parameter recovery and chi-square.
//! - Standard-error calibration over repeated Gaussian-noise trials.
//! - Seeded Poisson scenarios (flat and sloped backgrounds) rendered to a
//!   two-page PDF, one of them read back from a JSON store.
//! - Filtering of non-finite bins, input errors, singular curvature, and
//!   output failures that must leave no document behind.
use approx::assert_relative_eq;
use ndarray::{Array1, Array2};
use peakfit2d::{
    dataset::BinGrid,
    histogram::{HistError, Histogram2D, InMemoryHistogramSource, JsonHistogramFile},
    inference::{InferenceError, SignalYield},
    model::{ModelParams, model_grid},
    optimization::least_squares::{FitOptions, Tolerances},
    pipeline::{FitConfig, FitPipeline, FitResult, PipelineError},
    report::{
        PdfReportRenderer, RenderedReport, ReportInput, ReportRenderer, ReportResult,
    },
};
use rand::{SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, Normal, Poisson};
use std::path::{Path, PathBuf};

const N_BINS: usize = 10;

fn edges() -> Array1<f64> {
    Array1::linspace(0.0, 10.0, N_BINS + 1)
}

fn hist(contents: Array2<f64>) -> Histogram2D {
    Histogram2D::new(contents, edges(), edges()).unwrap()
}

/// Smooth, strictly positive background template.
fn background() -> Array2<f64> {
    Array2::from_shape_fn((N_BINS, N_BINS), |(i, j)| 20.0 + 0.8 * i as f64 - 0.5 * j as f64)
}

fn truth() -> ModelParams {
    ModelParams::new(400.0, 5.2, 4.8, 1.5, 1.2, 1.0)
}

fn expected(p: &ModelParams, bkg: &Array2<f64>) -> Array2<f64> {
    let grid = BinGrid::from_histogram(&hist(bkg.clone())).unwrap();
    model_grid(p, &grid, bkg)
}

fn source(data: Array2<f64>, bkg: Array2<f64>) -> InMemoryHistogramSource {
    InMemoryHistogramSource::new().with("hdata", hist(data)).with("hbkg", hist(bkg))
}

/// Renderer used when only the fit matters.
struct NoOutput;

impl ReportRenderer for NoOutput {
    fn render(&self, input: &ReportInput, _path: &Path) -> ReportResult<RenderedReport> {
        input.validate()?;
        Ok(RenderedReport { pages: 2, bytes: 0 })
    }
}

fn fit(data: Array2<f64>, bkg: Array2<f64>) -> Result<FitResult, PipelineError> {
    FitPipeline::new(FitConfig::default(), source(data, bkg), NoOutput)?.fit()
}

#[test]
// Purpose
// -------
// Data generated exactly from the model is recovered to 1e-6 relative with
// chi-square near zero.
//
// Given
// -----
// - A 10×10 grid with the noise-free expectation as data.
//
// Expect
// ------
// - Every parameter within 1e-6 relative of the truth and `chi2 < 1e-8`.
// - The yield equals `π·A·σ1·σ2` at the fitted parameters.
fn noise_free_data_recovers_truth() {
    // Arrange
    let bkg = background();
    let data = expected(&truth(), &bkg);

    // Act
    let result = fit(data, bkg).unwrap();

    // Assert
    assert!(result.outcome.converged, "status: {}", result.outcome.status);
    for (got, want) in result.params.to_array().iter().zip(truth().to_array()) {
        assert_relative_eq!(*got, want, max_relative = 1e-6);
    }
    assert!(result.outcome.chi2 < 1e-8, "chi2 = {}", result.outcome.chi2);
    assert_eq!(result.covariance.ndof(), N_BINS * N_BINS - 6);
    assert_eq!(result.signal_yield.value, SignalYield::integral(&result.params));
}

#[test]
// Purpose
// -------
// Reported standard errors are calibrated: across repeated Gaussian-noise
// trials the truth falls within ±1σ roughly 68% of the time.
//
// Given
// -----
// - 100 seeded trials with noise `N(0, sqrt(expected))` per bin.
//
// Expect
// ------
// - Coverage of `A` and of `μ1` each in `[0.55, 0.80]`.
fn standard_errors_are_calibrated_under_gaussian_noise() {
    // Arrange
    let bkg = background();
    let mean = expected(&truth(), &bkg);
    let mut rng = StdRng::seed_from_u64(7);
    let trials = 100;
    let (mut covered_a, mut covered_mu) = (0usize, 0usize);

    // Act
    for _ in 0..trials {
        let data = mean.mapv(|m| {
            let noise = Normal::new(0.0, m.max(1.0).sqrt()).unwrap();
            m + noise.sample(&mut rng)
        });
        let result = fit(data, bkg.clone()).unwrap();
        let se = result.covariance.std_errors();
        if (result.params.amplitude - truth().amplitude).abs() <= se[0] {
            covered_a += 1;
        }
        if (result.params.mean_x - truth().mean_x).abs() <= se[1] {
            covered_mu += 1;
        }
    }

    // Assert
    let coverage_a = covered_a as f64 / trials as f64;
    let coverage_mu = covered_mu as f64 / trials as f64;
    assert!((0.55..=0.80).contains(&coverage_a), "A coverage {coverage_a}");
    assert!((0.55..=0.80).contains(&coverage_mu), "mu1 coverage {coverage_mu}");
}

#[test]
// Purpose
// -------
// A seeded Poisson sample read from a JSON store is fitted accurately and
// rendered to a two-page PDF.
//
// Given
// -----
// - Poisson counts around the truth (StdRng seed 42), both histograms
//   written to `fitInputs.json` in a temp directory.
//
// Expect
// ------
// - `A` within 10%, means within 0.2 bin widths, `B` within 0.1.
// - The PDF exists, declares two pages, and nothing else is left behind.
fn seeded_poisson_scenario_end_to_end() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let bkg = background();
    let mean = expected(&truth(), &bkg);
    let mut rng = StdRng::seed_from_u64(42);
    let data = mean.mapv(|m| {
        let k: f64 = Poisson::new(m).unwrap().sample(&mut rng);
        k
    });
    let input_path = dir.path().join("fitInputs.json");
    let (data_hist, bkg_hist) = (hist(data), hist(bkg));
    JsonHistogramFile::write(&input_path, [("hdata", &data_hist), ("hbkg", &bkg_hist)]).unwrap();
    let config = FitConfig {
        input_path: input_path.clone(),
        output_path: dir.path().join("ex3.pdf"),
        ..FitConfig::default()
    };

    // Act
    let store = JsonHistogramFile::open(&config.input_path).unwrap();
    let report = FitPipeline::new(config, store, PdfReportRenderer::default()).unwrap().run().unwrap();

    // Assert
    let p = report.fit.params;
    let t = truth();
    assert_relative_eq!(p.amplitude, t.amplitude, max_relative = 0.10);
    assert!((p.mean_x - t.mean_x).abs() < 0.2, "mu1 = {}", p.mean_x);
    assert!((p.mean_y - t.mean_y).abs() < 0.2, "mu2 = {}", p.mean_y);
    assert!((p.background_scale - t.background_scale).abs() < 0.1, "B = {}", p.background_scale);
    assert!(report.fit.signal_yield.std_error > 0.0);

    let bytes = std::fs::read(&report.output_path).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
    assert!(String::from_utf8_lossy(&bytes).contains("/Count 2"));
    assert_eq!(report.rendered.pages, 2);
    let mut names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["ex3.pdf".to_string(), "fitInputs.json".to_string()]);
}

#[test]
// Purpose
// -------
// The reference scenario: a peak of 500 over a flat background of 100 per
// bin is recovered from seeded Poisson counts and rendered to two pages.
//
// Given
// -----
// - 10×10 unit bins, background 100 everywhere, `A = 500` centered on bin
//   (5, 5) with unit widths, `B = 1`, Poisson noise from StdRng seed 42.
//
// Expect
// ------
// - `A` within ±10%, `μ1`/`μ2` within ±0.2 bin widths, `B` within ±0.1.
// - A converged fit and a two-page PDF.
fn flat_background_reference_scenario() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let bkg = Array2::from_elem((N_BINS, N_BINS), 100.0);
    let e = edges();
    let peak_center = 0.5 * (e[5] + e[6]);
    let t = ModelParams::new(500.0, peak_center, peak_center, 1.0, 1.0, 1.0);
    let mean = expected(&t, &bkg);
    let mut rng = StdRng::seed_from_u64(42);
    let data = mean.mapv(|m| -> f64 { Poisson::new(m).unwrap().sample(&mut rng) });
    let config = FitConfig { output_path: dir.path().join("ex3.pdf"), ..FitConfig::default() };
    let pipeline =
        FitPipeline::new(config, source(data, bkg), PdfReportRenderer::default()).unwrap();

    // Act
    let report = pipeline.run().unwrap();

    // Assert
    let p = report.fit.params;
    let bin_width = 1.0;
    assert!(report.fit.outcome.converged, "status: {}", report.fit.outcome.status);
    assert_relative_eq!(p.amplitude, 500.0, max_relative = 0.10);
    assert_eq!(peak_center, 5.5);
    assert!((p.mean_x - peak_center).abs() <= 0.2 * bin_width, "mu1 = {}", p.mean_x);
    assert!((p.mean_y - peak_center).abs() <= 0.2 * bin_width, "mu2 = {}", p.mean_y);
    assert!((p.background_scale - 1.0).abs() <= 0.1, "B = {}", p.background_scale);
    assert_eq!(report.rendered.pages, 2);
    let bytes = std::fs::read(&report.output_path).unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("/Count 2"));
}

#[test]
// Purpose
// -------
// A single NaN data bin is excluded without error and noted in the summary.
fn nan_bin_is_dropped_exactly_once() {
    let bkg = background();
    let mut data = expected(&truth(), &bkg);
    data[[2, 7]] = f64::NAN;

    let result = fit(data, bkg).unwrap();

    assert_eq!(result.dataset.len(), N_BINS * N_BINS - 1);
    assert_eq!(result.dataset.dropped(), &[(2, 7)]);
    assert_eq!(result.covariance.ndof(), N_BINS * N_BINS - 1 - 6);
    assert!(
        result
            .summary()
            .lines()
            .contains(&"Excluded bins (non-finite uncertainty): 1".to_string())
    );
}

#[test]
// Purpose
// -------
// Missing histograms and mismatched binning fail as input errors before the
// fit, and no report is written.
fn input_errors_fail_before_fitting() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("ex3.pdf");
    let config = FitConfig { output_path: output_path.clone(), ..FitConfig::default() };
    let only_data = InMemoryHistogramSource::new().with("hdata", hist(background()));
    let coarse = Histogram2D::new(
        Array2::ones((5, N_BINS)),
        Array1::linspace(0.0, 10.0, 6),
        edges(),
    )
    .unwrap();
    let mismatched = InMemoryHistogramSource::new()
        .with("hdata", hist(background()))
        .with("hbkg", coarse);

    // Act
    let missing = FitPipeline::new(config.clone(), only_data, PdfReportRenderer::default())
        .unwrap()
        .run();
    let binning = FitPipeline::new(config, mismatched, PdfReportRenderer::default())
        .unwrap()
        .run();

    // Assert
    assert_eq!(
        missing.unwrap_err(),
        PipelineError::Histogram(HistError::MissingHistogram { name: "hbkg".to_string() })
    );
    assert!(matches!(
        binning.unwrap_err(),
        PipelineError::Histogram(HistError::BinningMismatch { .. })
    ));
    assert!(!output_path.exists());
}

#[test]
// Purpose
// -------
// An empty background template leaves `B` unconstrained; the fit runs but
// its covariance is reported as singular.
fn zero_background_template_gives_singular_covariance() {
    let bkg = Array2::zeros((N_BINS, N_BINS));
    let data = expected(&truth(), &bkg);

    let err = fit(data, bkg).unwrap_err();

    assert!(err.is_singular_covariance(), "{err}");
    assert!(matches!(err, PipelineError::Inference(InferenceError::SingularCovariance { .. })));
}

#[test]
// Purpose
// -------
// Requiring convergence turns an iteration-capped fit into an error.
fn required_convergence_rejects_capped_fit() {
    let bkg = background();
    let data = expected(&truth(), &bkg);
    let tols = Tolerances::new(Some(1e-14), Some(1e-14), Some(1e-14), Some(1)).unwrap();
    let config = FitConfig {
        options: FitOptions { tols, ..FitOptions::default() },
        require_convergence: true,
        ..FitConfig::default()
    };

    let err = FitPipeline::new(config, source(data, bkg), NoOutput).unwrap().fit().unwrap_err();

    assert!(matches!(err, PipelineError::NonConvergence { .. }), "{err}");
}

#[test]
// Purpose
// -------
// A report that cannot be written leaves neither the document nor a
// temporary file behind.
fn failed_write_leaves_no_document() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let output_path: PathBuf = dir.path().join("missing").join("ex3.pdf");
    let bkg = background();
    let config = FitConfig { output_path: output_path.clone(), ..FitConfig::default() };
    let pipeline = FitPipeline::new(
        config,
        source(expected(&truth(), &bkg), bkg),
        PdfReportRenderer::default(),
    )
    .unwrap();

    // Act
    let err = pipeline.run().unwrap_err();

    // Assert
    assert!(matches!(err, PipelineError::Report(_)), "{err}");
    assert!(!output_path.exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
