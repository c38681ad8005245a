//! Fixed-configuration analysis run: fit `hdata` over `hbkg` from
//! `fitInputs.json` and write the report to `ex3.pdf`.
use peakfit2d::{
    histogram::JsonHistogramFile,
    pipeline::{FitConfig, FitPipeline, PipelineResult},
    report::PdfReportRenderer,
};
use std::process::ExitCode;
use tracing::{Level, error};

fn run() -> PipelineResult<std::path::PathBuf> {
    let config = FitConfig::default();
    let source = JsonHistogramFile::open(&config.input_path)?;
    let pipeline = FitPipeline::new(config, source, PdfReportRenderer::default())?;
    Ok(pipeline.run()?.output_path)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_max_level(Level::INFO).with_target(false).init();

    match run() {
        Ok(path) => {
            println!("Fit done. Results saved in {}", path.display());
            ExitCode::SUCCESS
        }
        Err(err) if err.is_singular_covariance() => {
            error!(%err, "fit finished but parameter uncertainties are undefined");
            ExitCode::from(2)
        }
        Err(err) => {
            error!(%err, "fit failed");
            ExitCode::FAILURE
        }
    }
}
