// ==============================================================================
// generate_plots.rs - Plot Generator Entry Point
// ==============================================================================
// Description: Renders Manhattan, Q-Q, PCA and missingness plots for a GWAS run
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================
// Individual plot failures are reported and do not change the exit status.
// The run fails only if the output directory cannot be created.
// ==============================================================================

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

use gwas_report::cli::{init_tracing, parse_args};
use gwas_report::config::{
    default_analyses, Analysis, PlotConfig, DEFAULT_DPI, DEFAULT_IMISS_FILE, DEFAULT_LMISS_FILE,
    DEFAULT_PCA_FILE,
};
use gwas_report::orchestrator::PlotGenerator;
use gwas_report::plots::PngRenderer;
use gwas_report::stats::{GenomicControl, LambdaMethod};

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate GWAS visualization plots", long_about = None)]
struct Args {
    /// Directory holding the association results
    assoc_dir: PathBuf,

    /// Directory holding the PCA and missingness reports
    qc_dir: PathBuf,

    /// Directory for the PNG files (created if missing)
    output_dir: PathBuf,

    /// Raster resolution (10 to 1200)
    #[arg(
        long,
        env = "GWAS_REPORT_DPI",
        default_value_t = DEFAULT_DPI,
        value_parser = clap::value_parser!(u32).range(10..=1200)
    )]
    dpi: u32,

    /// Association file and label as FILE=LABEL (repeatable; replaces the defaults)
    #[arg(long = "analysis", value_name = "FILE=LABEL")]
    analyses: Vec<Analysis>,

    /// PCA eigenvector file name in the QC directory
    #[arg(long, env = "GWAS_REPORT_PCA_FILE", default_value = DEFAULT_PCA_FILE)]
    pca_file: String,

    /// Per-variant missingness file name in the QC directory
    #[arg(long, env = "GWAS_REPORT_LMISS_FILE", default_value = DEFAULT_LMISS_FILE)]
    lmiss_file: String,

    /// Per-individual missingness file name in the QC directory
    #[arg(long, env = "GWAS_REPORT_IMISS_FILE", default_value = DEFAULT_IMISS_FILE)]
    imiss_file: String,

    /// Genomic inflation estimator
    #[arg(long, env = "GWAS_REPORT_LAMBDA_METHOD", value_enum, default_value_t = LambdaMethod::default())]
    lambda_method: LambdaMethod,

    /// Seed for the resampled estimator
    #[arg(long, env = "GWAS_REPORT_SEED")]
    seed: Option<u64>,
}

impl Args {
    fn plot_config(&self) -> PlotConfig {
        let analyses = if self.analyses.is_empty() {
            default_analyses()
        } else {
            self.analyses.clone()
        };

        PlotConfig {
            analyses,
            pca_file: self.pca_file.clone(),
            lmiss_file: self.lmiss_file.clone(),
            imiss_file: self.imiss_file.clone(),
            dpi: self.dpi,
            genomic_control: GenomicControl::new(self.lambda_method, self.seed),
        }
    }
}

fn main() -> ExitCode {
    init_tracing("gwas_report=info,generate_plots=info");

    let args: Args = parse_args();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Plot generation failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = args.plot_config();
    config.validate()?;

    info!("GWAS Visualization and Reporting");
    info!("Analyses: {}", config.analyses.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "));

    let renderer = PngRenderer::new(config.dpi, config.genomic_control);
    let generator = PlotGenerator::new(renderer, config);
    let report = generator.run(&args.assoc_dir, &args.qc_dir, &args.output_dir)?;

    println!();
    println!("{}", report);
    println!("All plots saved to: {}", args.output_dir.display());

    Ok(())
}
