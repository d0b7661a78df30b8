// ==============================================================================
// extract_top_snps.rs - SNP Extractor Entry Point
// ==============================================================================
// Description: Extracts top-ranked and significant SNPs from a PLINK
//              association file into tab-separated tables
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

use gwas_report::cli::{init_tracing, parse_args};
use gwas_report::config::{ExtractConfig, DEFAULT_N_TOP};
use gwas_report::extractor::SnpExtractor;

#[derive(Parser, Debug)]
#[command(author, version, about = "Extract top SNPs from PLINK association results", long_about = None)]
struct Args {
    /// Association results file (.assoc)
    input_assoc_file: PathBuf,

    /// Directory for the extracted tables (created if missing)
    output_directory: PathBuf,

    /// Number of top-ranked SNPs written to top_1000_snps.txt
    #[arg(default_value_t = DEFAULT_N_TOP)]
    n_top: usize,

    /// P-value column name tried before 'P' and column index 8
    #[arg(long, env = "GWAS_REPORT_P_COLUMN")]
    p_column: Option<String>,
}

fn main() -> ExitCode {
    init_tracing("gwas_report=info,extract_top_snps=info");

    let args: Args = parse_args();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Extraction failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = ExtractConfig {
        n_top: args.n_top,
        p_column: args.p_column,
    };

    let summary = SnpExtractor::new(config).extract(&args.input_assoc_file, &args.output_directory)?;

    println!();
    println!("=== Summary ===");
    println!("Total SNPs:              {}", summary.total);
    println!("Valid p-values:          {}", summary.valid);
    println!("Genome-wide significant: {}", summary.genome_wide);
    println!("Suggestive:              {}", summary.suggestive);
    for file in &summary.files {
        println!("  {}", file.display());
    }

    Ok(())
}
