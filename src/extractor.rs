// ==============================================================================
// extractor.rs - Top SNP Extraction
// ==============================================================================
// Description: Ranks association results by p-value and writes the top-N,
//              top-100, genome-wide, suggestive and summary tables
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================
// Outputs (all tab-separated with header, written into the output directory):
//   top_1000_snps.txt                      first n_top rows by ascending p
//   top_100_snps.txt                       first 100 rows by ascending p
//   genome_wide_significant_snps_5e-8.txt  p < 5e-8, input order
//   suggestive_snps_1e-5.txt               p < 1e-5, input order
//   summary_statistics.txt                 CHR SNP BP A1 P, input order
// ==============================================================================

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::config::ExtractConfig;
use crate::models::Significance;
use crate::output::{write_table, TsvWriter};
use crate::parsers::assoc::{sort_by_p_value, P_VALUE_COLUMN};
use crate::parsers::{AssocParser, AssocTable, PValueResolver, ScoredRecord};

pub const TOP_N_FILE: &str = "top_1000_snps.txt";
pub const TOP_100_FILE: &str = "top_100_snps.txt";
pub const GENOME_WIDE_FILE: &str = "genome_wide_significant_snps_5e-8.txt";
pub const SUGGESTIVE_FILE: &str = "suggestive_snps_1e-5.txt";
pub const SUMMARY_FILE: &str = "summary_statistics.txt";

/// Rows in the fixed top-100 table
const TOP_100: usize = 100;

/// Columns projected into the summary table (p-value appended as `P`)
const SUMMARY_COLUMNS: [&str; 4] = ["CHR", "SNP", "BP", "A1"];

/// Counts reported after an extraction run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtractionSummary {
    /// Rows in the input table
    pub total: usize,
    /// Rows with a usable p-value
    pub valid: usize,
    pub top_n: usize,
    pub top_100: usize,
    pub genome_wide: usize,
    pub suggestive: usize,
    /// Files written successfully
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Serialize)]
struct SummaryRow<'a> {
    chr: &'a str,
    snp: &'a str,
    bp: &'a str,
    a1: &'a str,
    p: &'a str,
}

/// Top SNP extractor
pub struct SnpExtractor {
    config: ExtractConfig,
}

impl SnpExtractor {
    pub fn new(config: ExtractConfig) -> Self {
        Self { config }
    }

    /// Run the full extraction
    ///
    /// A parse failure aborts before any file is written. After a successful
    /// parse every output step is attempted; if any of them fail, the error
    /// lists each failed step.
    pub fn extract(&self, input: &Path, output_dir: &Path) -> Result<ExtractionSummary> {
        info!("Reading association file: {:?}", input);

        let resolver = match &self.config.p_column {
            Some(name) => PValueResolver::with_preferred_name(name.clone()),
            None => PValueResolver::default(),
        };
        let table = AssocParser::new(resolver)
            .parse(input)
            .with_context(|| format!("Failed to read association file {:?}", input))?;

        info!("Total SNPs in file: {}", table.len());
        info!(
            "Using p-value column '{}' ({})",
            table.p_column.name, table.p_column.strategy
        );

        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create output directory {:?}", output_dir))?;

        let cleaned = table.cleaned();
        info!(
            "SNPs with valid p-values: {} ({} missing, {} non-positive)",
            cleaned.len(),
            table.missing_count(),
            table.non_positive_count()
        );

        let mut sorted = cleaned.clone();
        sort_by_p_value(&mut sorted);

        let genome_wide: Vec<ScoredRecord<'_>> = cleaned
            .iter()
            .copied()
            .filter(|r| Significance::classify(r.p_value) == Significance::GenomeWide)
            .collect();
        let suggestive: Vec<ScoredRecord<'_>> = cleaned
            .iter()
            .copied()
            .filter(|r| Significance::classify(r.p_value) != Significance::NotSignificant)
            .collect();

        let mut summary = ExtractionSummary {
            total: table.len(),
            valid: cleaned.len(),
            genome_wide: genome_wide.len(),
            suggestive: suggestive.len(),
            ..ExtractionSummary::default()
        };
        let mut failures: Vec<String> = Vec::new();

        let n_top = self.config.n_top;
        let steps: [(&str, &[ScoredRecord<'_>]); 4] = [
            (TOP_N_FILE, &sorted[..n_top.min(sorted.len())]),
            (TOP_100_FILE, &sorted[..TOP_100.min(sorted.len())]),
            (GENOME_WIDE_FILE, genome_wide.as_slice()),
            (SUGGESTIVE_FILE, suggestive.as_slice()),
        ];

        for (file_name, records) in steps {
            let path = output_dir.join(file_name);
            match write_records(&path, &table, records) {
                Ok(rows) => {
                    info!("Saved {} SNPs to: {:?}", rows, path);
                    match file_name {
                        TOP_N_FILE => summary.top_n = rows,
                        TOP_100_FILE => summary.top_100 = rows,
                        _ => {}
                    }
                    summary.files.push(path);
                }
                Err(e) => {
                    error!("Failed to write {}: {:#}", file_name, e);
                    failures.push(format!("{}: {:#}", file_name, e));
                }
            }
        }

        info!("Genome-wide significant SNPs (p<5e-8): {}", summary.genome_wide);
        info!("Suggestive SNPs (p<1e-5): {}", summary.suggestive);

        let summary_path = output_dir.join(SUMMARY_FILE);
        match write_summary(&summary_path, &table, &cleaned) {
            Ok(rows) => {
                info!("Summary statistics ({} SNPs) saved to: {:?}", rows, summary_path);
                summary.files.push(summary_path);
            }
            Err(e) => {
                error!("Failed to write {}: {:#}", SUMMARY_FILE, e);
                failures.push(format!("{}: {:#}", SUMMARY_FILE, e));
            }
        }

        if !failures.is_empty() {
            anyhow::bail!(
                "{} output step(s) failed: {}",
                failures.len(),
                failures.join("; ")
            );
        }

        info!("Extraction complete");
        Ok(summary)
    }
}

/// Write full rows for a subset of records
fn write_records(path: &Path, table: &AssocTable, records: &[ScoredRecord<'_>]) -> Result<usize> {
    write_table(
        path,
        &table.columns,
        records.iter().map(|r| r.record.fields.as_slice()),
    )
}

/// Write the CHR/SNP/BP/A1/P projection
fn write_summary(path: &Path, table: &AssocTable, records: &[ScoredRecord<'_>]) -> Result<usize> {
    let indices = SUMMARY_COLUMNS
        .iter()
        .map(|name| table.require_column(name))
        .collect::<Result<Vec<_>, _>>()
        .context("Summary projection needs CHR, SNP, BP and A1 columns")?;
    let p_index = table.p_column.index;

    let header = SUMMARY_COLUMNS.iter().copied().chain(std::iter::once(P_VALUE_COLUMN));
    let mut writer = TsvWriter::create(path, header)?;

    for scored in records {
        let record = scored.record;
        writer.write_row(&SummaryRow {
            chr: record.field(indices[0]),
            snp: record.field(indices[1]),
            bp: record.field(indices[2]),
            a1: record.field(indices[3]),
            p: record.field(p_index),
        })?;
    }

    writer.finish()
}
