// ==============================================================================
// config.rs - Tool Configuration
// ==============================================================================
// Description: Settings for the SNP extractor and the plot generator
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================
// Defaults reproduce the file names of the AA_GWAS hg19 pipeline. Every name
// can be overridden from the command line or GWAS_REPORT_* variables.
// ==============================================================================

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::stats::GenomicControl;

/// Default number of top-ranked variants written by the extractor
pub const DEFAULT_N_TOP: usize = 1000;

/// Default raster resolution for plots
pub const DEFAULT_DPI: u32 = 300;

pub const DEFAULT_PCA_FILE: &str = "AA_GWAS_hg19_uniq_pca.eigenvec";
pub const DEFAULT_LMISS_FILE: &str = "basic_stats_preQC.lmiss";
pub const DEFAULT_IMISS_FILE: &str = "basic_stats_preQC.imiss";

/// Historical (file, label) triplet of association analyses
const DEFAULT_ANALYSES: &[(&str, &str)] = &[
    ("AA_GWAS_hg19_uniq_assoc_noQC.assoc", "No QC"),
    ("AA_GWAS_hg19_uniq_assoc_withQC.assoc", "With QC"),
    ("AA_GWAS_hg19_uniq_assoc.assoc", "Standard"),
];

/// Errors from configuration values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid analysis '{0}' (expected FILE=LABEL)")]
    InvalidAnalysis(String),

    #[error("DPI must be between 10 and 1200, got {0}")]
    InvalidDpi(u32),
}

/// Settings for `extract_top_snps`
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractConfig {
    /// Rows written to the top-N table
    pub n_top: usize,
    /// Header name tried before the default p-value strategies
    pub p_column: Option<String>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            n_top: DEFAULT_N_TOP,
            p_column: None,
        }
    }
}

/// One association results file and its display label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub file_name: String,
    pub label: String,
}

impl Analysis {
    pub fn new(file_name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            label: label.into(),
        }
    }

    /// Label as used in output file names ("With QC" -> "with_qc")
    pub fn slug(&self) -> String {
        self.label.replace(' ', "_").to_lowercase()
    }
}

impl FromStr for Analysis {
    type Err = ConfigError;

    /// Parse `FILE=LABEL`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((file, label)) if !file.trim().is_empty() && !label.trim().is_empty() => {
                Ok(Analysis::new(file.trim(), label.trim()))
            }
            _ => Err(ConfigError::InvalidAnalysis(s.to_string())),
        }
    }
}

impl fmt::Display for Analysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.file_name, self.label)
    }
}

/// Settings for `generate_plots`
#[derive(Debug, Clone, PartialEq)]
pub struct PlotConfig {
    /// Association analyses looked up in the association directory
    pub analyses: Vec<Analysis>,
    /// PCA eigenvector file in the QC directory
    pub pca_file: String,
    /// Per-variant missingness report in the QC directory
    pub lmiss_file: String,
    /// Per-individual missingness report in the QC directory
    pub imiss_file: String,
    pub dpi: u32,
    pub genomic_control: GenomicControl,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            analyses: default_analyses(),
            pca_file: DEFAULT_PCA_FILE.to_string(),
            lmiss_file: DEFAULT_LMISS_FILE.to_string(),
            imiss_file: DEFAULT_IMISS_FILE.to_string(),
            dpi: DEFAULT_DPI,
            genomic_control: GenomicControl::default(),
        }
    }
}

impl PlotConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(10..=1200).contains(&self.dpi) {
            return Err(ConfigError::InvalidDpi(self.dpi));
        }
        Ok(())
    }
}

pub fn default_analyses() -> Vec<Analysis> {
    DEFAULT_ANALYSES
        .iter()
        .map(|(file, label)| Analysis::new(*file, *label))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_analyses() {
        let config = PlotConfig::default();
        let slugs: Vec<String> = config.analyses.iter().map(Analysis::slug).collect();

        assert_eq!(slugs, vec!["no_qc", "with_qc", "standard"]);
        assert_eq!(config.dpi, 300);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_analysis() {
        let analysis: Analysis = "run2.assoc.logistic=Logistic Model".parse().unwrap();
        assert_eq!(analysis.file_name, "run2.assoc.logistic");
        assert_eq!(analysis.label, "Logistic Model");
        assert_eq!(analysis.slug(), "logistic_model");
        assert_eq!(analysis.to_string(), "run2.assoc.logistic=Logistic Model");
    }

    #[test]
    fn test_parse_analysis_rejects_bad_input() {
        assert!("no-label.assoc".parse::<Analysis>().is_err());
        assert!("=Label".parse::<Analysis>().is_err());
        assert!("file.assoc=".parse::<Analysis>().is_err());
    }

    #[test]
    fn test_invalid_dpi() {
        let config = PlotConfig {
            dpi: 5,
            ..PlotConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidDpi(5)));
    }

    #[test]
    fn test_extract_defaults() {
        let config = ExtractConfig::default();
        assert_eq!(config.n_top, 1000);
        assert!(config.p_column.is_none());
    }
}
