// ==============================================================================
// models.rs - GWAS Result Data Models
// ==============================================================================
// Description: Shared types and thresholds for association result processing
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================

use std::cmp::Ordering;
use std::fmt;

/// Genome-wide significance threshold (p < 5e-8)
pub const GENOME_WIDE_THRESHOLD: f64 = 5e-8;

/// Suggestive significance threshold (p < 1e-5)
pub const SUGGESTIVE_THRESHOLD: f64 = 1e-5;

/// Missingness rate cut-off drawn on the QC histograms
pub const MISSINGNESS_THRESHOLD: f64 = 0.02;

/// Significance level a variant reaches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Significance {
    /// p < 5e-8
    GenomeWide,
    /// 5e-8 <= p < 1e-5
    Suggestive,
    /// p >= 1e-5
    NotSignificant,
}

impl Significance {
    pub fn classify(p_value: f64) -> Self {
        if p_value < GENOME_WIDE_THRESHOLD {
            Significance::GenomeWide
        } else if p_value < SUGGESTIVE_THRESHOLD {
            Significance::Suggestive
        } else {
            Significance::NotSignificant
        }
    }
}

/// Sort key for chromosome codes
///
/// Autosomes sort numerically and the PLINK sex/mito codes follow them
/// (X=23, Y=24, XY=25, MT=26). Unknown codes (contigs, patches) go last in
/// lexicographic order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ChromosomeKey {
    Numbered(u32),
    Other(String),
}

impl ChromosomeKey {
    pub fn from_code(code: &str) -> Self {
        let trimmed = code.trim();
        let bare = trimmed
            .strip_prefix("chr")
            .or_else(|| trimmed.strip_prefix("CHR"))
            .unwrap_or(trimmed);

        if let Ok(n) = bare.parse::<u32>() {
            return ChromosomeKey::Numbered(n);
        }

        match bare.to_ascii_uppercase().as_str() {
            "X" => ChromosomeKey::Numbered(23),
            "Y" => ChromosomeKey::Numbered(24),
            "XY" => ChromosomeKey::Numbered(25),
            "MT" | "M" => ChromosomeKey::Numbered(26),
            _ => ChromosomeKey::Other(trimmed.to_string()),
        }
    }
}

/// Compare two chromosome codes in genome order
pub fn compare_chromosomes(a: &str, b: &str) -> Ordering {
    ChromosomeKey::from_code(a).cmp(&ChromosomeKey::from_code(b))
}

/// Most significant variants reported after a Manhattan plot
#[derive(Debug, Clone, PartialEq)]
pub struct TopHit {
    pub chromosome: String,
    pub snp: String,
    pub position: u64,
    pub p_value: f64,
}

impl fmt::Display for TopHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>4} {:>15} {:>12} {:>12.3e}",
            self.chromosome, self.snp, self.position, self.p_value
        )
    }
}
