// ==============================================================================
// missingness.rs - PLINK Missingness Report Parser
// ==============================================================================
// Description: Reads F_MISS rates from .lmiss (per variant) and .imiss
//              (per individual) reports
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================
// Format:
//   .lmiss:  CHR  SNP  N_MISS  N_GENO  F_MISS
//   .imiss:  FID  IID  MISS_PHENO  N_MISS  N_GENO  F_MISS
// ==============================================================================

use std::path::Path;
use thiserror::Error;

use super::table::{parse_optional_f64, TableParseError, WhitespaceTable};

/// Missingness rate column shared by both report types
pub const F_MISS_COLUMN: &str = "F_MISS";

/// Errors that can occur during missingness report parsing
#[derive(Error, Debug)]
pub enum MissingnessParseError {
    #[error(transparent)]
    Table(#[from] TableParseError),

    #[error("Required column '{}' not found in header", F_MISS_COLUMN)]
    MissingRateColumn,

    #[error("Invalid missingness rate at line {line}: {value}")]
    InvalidRate { line: usize, value: String },
}

pub struct MissingnessParser;

impl MissingnessParser {
    /// Parse the `F_MISS` column of a missingness report
    ///
    /// Rows with a missing rate (`NA`, `nan`) are skipped.
    pub fn parse(path: impl AsRef<Path>) -> Result<Vec<f64>, MissingnessParseError> {
        let table = WhitespaceTable::read(path.as_ref())?;
        Self::from_table(&table)
    }

    pub fn from_table(table: &WhitespaceTable) -> Result<Vec<f64>, MissingnessParseError> {
        let column = table
            .column_index(F_MISS_COLUMN)
            .ok_or(MissingnessParseError::MissingRateColumn)?;

        let mut rates = Vec::with_capacity(table.len());
        for row in &table.rows {
            let token = &row.fields[column];
            let rate = parse_optional_f64(token).map_err(|_| {
                MissingnessParseError::InvalidRate {
                    line: row.line,
                    value: token.clone(),
                }
            })?;
            if let Some(rate) = rate {
                rates.push(rate);
            }
        }

        Ok(rates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_lmiss_rates() {
        let contents = "\
 CHR         SNP   N_MISS   N_GENO   F_MISS
   1   rs3094315        0      112        0
   1  rs12124819        3      112  0.02679
   1  rs28765502       NA      112       NA
";
        let table = WhitespaceTable::from_reader(Cursor::new(contents)).unwrap();
        let rates = MissingnessParser::from_table(&table).unwrap();

        assert_eq!(rates, vec![0.0, 0.02679]);
    }

    #[test]
    fn test_imiss_rates() {
        let contents = "\
      FID       IID MISS_PHENO   N_MISS   N_GENO   F_MISS
     fam1      ind1          N     1200   200000    0.006
     fam2      ind2          N     8000   200000     0.04
";
        let table = WhitespaceTable::from_reader(Cursor::new(contents)).unwrap();
        let rates = MissingnessParser::from_table(&table).unwrap();

        assert_eq!(rates, vec![0.006, 0.04]);
    }

    #[test]
    fn test_missing_column() {
        let table = WhitespaceTable::from_reader(Cursor::new("CHR SNP N_MISS\n1 rs1 0\n")).unwrap();
        assert!(matches!(
            MissingnessParser::from_table(&table),
            Err(MissingnessParseError::MissingRateColumn)
        ));
    }

    #[test]
    fn test_invalid_rate() {
        let table = WhitespaceTable::from_reader(Cursor::new("SNP F_MISS\nrs1 high\n")).unwrap();
        assert!(matches!(
            MissingnessParser::from_table(&table),
            Err(MissingnessParseError::InvalidRate { line: 2, .. })
        ));
    }
}
