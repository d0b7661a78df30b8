// ==============================================================================
// eigenvec.rs - PLINK PCA Eigenvector Parser
// ==============================================================================
// Description: Parser for per-individual principal component scores
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================
// Format: Whitespace-delimited, columns FID IID PC1 PC2 PC3 ...
//   PLINK 1.9 writes no header:   fam1 ind1 -0.0123 0.0456 0.0031
//   PLINK 2 writes one:           #FID IID PC1 PC2 PC3
// ==============================================================================

use std::path::Path;
use thiserror::Error;
use tracing::debug;

use super::table::{TableParseError, WhitespaceTable};

/// Leading identifier columns (FID, IID)
const ID_COLUMNS: usize = 2;

/// Components needed for the PC1/PC2 and PC2/PC3 panels
const REQUIRED_COMPONENTS: usize = 3;

/// Principal component scores for one individual
#[derive(Debug, Clone, PartialEq)]
pub struct PcaRecord {
    pub family_id: String,
    pub individual_id: String,
    pub pc1: f64,
    pub pc2: f64,
    pub pc3: f64,
}

/// Errors that can occur during eigenvector file parsing
#[derive(Error, Debug)]
pub enum EigenvecParseError {
    #[error(transparent)]
    Table(#[from] TableParseError),

    #[error("Expected at least {expected} columns (FID, IID, PC1-PC3), found {found}")]
    TooFewColumns { expected: usize, found: usize },

    #[error("Invalid component value at line {line}: {value}")]
    InvalidValue { line: usize, value: String },
}

pub struct EigenvecParser;

impl EigenvecParser {
    /// Parse an eigenvector file, detecting whether it has a header row
    pub fn parse(path: impl AsRef<Path>) -> Result<Vec<PcaRecord>, EigenvecParseError> {
        let table = WhitespaceTable::read(path.as_ref())?;
        Self::from_table(table)
    }

    pub fn from_table(table: WhitespaceTable) -> Result<Vec<PcaRecord>, EigenvecParseError> {
        let expected = ID_COLUMNS + REQUIRED_COMPONENTS;
        if table.columns.len() < expected {
            return Err(EigenvecParseError::TooFewColumns {
                expected,
                found: table.columns.len(),
            });
        }

        // A numeric third field means the first line is already data
        let table = if table.columns[ID_COLUMNS].parse::<f64>().is_ok() {
            debug!("Eigenvector file has no header row");
            table.into_headerless()
        } else {
            table
        };

        table
            .rows
            .iter()
            .map(|row| {
                let component = |offset: usize| -> Result<f64, EigenvecParseError> {
                    let value = &row.fields[ID_COLUMNS + offset];
                    value.parse::<f64>().map_err(|_| EigenvecParseError::InvalidValue {
                        line: row.line,
                        value: value.clone(),
                    })
                };

                Ok(PcaRecord {
                    family_id: row.fields[0].clone(),
                    individual_id: row.fields[1].clone(),
                    pc1: component(0)?,
                    pc2: component(1)?,
                    pc3: component(2)?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_headerless_plink19() {
        let file = create_test_file(
            "fam1 ind1 -0.0123 0.0456 0.0031 0.1\nfam2 ind2 0.0200 -0.0100 0.0040 0.2\n",
        );

        let records = EigenvecParser::parse(file.path()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].family_id, "fam1");
        assert_eq!(records[0].individual_id, "ind1");
        assert!((records[0].pc1 - -0.0123).abs() < 1e-12);
        assert!((records[1].pc3 - 0.0040).abs() < 1e-12);
    }

    #[test]
    fn test_plink2_header() {
        let file = create_test_file(
            "#FID IID PC1 PC2 PC3\nfam1 ind1 0.1 0.2 0.3\nfam2 ind2 0.4 0.5 0.6\n",
        );

        let records = EigenvecParser::parse(file.path()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].individual_id, "ind2");
        assert!((records[1].pc2 - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_too_few_columns() {
        let file = create_test_file("fam1 ind1 0.1 0.2\n");

        match EigenvecParser::parse(file.path()).unwrap_err() {
            EigenvecParseError::TooFewColumns { expected, found } => {
                assert_eq!(expected, 5);
                assert_eq!(found, 4);
            }
            other => panic!("Expected TooFewColumns, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_component() {
        let file = create_test_file("FID IID PC1 PC2 PC3\nfam1 ind1 0.1 bad 0.3\n");

        assert!(matches!(
            EigenvecParser::parse(file.path()),
            Err(EigenvecParseError::InvalidValue { line: 2, .. })
        ));
    }
}
