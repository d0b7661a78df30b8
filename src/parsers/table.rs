// ==============================================================================
// table.rs - Whitespace-Delimited Table Reader
// ==============================================================================
// Description: Reads PLINK-style text tables (header row + whitespace columns)
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================
// Format: Header row followed by data rows, fields separated by any run of
// spaces or tabs. Leading padding is common (PLINK right-aligns columns).
// Example:
//    CHR         SNP         BP   A1      F_A      F_U   A2        CHISQ            P           OR
//      1   rs3094315     752566    G   0.1591   0.1538    A      0.04387       0.8341        1.041
// ==============================================================================

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::num::ParseFloatError;
use std::path::Path;
use thiserror::Error;

/// Tokens treated as a missing value
const MISSING_TOKENS: &[&str] = &[
    "NA", "N/A", "n/a", "#N/A", "#NA", "<NA>", "NaN", "nan", "-NaN", "-nan", "NULL", "null",
    "None", "1.#IND", "-1.#IND", "1.#QNAN", "-1.#QNAN", ".",
];

/// One data row with its 1-based line number in the source file
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub line: usize,
    pub fields: Vec<String>,
}

/// Parsed whitespace-delimited table
#[derive(Debug, Clone, PartialEq)]
pub struct WhitespaceTable {
    /// Header names in file order
    pub columns: Vec<String>,
    /// Data rows, each with exactly `columns.len()` fields
    pub rows: Vec<TableRow>,
    header_line: usize,
}

/// Errors that can occur while reading a table
#[derive(Error, Debug)]
pub enum TableParseError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("File is empty (no header row)")]
    MissingHeader,

    #[error("Invalid line format at line {line}: expected {expected} fields, found {found}")]
    FieldCountMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },
}

impl WhitespaceTable {
    /// Read a table from disk
    pub fn read(path: impl AsRef<Path>) -> Result<Self, TableParseError> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file))
    }

    /// Read a table from any buffered reader
    ///
    /// Blank lines are skipped. The first non-blank line is the header.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, TableParseError> {
        let mut columns: Option<Vec<String>> = None;
        let mut header_line = 0;
        let mut rows = Vec::new();

        for (idx, line_result) in reader.lines().enumerate() {
            let line_number = idx + 1;
            let line = line_result?;

            let fields: Vec<String> = line.split_whitespace().map(str::to_string).collect();
            if fields.is_empty() {
                continue;
            }

            match &columns {
                None => {
                    header_line = line_number;
                    columns = Some(fields);
                }
                Some(header) => {
                    if fields.len() != header.len() {
                        return Err(TableParseError::FieldCountMismatch {
                            line: line_number,
                            expected: header.len(),
                            found: fields.len(),
                        });
                    }
                    rows.push(TableRow {
                        line: line_number,
                        fields,
                    });
                }
            }
        }

        let columns = columns.ok_or(TableParseError::MissingHeader)?;

        Ok(Self {
            columns,
            rows,
            header_line,
        })
    }

    /// Index of the column with exactly this header name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Reinterpret the header row as data (for files written without a header)
    ///
    /// Column names become positional (`V1`, `V2`, ...).
    pub fn into_headerless(self) -> Self {
        let names = (1..=self.columns.len()).map(|i| format!("V{}", i)).collect();
        let mut rows = Vec::with_capacity(self.rows.len() + 1);
        rows.push(TableRow {
            line: self.header_line,
            fields: self.columns,
        });
        rows.extend(self.rows);

        Self {
            columns: names,
            rows,
            header_line: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Parse a numeric cell; missing markers and non-finite values map to `None`
pub fn parse_optional_f64(token: &str) -> Result<Option<f64>, ParseFloatError> {
    if token.is_empty() || MISSING_TOKENS.contains(&token) {
        return Ok(None);
    }

    let value = token.parse::<f64>()?;
    Ok(value.is_finite().then_some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_optional_f64() {
        assert_eq!(parse_optional_f64("0.25").unwrap(), Some(0.25));
        assert_eq!(parse_optional_f64("NA").unwrap(), None);
        assert_eq!(parse_optional_f64("-nan").unwrap(), None);
        assert_eq!(parse_optional_f64("inf").unwrap(), None);
        assert!(parse_optional_f64("N").is_err());
    }

    #[test]
    fn test_null_spellings_are_missing() {
        for token in ["null", "NULL", "None", "n/a", "<NA>", "#N/A", "-NaN", "1.#QNAN"] {
            assert_eq!(parse_optional_f64(token).unwrap(), None, "{}", token);
        }
        assert!(parse_optional_f64("none_of_these").is_err());
    }

    #[test]
    fn test_parse_padded_plink_table() {
        let contents = "\
 CHR   SNP      BP  A1        P
   1   rs1     100   A   0.5
   1   rs2     200   G   NA
";
        let table = WhitespaceTable::from_reader(Cursor::new(contents)).unwrap();

        assert_eq!(table.columns, vec!["CHR", "SNP", "BP", "A1", "P"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].fields[1], "rs1");
        assert_eq!(table.rows[1].fields[4], "NA");
        assert_eq!(table.rows[1].line, 3);
    }

    #[test]
    fn test_tabs_and_blank_lines() {
        let contents = "\nA\tB\n\n1\t2\n  \n3 \t 4\n";
        let table = WhitespaceTable::from_reader(Cursor::new(contents)).unwrap();

        assert_eq!(table.columns, vec!["A", "B"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[1].fields, vec!["3", "4"]);
        assert_eq!(table.rows[1].line, 6);
    }

    #[test]
    fn test_ragged_row_is_rejected() {
        let contents = "A B C\n1 2 3\n4 5\n";
        let result = WhitespaceTable::from_reader(Cursor::new(contents));

        match result.unwrap_err() {
            TableParseError::FieldCountMismatch {
                line,
                expected,
                found,
            } => {
                assert_eq!(line, 3);
                assert_eq!(expected, 3);
                assert_eq!(found, 2);
            }
            other => panic!("Expected FieldCountMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_file() {
        let result = WhitespaceTable::from_reader(Cursor::new("\n\n"));
        assert!(matches!(result, Err(TableParseError::MissingHeader)));
    }

    #[test]
    fn test_header_only_table() {
        let table = WhitespaceTable::from_reader(Cursor::new("CHR SNP P\n")).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.column_index("P"), Some(2));
        assert_eq!(table.column_index("OR"), None);
    }

    #[test]
    fn test_into_headerless() {
        let contents = "fam1 ind1 0.1 0.2\nfam2 ind2 0.3 0.4\n";
        let table = WhitespaceTable::from_reader(Cursor::new(contents))
            .unwrap()
            .into_headerless();

        assert_eq!(table.columns, vec!["V1", "V2", "V3", "V4"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].fields[0], "fam1");
        assert_eq!(table.rows[0].line, 1);
        assert_eq!(table.rows[1].line, 2);
    }

    #[test]
    fn test_read_missing_file() {
        let result = WhitespaceTable::read("/nonexistent/path/table.assoc");
        assert!(matches!(result, Err(TableParseError::IoError(_))));
    }
}
