// ==============================================================================
// assoc.rs - PLINK Association Results Parser
// ==============================================================================
// Description: Parser for association tables (.assoc, .qassoc, .assoc.logistic)
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================
// Format: Whitespace-delimited table with header
// Example:
//   CHR         SNP         BP   A1      F_A      F_U   A2        CHISQ            P           OR
//     1   rs3094315     752566    G   0.1591   0.1538    A      0.04387       0.8341        1.041
//     1  rs12124819     776546    A   0.2203   0.2411    G       0.5015       0.4788       0.8888
//
// The p-value column is resolved by an ordered list of strategies. Upstream
// tools occasionally rename or reorder columns, so a header match on `P` is
// tried first and the historical position (zero-based index 8) second.
// ==============================================================================

use std::cmp::Ordering;
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

use super::table::{parse_optional_f64, TableParseError, TableRow, WhitespaceTable};

/// Canonical name of the p-value column
pub const P_VALUE_COLUMN: &str = "P";

/// Zero-based position of the p-value column in PLINK `.assoc` output
pub const P_VALUE_FALLBACK_INDEX: usize = 8;

/// One way of locating the p-value column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnStrategy {
    /// Exact header match
    ByName(String),
    /// Zero-based column position
    ByPosition(usize),
}

impl fmt::Display for ColumnStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnStrategy::ByName(name) => write!(f, "header '{}'", name),
            ColumnStrategy::ByPosition(idx) => write!(f, "column index {}", idx),
        }
    }
}

/// P-value column after resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumn {
    pub index: usize,
    pub name: String,
    pub strategy: ColumnStrategy,
}

/// Ordered list of p-value column strategies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PValueResolver {
    strategies: Vec<ColumnStrategy>,
}

impl Default for PValueResolver {
    fn default() -> Self {
        Self {
            strategies: vec![
                ColumnStrategy::ByName(P_VALUE_COLUMN.to_string()),
                ColumnStrategy::ByPosition(P_VALUE_FALLBACK_INDEX),
            ],
        }
    }
}

impl PValueResolver {
    /// Default strategies with an explicit column name tried first
    pub fn with_preferred_name(name: impl Into<String>) -> Self {
        let mut resolver = Self::default();
        let name = name.into();
        if name != P_VALUE_COLUMN {
            resolver.strategies.insert(0, ColumnStrategy::ByName(name));
        }
        resolver
    }

    pub fn strategies(&self) -> &[ColumnStrategy] {
        &self.strategies
    }

    /// Find the p-value column in a header
    pub fn resolve(&self, columns: &[String]) -> Result<ResolvedColumn, AssocParseError> {
        for strategy in &self.strategies {
            let index = match strategy {
                ColumnStrategy::ByName(name) => columns.iter().position(|c| c == name),
                ColumnStrategy::ByPosition(idx) => (*idx < columns.len()).then_some(*idx),
            };

            if let Some(index) = index {
                let resolved = ResolvedColumn {
                    index,
                    name: columns[index].clone(),
                    strategy: strategy.clone(),
                };

                match strategy {
                    ColumnStrategy::ByName(_) => {
                        debug!("P-value column resolved by {}", strategy);
                    }
                    ColumnStrategy::ByPosition(_) => {
                        warn!(
                            "No '{}' header found; using {} ('{}') as the p-value column",
                            P_VALUE_COLUMN, strategy, resolved.name
                        );
                    }
                }

                return Ok(resolved);
            }
        }

        Err(AssocParseError::NoPValueColumn {
            tried: self
                .strategies
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        })
    }
}

/// Errors that can occur during association file parsing
#[derive(Error, Debug)]
pub enum AssocParseError {
    #[error(transparent)]
    Table(#[from] TableParseError),

    #[error("No p-value column found (tried {tried})")]
    NoPValueColumn { tried: String },

    #[error("Invalid p-value at line {line}: {value}")]
    InvalidPValue { line: usize, value: String },

    #[error("Required column '{0}' not found in header")]
    MissingColumn(String),

    #[error("Invalid position value at line {line}: {value}")]
    InvalidPosition { line: usize, value: String },
}

/// One variant row; fields are kept verbatim for output
#[derive(Debug, Clone, PartialEq)]
pub struct AssocRecord {
    pub line: usize,
    pub fields: Vec<String>,
    /// Parsed p-value, `None` when missing
    pub p_value: Option<f64>,
}

impl AssocRecord {
    /// P-value if usable for ranking and -log10 (present and > 0)
    pub fn valid_p(&self) -> Option<f64> {
        self.p_value.filter(|p| *p > 0.0)
    }

    pub fn field(&self, index: usize) -> &str {
        self.fields.get(index).map(String::as_str).unwrap_or("")
    }
}

/// Record with a usable p-value
#[derive(Debug, Clone, Copy)]
pub struct ScoredRecord<'a> {
    pub p_value: f64,
    pub record: &'a AssocRecord,
}

/// Parsed association table
#[derive(Debug, Clone)]
pub struct AssocTable {
    pub columns: Vec<String>,
    pub records: Vec<AssocRecord>,
    pub p_column: ResolvedColumn,
}

impl AssocTable {
    /// Records with a present, positive p-value, in input order
    pub fn cleaned(&self) -> Vec<ScoredRecord<'_>> {
        self.records
            .iter()
            .filter_map(|record| {
                record
                    .valid_p()
                    .map(|p_value| ScoredRecord { p_value, record })
            })
            .collect()
    }

    /// Number of rows with no p-value at all
    pub fn missing_count(&self) -> usize {
        self.records.iter().filter(|r| r.p_value.is_none()).count()
    }

    /// Number of rows whose p-value is zero or negative
    pub fn non_positive_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.p_value, Some(p) if p <= 0.0))
            .count()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn require_column(&self, name: &str) -> Result<usize, AssocParseError> {
        self.column_index(name)
            .ok_or_else(|| AssocParseError::MissingColumn(name.to_string()))
    }

    /// Base-pair position of a record
    pub fn position(&self, record: &AssocRecord, bp_column: usize) -> Result<u64, AssocParseError> {
        let value = record.field(bp_column);
        value.parse::<u64>().map_err(|_| AssocParseError::InvalidPosition {
            line: record.line,
            value: value.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Stable ascending sort by p-value; ties keep input order
pub fn sort_by_p_value(records: &mut [ScoredRecord<'_>]) {
    records.sort_by(|a, b| a.p_value.partial_cmp(&b.p_value).unwrap_or(Ordering::Equal));
}

/// Association results parser
#[derive(Debug, Clone, Default)]
pub struct AssocParser {
    resolver: PValueResolver,
}

impl AssocParser {
    pub fn new(resolver: PValueResolver) -> Self {
        Self { resolver }
    }

    /// Parse an association file
    ///
    /// # Returns
    /// * `Ok(AssocTable)` - Every row, with the p-value parsed (or `None` if missing)
    /// * `Err(AssocParseError)` - Unreadable file, ragged row, no p-value column,
    ///   or a p-value token that is neither numeric nor a missing marker
    pub fn parse(&self, path: impl AsRef<Path>) -> Result<AssocTable, AssocParseError> {
        let table = WhitespaceTable::read(path.as_ref())?;
        self.from_table(table)
    }

    pub fn from_table(&self, table: WhitespaceTable) -> Result<AssocTable, AssocParseError> {
        let p_column = self.resolver.resolve(&table.columns)?;

        let records = table
            .rows
            .into_iter()
            .map(|TableRow { line, fields }| {
                let p_value = parse_p_value(&fields[p_column.index], line)?;
                Ok(AssocRecord {
                    line,
                    fields,
                    p_value,
                })
            })
            .collect::<Result<Vec<_>, AssocParseError>>()?;

        Ok(AssocTable {
            columns: table.columns,
            records,
            p_column,
        })
    }
}

/// Parse a p-value token; missing markers and non-finite values map to `None`
pub fn parse_p_value(token: &str, line: usize) -> Result<Option<f64>, AssocParseError> {
    parse_optional_f64(token).map_err(|_| AssocParseError::InvalidPValue {
        line,
        value: token.to_string(),
    })
}
