// ==============================================================================
// parsers/mod.rs - File parser modules
// ==============================================================================
// Description: Parsers for PLINK association, PCA and QC report formats
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================

pub mod table;
pub mod assoc;
pub mod eigenvec;
pub mod missingness;

pub use table::{TableParseError, TableRow, WhitespaceTable};
pub use assoc::{
    AssocParseError, AssocParser, AssocRecord, AssocTable, ColumnStrategy, PValueResolver,
    ResolvedColumn, ScoredRecord,
};
pub use eigenvec::{EigenvecParseError, EigenvecParser, PcaRecord};
pub use missingness::{MissingnessParseError, MissingnessParser};
