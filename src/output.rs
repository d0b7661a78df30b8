// ==============================================================================
// output.rs - Tab-Separated Table Output
// ==============================================================================
// Description: Writes derived association tables as TSV with a header row
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================
// Field text is written exactly as read, so numeric precision is never
// altered and repeated runs produce byte-identical files.
// ==============================================================================

use anyhow::{Context, Result};
use csv::{Writer, WriterBuilder};
use serde::Serialize;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Tab-separated table writer (header written up front, even for empty tables)
pub struct TsvWriter {
    writer: Writer<File>,
    rows: usize,
}

impl TsvWriter {
    /// Create the file and write the header row
    pub fn create<I, S>(path: &Path, header: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        let mut writer = WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .from_path(path)
            .with_context(|| format!("Failed to create output file {:?}", path))?;

        writer
            .write_record(header)
            .with_context(|| format!("Failed to write header to {:?}", path))?;

        Ok(Self { writer, rows: 0 })
    }

    /// Write one row of raw fields
    pub fn write_fields<I, S>(&mut self, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        self.writer.write_record(fields)?;
        self.rows += 1;
        Ok(())
    }

    /// Write one row from a serializable struct (fields in declaration order)
    pub fn write_row<T: Serialize>(&mut self, row: &T) -> Result<()> {
        self.writer.serialize(row)?;
        self.rows += 1;
        Ok(())
    }

    /// Flush to disk and return the number of data rows written
    pub fn finish(mut self) -> Result<usize> {
        self.writer.flush()?;
        debug!("Wrote {} rows", self.rows);
        Ok(self.rows)
    }
}

/// Write a header plus rows of raw fields in one call
pub fn write_table<'a, H, R>(path: &Path, header: H, rows: R) -> Result<usize>
where
    H: IntoIterator,
    H::Item: AsRef<[u8]>,
    R: IntoIterator<Item = &'a [String]>,
{
    let mut writer = TsvWriter::create(path, header)?;
    for fields in rows {
        writer
            .write_fields(fields)
            .with_context(|| format!("Failed to write row to {:?}", path))?;
    }
    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[derive(Serialize)]
    struct Row<'a> {
        name: &'a str,
        value: f64,
    }

    #[test]
    fn test_write_table_preserves_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let rows = vec![
            vec!["1".to_string(), "rs1".to_string(), "4.000e-09".to_string()],
            vec!["2".to_string(), "rs2".to_string(), "0.5000".to_string()],
        ];

        let written = write_table(&path, ["CHR", "SNP", "P"], rows.iter().map(Vec::as_slice)).unwrap();

        assert_eq!(written, 2);
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "CHR\tSNP\tP\n1\trs1\t4.000e-09\n2\trs2\t0.5000\n");
    }

    #[test]
    fn test_empty_table_has_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.txt");

        let written = write_table(&path, ["CHR", "P"], std::iter::empty()).unwrap();

        assert_eq!(written, 0);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "CHR\tP\n");
    }

    #[test]
    fn test_serialized_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rows.txt");

        let mut writer = TsvWriter::create(&path, ["name", "value"]).unwrap();
        writer.write_row(&Row { name: "a", value: 0.25 }).unwrap();
        assert_eq!(writer.finish().unwrap(), 1);

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "name\tvalue\na\t0.25\n");
    }

    #[test]
    fn test_unwritable_path() {
        let result = TsvWriter::create(Path::new("/nonexistent/dir/out.txt"), ["A"]);
        assert!(result.is_err());
    }
}
