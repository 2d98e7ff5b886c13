//! Serialization of parameter records to the export line formats
//!
//! Every stream starts with a `#`-prefixed, tab-separated header naming its
//! columns. The header is written once, before the first record, and fixes the
//! column count every later row must match.

mod cc;
mod dr;
mod go;

pub use cc::CcLineWriter;
pub use dr::DrLineWriter;
pub use go::GoLineWriter;

use std::io::Write;

use crate::error::{ExportError, Result};

/// Rendering of an absent value
pub const MISSING_VALUE: &str = "-";

/// Common operations of the DR, CC and GO writers
pub trait LineWriter {
    type Record;

    /// Write the header unless already written; safe to call repeatedly
    fn write_header_if_necessary(&mut self) -> Result<()>;

    /// Write one record, returning the number of lines emitted
    fn write_record(&mut self, record: &Self::Record) -> Result<usize>;

    fn flush(&mut self) -> Result<()>;

    /// Lines written so far, header excluded
    fn lines_written(&self) -> usize;
}

/// Line-oriented writer enforcing the column contract of its header
pub struct TabularWriter<W: Write> {
    inner: W,
    stream: &'static str,
    columns: &'static [&'static str],
    header_written: bool,
    rows_written: usize,
}

impl<W: Write> TabularWriter<W> {
    pub fn new(inner: W, stream: &'static str, columns: &'static [&'static str]) -> Self {
        Self {
            inner,
            stream,
            columns,
            header_written: false,
            rows_written: 0,
        }
    }

    pub fn write_header_if_necessary(&mut self) -> Result<()> {
        if self.header_written {
            return Ok(());
        }

        writeln!(self.inner, "#{}", self.columns.join("\t"))?;
        self.header_written = true;
        Ok(())
    }

    /// Write a tab-separated row
    pub fn write_row(&mut self, fields: &[&str]) -> Result<()> {
        self.write_row_with(fields, |out, fields| writeln!(out, "{}", fields.join("\t")))
    }

    /// Check a row against the header, then render it with `render`
    pub fn write_row_with<F>(&mut self, fields: &[&str], render: F) -> Result<()>
    where
        F: FnOnce(&mut W, &[&str]) -> std::io::Result<()>,
    {
        if fields.len() != self.columns.len() {
            return Err(ExportError::ColumnCount {
                stream: self.stream,
                expected: self.columns.len(),
                actual: fields.len(),
            });
        }

        if let Some((column, value)) = fields
            .iter()
            .enumerate()
            .find(|(_, value)| value.contains(['\t', '\n', '\r']))
        {
            return Err(ExportError::InvalidField {
                stream: self.stream,
                column,
                value: value.to_string(),
            });
        }

        self.write_header_if_necessary()?;
        render(&mut self.inner, fields)?;
        self.rows_written += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    pub fn header_written(&self) -> bool {
        self.header_written
    }

    /// Flush and hand back the underlying writer
    pub fn into_inner(mut self) -> Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// Render an optional value, `-` when absent
pub(crate) fn or_missing(value: Option<&str>) -> &str {
    value.unwrap_or(MISSING_VALUE)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const COLUMNS: &[&str] = &["a", "b"];

    #[test]
    fn test_header_written_once_before_first_row() {
        let mut writer = TabularWriter::new(Vec::new(), "test", COLUMNS);
        writer.write_header_if_necessary().unwrap();
        writer.write_header_if_necessary().unwrap();
        writer.write_row(&["1", "2"]).unwrap();

        let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(out, "#a\tb\n1\t2\n");
    }

    #[test]
    fn test_column_count_mismatch() {
        let mut writer = TabularWriter::new(Vec::new(), "test", COLUMNS);
        let err = writer.write_row(&["1", "2", "3"]).unwrap_err();

        assert!(matches!(
            err,
            ExportError::ColumnCount {
                expected: 2,
                actual: 3,
                ..
            }
        ));
        assert_eq!(writer.rows_written(), 0);
        assert!(!writer.header_written());
    }

    #[test]
    fn test_field_with_separator_rejected() {
        let mut writer = TabularWriter::new(Vec::new(), "test", COLUMNS);
        let err = writer.write_row(&["1", "two\tparts"]).unwrap_err();
        assert!(matches!(err, ExportError::InvalidField { column: 1, .. }));

        assert!(writer.write_row(&["line\nbreak", "2"]).is_err());
    }

    #[test]
    fn test_no_header_without_rows() {
        let writer = TabularWriter::new(Vec::new(), "test", COLUMNS);
        assert!(writer.into_inner().unwrap().is_empty());
    }
}
