use std::io::Write;

use super::{LineWriter, TabularWriter, MISSING_VALUE};
use crate::converters::DrParameters;
use crate::error::Result;

/// Prefix of every DR line
pub const DR_LINE_PREFIX: &str = "DR   IntAct; ";

const COLUMNS: &[&str] = &["accession", "interaction_count"];

/// Writes `DR   IntAct; <accession>; <count>.` lines, `-` for no count
pub struct DrLineWriter<W: Write> {
    writer: TabularWriter<W>,
}

impl<W: Write> DrLineWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: TabularWriter::new(inner, "DR", COLUMNS),
        }
    }

    /// Flush and hand back the underlying writer
    pub fn close(self) -> Result<W> {
        self.writer.into_inner()
    }
}

impl<W: Write> LineWriter for DrLineWriter<W> {
    type Record = DrParameters;

    fn write_header_if_necessary(&mut self) -> Result<()> {
        self.writer.write_header_if_necessary()
    }

    fn write_record(&mut self, record: &DrParameters) -> Result<usize> {
        let count = record
            .interaction_count()
            .map(|count| count.to_string())
            .unwrap_or_else(|| MISSING_VALUE.to_string());

        self.writer
            .write_row_with(&[record.accession(), count.as_str()], |out, fields| {
                writeln!(out, "{}{}; {}.", DR_LINE_PREFIX, fields[0], fields[1])
            })?;
        Ok(1)
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()
    }

    fn lines_written(&self) -> usize {
        self.writer.rows_written()
    }
}
