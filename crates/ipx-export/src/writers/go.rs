use std::io::Write;

use super::{LineWriter, TabularWriter, MISSING_VALUE};
use crate::converters::GoParameters;
use crate::error::Result;

const COLUMNS: &[&str] = &[
    "first_accession",
    "second_accession",
    "publication_ids",
    "master_accession",
    "component_xrefs",
];

const LIST_SEPARATOR: &str = "|";

/// Writes GO lines, version 2 layout
pub struct GoLineWriter<W: Write> {
    writer: TabularWriter<W>,
}

impl<W: Write> GoLineWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: TabularWriter::new(inner, "GO", COLUMNS),
        }
    }

    /// Flush and hand back the underlying writer
    pub fn close(self) -> Result<W> {
        self.writer.into_inner()
    }
}

impl<W: Write> LineWriter for GoLineWriter<W> {
    type Record = GoParameters;

    fn write_header_if_necessary(&mut self) -> Result<()> {
        self.writer.write_header_if_necessary()
    }

    fn write_record(&mut self, record: &GoParameters) -> Result<usize> {
        let publications = join(record.publication_ids().iter());
        let components = if record.component_xrefs().is_empty() {
            MISSING_VALUE.to_string()
        } else {
            join(record.component_xrefs().iter())
        };

        self.writer.write_row(&[
            record.first_accession(),
            record.second_accession(),
            publications.as_str(),
            record.master_accession(),
            components.as_str(),
        ])?;
        Ok(1)
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()
    }

    fn lines_written(&self) -> usize {
        self.writer.rows_written()
    }
}

fn join<'s>(values: impl Iterator<Item = &'s String>) -> String {
    values.map(String::as_str).collect::<Vec<_>>().join(LIST_SEPARATOR)
}
