use std::io::Write;

use super::{or_missing, LineWriter, TabularWriter, MISSING_VALUE};
use crate::converters::{CcParameters, SecondCcParameters};
use crate::error::Result;
use crate::models::InteractionDetails;

const COLUMNS: &[&str] = &[
    "master_accession",
    "gene_name",
    "taxonomy_id",
    "accession",
    "partner_accession",
    "partner_gene_name",
    "partner_taxonomy_id",
    "interaction_count",
    "interaction_ids",
    "evidence",
];

/// Writes CC records, version 2 layout: one row per secondary interactor,
/// led by the master accession, gene name and taxonomy id of the record
pub struct CcLineWriter<W: Write> {
    writer: TabularWriter<W>,
}

impl<W: Write> CcLineWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: TabularWriter::new(inner, "CC", COLUMNS),
        }
    }

    /// Flush and hand back the underlying writer
    pub fn close(self) -> Result<W> {
        self.writer.into_inner()
    }

    fn write_secondary(
        &mut self,
        record: &CcParameters,
        second: &SecondCcParameters,
    ) -> Result<()> {
        let count = second.interaction_count().to_string();
        let interaction_ids = second
            .interaction_ids
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let evidence = if second.details.is_empty() {
            MISSING_VALUE.to_string()
        } else {
            second
                .details
                .iter()
                .map(render_details)
                .collect::<Vec<_>>()
                .join("; ")
        };

        self.writer.write_row(&[
            record.master(),
            or_missing(record.gene_name()),
            or_missing(record.taxonomy_id()),
            second.first_accession.as_str(),
            second.partner_accession.as_str(),
            or_missing(second.partner_gene_name.as_deref()),
            or_missing(second.partner_taxonomy_id.as_deref()),
            count.as_str(),
            interaction_ids.as_str(),
            evidence.as_str(),
        ])
    }
}

impl<W: Write> LineWriter for CcLineWriter<W> {
    type Record = CcParameters;

    fn write_header_if_necessary(&mut self) -> Result<()> {
        self.writer.write_header_if_necessary()
    }

    fn write_record(&mut self, record: &CcParameters) -> Result<usize> {
        for second in record.secondary() {
            self.write_secondary(record, second)?;
        }
        Ok(record.secondary().len())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()
    }

    fn lines_written(&self) -> usize {
        self.writer.rows_written()
    }
}

fn render_details(details: &InteractionDetails) -> String {
    let provenance = if details.spoke_expanded {
        "spoke-expanded"
    } else {
        "direct"
    };
    let publications = details
        .publication_ids
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(",");

    format!(
        "{}|{}|{}|{}",
        details.detection_method,
        details.interaction_type,
        provenance,
        if publications.is_empty() {
            MISSING_VALUE
        } else {
            publications.as_str()
        }
    )
}
