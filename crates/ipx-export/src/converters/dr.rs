use std::collections::BTreeSet;
use std::num::NonZeroUsize;

use super::index::EvidenceIndex;
use crate::entry::UniprotEntry;
use crate::error::{ExportError, Result};

/// One DR line: an accession and its count of distinct interaction partners
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrParameters {
    accession: String,
    interaction_count: Option<NonZeroUsize>,
}

impl DrParameters {
    /// A count of 0 is kept as "no count" and rendered `-`
    pub fn new(accession: impl Into<String>, interaction_count: usize) -> Result<Self> {
        let accession = accession.into();
        if accession.trim().is_empty() {
            return Err(ExportError::InvalidParameter(
                "DR line needs an accession".to_string(),
            ));
        }

        Ok(Self {
            accession,
            interaction_count: NonZeroUsize::new(interaction_count),
        })
    }

    pub fn accession(&self) -> &str {
        &self.accession
    }

    pub fn interaction_count(&self) -> Option<NonZeroUsize> {
        self.interaction_count
    }
}

/// Builds the DR line of an entry from its exported positive evidence
pub struct DrLineConverter<'a> {
    index: &'a EvidenceIndex<'a>,
}

impl<'a> DrLineConverter<'a> {
    pub fn new(index: &'a EvidenceIndex<'a>) -> Self {
        Self { index }
    }

    /// Count the distinct partners of the master and its positive isoforms
    /// and chains. Entries with negative evidence only get no count.
    pub fn convert(&self, entry: &UniprotEntry) -> Result<DrParameters> {
        let partners: BTreeSet<&str> = entry
            .positive_group()
            .flat_map(|member| {
                self.index
                    .clusters_of(member)
                    .filter_map(move |cluster| cluster.partner_of(member))
            })
            .collect();

        DrParameters::new(entry.master.as_str(), partners.len())
    }
}
