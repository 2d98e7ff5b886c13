use std::collections::{BTreeMap, BTreeSet};

use super::index::EvidenceIndex;
use crate::context::ClusterContext;
use crate::entry::UniprotEntry;
use crate::error::{ExportError, Result};

/// One GO line: a binary interaction of an entry member with its supporting
/// publications and cellular-component cross-references
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoParameters {
    first_accession: String,
    second_accession: String,
    publication_ids: BTreeSet<String>,
    master_accession: String,
    component_xrefs: BTreeSet<String>,
}

impl GoParameters {
    pub fn new(
        first_accession: impl Into<String>,
        second_accession: impl Into<String>,
        publication_ids: BTreeSet<String>,
        master_accession: impl Into<String>,
        component_xrefs: BTreeSet<String>,
    ) -> Result<Self> {
        let first_accession = first_accession.into();
        let second_accession = second_accession.into();

        if first_accession.trim().is_empty() || second_accession.trim().is_empty() {
            return Err(ExportError::InvalidParameter(
                "GO line needs both accessions".to_string(),
            ));
        }
        if publication_ids.is_empty() {
            return Err(ExportError::InvalidParameter(format!(
                "GO line {} - {} has no publication",
                first_accession, second_accession
            )));
        }

        Ok(Self {
            first_accession,
            second_accession,
            publication_ids,
            master_accession: master_accession.into(),
            component_xrefs,
        })
    }

    pub fn first_accession(&self) -> &str {
        &self.first_accession
    }

    pub fn second_accession(&self) -> &str {
        &self.second_accession
    }

    pub fn publication_ids(&self) -> &BTreeSet<String> {
        &self.publication_ids
    }

    pub fn master_accession(&self) -> &str {
        &self.master_accession
    }

    pub fn component_xrefs(&self) -> &BTreeSet<String> {
        &self.component_xrefs
    }
}

/// Builds the GO lines of an entry, one per (member, partner) pair
pub struct GoLineConverter<'a> {
    context: &'a ClusterContext,
    index: &'a EvidenceIndex<'a>,
}

impl<'a> GoLineConverter<'a> {
    pub fn new(context: &'a ClusterContext, index: &'a EvidenceIndex<'a>) -> Self {
        Self { context, index }
    }

    /// Each pair is built independently; a rejected pair does not affect the
    /// others
    pub fn convert(&self, entry: &UniprotEntry) -> Vec<Result<GoParameters>> {
        let mut pairs: BTreeMap<(&str, &str), (BTreeSet<String>, BTreeSet<String>)> =
            BTreeMap::new();

        for member in entry.positive_group() {
            for cluster in self.index.clusters_of(member) {
                let Some(partner) = cluster.partner_of(member) else {
                    continue;
                };
                let (publications, components) = pairs.entry((member, partner)).or_default();

                for interaction_id in &cluster.interaction_ids {
                    publications
                        .extend(cluster.publications_for(interaction_id).map(str::to_string));
                    components.extend(self.context.components(interaction_id).map(str::to_string));
                }
            }
        }

        pairs
            .into_iter()
            .map(|((member, partner), (publications, components))| {
                GoParameters::new(member, partner, publications, entry.master.as_str(), components)
            })
            .collect()
    }
}
