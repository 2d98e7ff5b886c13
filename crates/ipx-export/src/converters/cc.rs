use std::collections::{BTreeMap, BTreeSet};

use super::index::EvidenceIndex;
use crate::context::ClusterContext;
use crate::entry::UniprotEntry;
use crate::error::{ExportError, Result};
use crate::models::InteractionDetails;

/// One secondary interactor of a CC record: a member of the entry group, one
/// of its partners, and the merged evidence of the pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecondCcParameters {
    /// The master itself or one of its isoforms or chains
    pub first_accession: String,
    pub partner_accession: String,
    pub partner_gene_name: Option<String>,
    pub partner_taxonomy_id: Option<String>,
    pub interaction_ids: BTreeSet<String>,
    /// Sorted, one per (method, type, spoke-expanded) combination
    pub details: Vec<InteractionDetails>,
}

impl SecondCcParameters {
    pub fn interaction_count(&self) -> usize {
        self.interaction_ids.len()
    }

    /// Partners are ordered by their smallest evidence key, partners without
    /// known evidence last, then by accessions
    fn ordering_key(&self) -> (bool, Option<(&str, &str, bool)>, &str, &str) {
        let smallest = self.details.first().map(InteractionDetails::sort_key);
        (
            smallest.is_none(),
            smallest,
            &self.first_accession,
            &self.partner_accession,
        )
    }
}

/// The CC record of one entry master; every row carries the master's
/// accession, gene name and taxonomy id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CcParameters {
    master: String,
    gene_name: Option<String>,
    taxonomy_id: Option<String>,
    secondary: Vec<SecondCcParameters>,
}

impl CcParameters {
    /// Secondary interactors are sorted here, after accumulation
    pub fn new(
        master: impl Into<String>,
        gene_name: Option<String>,
        taxonomy_id: Option<String>,
        mut secondary: Vec<SecondCcParameters>,
    ) -> Result<Self> {
        let master = master.into();
        if master.trim().is_empty() {
            return Err(ExportError::InvalidParameter(
                "CC record needs a master accession".to_string(),
            ));
        }
        if secondary.is_empty() {
            return Err(ExportError::InvalidParameter(format!(
                "CC record of {} has no secondary interactor",
                master
            )));
        }

        secondary.sort_by(|a, b| a.ordering_key().cmp(&b.ordering_key()));

        Ok(Self {
            master,
            gene_name,
            taxonomy_id,
            secondary,
        })
    }

    pub fn master(&self) -> &str {
        &self.master
    }

    pub fn gene_name(&self) -> Option<&str> {
        self.gene_name.as_deref()
    }

    pub fn taxonomy_id(&self) -> Option<&str> {
        self.taxonomy_id.as_deref()
    }

    pub fn secondary(&self) -> &[SecondCcParameters] {
        &self.secondary
    }
}

#[derive(Default)]
struct PairEvidence {
    interaction_ids: BTreeSet<String>,
    details: Vec<InteractionDetails>,
}

/// Builds the CC record of an entry from its exported positive evidence
pub struct CcLineConverter<'a> {
    context: &'a ClusterContext,
    index: &'a EvidenceIndex<'a>,
}

impl<'a> CcLineConverter<'a> {
    pub fn new(context: &'a ClusterContext, index: &'a EvidenceIndex<'a>) -> Self {
        Self { context, index }
    }

    /// `None` when no member of the group has positive evidence
    pub fn convert(&self, entry: &UniprotEntry) -> Result<Option<CcParameters>> {
        let mut pairs: BTreeMap<(&str, &str), PairEvidence> = BTreeMap::new();

        for member in entry.positive_group() {
            for cluster in self.index.clusters_of(member) {
                let Some(partner) = cluster.partner_of(member) else {
                    continue;
                };
                let evidence = pairs.entry((member, partner)).or_default();

                for interaction_id in &cluster.interaction_ids {
                    evidence.interaction_ids.insert(interaction_id.clone());

                    if let Some(method) = self.context.method_and_type(interaction_id) {
                        let mut details = InteractionDetails::new(
                            self.context.term_name(&method.detection_method),
                            self.context.term_name(&method.interaction_type),
                            self.context.is_spoke_expanded(interaction_id),
                        );
                        details
                            .publication_ids
                            .extend(cluster.publications_for(interaction_id).map(str::to_string));
                        evidence.details.push(details);
                    }
                }
            }
        }

        if pairs.is_empty() {
            return Ok(None);
        }

        let secondary = pairs
            .into_iter()
            .map(|((member, partner), evidence)| SecondCcParameters {
                first_accession: member.to_string(),
                partner_accession: partner.to_string(),
                partner_gene_name: self.context.gene_name(partner).map(str::to_string),
                partner_taxonomy_id: self.context.taxonomy_id(partner).map(str::to_string),
                interaction_ids: evidence.interaction_ids,
                details: coalesce(evidence.details),
            })
            .collect();

        CcParameters::new(
            entry.master.as_str(),
            self.context.gene_name(&entry.master).map(str::to_string),
            self.context.taxonomy_id(&entry.master).map(str::to_string),
            secondary,
        )
        .map(Some)
    }
}

/// Sort details and merge those sharing a key, uniting their publications
fn coalesce(mut details: Vec<InteractionDetails>) -> Vec<InteractionDetails> {
    details.sort();

    let mut merged: Vec<InteractionDetails> = Vec::with_capacity(details.len());
    for detail in details {
        match merged.last_mut() {
            Some(last) if last.sort_key() == detail.sort_key() => {
                last.publication_ids.extend(detail.publication_ids);
            },
            _ => merged.push(detail),
        }
    }
    merged
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::models::{MethodAndType, ScoredInteraction};

    fn context() -> ClusterContext {
        let mut context = ClusterContext::new();
        context.insert_gene_name("P12345", "ABC1");
        context.insert_gene_name("Q11111", "DEF1");
        context.insert_taxonomy_id("P12345", "9606");
        context.insert_term_name("MI:A", "A method");
        context.insert_term_name("MI:B", "B method");
        context.insert_term_name("MI:x", "x type");
        context.insert_term_name("MI:y", "y type");
        context
    }

    fn convert(
        context: &ClusterContext,
        clusters: &[ScoredInteraction],
        entry: &UniprotEntry,
    ) -> CcParameters {
        let index = EvidenceIndex::new(clusters);
        CcLineConverter::new(context, &index)
            .convert(entry)
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_secondary_ordered_by_method_then_type() {
        let mut context = context();
        context.insert_interaction_method("EBI-1", MethodAndType::new("MI:B", "MI:x"));
        context.insert_interaction_method("EBI-2", MethodAndType::new("MI:A", "MI:y"));
        context.insert_interaction_method("EBI-3", MethodAndType::new("MI:A", "MI:x"));

        let clusters = vec![
            ScoredInteraction::new("P12345", "Q11111", 0.5).with_interaction("EBI-1", ["PMID:1"]),
            ScoredInteraction::new("P12345", "Q22222", 0.5).with_interaction("EBI-2", ["PMID:2"]),
            ScoredInteraction::new("Q33333", "P12345", 0.5).with_interaction("EBI-3", ["PMID:3"]),
        ];

        let record = convert(&context, &clusters, &UniprotEntry::new("P12345"));
        let partners: Vec<&str> = record
            .secondary()
            .iter()
            .map(|s| s.partner_accession.as_str())
            .collect();
        assert_eq!(partners, vec!["Q33333", "Q22222", "Q11111"]);

        // independent of input order
        let reversed: Vec<ScoredInteraction> = clusters.into_iter().rev().collect();
        assert_eq!(convert(&context, &reversed, &UniprotEntry::new("P12345")), record);
    }

    #[test]
    fn test_direct_before_spoke_expanded() {
        let mut context = context();
        context.insert_interaction_method("EBI-1", MethodAndType::new("MI:A", "MI:x"));
        context.insert_interaction_method("EBI-2", MethodAndType::new("MI:A", "MI:x"));
        context.insert_spoke_expanded("EBI-1");

        let clusters = vec![
            ScoredInteraction::new("P12345", "Q11111", 0.5).with_interaction("EBI-1", ["PMID:1"]),
            ScoredInteraction::new("P12345", "Q22222", 0.5).with_interaction("EBI-2", ["PMID:2"]),
        ];

        let record = convert(&context, &clusters, &UniprotEntry::new("P12345"));
        assert_eq!(record.secondary()[0].partner_accession, "Q22222");
        assert!(!record.secondary()[0].details[0].spoke_expanded);
        assert!(record.secondary()[1].details[0].spoke_expanded);
    }

    #[test]
    fn test_details_merged_by_method_and_type() {
        let mut context = context();
        context.insert_interaction_method("EBI-1", MethodAndType::new("MI:A", "MI:x"));
        context.insert_interaction_method("EBI-2", MethodAndType::new("MI:A", "MI:x"));
        context.insert_interaction_method("EBI-3", MethodAndType::new("MI:B", "MI:x"));

        let clusters = vec![ScoredInteraction::new("P12345", "Q11111", 0.5)
            .with_interaction("EBI-1", ["PMID:1"])
            .with_interaction("EBI-2", ["PMID:2", "PMID:1"])
            .with_interaction("EBI-3", ["PMID:3"])];

        let record = convert(&context, &clusters, &UniprotEntry::new("P12345"));
        let second = &record.secondary()[0];

        assert_eq!(second.interaction_count(), 3);
        assert_eq!(second.details.len(), 2);
        assert_eq!(second.details[0].detection_method, "A method");
        assert_eq!(second.details[0].interaction_type, "x type");
        assert_eq!(second.details[0].publication_ids.len(), 2);
        assert_eq!(record.gene_name(), Some("ABC1"));
        assert_eq!(second.partner_gene_name.as_deref(), Some("DEF1"));
        assert_eq!(second.partner_taxonomy_id, None);
        assert_eq!(record.taxonomy_id(), Some("9606"));
    }

    #[test]
    fn test_isoform_partners_listed_under_master() {
        let mut context = context();
        context.insert_interaction_method("EBI-1", MethodAndType::new("MI:A", "MI:x"));
        context.insert_interaction_method("EBI-2", MethodAndType::new("MI:A", "MI:x"));

        let clusters = vec![
            ScoredInteraction::new("P12345", "Q11111", 0.5).with_interaction("EBI-1", ["PMID:1"]),
            ScoredInteraction::new("P12345-2", "Q11111", 0.5).with_interaction("EBI-2", ["PMID:2"]),
        ];

        let mut entry = UniprotEntry::new("P12345");
        entry.positive.insert("P12345-2".to_string());

        let record = convert(&context, &clusters, &entry);
        assert_eq!(record.master(), "P12345");
        assert_eq!(record.gene_name(), Some("ABC1"));
        let firsts: Vec<&str> = record
            .secondary()
            .iter()
            .map(|s| s.first_accession.as_str())
            .collect();
        assert_eq!(firsts, vec!["P12345", "P12345-2"]);
    }

    #[test]
    fn test_no_evidence_yields_no_record() {
        let index = EvidenceIndex::new(&[]);
        let context = context();
        let converter = CcLineConverter::new(&context, &index);

        assert_eq!(converter.convert(&UniprotEntry::new("P12345")).unwrap(), None);
    }

    #[test]
    fn test_empty_secondary_rejected() {
        assert!(CcParameters::new("P12345", None, None, Vec::new()).is_err());
    }
}
