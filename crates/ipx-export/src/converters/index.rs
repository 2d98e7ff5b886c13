use std::collections::HashMap;

use crate::models::ScoredInteraction;

/// Exported positive clusters indexed by interactor accession.
///
/// Built once per run from the filter output; a self-interaction is listed
/// once under its accession.
#[derive(Debug, Default)]
pub struct EvidenceIndex<'a> {
    clusters: &'a [ScoredInteraction],
    by_accession: HashMap<&'a str, Vec<usize>>,
}

impl<'a> EvidenceIndex<'a> {
    pub fn new(clusters: &'a [ScoredInteraction]) -> Self {
        let mut by_accession: HashMap<&'a str, Vec<usize>> = HashMap::new();

        for (position, cluster) in clusters.iter().enumerate() {
            if cluster.negative {
                continue;
            }

            by_accession
                .entry(cluster.interactor_a.as_str())
                .or_default()
                .push(position);
            if !cluster.is_self_interaction() {
                by_accession
                    .entry(cluster.interactor_b.as_str())
                    .or_default()
                    .push(position);
            }
        }

        Self {
            clusters,
            by_accession,
        }
    }

    /// Positive clusters in which `accession` takes part, in input order
    pub fn clusters_of<'s>(
        &'s self,
        accession: &str,
    ) -> impl Iterator<Item = &'a ScoredInteraction> + 's {
        self.by_accession
            .get(accession)
            .into_iter()
            .flatten()
            .map(move |&position| &self.clusters[position])
    }

    /// Number of indexed accessions
    pub fn len(&self) -> usize {
        self.by_accession.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_accession.is_empty()
    }
}
