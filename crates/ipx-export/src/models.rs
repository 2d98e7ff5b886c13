//! Interaction data models consumed by the export pipeline

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A clustered, scored binary interaction between two interactors.
///
/// Produced upstream by the clustering and MI-score computation; the pipeline
/// never mutates a record it receives, it only derives restricted copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredInteraction {
    /// Accession of interactor A
    pub interactor_a: String,
    /// Accession of interactor B
    pub interactor_b: String,
    /// MI confidence score in [0.0, 1.0]
    pub score: f64,
    /// Interaction ids supporting this pair (e.g. "EBI-1234567")
    pub interaction_ids: BTreeSet<String>,
    /// Publication ids contributing each interaction id
    #[serde(default)]
    pub publications: BTreeMap<String, BTreeSet<String>>,
    /// Whether the cluster was built from negative evidence
    #[serde(default)]
    pub negative: bool,
}

impl ScoredInteraction {
    pub fn new(
        interactor_a: impl Into<String>,
        interactor_b: impl Into<String>,
        score: f64,
    ) -> Self {
        Self {
            interactor_a: interactor_a.into(),
            interactor_b: interactor_b.into(),
            score,
            interaction_ids: BTreeSet::new(),
            publications: BTreeMap::new(),
            negative: false,
        }
    }

    /// Add an interaction id with the publications it was curated from
    pub fn with_interaction<I, P>(
        mut self,
        interaction_id: impl Into<String>,
        publications: I,
    ) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        let interaction_id = interaction_id.into();
        self.publications
            .entry(interaction_id.clone())
            .or_default()
            .extend(publications.into_iter().map(Into::into));
        self.interaction_ids.insert(interaction_id);
        self
    }

    /// Mark the cluster as negative evidence
    pub fn negative(mut self) -> Self {
        self.negative = true;
        self
    }

    /// Both interactor accessions, A first
    pub fn accessions(&self) -> [&str; 2] {
        [&self.interactor_a, &self.interactor_b]
    }

    pub fn is_self_interaction(&self) -> bool {
        self.interactor_a == self.interactor_b
    }

    /// The other side of the pair, or `None` when `accession` is not part of it
    pub fn partner_of(&self, accession: &str) -> Option<&str> {
        if self.interactor_a == accession {
            Some(&self.interactor_b)
        } else if self.interactor_b == accession {
            Some(&self.interactor_a)
        } else {
            None
        }
    }

    /// Publications recorded for one interaction id
    pub fn publications_for(&self, interaction_id: &str) -> impl Iterator<Item = &str> {
        self.publications
            .get(interaction_id)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Check the record is usable; returns the reason when it is not
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.interactor_a.trim().is_empty() || self.interactor_b.trim().is_empty() {
            return Err("empty interactor accession".to_string());
        }
        if self.interaction_ids.is_empty() {
            return Err("no interaction ids".to_string());
        }
        if !self.score.is_finite() || !(0.0..=1.0).contains(&self.score) {
            return Err(format!("score {} outside [0, 1]", self.score));
        }
        Ok(())
    }

    /// Copy of this cluster keeping only the given interaction ids
    pub fn restricted_to(&self, kept: &BTreeSet<String>) -> ScoredInteraction {
        let interaction_ids: BTreeSet<String> =
            self.interaction_ids.intersection(kept).cloned().collect();
        let publications = self
            .publications
            .iter()
            .filter(|(id, _)| interaction_ids.contains(*id))
            .map(|(id, pubs)| (id.clone(), pubs.clone()))
            .collect();

        ScoredInteraction {
            interactor_a: self.interactor_a.clone(),
            interactor_b: self.interactor_b.clone(),
            score: self.score,
            interaction_ids,
            publications,
            negative: self.negative,
        }
    }
}

/// Detection method and interaction type ids of one interaction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodAndType {
    /// Interaction detection method term id (e.g. "MI:0018")
    pub detection_method: String,
    /// Interaction type term id (e.g. "MI:0915")
    pub interaction_type: String,
}

impl MethodAndType {
    pub fn new(detection_method: impl Into<String>, interaction_type: impl Into<String>) -> Self {
        Self {
            detection_method: detection_method.into(),
            interaction_type: interaction_type.into(),
        }
    }
}

/// Evidence summary for a secondary interactor of a CC record.
///
/// Field order defines the ordering: detection method display name, then
/// interaction type display name, then direct evidence before spoke-expanded
/// evidence, then publications.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InteractionDetails {
    pub detection_method: String,
    pub interaction_type: String,
    pub spoke_expanded: bool,
    pub publication_ids: BTreeSet<String>,
}

impl InteractionDetails {
    pub fn new(
        detection_method: impl Into<String>,
        interaction_type: impl Into<String>,
        spoke_expanded: bool,
    ) -> Self {
        Self {
            detection_method: detection_method.into(),
            interaction_type: interaction_type.into(),
            spoke_expanded,
            publication_ids: BTreeSet::new(),
        }
    }

    /// The three-part key details are merged and ordered by
    pub fn sort_key(&self) -> (&str, &str, bool) {
        (&self.detection_method, &self.interaction_type, self.spoke_expanded)
    }
}
