//! Read-only lookup tables shared by every stage of an export run
//!
//! The context is populated once before filtering and is only borrowed
//! immutably by the pipeline, so it can be shared across threads while entries
//! are converted. Call [`ClusterContext::clear`] between runs.

use ipx_common::accession;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::io::Read;
use tracing::info;

use crate::error::{ExportError, Result};
use crate::models::MethodAndType;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterContext {
    /// Gene name by UniProtKB accession
    #[serde(default)]
    gene_names: HashMap<String, String>,
    /// Ontology term display name by term id
    #[serde(default)]
    term_names: HashMap<String, String>,
    /// Detection method and interaction type by interaction id
    #[serde(default)]
    interaction_methods: HashMap<String, MethodAndType>,
    /// Interaction ids inferred by spoke expansion of a complex
    #[serde(default)]
    spoke_expanded: HashSet<String>,
    /// NCBI taxonomy id by UniProtKB accession
    #[serde(default)]
    taxonomy_ids: HashMap<String, String>,
    /// GO cellular-component cross-references by interaction id
    #[serde(default)]
    interaction_components: HashMap<String, BTreeSet<String>>,
}

impl ClusterContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a context serialized as JSON and check it is consistent
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let context: ClusterContext = serde_json::from_reader(reader)?;
        context.validate()?;

        info!(
            gene_names = context.gene_names.len(),
            terms = context.term_names.len(),
            interactions = context.interaction_methods.len(),
            spoke_expanded = context.spoke_expanded.len(),
            "Cluster context loaded"
        );

        Ok(context)
    }

    /// Reject tables with empty keys or values.
    ///
    /// A partially populated context yields systematically wrong lines, so
    /// this error aborts the run instead of skipping records.
    pub fn validate(&self) -> Result<()> {
        let empty_key = |key: &String| key.trim().is_empty();

        if self.gene_names.keys().any(empty_key) {
            return Err(ExportError::Context("gene name with empty accession".to_string()));
        }
        if self.term_names.keys().any(empty_key) {
            return Err(ExportError::Context("term name with empty term id".to_string()));
        }
        if self.taxonomy_ids.keys().any(empty_key) {
            return Err(ExportError::Context("taxonomy id with empty accession".to_string()));
        }
        if self.spoke_expanded.iter().any(empty_key) {
            return Err(ExportError::Context("empty spoke-expanded interaction id".to_string()));
        }

        for (interaction_id, method) in &self.interaction_methods {
            if interaction_id.trim().is_empty() {
                return Err(ExportError::Context(
                    "detection method with empty interaction id".to_string(),
                ));
            }
            if method.detection_method.trim().is_empty()
                || method.interaction_type.trim().is_empty()
            {
                return Err(ExportError::Context(format!(
                    "interaction {} has an empty detection method or interaction type",
                    interaction_id
                )));
            }
        }

        Ok(())
    }

    /// Drop every table, ready for the next run
    pub fn clear(&mut self) {
        self.gene_names.clear();
        self.term_names.clear();
        self.interaction_methods.clear();
        self.spoke_expanded.clear();
        self.taxonomy_ids.clear();
        self.interaction_components.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.gene_names.is_empty()
            && self.term_names.is_empty()
            && self.interaction_methods.is_empty()
            && self.spoke_expanded.is_empty()
            && self.taxonomy_ids.is_empty()
            && self.interaction_components.is_empty()
    }

    // ------------------------------------------------------------------------
    // Population
    // ------------------------------------------------------------------------

    pub fn insert_gene_name(&mut self, accession: impl Into<String>, gene_name: impl Into<String>) {
        self.gene_names.insert(accession.into(), gene_name.into());
    }

    pub fn insert_term_name(&mut self, term_id: impl Into<String>, name: impl Into<String>) {
        self.term_names.insert(term_id.into(), name.into());
    }

    pub fn insert_interaction_method(
        &mut self,
        interaction_id: impl Into<String>,
        method_and_type: MethodAndType,
    ) {
        self.interaction_methods
            .insert(interaction_id.into(), method_and_type);
    }

    pub fn insert_spoke_expanded(&mut self, interaction_id: impl Into<String>) {
        self.spoke_expanded.insert(interaction_id.into());
    }

    pub fn insert_taxonomy_id(
        &mut self,
        accession: impl Into<String>,
        taxonomy_id: impl Into<String>,
    ) {
        self.taxonomy_ids.insert(accession.into(), taxonomy_id.into());
    }

    pub fn insert_component(
        &mut self,
        interaction_id: impl Into<String>,
        go_id: impl Into<String>,
    ) {
        self.interaction_components
            .entry(interaction_id.into())
            .or_default()
            .insert(go_id.into());
    }

    // ------------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------------

    /// Gene name of an accession, falling back to its master entry
    pub fn gene_name(&self, accession: &str) -> Option<&str> {
        self.gene_names
            .get(accession)
            .or_else(|| self.gene_names.get(accession::master_of(accession)))
            .map(String::as_str)
    }

    /// Taxonomy id of an accession, falling back to its master entry
    pub fn taxonomy_id(&self, accession: &str) -> Option<&str> {
        self.taxonomy_ids
            .get(accession)
            .or_else(|| self.taxonomy_ids.get(accession::master_of(accession)))
            .map(String::as_str)
    }

    /// Display name of an ontology term; the id itself when no name is known
    pub fn term_name<'a>(&'a self, term_id: &'a str) -> &'a str {
        self.term_names
            .get(term_id)
            .map(String::as_str)
            .unwrap_or(term_id)
    }

    pub fn method_and_type(&self, interaction_id: &str) -> Option<&MethodAndType> {
        self.interaction_methods.get(interaction_id)
    }

    pub fn is_spoke_expanded(&self, interaction_id: &str) -> bool {
        self.spoke_expanded.contains(interaction_id)
    }

    /// GO cellular-component ids annotated on an interaction
    pub fn components(&self, interaction_id: &str) -> impl Iterator<Item = &str> {
        self.interaction_components
            .get(interaction_id)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }
}
