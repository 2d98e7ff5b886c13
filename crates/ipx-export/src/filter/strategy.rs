//! Pluggable selection rules

use std::collections::BTreeSet;

use crate::context::ClusterContext;
use crate::models::ScoredInteraction;
use crate::policy::{ExportPolicy, MethodStatus};

/// Decides which interaction ids of a cluster may be published.
///
/// Implementations must be pure functions of their arguments so clusters can
/// be evaluated in any order.
pub trait ExportStrategy: Send + Sync {
    /// Short identifier used in logs and configuration
    fn name(&self) -> &'static str;

    /// Select the interaction ids to export
    ///
    /// # Arguments
    /// * `cluster` - The scored cluster under evaluation
    /// * `policy` - Curation toggles and method statuses
    /// * `context` - Method and spoke-expansion lookups
    ///
    /// # Returns
    /// The kept interaction ids; an empty set means the pair is not exported
    fn select(
        &self,
        cluster: &ScoredInteraction,
        policy: &ExportPolicy,
        context: &ClusterContext,
    ) -> BTreeSet<String>;
}

impl<S: ExportStrategy + ?Sized> ExportStrategy for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn select(
        &self,
        cluster: &ScoredInteraction,
        policy: &ExportPolicy,
        context: &ClusterContext,
    ) -> BTreeSet<String> {
        (**self).select(cluster, policy, context)
    }
}

/// Whether an interaction id was curated with a `DoNotExport` method.
///
/// This holds for every strategy: such evidence is never published, whatever
/// its score.
pub(crate) fn is_blocked(
    interaction_id: &str,
    policy: &ExportPolicy,
    context: &ClusterContext,
) -> bool {
    context
        .method_and_type(interaction_id)
        .map(|m| policy.status_for(&m.detection_method) == MethodStatus::DoNotExport)
        .unwrap_or(false)
}
