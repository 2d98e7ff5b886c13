use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

use super::strategy::ExportStrategy;
use crate::context::ClusterContext;
use crate::models::ScoredInteraction;
use crate::policy::{ExportPolicy, MethodStatus};

/// Decides per interaction id from the curated status of its detection method.
///
/// Methods without a curator decision fall back to the score threshold of the
/// pair. `Conditional` methods are kept once the distinct publications of the
/// cluster's interactions using that method reach the minimum.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetectionMethodStrategy;

impl ExportStrategy for DetectionMethodStrategy {
    fn name(&self) -> &'static str {
        "method"
    }

    fn select(
        &self,
        cluster: &ScoredInteraction,
        policy: &ExportPolicy,
        context: &ClusterContext,
    ) -> BTreeSet<String> {
        if cluster.negative && policy.exclude_negative {
            return BTreeSet::new();
        }

        // Candidates with a known method, spoke-expanded evidence removed
        let mut candidates: Vec<(&String, &str)> =
            Vec::with_capacity(cluster.interaction_ids.len());
        for interaction_id in &cluster.interaction_ids {
            if policy.exclude_spoke_expanded && context.is_spoke_expanded(interaction_id) {
                continue;
            }

            match context.method_and_type(interaction_id) {
                Some(method) => candidates.push((interaction_id, method.detection_method.as_str())),
                None => warn!(
                    interaction_id = %interaction_id,
                    "No detection method known for interaction, skipping"
                ),
            }
        }

        let mut publications_by_method: HashMap<&str, BTreeSet<&str>> = HashMap::new();
        for (interaction_id, method) in &candidates {
            publications_by_method
                .entry(*method)
                .or_default()
                .extend(cluster.publications_for(interaction_id));
        }

        let score_accepted = cluster.negative || policy.accepts_score(cluster.score);

        candidates
            .into_iter()
            .filter(|(interaction_id, method)| {
                let keep = match policy.status_for(method) {
                    MethodStatus::Export => true,
                    MethodStatus::DoNotExport => false,
                    MethodStatus::NotSpecified => score_accepted,
                    MethodStatus::Conditional { min_occurrence } => {
                        let occurrences = publications_by_method
                            .get(method)
                            .map(BTreeSet::len)
                            .unwrap_or(0);
                        occurrences >= min_occurrence as usize
                    },
                };

                if !keep {
                    debug!(
                        interaction_id = %interaction_id,
                        detection_method = %method,
                        "Interaction not exported"
                    );
                }
                keep
            })
            .map(|(interaction_id, _)| interaction_id.clone())
            .collect()
    }
}
