use std::collections::BTreeSet;
use tracing::debug;

use super::strategy::{is_blocked, ExportStrategy};
use crate::context::ClusterContext;
use crate::models::ScoredInteraction;
use crate::policy::ExportPolicy;

/// Exports a pair with all of its evidence when the pair clears the score
/// threshold, or nothing at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreThresholdStrategy;

impl ExportStrategy for ScoreThresholdStrategy {
    fn name(&self) -> &'static str {
        "score"
    }

    fn select(
        &self,
        cluster: &ScoredInteraction,
        policy: &ExportPolicy,
        context: &ClusterContext,
    ) -> BTreeSet<String> {
        let rejected = if cluster.negative {
            policy.exclude_negative
        } else {
            rejects_positive_pair(cluster, policy, context)
        };
        if rejected {
            return BTreeSet::new();
        }

        cluster
            .interaction_ids
            .iter()
            .filter(|id| !is_blocked(id, policy, context))
            .cloned()
            .collect()
    }
}

/// Spoke-expanded-only and low-confidence pairs are not exported
fn rejects_positive_pair(
    cluster: &ScoredInteraction,
    policy: &ExportPolicy,
    context: &ClusterContext,
) -> bool {
    if policy.exclude_spoke_expanded
        && cluster
            .interaction_ids
            .iter()
            .all(|id| context.is_spoke_expanded(id))
    {
        debug!(
            interactor_a = %cluster.interactor_a,
            interactor_b = %cluster.interactor_b,
            "Pair only supported by spoke-expanded evidence"
        );
        return true;
    }

    if !policy.accepts_score(cluster.score) {
        debug!(
            interactor_a = %cluster.interactor_a,
            interactor_b = %cluster.interactor_b,
            score = cluster.score,
            min_score = policy.min_score,
            "Pair below score threshold"
        );
        return true;
    }

    false
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::models::MethodAndType;
    use crate::policy::MethodStatus;

    fn cluster(score: f64) -> ScoredInteraction {
        ScoredInteraction::new("P12345", "Q99999", score)
            .with_interaction("EBI-1", ["PMID:1"])
            .with_interaction("EBI-2", ["PMID:2"])
    }

    fn context() -> ClusterContext {
        let mut context = ClusterContext::new();
        context.insert_interaction_method("EBI-1", MethodAndType::new("MI:0018", "MI:0915"));
        context.insert_interaction_method("EBI-2", MethodAndType::new("MI:0096", "MI:0915"));
        context
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let policy = ExportPolicy::default().with_min_score(0.40);
        let context = context();

        assert!(ScoreThresholdStrategy.select(&cluster(0.39), &policy, &context).is_empty());
        assert_eq!(ScoreThresholdStrategy.select(&cluster(0.40), &policy, &context).len(), 2);
        assert_eq!(ScoreThresholdStrategy.select(&cluster(0.41), &policy, &context).len(), 2);
    }

    #[test]
    fn test_low_confidence_kept_when_not_excluded() {
        let policy = ExportPolicy {
            exclude_low_confidence: false,
            ..ExportPolicy::default().with_min_score(0.40)
        };

        let kept = ScoreThresholdStrategy.select(&cluster(0.39), &policy, &context());
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_do_not_export_dominates_score() {
        let policy =
            ExportPolicy::default().with_method_status("MI:0096", MethodStatus::DoNotExport);

        let kept = ScoreThresholdStrategy.select(&cluster(1.0), &policy, &context());
        assert_eq!(kept.into_iter().collect::<Vec<_>>(), vec!["EBI-1".to_string()]);
    }

    #[test]
    fn test_spoke_expanded_only_pair_dropped() {
        let mut context = context();
        context.insert_spoke_expanded("EBI-1");
        let policy = ExportPolicy::default();

        // one direct interaction left: the whole pair survives
        assert_eq!(ScoreThresholdStrategy.select(&cluster(0.9), &policy, &context).len(), 2);

        context.insert_spoke_expanded("EBI-2");
        assert!(ScoreThresholdStrategy.select(&cluster(0.9), &policy, &context).is_empty());

        let lenient = ExportPolicy {
            exclude_spoke_expanded: false,
            ..policy
        };
        assert_eq!(ScoreThresholdStrategy.select(&cluster(0.9), &lenient, &context).len(), 2);
    }

    #[test]
    fn test_negative_cluster() {
        let negative = cluster(0.1).negative();
        let context = context();

        assert!(ScoreThresholdStrategy
            .select(&negative, &ExportPolicy::default(), &context)
            .is_empty());

        let policy = ExportPolicy {
            exclude_negative: false,
            ..ExportPolicy::default()
        };
        assert_eq!(ScoreThresholdStrategy.select(&negative, &policy, &context).len(), 2);
    }
}
