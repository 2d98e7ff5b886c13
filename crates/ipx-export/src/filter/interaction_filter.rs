use ipx_common::accession;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

use super::source::{ClusterSource, SourceRecord};
use super::strategy::ExportStrategy;
use crate::context::ClusterContext;
use crate::error::Result;
use crate::models::ScoredInteraction;
use crate::policy::ExportPolicy;

/// Counters of one filtering pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterStats {
    pub clusters_read: usize,
    /// Malformed records skipped with a warning
    pub clusters_malformed: usize,
    /// Pairs with an interactor outside UniProtKB
    pub clusters_non_target: usize,
    /// Pairs for which the strategy kept nothing
    pub clusters_rejected: usize,
    pub positive_clusters: usize,
    pub negative_clusters: usize,
    pub interaction_ids_selected: usize,
}

/// Outcome of [`InteractionFilter::export_interactions`]
#[derive(Debug, Clone, Default)]
pub struct FilterResult {
    /// Accessions with exported positive evidence, ascending
    pub positive_accessions: BTreeSet<String>,
    /// Accessions with exported negative evidence only, ascending
    pub negative_accessions: BTreeSet<String>,
    pub selected_interaction_ids: BTreeSet<String>,
    /// Kept clusters, each restricted to its selected interaction ids
    pub clusters: Vec<ScoredInteraction>,
    pub stats: FilterStats,
}

/// Applies an export strategy to every candidate cluster of a source
pub struct InteractionFilter<'a, S: ExportStrategy + ?Sized> {
    context: &'a ClusterContext,
    policy: &'a ExportPolicy,
    strategy: &'a S,
}

impl<'a, S: ExportStrategy + ?Sized> InteractionFilter<'a, S> {
    pub fn new(context: &'a ClusterContext, policy: &'a ExportPolicy, strategy: &'a S) -> Self {
        Self {
            context,
            policy,
            strategy,
        }
    }

    /// Select the exportable evidence of every cluster in `source`.
    ///
    /// Malformed records are skipped and counted. An error from the source
    /// itself aborts the pass.
    pub fn export_interactions(&self, source: &mut dyn ClusterSource) -> Result<FilterResult> {
        info!(
            source = source.name(),
            strategy = self.strategy.name(),
            "Selecting exportable interactions"
        );

        let source_name = source.name().to_string();
        let mut result = FilterResult::default();

        for record in source.clusters()? {
            result.stats.clusters_read += 1;
            let cluster = match record? {
                SourceRecord::Cluster(cluster) => cluster,
                SourceRecord::Malformed { location, reason } => {
                    warn!(
                        source = %source_name,
                        location = %location,
                        reason = %reason,
                        "Skipping undecodable cluster record"
                    );
                    result.stats.clusters_malformed += 1;
                    continue;
                },
            };

            if let Err(reason) = cluster.validate() {
                warn!(
                    source = %source_name,
                    interactor_a = %cluster.interactor_a,
                    interactor_b = %cluster.interactor_b,
                    reason = %reason,
                    "Skipping malformed cluster"
                );
                result.stats.clusters_malformed += 1;
                continue;
            }

            if self.policy.exclude_non_target_interactors
                && !cluster
                    .accessions()
                    .iter()
                    .all(|ac| accession::is_uniprot_accession(ac))
            {
                debug!(
                    interactor_a = %cluster.interactor_a,
                    interactor_b = %cluster.interactor_b,
                    "Skipping pair with a non-UniProtKB interactor"
                );
                result.stats.clusters_non_target += 1;
                continue;
            }

            let selected = self.strategy.select(&cluster, self.policy, self.context);
            if selected.is_empty() {
                result.stats.clusters_rejected += 1;
                continue;
            }

            let accessions = if cluster.negative {
                result.stats.negative_clusters += 1;
                &mut result.negative_accessions
            } else {
                result.stats.positive_clusters += 1;
                &mut result.positive_accessions
            };
            accessions.insert(cluster.interactor_a.clone());
            accessions.insert(cluster.interactor_b.clone());

            result.clusters.push(cluster.restricted_to(&selected));
            result.selected_interaction_ids.extend(selected);
        }

        // An accession with any positive evidence is reported as positive only
        let FilterResult {
            positive_accessions,
            negative_accessions,
            ..
        } = &mut result;
        negative_accessions.retain(|ac| !positive_accessions.contains(ac));

        result.stats.interaction_ids_selected = result.selected_interaction_ids.len();

        info!(
            clusters_read = result.stats.clusters_read,
            malformed = result.stats.clusters_malformed,
            non_target = result.stats.clusters_non_target,
            rejected = result.stats.clusters_rejected,
            positive_accessions = result.positive_accessions.len(),
            negative_accessions = result.negative_accessions.len(),
            interaction_ids = result.stats.interaction_ids_selected,
            "Interaction selection completed"
        );

        Ok(result)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::ExportError;
    use crate::filter::{
        DetectionMethodStrategy, InMemorySource, JsonLinesSource, ScoreThresholdStrategy,
        SourceRecords,
    };
    use crate::models::MethodAndType;
    use crate::policy::MethodStatus;

    fn context() -> ClusterContext {
        let mut context = ClusterContext::new();
        for id in ["EBI-1", "EBI-2", "EBI-3", "EBI-4"] {
            context.insert_interaction_method(id, MethodAndType::new("MI:0018", "MI:0915"));
        }
        context.insert_interaction_method("EBI-5", MethodAndType::new("MI:0096", "MI:0915"));
        context
    }

    fn clusters() -> Vec<ScoredInteraction> {
        vec![
            ScoredInteraction::new("P12345", "Q99999", 0.8).with_interaction("EBI-1", ["PMID:1"]),
            ScoredInteraction::new("P12345-2", "P67890", 0.2).with_interaction("EBI-2", ["PMID:2"]),
            ScoredInteraction::new("P67890", "Q99999", 0.9)
                .with_interaction("EBI-3", ["PMID:3"])
                .negative(),
            ScoredInteraction::new("P11111", "EBI-777", 0.9).with_interaction("EBI-4", ["PMID:4"]),
            ScoredInteraction::new("P22222", "Q22222", 1.0).with_interaction("EBI-5", ["PMID:5"]),
        ]
    }

    fn lenient_negative() -> ExportPolicy {
        ExportPolicy {
            exclude_negative: false,
            ..ExportPolicy::default()
        }
    }

    #[test]
    fn test_positive_and_negative_sets_are_disjoint() {
        let context = context();
        let policy = lenient_negative();
        let filter = InteractionFilter::new(&context, &policy, &ScoreThresholdStrategy);

        let result = filter
            .export_interactions(&mut InMemorySource::new(clusters()))
            .unwrap();

        let positive: Vec<&str> = result.positive_accessions.iter().map(String::as_str).collect();
        let negative: Vec<&str> = result.negative_accessions.iter().map(String::as_str).collect();
        assert_eq!(positive, vec!["P12345", "P22222", "Q22222", "Q99999"]);
        // Q99999 also has positive evidence
        assert_eq!(negative, vec!["P67890"]);

        assert_eq!(result.stats.clusters_read, 5);
        assert_eq!(result.stats.clusters_non_target, 1);
        assert_eq!(result.stats.clusters_rejected, 1);
        assert_eq!(result.stats.positive_clusters, 2);
        assert_eq!(result.stats.negative_clusters, 1);
        assert_eq!(result.clusters.len(), 3);
    }

    #[test]
    fn test_do_not_export_removes_pair_at_full_score() {
        let context = context();
        let policy =
            ExportPolicy::default().with_method_status("MI:0096", MethodStatus::DoNotExport);
        let filter = InteractionFilter::new(&context, &policy, &DetectionMethodStrategy);

        let result = filter
            .export_interactions(&mut InMemorySource::new(clusters()))
            .unwrap();

        assert!(!result.positive_accessions.contains("P22222"));
        assert!(!result.selected_interaction_ids.contains("EBI-5"));
        assert!(result.negative_accessions.is_empty());
    }

    #[test]
    fn test_non_target_interactors_kept_when_allowed() {
        let context = context();
        let policy = ExportPolicy {
            exclude_non_target_interactors: false,
            ..ExportPolicy::default()
        };
        let filter = InteractionFilter::new(&context, &policy, &ScoreThresholdStrategy);

        let result = filter
            .export_interactions(&mut InMemorySource::new(clusters()))
            .unwrap();
        assert!(result.positive_accessions.contains("EBI-777"));
    }

    #[test]
    fn test_malformed_clusters_skipped() {
        let context = context();
        let policy = ExportPolicy::default();
        let filter = InteractionFilter::new(&context, &policy, &ScoreThresholdStrategy);

        let mut out_of_range =
            ScoredInteraction::new("P12345", "Q99999", 0.5).with_interaction("EBI-1", ["PMID:1"]);
        out_of_range.score = 1.5;
        let source_clusters = vec![
            ScoredInteraction::new("P12345", "Q99999", 0.5),
            ScoredInteraction::new("", "Q99999", 0.5).with_interaction("EBI-1", ["PMID:1"]),
            out_of_range,
            // interaction id without publications is tolerated
            ScoredInteraction::new("P12345", "Q99999", 0.5)
                .with_interaction("EBI-1", Vec::<String>::new()),
        ];

        let result = filter
            .export_interactions(&mut InMemorySource::new(source_clusters))
            .unwrap();
        assert_eq!(result.stats.clusters_malformed, 3);
        assert_eq!(result.stats.positive_clusters, 1);
    }

    #[test]
    fn test_undecodable_records_skipped_and_counted() {
        let context = context();
        let policy = ExportPolicy::default();
        let filter = InteractionFilter::new(&context, &policy, &ScoreThresholdStrategy);

        let lines = concat!(
            r#"{"interactor_a":"P12345","interactor_b":"Q99999","score":0.8,"#,
            r#""interaction_ids":["EBI-1"]}"#,
            "\n",
            r#"{"interactor_a":"P22222"}"#,
            "\n",
            r#"{"interactor_a":"P33333","interactor_b":"Q33333","score":0.9,"#,
            r#""interaction_ids":["EBI-2"]}"#,
            "\n",
        );
        let mut source = JsonLinesSource::new("clusters.jsonl", lines.as_bytes());

        let result = filter.export_interactions(&mut source).unwrap();
        assert_eq!(result.stats.clusters_read, 3);
        assert_eq!(result.stats.clusters_malformed, 1);
        assert_eq!(result.stats.positive_clusters, 2);
        assert!(result.positive_accessions.contains("Q33333"));
    }

    struct FailingSource;

    impl ClusterSource for FailingSource {
        fn name(&self) -> &str {
            "failing"
        }

        fn clusters(&mut self) -> Result<SourceRecords<'_>> {
            let cluster = ScoredInteraction::new("P12345", "Q99999", 0.9)
                .with_interaction("EBI-1", ["PMID:1"]);
            Ok(Box::new(
                vec![
                    Ok(SourceRecord::Cluster(cluster)),
                    Err(ExportError::Source("connection lost".to_string())),
                ]
                .into_iter(),
            ))
        }
    }

    #[test]
    fn test_source_error_aborts() {
        let context = context();
        let policy = ExportPolicy::default();
        let filter = InteractionFilter::new(&context, &policy, &ScoreThresholdStrategy);

        let err = filter.export_interactions(&mut FailingSource).unwrap_err();
        assert!(matches!(err, ExportError::Source(_)));
    }
}
