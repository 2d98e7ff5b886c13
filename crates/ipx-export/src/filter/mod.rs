//! Selection of exportable interaction evidence
//!
//! A [`ClusterSource`] supplies scored clusters, an [`ExportStrategy`] decides
//! which interaction ids of each cluster may be published, and the
//! [`InteractionFilter`] collects the outcome into a [`FilterResult`].

mod interaction_filter;
mod method;
mod score;
mod source;
mod strategy;

pub use interaction_filter::{FilterResult, FilterStats, InteractionFilter};
pub use method::DetectionMethodStrategy;
pub use score::ScoreThresholdStrategy;
pub use source::{ClusterSource, InMemorySource, JsonLinesSource, SourceRecord, SourceRecords};
pub use strategy::ExportStrategy;
