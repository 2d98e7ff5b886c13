//! IPX Export Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Publishes curated molecular-interaction evidence as UniProtKB cross-reference
//! lines.
//!
//! # Overview
//!
//! Scored interaction clusters flow one way through the pipeline:
//!
//! 1. **Filter** ([`filter`]): an [`ExportStrategy`](filter::ExportStrategy)
//!    decides which interaction ids of each cluster may be published under the
//!    [`ExportPolicy`](policy::ExportPolicy).
//! 2. **Group** ([`entry`]): exported accessions are merged into
//!    [`UniprotEntry`](entry::UniprotEntry) groups of a master accession and its
//!    isoforms and feature chains.
//! 3. **Convert** ([`converters`]): each group becomes DR, CC and GO parameter
//!    records, looked up against the read-only [`ClusterContext`](context::ClusterContext).
//! 4. **Write** ([`writers`]): records are serialized to the line formats.
//!
//! [`pipeline::ExportPipeline`] drives the four steps.
//!
//! # Example
//!
//! ```
//! use ipx_export::context::ClusterContext;
//! use ipx_export::filter::{InMemorySource, ScoreThresholdStrategy};
//! use ipx_export::pipeline::{ExportPipeline, ExportSinks};
//! use ipx_export::policy::ExportPolicy;
//!
//! # fn main() -> ipx_export::Result<()> {
//! let context = ClusterContext::new();
//! let policy = ExportPolicy::default();
//! let pipeline = ExportPipeline::new(&context, &policy, ScoreThresholdStrategy);
//!
//! let mut source = InMemorySource::new(Vec::new());
//! let mut sinks = ExportSinks::new(Vec::new(), Vec::new(), Vec::new());
//! let stats = pipeline.run(&mut source, &mut sinks, |_| {})?;
//! assert_eq!(stats.dr_lines, 0);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod context;
pub mod converters;
pub mod entry;
pub mod error;
pub mod filter;
pub mod models;
pub mod pipeline;
pub mod policy;
pub mod writers;

pub use error::{ExportError, Result};
