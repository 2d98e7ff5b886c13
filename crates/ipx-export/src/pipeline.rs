//! End-to-end export run: filter, group, convert, write

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use std::io::Write;
use tracing::{debug, info, warn};

use crate::context::ClusterContext;
use crate::converters::{EntryRecords, EvidenceIndex, LineConverters};
use crate::entry::{UniprotEntry, UniprotEntryIterator};
use crate::error::{ExportError, Result};
use crate::filter::{ClusterSource, ExportStrategy, FilterResult, FilterStats, InteractionFilter};
use crate::policy::ExportPolicy;
use crate::writers::{CcLineWriter, DrLineWriter, GoLineWriter, LineWriter};

/// Notification emitted for every line written or record rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportEvent<'e> {
    DrLine {
        accession: &'e str,
    },
    CcRecord {
        master: &'e str,
        lines: usize,
    },
    GoLine {
        first_accession: &'e str,
        second_accession: &'e str,
    },
    /// A parameter record failed construction and was skipped
    RecordRejected {
        stream: &'static str,
        master: &'e str,
        reason: String,
    },
}

/// Statistics of one export run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportStats {
    pub filter: FilterStats,
    pub entries: usize,
    pub dr_lines: usize,
    pub cc_records: usize,
    pub cc_lines: usize,
    pub go_lines: usize,
    pub rejected_records: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ExportStats {
    fn started(filter: FilterStats, started_at: DateTime<Utc>) -> Self {
        Self {
            filter,
            entries: 0,
            dr_lines: 0,
            cc_records: 0,
            cc_lines: 0,
            go_lines: 0,
            rejected_records: 0,
            started_at,
            finished_at: started_at,
        }
    }

    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

/// The three output streams of a run
pub struct ExportSinks<W: Write> {
    pub dr: DrLineWriter<W>,
    pub cc: CcLineWriter<W>,
    pub go: GoLineWriter<W>,
}

impl<W: Write> ExportSinks<W> {
    pub fn new(dr: W, cc: W, go: W) -> Self {
        Self {
            dr: DrLineWriter::new(dr),
            cc: CcLineWriter::new(cc),
            go: GoLineWriter::new(go),
        }
    }

    pub fn flush(&mut self) -> Result<()> {
        self.dr.flush()?;
        self.cc.flush()?;
        self.go.flush()
    }

    /// Flush every stream and hand back the DR, CC and GO writers
    pub fn close(self) -> Result<(W, W, W)> {
        Ok((self.dr.close()?, self.cc.close()?, self.go.close()?))
    }
}

/// Drives one export run over a cluster source.
///
/// The context and policy are borrowed for the whole run and never mutated.
/// With [`ExportPipeline::parallel`] entries are converted on the rayon pool;
/// records are still written by the calling thread in entry order, so both
/// modes produce identical output.
pub struct ExportPipeline<'a, S: ExportStrategy> {
    context: &'a ClusterContext,
    policy: &'a ExportPolicy,
    strategy: S,
    parallel: bool,
}

impl<'a, S: ExportStrategy> ExportPipeline<'a, S> {
    pub fn new(context: &'a ClusterContext, policy: &'a ExportPolicy, strategy: S) -> Self {
        Self {
            context,
            policy,
            strategy,
            parallel: false,
        }
    }

    /// Convert entries in parallel
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Run the export, reporting every line through `on_event`
    ///
    /// # Returns
    /// Statistics of the run; the sinks are flushed but left open
    pub fn run<W, F>(
        &self,
        source: &mut dyn ClusterSource,
        sinks: &mut ExportSinks<W>,
        mut on_event: F,
    ) -> Result<ExportStats>
    where
        W: Write,
        F: FnMut(&ExportEvent<'_>),
    {
        self.policy.validate()?;
        let started_at = Utc::now();

        info!(
            strategy = self.strategy.name(),
            parallel = self.parallel,
            "Step 1/3: Selecting exportable interactions..."
        );
        let FilterResult {
            positive_accessions,
            negative_accessions,
            clusters,
            stats: filter_stats,
            ..
        } = InteractionFilter::new(self.context, self.policy, &self.strategy)
            .export_interactions(source)?;

        let mut stats = ExportStats::started(filter_stats, started_at);
        let index = EvidenceIndex::new(&clusters);
        let converters = LineConverters::new(self.context, &index);
        let entries = UniprotEntryIterator::new(positive_accessions, negative_accessions);

        info!("Step 2/3: Converting entries...");
        if self.parallel {
            let entries: Vec<UniprotEntry> = entries.collect();
            debug!(entries = entries.len(), "Converting entries in parallel");

            let records: Vec<EntryRecords> = entries
                .par_iter()
                .map(|entry| converters.convert(entry))
                .collect();

            info!("Step 3/3: Writing lines...");
            for entry_records in records {
                Self::write_records(entry_records, sinks, &mut stats, &mut on_event)?;
            }
        } else {
            info!("Step 3/3: Writing lines...");
            for entry in entries {
                Self::write_records(converters.convert(&entry), sinks, &mut stats, &mut on_event)?;
            }
        }

        sinks.flush()?;
        stats.finished_at = Utc::now();

        info!(
            entries = stats.entries,
            dr_lines = stats.dr_lines,
            cc_records = stats.cc_records,
            cc_lines = stats.cc_lines,
            go_lines = stats.go_lines,
            rejected = stats.rejected_records,
            duration_ms = stats.duration_ms(),
            "Export completed"
        );

        Ok(stats)
    }

    fn write_records<W, F>(
        records: EntryRecords,
        sinks: &mut ExportSinks<W>,
        stats: &mut ExportStats,
        on_event: &mut F,
    ) -> Result<()>
    where
        W: Write,
        F: FnMut(&ExportEvent<'_>),
    {
        let EntryRecords { master, dr, cc, go } = records;
        stats.entries += 1;

        match dr {
            Ok(params) => {
                sinks.dr.write_record(&params)?;
                stats.dr_lines += 1;
                on_event(&ExportEvent::DrLine {
                    accession: params.accession(),
                });
            },
            Err(err) => reject("DR", &master, err, stats, on_event),
        }

        match cc {
            Ok(Some(params)) => {
                let lines = sinks.cc.write_record(&params)?;
                stats.cc_records += 1;
                stats.cc_lines += lines;
                on_event(&ExportEvent::CcRecord {
                    master: params.master(),
                    lines,
                });
            },
            Ok(None) => {},
            Err(err) => reject("CC", &master, err, stats, on_event),
        }

        for line in go {
            match line {
                Ok(params) => {
                    sinks.go.write_record(&params)?;
                    stats.go_lines += 1;
                    on_event(&ExportEvent::GoLine {
                        first_accession: params.first_accession(),
                        second_accession: params.second_accession(),
                    });
                },
                Err(err) => reject("GO", &master, err, stats, on_event),
            }
        }

        Ok(())
    }
}

fn reject<F>(
    stream: &'static str,
    master: &str,
    err: ExportError,
    stats: &mut ExportStats,
    on_event: &mut F,
) where
    F: FnMut(&ExportEvent<'_>),
{
    warn!(stream, master = %master, error = %err, "Record rejected");
    stats.rejected_records += 1;
    on_event(&ExportEvent::RecordRejected {
        stream,
        master,
        reason: err.to_string(),
    });
}
