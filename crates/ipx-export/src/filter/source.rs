//! Suppliers of scored interaction clusters

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{ExportError, Result};
use crate::models::ScoredInteraction;

/// One item handed over by a [`ClusterSource`]
#[derive(Debug, Clone, PartialEq)]
pub enum SourceRecord {
    Cluster(ScoredInteraction),
    /// A record that could not be decoded; the filter skips and counts it
    Malformed { location: String, reason: String },
}

/// Items of one pass over a [`ClusterSource`]
pub type SourceRecords<'s> = Box<dyn Iterator<Item = Result<SourceRecord>> + 's>;

/// Supplier of the candidate clusters of an export run.
///
/// Clustering and scoring happen upstream; a source only hands over the
/// finished records. Errors yielded by the iterator abort the run.
pub trait ClusterSource {
    /// Human-readable name used in logs
    fn name(&self) -> &str;

    /// Iterate the candidate clusters
    ///
    /// # Returns
    /// A fallible iterator; an `Err` item is an upstream failure such as an
    /// I/O error, while a record that cannot be decoded is yielded as
    /// [`SourceRecord::Malformed`]
    fn clusters(&mut self) -> Result<SourceRecords<'_>>;
}

/// Clusters held in memory, mostly for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    clusters: Vec<ScoredInteraction>,
}

impl InMemorySource {
    pub fn new(clusters: Vec<ScoredInteraction>) -> Self {
        Self { clusters }
    }
}

impl ClusterSource for InMemorySource {
    fn name(&self) -> &str {
        "memory"
    }

    fn clusters(&mut self) -> Result<SourceRecords<'_>> {
        Ok(Box::new(
            self.clusters
                .iter()
                .cloned()
                .map(|cluster| Ok(SourceRecord::Cluster(cluster))),
        ))
    }
}

/// One JSON-encoded [`ScoredInteraction`] per line; blank lines are ignored.
///
/// A line that is not valid JSON or lacks a required field is yielded as
/// [`SourceRecord::Malformed`] tagged `name:line`. Read failures end the pass.
///
/// The reader is consumed by the first call to [`ClusterSource::clusters`].
pub struct JsonLinesSource<R: BufRead> {
    name: String,
    reader: Option<R>,
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(name: impl Into<String>, reader: R) -> Self {
        Self {
            name: name.into(),
            reader: Some(reader),
        }
    }
}

impl JsonLinesSource<BufReader<File>> {
    /// Open a JSON-lines cluster file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            ExportError::Source(format!("Failed to open {}: {}", path.display(), e))
        })?;

        Ok(Self::new(path.display().to_string(), BufReader::new(file)))
    }
}

impl<R: BufRead> ClusterSource for JsonLinesSource<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn clusters(&mut self) -> Result<SourceRecords<'_>> {
        let reader = self.reader.take().ok_or_else(|| {
            ExportError::Source(format!("{} has already been read", self.name))
        })?;
        let name = self.name.as_str();

        let records = reader
            .lines()
            .enumerate()
            .filter_map(move |(index, line)| {
                let line_number = index + 1;
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        return Some(Err(ExportError::Source(format!(
                            "{}:{}: {}",
                            name, line_number, e
                        ))))
                    },
                };

                if line.trim().is_empty() {
                    return None;
                }

                let record = match serde_json::from_str::<ScoredInteraction>(&line) {
                    Ok(cluster) => SourceRecord::Cluster(cluster),
                    Err(e) => SourceRecord::Malformed {
                        location: format!("{}:{}", name, line_number),
                        reason: e.to_string(),
                    },
                };
                Some(Ok(record))
            });

        Ok(Box::new(records))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const LINES: &str = r#"{"interactor_a":"P12345","interactor_b":"Q99999","score":0.6,"interaction_ids":["EBI-1"]}

{"interactor_a":"P12345","interactor_b":"P12345","score":0.5,"interaction_ids":["EBI-2"],"negative":true}
"#;

    fn decoded(records: SourceRecords<'_>) -> Vec<SourceRecord> {
        records.collect::<Result<_>>().unwrap()
    }

    #[test]
    fn test_json_lines_source_skips_blank_lines() {
        let mut source = JsonLinesSource::new("inline", LINES.as_bytes());
        let records = decoded(source.clusters().unwrap());

        assert_eq!(records.len(), 2);
        match (&records[0], &records[1]) {
            (SourceRecord::Cluster(first), SourceRecord::Cluster(second)) => {
                assert_eq!(first.interactor_b, "Q99999");
                assert!(second.negative);
            },
            other => panic!("unexpected records: {other:?}"),
        }
    }

    #[test]
    fn test_json_lines_source_yields_undecodable_lines_as_malformed() {
        let first = LINES.lines().next().unwrap();
        let input = format!("{}\n{{\"interactor_a\":\"P22222\"}}\nnot json\n", first);
        let mut source = JsonLinesSource::new("broken.jsonl", input.as_bytes());
        let records = decoded(source.clusters().unwrap());

        assert_eq!(records.len(), 3);
        assert!(matches!(records[0], SourceRecord::Cluster(_)));
        match &records[1] {
            SourceRecord::Malformed { location, reason } => {
                assert_eq!(location, "broken.jsonl:2");
                assert!(reason.contains("interactor_b"));
            },
            other => panic!("unexpected record: {other:?}"),
        }
        assert!(matches!(
            &records[2],
            SourceRecord::Malformed { location, .. } if location == "broken.jsonl:3"
        ));
    }

    struct BrokenReader;

    impl std::io::Read for BrokenReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("disk unplugged"))
        }
    }

    #[test]
    fn test_json_lines_source_read_failure_is_an_error() {
        let mut source = JsonLinesSource::new("unplugged", BufReader::new(BrokenReader));
        let err = source.clusters().unwrap().next().unwrap().unwrap_err();

        match err {
            ExportError::Source(message) => assert!(message.starts_with("unplugged:1:")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_json_lines_source_is_read_once() {
        let mut source = JsonLinesSource::new("inline", LINES.as_bytes());
        assert_eq!(source.clusters().unwrap().count(), 2);
        assert!(source.clusters().is_err());
    }

    #[test]
    fn test_in_memory_source_can_be_replayed() {
        let mut source = InMemorySource::new(vec![ScoredInteraction::new("P12345", "Q99999", 0.5)]);
        assert_eq!(source.clusters().unwrap().count(), 1);
        assert_eq!(source.clusters().unwrap().count(), 1);
    }

    #[test]
    fn test_open_missing_file() {
        let err = JsonLinesSource::open("/nonexistent/clusters.jsonl").err().unwrap();
        assert!(matches!(err, ExportError::Source(_)));
    }
}
