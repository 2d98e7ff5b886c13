//! Grouping of exported accessions into UniProtKB entries
//!
//! [`UniprotEntryIterator`] merges the ascending positive and negative
//! accession streams in a single pass. Each yielded [`UniprotEntry`] holds a
//! master accession and the isoform or feature-chain accessions of that master
//! found in either stream. Membership is decided by derived master
//! ([`accession::master_of`]), never by literal string prefix: `A0A023` and
//! `A0A023GPI8` are different entries even though one prefixes the other.

use ipx_common::accession;
use std::collections::BTreeSet;
use std::iter::{FusedIterator, Peekable};

/// A master accession with the related accessions found in each stream.
///
/// The master itself is never listed in `positive` or `negative`, and it may
/// appear in neither input when only isoforms or chains were exported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniprotEntry {
    pub master: String,
    /// Isoforms and chains with exported positive evidence
    pub positive: BTreeSet<String>,
    /// Isoforms and chains with negative evidence only
    pub negative: BTreeSet<String>,
}

impl UniprotEntry {
    pub fn new(master: impl Into<String>) -> Self {
        Self {
            master: master.into(),
            positive: BTreeSet::new(),
            negative: BTreeSet::new(),
        }
    }

    /// Master followed by the positive related accessions
    pub fn positive_group(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.master.as_str()).chain(self.positive.iter().map(String::as_str))
    }

    /// Every accession of the entry, master first
    pub fn accessions(&self) -> impl Iterator<Item = &str> {
        self.positive_group()
            .chain(self.negative.iter().map(String::as_str))
    }
}

/// Lazily merges two ascending, duplicate-free accession streams into entries.
///
/// Both inputs must be sorted lexicographically; `BTreeSet` iteration satisfies
/// this. Isoform and chain accessions always sort directly after their master,
/// so every entry is drained from a contiguous run of each stream.
pub struct UniprotEntryIterator<P, N>
where
    P: Iterator<Item = String>,
    N: Iterator<Item = String>,
{
    positive: Peekable<P>,
    negative: Peekable<N>,
}

impl<P, N> UniprotEntryIterator<P, N>
where
    P: Iterator<Item = String>,
    N: Iterator<Item = String>,
{
    pub fn new(
        positive: impl IntoIterator<IntoIter = P>,
        negative: impl IntoIterator<IntoIter = N>,
    ) -> Self {
        Self {
            positive: positive.into_iter().peekable(),
            negative: negative.into_iter().peekable(),
        }
    }

    fn drain_into(
        stream: &mut Peekable<impl Iterator<Item = String>>,
        master: &str,
        members: &mut BTreeSet<String>,
    ) {
        while let Some(accession) =
            stream.next_if(|candidate| accession::belongs_to(candidate, master))
        {
            if accession != master {
                members.insert(accession);
            }
        }
    }
}

impl<P, N> Iterator for UniprotEntryIterator<P, N>
where
    P: Iterator<Item = String>,
    N: Iterator<Item = String>,
{
    type Item = UniprotEntry;

    fn next(&mut self) -> Option<UniprotEntry> {
        let candidate = match (self.positive.peek(), self.negative.peek()) {
            (None, None) => return None,
            (Some(positive), None) => positive,
            (None, Some(negative)) => negative,
            (Some(positive), Some(negative)) => positive.min(negative),
        };

        let mut entry = UniprotEntry::new(accession::master_of(candidate));

        Self::drain_into(&mut self.positive, &entry.master, &mut entry.positive);
        Self::drain_into(&mut self.negative, &entry.master, &mut entry.negative);

        Some(entry)
    }
}

impl<P, N> FusedIterator for UniprotEntryIterator<P, N>
where
    P: Iterator<Item = String>,
    N: Iterator<Item = String>,
{
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn entries(positive: &[&str], negative: &[&str]) -> Vec<UniprotEntry> {
        UniprotEntryIterator::new(strings(positive), strings(negative)).collect()
    }

    fn set(values: &[&str]) -> BTreeSet<String> {
        strings(values).into_iter().collect()
    }

    #[test]
    fn test_isoform_grouped_under_master() {
        let result = entries(&["P12345", "P12345-1", "P99999"], &[]);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].master, "P12345");
        assert_eq!(result[0].positive, set(&["P12345-1"]));
        assert!(result[0].negative.is_empty());
        assert_eq!(result[1].master, "P99999");
        assert!(result[1].positive.is_empty());
    }

    #[test]
    fn test_dual_stream_interleave() {
        let result = entries(&["P11111"], &["P11111-2", "P22222"]);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].master, "P11111");
        assert!(result[0].positive.is_empty());
        assert_eq!(result[0].negative, set(&["P11111-2"]));
        assert_eq!(result[1].master, "P22222");
        assert!(result[1].negative.is_empty());
    }

    #[test]
    fn test_master_derived_when_absent_from_inputs() {
        let result = entries(&["P12345-2"], &["P12345-PRO_0000012345"]);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].master, "P12345");
        assert_eq!(result[0].positive, set(&["P12345-2"]));
        assert_eq!(result[0].negative, set(&["P12345-PRO_0000012345"]));
    }

    #[test]
    fn test_master_only_in_negative_stream() {
        let result = entries(&["P12345-1"], &["P12345"]);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].master, "P12345");
        assert_eq!(result[0].positive, set(&["P12345-1"]));
        assert!(result[0].negative.is_empty());
    }

    #[test]
    fn test_literal_prefix_is_not_membership() {
        // A0A023 prefixes A0A023GPI8 but names another entry
        let result = entries(&["A0A023", "A0A023-2", "A0A023GPI8"], &["A0A023GPI8-1"]);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].master, "A0A023");
        assert_eq!(result[0].positive, set(&["A0A023-2"]));
        assert!(result[0].negative.is_empty());
        assert_eq!(result[1].master, "A0A023GPI8");
        assert_eq!(result[1].negative, set(&["A0A023GPI8-1"]));
    }

    #[test]
    fn test_unrecognised_suffix_does_not_split_master() {
        let result = entries(
            &["P12345", "P12345-2", "P12345-ABC", "P12345-PRO_0000000001", "P99999"],
            &["P12345-", "P12345-X"],
        );

        let masters: Vec<&str> = result.iter().map(|e| e.master.as_str()).collect();
        assert_eq!(masters, vec!["P12345", "P99999"]);
        assert_eq!(
            result[0].positive,
            set(&["P12345-2", "P12345-ABC", "P12345-PRO_0000000001"])
        );
        assert_eq!(result[0].negative, set(&["P12345-", "P12345-X"]));
    }

    #[test]
    fn test_non_uniprot_identifiers_stand_alone() {
        let result = entries(&["EBI-1", "EBI-2"], &[]);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].master, "EBI-1");
        assert_eq!(result[1].master, "EBI-2");
    }

    #[test]
    fn test_empty_inputs() {
        assert!(entries(&[], &[]).is_empty());

        let mut iter = UniprotEntryIterator::new(strings(&["P12345"]), Vec::new());
        assert!(iter.next().is_some());
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_accessions_lists_master_first() {
        let result = entries(&["P12345", "P12345-1"], &["P12345-2"]);
        let accessions: Vec<&str> = result[0].accessions().collect();
        assert_eq!(accessions, vec!["P12345", "P12345-1", "P12345-2"]);

        let positive: Vec<&str> = result[0].positive_group().collect();
        assert_eq!(positive, vec!["P12345", "P12345-1"]);
    }
}
