//! UniProtKB accession utilities
//!
//! Isoforms and proteolytic feature chains are named after their master entry
//! with a suffix behind [`SUFFIX_SEPARATOR`]:
//!
//! ```text
//! P12345                  master
//! P12345-2                isoform 2
//! P12345-PRO_0000012345   feature chain
//! ```
//!
//! Because `-` sorts before every digit and letter, all accessions derived from
//! a master form one contiguous run in a lexicographically sorted sequence,
//! directly after the master itself. [`master_of`] strips every suffix of that
//! run, whether or not UniProtKB issues it.

use std::sync::LazyLock;

use regex::Regex;

/// Separator between a master accession and an isoform or chain suffix
pub const SUFFIX_SEPARATOR: char = '-';

#[allow(clippy::expect_used)]
static MASTER_ACCESSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[OPQ][0-9][A-Z0-9]{3}[0-9]|[A-NR-Z][0-9](?:[A-Z][A-Z0-9]{2}[0-9]){1,2})$")
        .expect("UniProtKB master accession pattern is valid")
});

#[allow(clippy::expect_used)]
static UNIPROT_ACCESSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:[OPQ][0-9][A-Z0-9]{3}[0-9]|[A-NR-Z][0-9](?:[A-Z][A-Z0-9]{2}[0-9]){1,2})(?:-(?:[0-9]+|PRO_[0-9]{10}))?$",
    )
    .expect("UniProtKB accession pattern is valid")
});

/// Derive the master accession of an isoform or feature chain.
///
/// The master is the part before the first character that sorts below `0`
/// ([`SUFFIX_SEPARATOR`] in practice), provided it is a well-formed master
/// accession. Suffixes UniProtKB does not issue (`P12345-ABC`) are stripped as
/// well, so that the whole sorted run following a master shares it.
/// Identifiers outside UniProtKB (`EBI-1234567`) are returned unchanged.
pub fn master_of(accession: &str) -> &str {
    match accession.find(|c: char| c < '0') {
        Some(end) if MASTER_ACCESSION.is_match(&accession[..end]) => &accession[..end],
        _ => accession,
    }
}

/// Whether the accession names a master entry
pub fn is_master(accession: &str) -> bool {
    master_of(accession) == accession
}

/// Whether `accession` is `master` itself or one of its isoforms or chains
pub fn belongs_to(accession: &str, master: &str) -> bool {
    master_of(accession) == master
}

/// Whether the identifier is a well-formed UniProtKB accession, with or
/// without an isoform or feature-chain suffix
pub fn is_uniprot_accession(accession: &str) -> bool {
    UNIPROT_ACCESSION.is_match(accession)
}
