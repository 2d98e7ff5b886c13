//! Conversion of grouped entries into DR, CC and GO parameter records
//!
//! Converters only read the [`ClusterContext`] and the [`EvidenceIndex`], so
//! entries can be converted in parallel.

pub mod cc;
pub mod dr;
pub mod go;
pub mod index;

pub use cc::{CcLineConverter, CcParameters, SecondCcParameters};
pub use dr::{DrLineConverter, DrParameters};
pub use go::{GoLineConverter, GoParameters};
pub use index::EvidenceIndex;

use crate::context::ClusterContext;
use crate::entry::UniprotEntry;
use crate::error::Result;

/// Records produced for one entry
#[derive(Debug)]
pub struct EntryRecords {
    pub master: String,
    pub dr: Result<DrParameters>,
    pub cc: Result<Option<CcParameters>>,
    pub go: Vec<Result<GoParameters>>,
}

/// The three line converters sharing one evidence index
pub struct LineConverters<'a> {
    dr: DrLineConverter<'a>,
    cc: CcLineConverter<'a>,
    go: GoLineConverter<'a>,
}

impl<'a> LineConverters<'a> {
    pub fn new(context: &'a ClusterContext, index: &'a EvidenceIndex<'a>) -> Self {
        Self {
            dr: DrLineConverter::new(index),
            cc: CcLineConverter::new(context, index),
            go: GoLineConverter::new(context, index),
        }
    }

    pub fn convert(&self, entry: &UniprotEntry) -> EntryRecords {
        EntryRecords {
            master: entry.master.clone(),
            dr: self.dr.convert(entry),
            cc: self.cc.convert(entry),
            go: self.go.convert(entry),
        }
    }
}
