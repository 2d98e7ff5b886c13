//! IPX Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared utilities and error handling for the IPX export workspace.
//!
//! # Overview
//!
//! - **Error Handling**: `IpxError` and the crate-wide `Result` alias
//! - **Accessions**: UniProtKB accession recognition and master derivation
//! - **Logging**: `tracing` subscriber setup shared by every binary
//!
//! # Example
//!
//! ```
//! use ipx_common::accession;
//!
//! assert_eq!(accession::master_of("P12345-2"), "P12345");
//! assert!(accession::is_uniprot_accession("P12345-PRO_0000012345"));
//! ```

pub mod accession;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use error::{IpxError, Result};
