//! Error types for IPX

use thiserror::Error;

/// Result type alias for IPX operations
pub type Result<T> = std::result::Result<T, IpxError>;

/// Main error type shared by the IPX crates
#[derive(Error, Debug)]
pub enum IpxError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
