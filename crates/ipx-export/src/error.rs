//! Error types for the export pipeline

/// Result type for export operations
pub type Result<T> = std::result::Result<T, ExportError>;

/// Errors raised while filtering, converting or writing export lines
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// A parameter record could not be built; only that record is lost
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A row disagrees with the column count fixed by the stream header
    #[error("Column count mismatch in {stream} stream: expected {expected}, got {actual}")]
    ColumnCount {
        stream: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A field would break the tab-separated layout
    #[error("Invalid field in {stream} stream, column {column}: {value:?}")]
    InvalidField {
        stream: &'static str,
        column: usize,
        value: String,
    },

    #[error("Cluster source error: {0}")]
    Source(String),

    #[error("Cluster context error: {0}")]
    Context(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Common(#[from] ipx_common::IpxError),
}

impl From<figment::Error> for ExportError {
    fn from(err: figment::Error) -> Self {
        ExportError::Config(err.to_string())
    }
}
