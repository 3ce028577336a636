//! Error types for drillhole table loading and hole selection

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for striplog operations
pub type Result<T> = std::result::Result<T, StriplogError>;

/// Errors that can occur while loading, filtering or configuring a striplog
#[derive(Error, Debug)]
pub enum StriplogError {
    #[error("Failed to open {}: {source}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },

    #[error("Column not found: '{column}'")]
    MissingColumn { column: String },

    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    #[error("No intervals for hole '{hole_id}'")]
    EmptySelection { hole_id: String },

    #[error("Unknown color: '{name}'")]
    UnknownColor { name: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

impl From<config::ConfigError> for StriplogError {
    fn from(err: config::ConfigError) -> Self {
        StriplogError::ConfigError {
            message: err.to_string(),
        }
    }
}
