//! Error types for the reasoning-engine crate

use insight_store::InsightStoreError;
use std::path::PathBuf;
use std::time::Duration;
use symbol_parser::ParseError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    /// The file store could not produce the file's content
    #[error("Failed to read {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The parser rejected the file's content
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: ParseError,
    },

    /// Analysis did not finish within the configured timeout
    #[error("Analysis of {path} timed out after {after:?}")]
    Timeout { path: String, after: Duration },

    /// The analysis task panicked or was aborted
    #[error("Analysis of {path} aborted: {reason}")]
    Aborted { path: String, reason: String },

    /// The durable insight store failed
    #[error("Persistence error: {0}")]
    Persistence(#[from] InsightStoreError),

    /// `start` was called outside of a Tokio runtime
    #[error("No Tokio runtime available to run the scheduler")]
    NoRuntime,

    /// Configuration file could not be read
    #[error("Failed to read config {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for [`crate::config::EngineConfig`]
    #[error("Invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}
