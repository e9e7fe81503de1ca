use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the COVID statistics pipeline.
#[derive(Error, Debug)]
pub enum CovidError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A delimited snapshot or store file could not be parsed.
    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// A JSON configuration document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A date string did not match the expected format.
    #[error("Invalid date format: {0}")]
    DateParse(String),

    /// The expected snapshot directory does not exist.
    #[error("Data path not found: {}", .0.display())]
    DataPathNotFound(PathBuf),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The persistence store rejected an operation.
    #[error("Store error: {0}")]
    Store(String),

    /// Chart rendering failed in the plotting backend.
    #[error("Chart rendering failed: {0}")]
    Chart(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the pipeline crates.
pub type Result<T> = std::result::Result<T, CovidError>;
