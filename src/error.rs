use thiserror::Error;

use crate::types::DataType;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Convenience result type for scrubber operations.
pub type ScrubResult<T> = Result<T, ScrubError>;

/// Convenience result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Convenience result type for dataset preparation.
pub type PrepareResult<T> = Result<T, PrepareError>;

/// Error type returned by ingestion functions.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV ingestion error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The input does not conform to the provided schema (missing required columns, etc.).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A value could not be parsed into the required [`crate::types::DataType`].
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    ParseError {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },
}

/// Error type returned by [`crate::scrubber::DataScrubber`] operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScrubError {
    /// An operation referenced a column that is not in the table.
    #[error("column '{column}' not found (columns={available:?})")]
    ColumnNotFound {
        column: String,
        available: Vec<String>,
    },

    /// A rename would leave two columns with the same name.
    #[error("duplicate column name '{column}'")]
    DuplicateColumn { column: String },

    /// Nulls or duplicate rows remain after cleaning.
    #[error("data integrity check failed: {null_count} null value(s), {duplicate_count} duplicate row(s)")]
    DataIntegrity {
        null_count: usize,
        duplicate_count: usize,
    },

    /// A value could not be represented in the requested type.
    #[error("cannot convert value at row {row} column '{column}' to {target}: {message} (value='{raw}')")]
    Conversion {
        row: usize,
        column: String,
        target: DataType,
        raw: String,
        message: String,
    },
}

/// Error type returned when writing a [`crate::types::DataSet`] out.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Underlying I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Error type returned by the batch preparation jobs in [`crate::prepare`].
#[derive(Debug, Error)]
pub enum PrepareError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`crate::prepare::PrepareConfig`].
    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The configuration parsed but is semantically invalid.
    #[error("invalid config: {message}")]
    Config { message: String },

    /// Reading the raw input failed.
    #[error(transparent)]
    Ingestion(#[from] IngestionError),

    /// A cleaning step failed.
    #[error(transparent)]
    Scrub(#[from] ScrubError),

    /// Writing the prepared output failed.
    #[error(transparent)]
    Export(#[from] ExportError),

    /// The worker pool for parallel jobs could not be built.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
