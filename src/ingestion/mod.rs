//! Ingestion entrypoints and implementations.
//!
//! Most callers should use [`ingest_inferred_from_path`] or [`ingest_from_path`] (from
//! [`unified`]) which:
//!
//! - pick the delimiter by file extension (or you can override via [`IngestionOptions`])
//! - read the file into an in-memory [`crate::types::DataSet`]
//! - optionally report success/failure/alerts to an [`IngestionObserver`]
//!
//! Reader-level functions are available under [`csv`].

pub mod csv;
pub mod observability;
pub mod unified;

pub use observability::{
    CompositeObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats, TracingObserver,
};
pub use unified::{ingest_from_path, ingest_inferred_from_path, IngestionFormat, IngestionOptions, IngestionRequest};
