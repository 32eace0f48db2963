//! Unified ingestion entrypoints.
//!
//! - [`ingest_from_path`] reads a file against a caller-provided [`Schema`].
//! - [`ingest_inferred_from_path`] reads a file and infers one type per column.
//!
//! If [`IngestionOptions::format`] is `None`, the delimiter is chosen from the file extension.
//! If an [`IngestionObserver`] is configured, success/failure/alerts are reported to it.

use std::error::Error as StdError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataSet, Schema};

use super::csv;
use super::observability::{IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats};

/// Supported delimited-text formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionFormat {
    /// Comma-separated values.
    Csv,
    /// Tab-separated values.
    Tsv,
}

impl IngestionFormat {
    /// Parse an ingestion format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "tsv" | "tab" => Some(Self::Tsv),
            _ => None,
        }
    }

    /// Field delimiter byte for this format.
    pub fn delimiter(self) -> u8 {
        match self {
            Self::Csv => b',',
            Self::Tsv => b'\t',
        }
    }
}

/// Options controlling unified ingestion behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct IngestionOptions {
    /// If `None`, detect format from file extension.
    pub format: Option<IngestionFormat>,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("format", &self.format)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            format: None,
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
        }
    }
}

/// Read a delimited file against `schema`.
///
/// ```no_run
/// use data_scrubber::ingestion::{ingest_from_path, IngestionOptions};
/// use data_scrubber::types::{DataType, Field, Schema};
///
/// # fn main() -> Result<(), data_scrubber::IngestionError> {
/// let schema = Schema::new(vec![
///     Field::new("CustomerID", DataType::Int64),
///     Field::new("Name", DataType::Utf8),
/// ]);
/// let ds = ingest_from_path("customers_data.csv", &schema, &IngestionOptions::default())?;
/// println!("rows={}", ds.row_count());
/// # Ok(())
/// # }
/// ```
pub fn ingest_from_path(
    path: impl AsRef<Path>,
    schema: &Schema,
    options: &IngestionOptions,
) -> IngestionResult<DataSet> {
    let path = path.as_ref();
    run_observed(path, false, options, |fmt| {
        let mut rdr = csv::reader_builder(fmt.delimiter()).from_path(path)?;
        csv::ingest_csv_from_reader(&mut rdr, schema)
    })
}

/// Read a delimited file, inferring column types (see
/// [`csv::ingest_csv_inferred_from_path`]).
///
/// ```no_run
/// use std::sync::Arc;
///
/// use data_scrubber::ingestion::{ingest_inferred_from_path, IngestionOptions, TracingObserver};
///
/// # fn main() -> Result<(), data_scrubber::IngestionError> {
/// let opts = IngestionOptions {
///     observer: Some(Arc::new(TracingObserver)),
///     ..Default::default()
/// };
/// let ds = ingest_inferred_from_path("data/raw/sales_data.csv", &opts)?;
/// println!("shape={:?}", ds.shape());
/// # Ok(())
/// # }
/// ```
pub fn ingest_inferred_from_path(path: impl AsRef<Path>, options: &IngestionOptions) -> IngestionResult<DataSet> {
    let path = path.as_ref();
    run_observed(path, true, options, |fmt| csv::ingest_csv_inferred_from_path(path, fmt.delimiter()))
}

fn run_observed<F>(path: &Path, inferred: bool, options: &IngestionOptions, ingest: F) -> IngestionResult<DataSet>
where
    F: FnOnce(IngestionFormat) -> IngestionResult<DataSet>,
{
    let format = match options.format {
        Some(f) => f,
        None => infer_format_from_path(path)?,
    };
    let result = ingest(format);

    let Some(obs) = options.observer.as_ref() else {
        return result;
    };
    let ctx = IngestionContext {
        path: path.to_path_buf(),
        format,
        inferred,
    };
    match &result {
        Ok(ds) => {
            let stats = IngestionStats {
                rows: ds.row_count(),
                columns: ds.column_count(),
                null_cells: ds.null_counts().iter().sum(),
            };
            obs.on_success(&ctx, stats);
        }
        Err(e) => {
            let severity = severity_for_error(e);
            obs.on_failure(&ctx, severity, e);
            if severity >= options.alert_at_or_above {
                obs.on_alert(&ctx, severity, e);
            }
        }
    }
    result
}

/// Unreadable input is critical; rejected content is an error.
fn severity_for_error(e: &IngestionError) -> IngestionSeverity {
    let unreadable = match e {
        IngestionError::Io(_) => true,
        IngestionError::Csv(err) => matches!(err.kind(), ::csv::ErrorKind::Io(_)) || caused_by_io(err),
        IngestionError::SchemaMismatch { .. } | IngestionError::ParseError { .. } => false,
    };
    if unreadable {
        IngestionSeverity::Critical
    } else {
        IngestionSeverity::Error
    }
}

fn caused_by_io(e: &(dyn StdError + 'static)) -> bool {
    std::iter::successors(Some(e), |&err| err.source()).any(|err| err.is::<std::io::Error>())
}

fn infer_format_from_path(path: &Path) -> IngestionResult<IngestionFormat> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| IngestionError::SchemaMismatch {
            message: format!("cannot infer format: path has no extension ({})", path.display()),
        })?;

    IngestionFormat::from_extension(ext).ok_or_else(|| IngestionError::SchemaMismatch {
        message: format!(
            "cannot infer format from extension '{ext}' for path ({})",
            path.display()
        ),
    })
}

/// Owned ingestion request, for callers that queue reads as jobs.
#[derive(Clone)]
pub struct IngestionRequest {
    /// Path to the input file.
    pub path: PathBuf,
    /// Schema to parse values into. `None` infers column types.
    pub schema: Option<Schema>,
    /// Options controlling ingestion.
    pub options: IngestionOptions,
}

impl fmt::Debug for IngestionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionRequest")
            .field("path", &self.path)
            .field("schema_fields", &self.schema.as_ref().map(|s| s.fields.len()))
            .field("options", &self.options)
            .finish()
    }
}

impl IngestionRequest {
    /// Execute the request.
    pub fn run(&self) -> IngestionResult<DataSet> {
        match &self.schema {
            Some(schema) => ingest_from_path(&self.path, schema, &self.options),
            None => ingest_inferred_from_path(&self.path, &self.options),
        }
    }
}
