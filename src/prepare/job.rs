use std::path::PathBuf;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::PrepareResult;
use crate::export::write_csv_to_path;
use crate::ingestion::{ingest_inferred_from_path, IngestionOptions, TracingObserver};
use crate::scrubber::{DataScrubber, TracingScrubObserver};
use crate::types::{DataType, Field, Value};

use super::config::{DatasetJob, KindFill, PlaceholderColumn, PrepareConfig};

/// Outcome of one successful [`run_job`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreparationReport {
    pub name: String,
    /// `(rows, columns)` as read.
    pub original_shape: (usize, usize),
    /// `(rows, columns)` as written.
    pub cleaned_shape: (usize, usize),
    pub columns_renamed: Vec<String>,
    pub columns_added: Vec<String>,
    pub duplicates_removed: usize,
    pub nulls_before: usize,
    pub nulls_after: usize,
    pub outliers_removed: usize,
    pub output_path: PathBuf,
}

/// Read, clean and write one dataset.
///
/// Steps: trim header names, add placeholder columns, dedupe on the key, fill nulls (per column,
/// then by kind), drop out-of-bounds rows, run the optional `clean` pass, write the output.
/// Columns named by the job that are absent from the data are skipped with a warning.
pub fn run_job(config: &PrepareConfig, job: &DatasetJob) -> PrepareResult<PreparationReport> {
    let input = config.input_path(job);
    let output = config.output_path(job);

    info!("==================================");
    info!("STARTING {}", job.name);
    info!("==================================");
    info!(dataset = %job.name, "data/raw     : {}", config.raw_dir.display());
    info!(dataset = %job.name, "data/prepared: {}", config.prepared_dir.display());

    info!(dataset = %job.name, "READING: {}", input.display());
    let ingest_opts = IngestionOptions {
        observer: Some(Arc::new(TracingObserver)),
        ..Default::default()
    };
    let raw = ingest_inferred_from_path(&input, &ingest_opts)?;
    let original_shape = raw.shape();
    info!(
        dataset = %job.name,
        "Initial columns: {} shape={:?}",
        raw.column_names().join(", "),
        original_shape
    );

    let mut scrubber = DataScrubber::from_owned(raw).with_observer(Arc::new(TracingScrubObserver));

    let columns_renamed = trim_headers(&mut scrubber, &job.name)?;
    let columns_added = add_placeholders(&mut scrubber, &job.add_columns, config.seed, &job.name)?;

    let rows_before_dedupe = scrubber.data().row_count();
    let key: Vec<&str> = job.dedupe_key.iter().map(String::as_str).collect();
    if !key.is_empty() && key.iter().all(|c| scrubber.data().schema.contains(c)) {
        scrubber.remove_duplicates_by(&key)?;
    } else {
        if !key.is_empty() {
            warn!(
                dataset = %job.name,
                "No '{}' column found; removed exact duplicates instead.",
                key.join(", ")
            );
        }
        scrubber.remove_duplicates();
    }
    let duplicates_removed = rows_before_dedupe - scrubber.data().row_count();
    info!(dataset = %job.name, "Deduped shape: {:?}", scrubber.data().shape());

    let nulls_before = scrubber.consistency_snapshot().total_nulls();
    info!(dataset = %job.name, "Total missing values before handling: {nulls_before}");
    for (column, value) in &job.fill_columns {
        if scrubber.data().schema.contains(column) {
            scrubber.fill_missing_in(column, value.clone())?;
        } else {
            warn!(dataset = %job.name, "fill skipped: column '{column}' not found");
        }
    }
    if let Some(kinds) = &job.fill_by_kind {
        fill_by_kind(&mut scrubber, kinds)?;
    }
    let nulls_after = scrubber.consistency_snapshot().total_nulls();
    info!(dataset = %job.name, "Total missing values after handling: {nulls_after}");

    let rows_before_outliers = scrubber.data().row_count();
    for bounds in &job.outliers {
        if scrubber.data().schema.contains(&bounds.column) {
            let (lower, upper) = bounds.range();
            scrubber.filter_outliers(&bounds.column, lower, upper)?;
        } else {
            warn!(dataset = %job.name, "outlier filter skipped: column '{}' not found", bounds.column);
        }
    }
    let outliers_removed = rows_before_outliers - scrubber.data().row_count();
    info!(
        dataset = %job.name,
        "Removed {outliers_removed} outlier rows; {} records remaining",
        scrubber.data().row_count()
    );

    if let Some(clean) = &job.clean {
        scrubber.clean(clean);
    }

    let prepared = scrubber.into_data();
    write_csv_to_path(&prepared, &output, b',')?;
    info!(dataset = %job.name, "Data saved to {}", output.display());

    let cleaned_shape = prepared.shape();
    info!("==================================");
    info!("Original shape: {original_shape:?}");
    info!("Cleaned shape:  {cleaned_shape:?}");
    info!("FINISHED {}", job.name);
    info!("==================================");

    Ok(PreparationReport {
        name: job.name.clone(),
        original_shape,
        cleaned_shape,
        columns_renamed,
        columns_added,
        duplicates_removed,
        nulls_before,
        nulls_after,
        outliers_removed,
        output_path: output,
    })
}

/// Strip surrounding whitespace from column names. Returns `"old -> new"` for each change.
fn trim_headers(scrubber: &mut DataScrubber, dataset: &str) -> PrepareResult<Vec<String>> {
    let renames: Vec<(String, String)> = scrubber
        .data()
        .schema
        .field_names()
        .filter(|name| name.trim() != *name)
        .map(|name| (name.to_owned(), name.trim().to_owned()))
        .collect();
    if renames.is_empty() {
        return Ok(Vec::new());
    }

    scrubber.rename_columns(renames.iter().map(|(old, new)| (old, new)))?;
    let changed: Vec<String> = renames
        .iter()
        .map(|(old, new)| format!("{old:?} -> {new:?}"))
        .collect();
    info!(dataset, "Cleaned column names: {}", changed.join(", "));
    Ok(changed)
}

/// Add each missing placeholder column. Returns the names that were added.
fn add_placeholders(
    scrubber: &mut DataScrubber,
    columns: &[PlaceholderColumn],
    seed: u64,
    dataset: &str,
) -> PrepareResult<Vec<String>> {
    let mut added = Vec::new();

    for column in columns {
        if let Some(idx) = scrubber.data().schema.index_of(&column.name) {
            let data = scrubber.data();
            if data.row_count() > 0 && data.column_values(idx).all(Value::is_null) {
                warn!(dataset, "Column '{}' exists but contains only missing values.", column.name);
            }
            continue;
        }

        let (data_type, values) = placeholder_values(column, scrubber.data().row_count(), seed);
        scrubber.add_column(Field::new(column.name.clone(), data_type), |i| values[i].clone())?;
        added.push(column.name.clone());
    }

    if added.is_empty() {
        info!(dataset, "No new columns added.");
    } else {
        info!(dataset, "Added columns: {}", added.join(", "));
    }
    Ok(added)
}

fn placeholder_values(column: &PlaceholderColumn, rows: usize, seed: u64) -> (DataType, Vec<Value>) {
    match (&column.default, &column.choices) {
        (_, Some(choices)) => {
            // Every column starts again from the configured seed.
            let mut rng = StdRng::seed_from_u64(seed);
            let values = (0..rows)
                .map(|_| {
                    choices
                        .choose(&mut rng)
                        .map(|c| Value::Utf8(c.clone()))
                        .unwrap_or(Value::Null)
                })
                .collect();
            (DataType::Utf8, values)
        }
        (Some(default), None) => {
            let data_type = default.data_type().unwrap_or(DataType::Utf8);
            (data_type, vec![default.clone(); rows])
        }
        (None, None) => (DataType::Utf8, vec![Value::Null; rows]),
    }
}

fn fill_by_kind(scrubber: &mut DataScrubber, kinds: &KindFill) -> PrepareResult<()> {
    let targets: Vec<(String, Value)> = scrubber
        .data()
        .schema
        .fields
        .iter()
        .filter_map(|field| {
            let fill = match field.data_type {
                DataType::Int64 | DataType::Float64 => kinds.numeric.as_ref(),
                DataType::Utf8 => kinds.text.as_ref(),
                DataType::Bool | DataType::DateTime => None,
            }?;
            Some((field.name.clone(), fill.clone()))
        })
        .collect();

    for (column, fill) in targets {
        scrubber.fill_missing_in(&column, fill)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{placeholder_values, trim_headers};
    use crate::prepare::config::PlaceholderColumn;
    use crate::scrubber::DataScrubber;
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    fn choice_column(name: &str) -> PlaceholderColumn {
        PlaceholderColumn {
            name: name.into(),
            default: None,
            choices: Some(vec!["Cash".into(), "Debit".into(), "StoreCredit".into()]),
        }
    }

    #[test]
    fn placeholder_choices_are_seeded() {
        let (dt, a) = placeholder_values(&choice_column("PaymentType"), 50, 42);
        let (_, b) = placeholder_values(&choice_column("PaymentType"), 50, 42);
        assert_eq!(dt, DataType::Utf8);
        assert_eq!(a, b);
        assert!(a.iter().all(|v| matches!(v, Value::Utf8(s) if ["Cash", "Debit", "StoreCredit"].contains(&s.as_str()))));
    }

    #[test]
    fn placeholder_default_takes_value_type() {
        let column = PlaceholderColumn {
            name: "DiscountPercentage".into(),
            default: Some(Value::Float64(0.0)),
            choices: None,
        };
        let (dt, values) = placeholder_values(&column, 3, 42);
        assert_eq!(dt, DataType::Float64);
        assert_eq!(values, vec![Value::Float64(0.0); 3]);
    }

    #[test]
    fn trim_headers_reports_changes() {
        let ds = DataSet::new(
            Schema::new(vec![
                Field::new(" CustomerID", DataType::Int64),
                Field::new("Name", DataType::Utf8),
            ]),
            vec![vec![Value::Int64(1), Value::Utf8("Ann".into())]],
        );
        let mut scrubber = DataScrubber::new(&ds);
        let changed = trim_headers(&mut scrubber, "customers").unwrap();
        assert_eq!(changed, vec![r#"" CustomerID" -> "CustomerID""#]);
        assert_eq!(scrubber.data().column_names(), vec!["CustomerID", "Name"]);
    }
}
