//! CSV export implementation.

use std::fs;
use std::path::Path;

use crate::error::ExportResult;
use crate::types::DataSet;

/// Write `dataset` as delimited text with a header row and no index column.
///
/// Parent directories are created if missing. Nulls are written as empty cells; other values use
/// their [`std::fmt::Display`] form.
pub fn write_csv_to_path(dataset: &DataSet, path: impl AsRef<Path>, delimiter: u8) -> ExportResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut wtr = csv::WriterBuilder::new().delimiter(delimiter).from_path(path)?;
    write_csv_to_writer(dataset, &mut wtr)
}

/// Write `dataset` to an existing CSV writer and flush it.
pub fn write_csv_to_writer<W: std::io::Write>(dataset: &DataSet, wtr: &mut csv::Writer<W>) -> ExportResult<()> {
    wtr.write_record(dataset.schema.field_names())?;
    for row in &dataset.rows {
        wtr.write_record(row.iter().map(|v| v.to_string()))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Render `dataset` as a CSV string.
pub fn to_csv_string(dataset: &DataSet) -> ExportResult<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    write_csv_to_writer(dataset, &mut wtr)?;
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::to_csv_string;
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    #[test]
    fn writes_header_and_rows_without_index() {
        let ds = DataSet::new(
            Schema::new(vec![
                Field::new("ID", DataType::Int64),
                Field::new("Name", DataType::Utf8),
                Field::new("Amount", DataType::Float64),
            ]),
            vec![
                vec![Value::Int64(1), Value::Utf8("Bob, Jr.".into()), Value::Float64(10.0)],
                vec![Value::Int64(2), Value::Utf8("Amy".into()), Value::Null],
            ],
        );

        let out = to_csv_string(&ds).unwrap();
        assert_eq!(out, "ID,Name,Amount\n1,\"Bob, Jr.\",10.0\n2,Amy,\n");
    }

    #[test]
    fn empty_dataset_writes_only_header() {
        let ds = DataSet::new(Schema::new(vec![Field::new("a", DataType::Utf8)]), vec![]);
        assert_eq!(to_csv_string(&ds).unwrap(), "a\n");
    }
}
