//! CSV ingestion implementation.

use std::path::Path;

use crate::convert::{parse_bool, parse_datetime};
use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataSet, DataType, Field, Schema, Value};

/// Raw cell contents treated as missing by inferred ingestion.
pub const NULL_TOKENS: &[&str] = &["", "NA", "N/A", "n/a", "NaN", "nan", "NULL", "null", "<NA>", "#N/A"];

/// Ingest a CSV file into an in-memory [`DataSet`].
///
/// Rules:
///
/// - CSV must have headers.
/// - Headers must contain all schema fields (order can differ).
/// - Each value is parsed according to the schema field type.
pub fn ingest_csv_from_path(path: impl AsRef<Path>, schema: &Schema) -> IngestionResult<DataSet> {
    let mut rdr = reader_builder(b',').from_path(path)?;
    ingest_csv_from_reader(&mut rdr, schema)
}

/// Ingest CSV data from an existing CSV reader.
pub fn ingest_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    schema: &Schema,
) -> IngestionResult<DataSet> {
    let headers = rdr.headers()?.clone();

    // Map schema fields -> CSV column indexes (allows re-ordered CSV columns).
    let mut col_idxs = Vec::with_capacity(schema.fields.len());
    for field in &schema.fields {
        match headers.iter().position(|h| h == field.name) {
            Some(idx) => col_idxs.push(idx),
            None => {
                return Err(IngestionError::SchemaMismatch {
                    message: format!(
                        "missing required column '{field}'. headers={:?}",
                        headers.iter().collect::<Vec<_>>(),
                        field = field.name
                    ),
                });
            }
        }
    }

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        // Report 1-based row number for users; +1 again because header is row 1.
        let user_row = row_idx0 + 2;
        let record = result?;

        let mut row: Vec<Value> = Vec::with_capacity(schema.fields.len());
        for (field, &csv_idx) in schema.fields.iter().zip(col_idxs.iter()) {
            let raw = record.get(csv_idx).unwrap_or("");
            row.push(parse_typed_value(user_row, &field.name, field.data_type, raw)?);
        }
        rows.push(row);
    }

    Ok(DataSet::new(schema.clone(), rows))
}

/// Ingest a delimited file, inferring one type per column.
///
/// Every column is kept, in header order. A column is `Int64` if every non-missing cell parses
/// as an integer, else `Float64` if every cell parses as a float, else `Bool` for `true`/`false`
/// literals, else `Utf8`. Columns with no values at all become `Float64`. Cells matching
/// [`NULL_TOKENS`] become [`Value::Null`]. Headers are taken verbatim.
pub fn ingest_csv_inferred_from_path(path: impl AsRef<Path>, delimiter: u8) -> IngestionResult<DataSet> {
    let mut rdr = reader_builder(delimiter).from_path(path)?;
    ingest_csv_inferred_from_reader(&mut rdr)
}

/// Inferred ingestion from an existing CSV reader. See [`ingest_csv_inferred_from_path`].
pub fn ingest_csv_inferred_from_reader<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> IngestionResult<DataSet> {
    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_owned).collect();
    for (i, name) in headers.iter().enumerate() {
        if headers[..i].contains(name) {
            return Err(IngestionError::SchemaMismatch {
                message: format!("duplicate column '{name}' in header"),
            });
        }
    }

    let mut raw_rows: Vec<csv::StringRecord> = Vec::new();
    for result in rdr.records() {
        raw_rows.push(result?);
    }

    let fields: Vec<Field> = headers
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let cells = raw_rows.iter().map(|r| r.get(idx).unwrap_or(""));
            Field::new(name.clone(), infer_column_type(cells))
        })
        .collect();
    let schema = Schema::new(fields);

    let mut rows = Vec::with_capacity(raw_rows.len());
    for (row_idx0, record) in raw_rows.iter().enumerate() {
        let user_row = row_idx0 + 2;
        let mut row = Vec::with_capacity(schema.len());
        for (idx, field) in schema.fields.iter().enumerate() {
            let raw = record.get(idx).unwrap_or("");
            if is_null_token(raw) {
                row.push(Value::Null);
            } else {
                row.push(parse_typed_value(user_row, &field.name, field.data_type, raw)?);
            }
        }
        rows.push(row);
    }

    Ok(DataSet::new(schema, rows))
}

pub(crate) fn reader_builder(delimiter: u8) -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(true).delimiter(delimiter).flexible(true);
    builder
}

fn is_null_token(raw: &str) -> bool {
    NULL_TOKENS.contains(&raw.trim())
}

fn infer_column_type<'a>(cells: impl Iterator<Item = &'a str>) -> DataType {
    let mut int_ok = true;
    let mut float_ok = true;
    let mut bool_ok = true;
    let mut seen = false;

    for cell in cells.filter(|c| !is_null_token(c)) {
        let cell = cell.trim();
        seen = true;
        int_ok = int_ok && cell.parse::<i64>().is_ok();
        float_ok = float_ok && cell.parse::<f64>().is_ok();
        bool_ok = bool_ok && (cell.eq_ignore_ascii_case("true") || cell.eq_ignore_ascii_case("false"));
        if !int_ok && !float_ok && !bool_ok {
            return DataType::Utf8;
        }
    }

    match (seen, int_ok, float_ok, bool_ok) {
        (false, ..) => DataType::Float64,
        (true, true, _, _) => DataType::Int64,
        (true, _, true, _) => DataType::Float64,
        (true, _, _, true) => DataType::Bool,
        _ => DataType::Utf8,
    }
}

fn parse_typed_value(row: usize, column: &str, data_type: DataType, raw: &str) -> IngestionResult<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Value::Null);
    }

    let parse_error = |message: String| IngestionError::ParseError {
        row,
        column: column.to_owned(),
        raw: raw.to_owned(),
        message,
    };

    match data_type {
        DataType::Utf8 => Ok(Value::Utf8(trimmed.to_owned())),
        DataType::Int64 => trimmed
            .parse::<i64>()
            .map(Value::Int64)
            .map_err(|e| parse_error(e.to_string())),
        DataType::Float64 => trimmed
            .parse::<f64>()
            .map(Value::Float64)
            .map_err(|e| parse_error(e.to_string())),
        DataType::Bool => parse_bool(trimmed).map(Value::Bool).map_err(parse_error),
        DataType::DateTime => parse_datetime(trimmed)
            .map(Value::DateTime)
            .ok_or_else(|| parse_error("unrecognized date/time format".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::{infer_column_type, ingest_csv_inferred_from_reader, reader_builder};
    use crate::types::{DataType, Value};

    #[test]
    fn infer_column_type_prefers_narrowest_type() {
        assert_eq!(infer_column_type(["1", "2", ""].into_iter()), DataType::Int64);
        assert_eq!(infer_column_type(["1", "2.5"].into_iter()), DataType::Float64);
        assert_eq!(infer_column_type(["true", "FALSE", "NA"].into_iter()), DataType::Bool);
        assert_eq!(infer_column_type(["1", "x"].into_iter()), DataType::Utf8);
        assert_eq!(infer_column_type(["", "nan"].into_iter()), DataType::Float64);
    }

    #[test]
    fn inferred_ingestion_keeps_header_order_and_nulls() {
        let input = "ID,Name,Amount\n1,Bob,10.0\n2, Amy ,\n3,N/A,4\n";
        let mut rdr = reader_builder(b',').from_reader(input.as_bytes());
        let ds = ingest_csv_inferred_from_reader(&mut rdr).unwrap();

        assert_eq!(ds.column_names(), vec!["ID", "Name", "Amount"]);
        assert_eq!(ds.schema.fields[0].data_type, DataType::Int64);
        assert_eq!(ds.schema.fields[1].data_type, DataType::Utf8);
        assert_eq!(ds.schema.fields[2].data_type, DataType::Float64);
        assert_eq!(ds.rows[1], vec![Value::Int64(2), Value::Utf8("Amy".into()), Value::Null]);
        assert_eq!(ds.rows[2][1], Value::Null);
        assert_eq!(ds.rows[2][2], Value::Float64(4.0));
    }

    #[test]
    fn inferred_ingestion_rejects_duplicate_headers() {
        let input = "a,a\n1,2\n";
        let mut rdr = reader_builder(b',').from_reader(input.as_bytes());
        let err = ingest_csv_inferred_from_reader(&mut rdr).unwrap_err();
        assert!(err.to_string().contains("duplicate column 'a'"));
    }

    #[test]
    fn inferred_ingestion_keeps_untrimmed_headers() {
        let input = " ID ,Name\n1,a\n";
        let mut rdr = reader_builder(b',').from_reader(input.as_bytes());
        let ds = ingest_csv_inferred_from_reader(&mut rdr).unwrap();
        assert_eq!(ds.column_names(), vec![" ID ", "Name"]);
    }
}
