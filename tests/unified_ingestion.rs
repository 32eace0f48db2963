use data_scrubber::ingestion::{
    ingest_from_path, ingest_inferred_from_path, IngestionFormat, IngestionOptions, IngestionRequest,
};
use data_scrubber::types::{DataType, Field, Schema, Value};
use data_scrubber::IngestionError;

#[test]
fn format_is_detected_from_extension() {
    assert_eq!(IngestionFormat::from_extension("CSV"), Some(IngestionFormat::Csv));
    assert_eq!(IngestionFormat::from_extension("tsv"), Some(IngestionFormat::Tsv));
    assert_eq!(IngestionFormat::from_extension("parquet"), None);
}

#[test]
fn tsv_and_csv_read_the_same_table() {
    let tsv = ingest_inferred_from_path("tests/fixtures/sales_data.tsv", &IngestionOptions::default()).unwrap();
    assert_eq!(tsv.shape(), (4, 6));
    assert_eq!(tsv.rows[1][5], Value::Null);
    assert_eq!(tsv.schema.fields[5].data_type, DataType::Float64);

    let csv = ingest_inferred_from_path("tests/fixtures/sales_data.csv", &IngestionOptions::default()).unwrap();
    assert_eq!(csv.rows[0][..6], tsv.rows[0][..]);
}

#[test]
fn forced_format_overrides_extension() {
    let opts = IngestionOptions {
        format: Some(IngestionFormat::Tsv),
        ..Default::default()
    };
    // Read as TSV, the comma-separated header is a single column.
    let ds = ingest_inferred_from_path("tests/fixtures/people.csv", &opts).unwrap();
    assert_eq!(ds.column_count(), 1);
}

#[test]
fn unknown_extension_is_a_schema_mismatch() {
    let err = ingest_inferred_from_path("tests/fixtures/people.xlsx", &IngestionOptions::default()).unwrap_err();
    assert!(matches!(err, IngestionError::SchemaMismatch { .. }));
}

#[test]
fn request_runs_typed_or_inferred() {
    let schema = Schema::new(vec![Field::new("name", DataType::Utf8)]);
    let typed = IngestionRequest {
        path: "tests/fixtures/people.csv".into(),
        schema: Some(schema.clone()),
        options: IngestionOptions::default(),
    }
    .run()
    .unwrap();
    assert_eq!(typed.schema, schema);

    let inferred = IngestionRequest {
        path: "tests/fixtures/people.csv".into(),
        schema: None,
        options: IngestionOptions::default(),
    }
    .run()
    .unwrap();
    assert_eq!(inferred.column_count(), 4);
    assert_eq!(
        ingest_from_path("tests/fixtures/people.csv", &schema, &IngestionOptions::default()).unwrap(),
        typed
    );
}
