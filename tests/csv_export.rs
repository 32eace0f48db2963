use chrono::NaiveDate;

use data_scrubber::export::write_csv_to_path;
use data_scrubber::ingestion::csv::ingest_csv_inferred_from_path;
use data_scrubber::types::{DataSet, DataType, Field, Schema, Value};

fn sales() -> DataSet {
    let day = NaiveDate::from_ymd_opt(2023, 1, 6).unwrap().and_hms_opt(0, 0, 0).unwrap();
    DataSet::new(
        Schema::new(vec![
            Field::new("TransactionID", DataType::Int64),
            Field::new("SaleDate", DataType::DateTime),
            Field::new("SaleAmount", DataType::Float64),
            Field::new("PaymentType", DataType::Utf8),
        ]),
        vec![
            vec![Value::Int64(550), Value::DateTime(day), Value::Float64(39.1), Value::from("Cash")],
            vec![Value::Int64(551), Value::Null, Value::Float64(f64::NAN), Value::from("Store, Credit")],
        ],
    )
}

#[test]
fn writes_into_new_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prepared/nested/sales.csv");
    write_csv_to_path(&sales(), &path, b',').unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        text,
        "TransactionID,SaleDate,SaleAmount,PaymentType\n\
         550,2023-01-06 00:00:00,39.1,Cash\n\
         551,,,\"Store, Credit\"\n"
    );
}

#[test]
fn tsv_output_reads_back_with_nulls() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sales.tsv");
    write_csv_to_path(&sales(), &path, b'\t').unwrap();

    let back = ingest_csv_inferred_from_path(&path, b'\t').unwrap();
    assert_eq!(back.column_names(), vec!["TransactionID", "SaleDate", "SaleAmount", "PaymentType"]);
    assert_eq!(back.rows[0][0], Value::Int64(550));
    assert_eq!(back.rows[1][1], Value::Null);
    assert_eq!(back.rows[1][2], Value::Null);
    assert_eq!(back.rows[1][3], Value::from("Store, Credit"));
}
