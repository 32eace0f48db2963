//! `data-scrubber` is a small library for cleaning tabular data held in memory as a
//! [`types::DataSet`].
//!
//! The primary entrypoint is [`scrubber::DataScrubber`], which owns a private copy of a table and
//! exposes chainable cleaning operations: duplicate removal, missing-value handling, type
//! conversion, outlier filtering, string formatting, date parsing and column renaming/reordering.
//! Around it sit CSV [`ingestion`] and [`export`], plus a config-driven batch pipeline in
//! [`prepare`].
//!
//! ## Value types
//!
//! Cells are typed [`types::Value`]s matching a [`types::Schema`]. Supported logical types are:
//!
//! - [`types::DataType::Int64`]
//! - [`types::DataType::Float64`]
//! - [`types::DataType::Bool`]
//! - [`types::DataType::Utf8`]
//! - [`types::DataType::DateTime`]
//!
//! Empty cells and common null tokens (`NA`, `null`, ...) map to [`types::Value::Null`].
//!
//! ## Quick example: read, clean, write
//!
//! ```no_run
//! use data_scrubber::export::write_csv_to_path;
//! use data_scrubber::ingestion::{ingest_inferred_from_path, IngestionOptions};
//! use data_scrubber::scrubber::{CleanOptions, DataScrubber};
//! use data_scrubber::types::Value;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let raw = ingest_inferred_from_path("data/raw/customers_data.csv", &IngestionOptions::default())?;
//! let mut scrubber = DataScrubber::new(&raw);
//! scrubber.clean(&CleanOptions {
//!     fill_value: Some(Value::from("Unknown")),
//!     lowercase: vec!["Region".into()],
//!     ..Default::default()
//! });
//! write_csv_to_path(scrubber.data(), "data/prepared/customers_prepared.csv", b',')?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Scrubber example
//!
//! ```rust
//! use data_scrubber::scrubber::DataScrubber;
//! use data_scrubber::types::{DataSet, DataType, Field, Schema, Value};
//!
//! # fn main() -> Result<(), data_scrubber::ScrubError> {
//! let ds = DataSet::new(
//!     Schema::new(vec![
//!         Field::new("SaleAmount", DataType::Utf8),
//!         Field::new("Store", DataType::Utf8),
//!     ]),
//!     vec![
//!         vec![Value::from("12"), Value::from(" north ")],
//!         vec![Value::from("900"), Value::from("South")],
//!     ],
//! );
//!
//! let mut scrubber = DataScrubber::new(&ds);
//! scrubber
//!     .convert_column_type("SaleAmount", DataType::Float64)?
//!     .filter_outliers("SaleAmount", 0.0, 500.0)?
//!     .uppercase_trim("Store")?
//!     .rename_columns([("Store", "StoreRegion")])?;
//!
//! assert_eq!(scrubber.data().row_count(), 1);
//! assert_eq!(scrubber.data().rows[0][1], Value::from("NORTH"));
//! assert_eq!(scrubber.data().column_names(), vec!["SaleAmount", "StoreRegion"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`scrubber`]: the [`scrubber::DataScrubber`] and its composite `clean` pass
//! - [`ingestion`]: CSV/TSV readers, typed or inferred, with observer hooks
//! - [`export`]: CSV writers
//! - [`prepare`]: TOML-configured batch jobs run in parallel
//! - [`convert`]: value casting and date parsing rules
//! - [`processing`]: column statistics used by `inspect`
//! - [`types`]: schema + in-memory dataset types
//! - [`error`]: error types

pub mod convert;
pub mod error;
pub mod export;
pub mod ingestion;
pub mod prepare;
pub mod processing;
pub mod scrubber;
pub mod types;

pub use error::{
    ExportError, ExportResult, IngestionError, IngestionResult, PrepareError, PrepareResult, ScrubError, ScrubResult,
};
