//! Writing a [`crate::types::DataSet`] back to delimited text.

pub mod csv;

pub use csv::{to_csv_string, write_csv_to_path, write_csv_to_writer};
