//! In-memory column statistics.
//!
//! The processing layer operates on [`crate::types::DataSet`] values without mutating them. It
//! backs the summary statistics reported by
//! [`crate::scrubber::DataScrubber::inspect`].
//!
//! ```rust
//! use data_scrubber::processing::{reduce, ReduceOp};
//! use data_scrubber::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let ds = DataSet::new(
//!     Schema::new(vec![Field::new("score", DataType::Float64)]),
//!     vec![
//!         vec![Value::Float64(10.0)],
//!         vec![Value::Float64(20.0)],
//!         vec![Value::Null],
//!     ],
//! );
//!
//! assert_eq!(reduce(&ds, "score", ReduceOp::Max), Some(Value::Float64(20.0)));
//! assert_eq!(reduce(&ds, "score", ReduceOp::Mean), Some(Value::Float64(15.0)));
//! assert_eq!(reduce(&ds, "score", ReduceOp::CountNonNull), Some(Value::Int64(2)));
//! ```

pub mod reduce;

pub use reduce::{reduce, ReduceOp};
