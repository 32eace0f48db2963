//! Chainable cleaning operations over an owned [`DataSet`].
//!
//! [`DataScrubber`] takes a private deep copy of a table at construction and every operation
//! mutates that copy in place, returning `&mut Self` (or `ScrubResult<&mut Self>` when the
//! operation can fail) so calls chain:
//!
//! ```rust
//! use data_scrubber::scrubber::DataScrubber;
//! use data_scrubber::types::{DataSet, DataType, Field, Schema, Value};
//!
//! # fn main() -> Result<(), data_scrubber::ScrubError> {
//! let raw = DataSet::new(
//!     Schema::new(vec![
//!         Field::new("ID", DataType::Int64),
//!         Field::new("Name", DataType::Utf8),
//!         Field::new("Amount", DataType::Float64),
//!     ]),
//!     vec![
//!         vec![Value::Int64(1), Value::Utf8(" Bob ".into()), Value::Float64(10.0)],
//!         vec![Value::Int64(1), Value::Utf8(" Bob ".into()), Value::Float64(10.0)],
//!         vec![Value::Int64(2), Value::Utf8("AMY".into()), Value::Null],
//!     ],
//! );
//!
//! let mut scrubber = DataScrubber::new(&raw);
//! scrubber
//!     .remove_duplicates()
//!     .handle_missing(false, Some(Value::Int64(0)))
//!     .lowercase_trim("Name")?
//!     .filter_outliers("Amount", 0.0, 100.0)?;
//!
//! let snapshot = scrubber.assert_clean()?;
//! assert_eq!(snapshot.duplicate_count, 0);
//! assert_eq!(scrubber.data().rows[1][1], Value::Utf8("amy".into()));
//! // The caller's table is untouched.
//! assert_eq!(raw.row_count(), 3);
//! # Ok(())
//! # }
//! ```
//!
//! Standalone operations that name a column fail with [`ScrubError::ColumnNotFound`] when it is
//! absent. [`DataScrubber::clean`] is the exception: it skips missing columns and keeps going.

mod clean;
mod columns;
mod consistency;
mod inspect;
mod observer;
mod rows;

use std::fmt;
use std::sync::Arc;

use crate::error::{ScrubError, ScrubResult};
use crate::types::DataSet;

pub use clean::CleanOptions;
pub use columns::STANDARD_DATETIME_COLUMN;
pub use consistency::ConsistencySnapshot;
pub use observer::{ScrubEvent, ScrubObserver, TracingScrubObserver};

/// Stateful wrapper owning one [`DataSet`] and exposing cleaning operations.
///
/// A scrubber has no internal synchronization; clean independent inputs with independent
/// scrubbers.
#[derive(Clone)]
pub struct DataScrubber {
    data: DataSet,
    observer: Option<Arc<dyn ScrubObserver>>,
}

impl fmt::Debug for DataScrubber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataScrubber")
            .field("shape", &self.data.shape())
            .field("columns", &self.data.column_names())
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

impl DataScrubber {
    /// Create a scrubber over a deep copy of `data`.
    pub fn new(data: &DataSet) -> Self {
        Self::from_owned(data.clone())
    }

    /// Create a scrubber that takes ownership of `data`.
    pub fn from_owned(data: DataSet) -> Self {
        Self { data, observer: None }
    }

    /// Attach an observer for scrub events.
    pub fn with_observer(mut self, observer: Arc<dyn ScrubObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// The current table.
    pub fn data(&self) -> &DataSet {
        &self.data
    }

    /// Consume the scrubber and return the table.
    pub fn into_data(self) -> DataSet {
        self.data
    }

    fn column_index(&self, column: &str) -> ScrubResult<usize> {
        self.data
            .schema
            .index_of(column)
            .ok_or_else(|| ScrubError::ColumnNotFound {
                column: column.to_owned(),
                available: self.data.column_names(),
            })
    }

    /// Resolve every name up front so that multi-column operations fail before mutating.
    fn column_indexes<S: AsRef<str>>(&self, columns: &[S]) -> ScrubResult<Vec<usize>> {
        columns.iter().map(|c| self.column_index(c.as_ref())).collect()
    }

    fn emit(&self, event: ScrubEvent) {
        if let Some(obs) = &self.observer {
            obs.on_event(&event);
        }
    }

    fn applied(&self, op: &'static str, before: (usize, usize)) {
        let (rows_after, columns_after) = self.data.shape();
        self.emit(ScrubEvent::Applied {
            op,
            rows_before: before.0,
            rows_after,
            columns_before: before.1,
            columns_after,
        });
    }

    fn skipped(&self, op: &'static str, reason: impl Into<String>) {
        self.emit(ScrubEvent::Skipped {
            op,
            reason: reason.into(),
        });
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Mutex;

    use super::{ScrubEvent, ScrubObserver};
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    #[derive(Default)]
    pub(crate) struct RecordingObserver {
        pub(crate) events: Mutex<Vec<ScrubEvent>>,
    }

    impl ScrubObserver for RecordingObserver {
        fn on_event(&self, event: &ScrubEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }

    pub(crate) fn people() -> DataSet {
        DataSet::new(
            Schema::new(vec![
                Field::new("ID", DataType::Int64),
                Field::new("Name", DataType::Utf8),
                Field::new("Amount", DataType::Float64),
            ]),
            vec![
                vec![Value::Int64(1), Value::Utf8("Bob".into()), Value::Float64(10.0)],
                vec![Value::Int64(1), Value::Utf8("Bob".into()), Value::Float64(10.0)],
                vec![Value::Int64(2), Value::Utf8("Amy".into()), Value::Null],
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::test_support::{people, RecordingObserver};
    use super::{DataScrubber, ScrubEvent};
    use crate::error::ScrubError;
    use crate::types::Value;

    #[test]
    fn new_takes_an_independent_copy() {
        let mut original = people();
        let mut scrubber = DataScrubber::new(&original);

        original.rows[0][1] = Value::Utf8("Changed".into());
        assert_eq!(scrubber.data().rows[0][1], Value::Utf8("Bob".into()));

        scrubber.uppercase_trim("Name").unwrap();
        assert_eq!(original.rows[2][1], Value::Utf8("Amy".into()));
    }

    #[test]
    fn column_not_found_lists_available_columns() {
        let mut scrubber = DataScrubber::new(&people());
        let err = scrubber.lowercase_trim("Ghost").unwrap_err();
        assert_eq!(
            err,
            ScrubError::ColumnNotFound {
                column: "Ghost".into(),
                available: vec!["ID".into(), "Name".into(), "Amount".into()],
            }
        );
    }

    #[test]
    fn observer_sees_applied_events() {
        let obs = Arc::new(RecordingObserver::default());
        let mut scrubber = DataScrubber::new(&people()).with_observer(obs.clone());
        scrubber.remove_duplicates();

        let events = obs.events.lock().unwrap().clone();
        assert_eq!(
            events,
            vec![ScrubEvent::Applied {
                op: "remove_duplicates",
                rows_before: 3,
                rows_after: 2,
                columns_before: 3,
                columns_after: 3,
            }]
        );
    }
}
