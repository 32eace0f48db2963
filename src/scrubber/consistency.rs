use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{ScrubError, ScrubResult};

use super::DataScrubber;

/// Null and duplicate counts for a table at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsistencySnapshot {
    /// Null count per column, in column order.
    pub null_counts: IndexMap<String, usize>,
    /// Rows equal in every column to an earlier row.
    pub duplicate_count: usize,
}

impl ConsistencySnapshot {
    /// Sum of nulls across all columns.
    pub fn total_nulls(&self) -> usize {
        self.null_counts.values().sum()
    }

    /// `true` when there are no nulls and no duplicate rows.
    pub fn is_clean(&self) -> bool {
        self.total_nulls() == 0 && self.duplicate_count == 0
    }
}

impl DataScrubber {
    /// Count nulls per column and fully duplicated rows. Does not mutate.
    pub fn consistency_snapshot(&self) -> ConsistencySnapshot {
        let null_counts = self
            .data
            .schema
            .field_names()
            .map(str::to_owned)
            .zip(self.data.null_counts())
            .collect();
        ConsistencySnapshot {
            null_counts,
            duplicate_count: self.data.duplicate_row_count(),
        }
    }

    /// Post-cleaning check: the snapshot, or [`ScrubError::DataIntegrity`] if any null or
    /// duplicate row remains.
    pub fn assert_clean(&self) -> ScrubResult<ConsistencySnapshot> {
        let snapshot = self.consistency_snapshot();
        if snapshot.is_clean() {
            Ok(snapshot)
        } else {
            Err(ScrubError::DataIntegrity {
                null_count: snapshot.total_nulls(),
                duplicate_count: snapshot.duplicate_count,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ScrubError;
    use crate::scrubber::test_support::people;
    use crate::scrubber::DataScrubber;

    #[test]
    fn snapshot_counts_nulls_and_duplicates() {
        let scrubber = DataScrubber::new(&people());
        let snapshot = scrubber.consistency_snapshot();
        assert_eq!(
            snapshot.null_counts.iter().map(|(k, v)| (k.as_str(), *v)).collect::<Vec<_>>(),
            vec![("ID", 0), ("Name", 0), ("Amount", 1)]
        );
        assert_eq!(snapshot.duplicate_count, 1);
        assert_eq!(snapshot.total_nulls(), 1);
    }

    #[test]
    fn assert_clean_reports_remaining_problems() {
        let mut scrubber = DataScrubber::new(&people());
        assert_eq!(
            scrubber.assert_clean().unwrap_err(),
            ScrubError::DataIntegrity {
                null_count: 1,
                duplicate_count: 1
            }
        );

        scrubber.remove_duplicates().drop_missing();
        let snapshot = scrubber.assert_clean().unwrap();
        assert!(snapshot.is_clean());
    }
}
