use indexmap::IndexMap;
use serde::Deserialize;

use crate::types::{DataSet, Value};

use super::DataScrubber;

/// Options for [`DataScrubber::clean`].
///
/// Deserializable so pipeline configs can embed it; every field is optional there.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CleanOptions {
    /// Remove fully duplicated rows first.
    pub drop_duplicates: bool,
    /// Drop rows containing any null. Takes precedence over `fill_value`.
    pub drop_na: bool,
    /// Fill every null with this value.
    pub fill_value: Option<Value>,
    /// Columns to lowercase and trim.
    pub lowercase: Vec<String>,
    /// Columns to uppercase and trim.
    pub uppercase: Vec<String>,
    /// Columns to parse as date/time in place.
    pub date_columns: Vec<String>,
    /// Old → new column names, applied all-or-nothing.
    pub rename_map: Option<IndexMap<String, String>>,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            drop_duplicates: true,
            drop_na: false,
            fill_value: None,
            lowercase: Vec::new(),
            uppercase: Vec::new(),
            date_columns: Vec::new(),
            rename_map: None,
        }
    }
}

impl DataScrubber {
    /// Run the standard cleaning sequence, best effort.
    ///
    /// Steps, in order:
    ///
    /// 1. remove duplicate rows (if `drop_duplicates`)
    /// 2. drop rows with nulls (if `drop_na`), else fill nulls with `fill_value` (if set)
    /// 3. lowercase + trim each `lowercase` column
    /// 4. uppercase + trim each `uppercase` column
    /// 5. parse each `date_columns` column in place; unparsable values become null
    /// 6. apply `rename_map`
    ///
    /// Columns that do not exist are skipped, and a rename that names a missing column (or would
    /// create a duplicate) is skipped entirely. Skips are reported as [`super::ScrubEvent::Skipped`].
    pub fn clean(&mut self, options: &CleanOptions) -> &DataSet {
        if options.drop_duplicates {
            self.remove_duplicates();
        }

        if options.drop_na {
            self.handle_missing(true, None);
        } else if let Some(fill) = &options.fill_value {
            self.handle_missing(false, Some(fill.clone()));
        }

        for column in &options.lowercase {
            match self.data.schema.index_of(column) {
                Some(idx) => {
                    let before = self.data.shape();
                    self.format_strings(idx, str::to_lowercase);
                    self.applied("lowercase_trim", before);
                }
                None => self.skipped("lowercase_trim", format!("column '{column}' not found")),
            }
        }

        for column in &options.uppercase {
            match self.data.schema.index_of(column) {
                Some(idx) => {
                    let before = self.data.shape();
                    self.format_strings(idx, str::to_uppercase);
                    self.applied("uppercase_trim", before);
                }
                None => self.skipped("uppercase_trim", format!("column '{column}' not found")),
            }
        }

        for column in &options.date_columns {
            match self.data.schema.index_of(column) {
                Some(idx) => {
                    let before = self.data.shape();
                    self.parse_dates_in_place(idx);
                    self.applied("parse_dates", before);
                }
                None => self.skipped("parse_dates", format!("column '{column}' not found")),
            }
        }

        if let Some(mapping) = &options.rename_map {
            if let Err(e) = self.rename_columns(mapping) {
                self.skipped("rename_columns", e.to_string());
            }
        }

        &self.data
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use indexmap::IndexMap;

    use super::CleanOptions;
    use crate::scrubber::test_support::{people, RecordingObserver};
    use crate::scrubber::{DataScrubber, ScrubEvent};
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    fn customers() -> DataSet {
        DataSet::new(
            Schema::new(vec![
                Field::new("CustomerID", DataType::Utf8),
                Field::new("Region", DataType::Utf8),
                Field::new("CustomerSince", DataType::Utf8),
            ]),
            vec![
                vec![
                    Value::Utf8("c-001 ".into()),
                    Value::Utf8(" East".into()),
                    Value::Utf8("2021-04-01".into()),
                ],
                vec![
                    Value::Utf8("c-002".into()),
                    Value::Null,
                    Value::Utf8("whenever".into()),
                ],
            ],
        )
    }

    #[test]
    fn defaults_only_dedupe() {
        let mut scrubber = DataScrubber::new(&people());
        let out = scrubber.clean(&CleanOptions::default());
        assert_eq!(out.row_count(), 2);
        assert_eq!(out.rows[1][2], Value::Null);
    }

    #[test]
    fn drop_na_wins_over_fill_value() {
        let mut scrubber = DataScrubber::new(&people());
        let out = scrubber.clean(&CleanOptions {
            drop_na: true,
            fill_value: Some(Value::Int64(0)),
            ..Default::default()
        });
        assert_eq!(out.row_count(), 1);
    }

    #[test]
    fn full_sequence_on_customer_like_data() {
        let mut scrubber = DataScrubber::new(&customers());
        let out = scrubber.clean(&CleanOptions {
            fill_value: Some(Value::from("N/A")),
            uppercase: vec!["CustomerID".into()],
            lowercase: vec!["Region".into(), "PreferredContactMethod".into()],
            date_columns: vec!["CustomerSince".into()],
            ..Default::default()
        });

        assert_eq!(out.rows[0][0], Value::Utf8("C-001".into()));
        assert_eq!(out.rows[0][1], Value::Utf8("east".into()));
        assert_eq!(out.rows[1][1], Value::Utf8("n/a".into()));
        let since = NaiveDate::from_ymd_opt(2021, 4, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(out.rows[0][2], Value::DateTime(since));
        assert_eq!(out.rows[1][2], Value::Null);
        assert_eq!(out.schema.fields[2].data_type, DataType::DateTime);
    }

    #[test]
    fn rename_with_missing_column_is_skipped_whole() {
        let obs = Arc::new(RecordingObserver::default());
        let mut scrubber = DataScrubber::new(&people()).with_observer(obs.clone());
        let rename: IndexMap<String, String> = [("ID", "Id"), ("Ghost", "Spirit")]
            .into_iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect();
        let out = scrubber.clean(&CleanOptions {
            rename_map: Some(rename),
            ..Default::default()
        });

        assert_eq!(out.column_names(), vec!["ID", "Name", "Amount"]);
        let events = obs.events.lock().unwrap();
        assert!(events
            .iter()
            .any(|e| matches!(e, ScrubEvent::Skipped { op: "rename_columns", .. })));
    }

    #[test]
    fn rename_applies_when_all_columns_exist() {
        let mut scrubber = DataScrubber::new(&people());
        let rename: IndexMap<String, String> = [("Amount".to_string(), "AmountUSD".to_string())]
            .into_iter()
            .collect();
        let out = scrubber.clean(&CleanOptions {
            rename_map: Some(rename),
            ..Default::default()
        });
        assert_eq!(out.column_names(), vec!["ID", "Name", "AmountUSD"]);
    }

    #[test]
    fn case_and_date_steps_skip_missing_columns() {
        let obs = Arc::new(RecordingObserver::default());
        let mut scrubber = DataScrubber::new(&customers()).with_observer(obs.clone());
        let out = scrubber.clean(&CleanOptions {
            uppercase: vec!["Ghost".into(), "CustomerID".into()],
            date_columns: vec!["Ghost".into()],
            ..Default::default()
        });

        assert_eq!(out.rows[0][0], Value::Utf8("C-001".into()));
        assert_eq!(out.schema.fields[2].data_type, DataType::Utf8);
        let events = obs.events.lock().unwrap();
        for op in ["uppercase_trim", "parse_dates"] {
            assert!(events
                .iter()
                .any(|e| matches!(e, ScrubEvent::Skipped { op: o, .. } if *o == op)));
        }
    }
}
