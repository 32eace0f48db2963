use crate::convert::{cast_value, parse_datetime};
use crate::error::{ScrubError, ScrubResult};
use crate::types::{DataType, Field, Value};

use super::DataScrubber;

/// Default target column for [`DataScrubber::parse_dates_to_standard_datetime`].
pub const STANDARD_DATETIME_COLUMN: &str = "StandardDateTime";

impl DataScrubber {
    /// Coerce every value in `column` to `target` (rules in [`crate::convert::cast_value`]).
    ///
    /// All values are converted before anything is written back, so a single failure leaves the
    /// column untouched and returns [`ScrubError::Conversion`] naming the 0-based row.
    pub fn convert_column_type(&mut self, column: &str, target: DataType) -> ScrubResult<&mut Self> {
        let before = self.data.shape();
        let idx = self.column_index(column)?;

        let mut converted = Vec::with_capacity(self.data.row_count());
        for (row_idx, row) in self.data.rows.iter().enumerate() {
            let value = &row[idx];
            let out = cast_value(value, target).map_err(|message| ScrubError::Conversion {
                row: row_idx,
                column: column.to_owned(),
                target,
                raw: value.to_string(),
                message,
            })?;
            converted.push(out);
        }

        self.replace_column(idx, target, converted);
        self.applied("convert_column_type", before);
        Ok(self)
    }

    /// Append `field` as the last column, producing each row's value with `value_for_row`.
    ///
    /// Fails with [`ScrubError::DuplicateColumn`] if the name is already taken.
    pub fn add_column<F>(&mut self, field: Field, value_for_row: F) -> ScrubResult<&mut Self>
    where
        F: FnMut(usize) -> Value,
    {
        if self.data.schema.contains(&field.name) {
            return Err(ScrubError::DuplicateColumn { column: field.name });
        }
        let before = self.data.shape();
        let values = (0..self.data.row_count()).map(value_for_row).collect();
        self.data.push_column(field, values);
        self.applied("add_column", before);
        Ok(self)
    }

    /// Remove every named column. Fails before mutating if any name is missing.
    pub fn drop_columns<S: AsRef<str>>(&mut self, columns: &[S]) -> ScrubResult<&mut Self> {
        let before = self.data.shape();
        let dropped = self.column_indexes(columns)?;
        let keep: Vec<usize> = (0..self.data.column_count())
            .filter(|i| !dropped.contains(i))
            .collect();
        self.project(&keep);
        self.applied("drop_columns", before);
        Ok(self)
    }

    /// Keep only rows where `lower <= value <= upper` in `column`.
    ///
    /// Null (and `NaN`) values fail the comparison and are dropped. A non-null value that is not
    /// numeric returns [`ScrubError::Conversion`] without filtering anything.
    pub fn filter_outliers(&mut self, column: &str, lower: f64, upper: f64) -> ScrubResult<&mut Self> {
        let before = self.data.shape();
        let idx = self.column_index(column)?;

        if let Some((row_idx, value)) = self
            .data
            .rows
            .iter()
            .map(|row| &row[idx])
            .enumerate()
            .find(|(_, v)| !v.is_null() && v.as_f64().is_none())
        {
            return Err(ScrubError::Conversion {
                row: row_idx,
                column: column.to_owned(),
                target: DataType::Float64,
                raw: value.to_string(),
                message: "value is not numeric and cannot be compared with bounds".to_string(),
            });
        }

        self.data
            .rows
            .retain(|row| matches!(row[idx].as_f64(), Some(v) if v >= lower && v <= upper));
        self.applied("filter_outliers", before);
        Ok(self)
    }

    /// Lowercase and trim every value in `column`. Non-string values are stringified first, so
    /// this never fails on type. Nulls stay null.
    pub fn lowercase_trim(&mut self, column: &str) -> ScrubResult<&mut Self> {
        let before = self.data.shape();
        let idx = self.column_index(column)?;
        self.format_strings(idx, str::to_lowercase);
        self.applied("lowercase_trim", before);
        Ok(self)
    }

    /// Uppercase and trim every value in `column`. Non-string values are stringified first.
    /// Nulls stay null.
    pub fn uppercase_trim(&mut self, column: &str) -> ScrubResult<&mut Self> {
        let before = self.data.shape();
        let idx = self.column_index(column)?;
        self.format_strings(idx, str::to_uppercase);
        self.applied("uppercase_trim", before);
        Ok(self)
    }

    /// Parse `column` as date/time values into `new_column`, leaving `column` as it is.
    ///
    /// `new_column` is created if missing and overwritten if present. Any non-null value that
    /// does not parse returns [`ScrubError::Conversion`] and nothing is written.
    pub fn parse_date_into(&mut self, column: &str, new_column: &str) -> ScrubResult<&mut Self> {
        let before = self.data.shape();
        let idx = self.column_index(column)?;

        let mut parsed = Vec::with_capacity(self.data.row_count());
        for (row_idx, row) in self.data.rows.iter().enumerate() {
            let value = &row[idx];
            let out = cast_value(value, DataType::DateTime).map_err(|message| ScrubError::Conversion {
                row: row_idx,
                column: column.to_owned(),
                target: DataType::DateTime,
                raw: value.to_string(),
                message,
            })?;
            parsed.push(out);
        }

        match self.data.schema.index_of(new_column) {
            Some(target_idx) => self.replace_column(target_idx, DataType::DateTime, parsed),
            None => {
                self.data
                    .push_column(Field::new(new_column, DataType::DateTime), parsed);
            }
        }
        self.applied("parse_date_into", before);
        Ok(self)
    }

    /// [`Self::parse_date_into`] targeting [`STANDARD_DATETIME_COLUMN`].
    pub fn parse_dates_to_standard_datetime(&mut self, column: &str) -> ScrubResult<&mut Self> {
        self.parse_date_into(column, STANDARD_DATETIME_COLUMN)
    }

    /// Rename columns old → new.
    ///
    /// Every old name is checked first ([`ScrubError::ColumnNotFound`]); then the resulting
    /// names must be unique ([`ScrubError::DuplicateColumn`]). Either failure leaves the table
    /// as it was. Swapping two names in one mapping is allowed.
    pub fn rename_columns<I, K, V>(&mut self, mapping: I) -> ScrubResult<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let before = self.data.shape();
        let mut names = self.data.column_names();
        for (old, new) in mapping {
            let idx = self.column_index(old.as_ref())?;
            names[idx] = new.as_ref().to_owned();
        }

        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(ScrubError::DuplicateColumn { column: name.clone() });
            }
        }

        for (field, name) in self.data.schema.fields.iter_mut().zip(names) {
            field.name = name;
        }
        self.applied("rename_columns", before);
        Ok(self)
    }

    /// Restrict the table to exactly `order`, in that order. Columns not listed are dropped.
    ///
    /// Fails if any name is missing, or listed twice.
    pub fn reorder_columns<S: AsRef<str>>(&mut self, order: &[S]) -> ScrubResult<&mut Self> {
        let before = self.data.shape();
        let idxs = self.column_indexes(order)?;
        for (i, idx) in idxs.iter().enumerate() {
            if idxs[..i].contains(idx) {
                return Err(ScrubError::DuplicateColumn {
                    column: order[i].as_ref().to_owned(),
                });
            }
        }
        self.project(&idxs);
        self.applied("reorder_columns", before);
        Ok(self)
    }

    /// Replace the values at `idx` in place, coercing unparsable entries to null.
    pub(super) fn parse_dates_in_place(&mut self, idx: usize) {
        for row in &mut self.data.rows {
            let parsed = match &row[idx] {
                Value::DateTime(dt) => Value::DateTime(*dt),
                Value::Utf8(s) => parse_datetime(s).map(Value::DateTime).unwrap_or(Value::Null),
                _ => Value::Null,
            };
            row[idx] = parsed;
        }
        self.data.schema.fields[idx].data_type = DataType::DateTime;
    }

    pub(super) fn format_strings(&mut self, idx: usize, case: fn(&str) -> String) {
        for row in &mut self.data.rows {
            let formatted = match &row[idx] {
                v if v.is_null() => Value::Null,
                Value::Utf8(s) => Value::Utf8(case(s.trim())),
                other => Value::Utf8(case(other.to_string().trim())),
            };
            row[idx] = formatted;
        }
        self.data.schema.fields[idx].data_type = DataType::Utf8;
    }

    fn replace_column(&mut self, idx: usize, data_type: DataType, values: Vec<Value>) {
        for (row, value) in self.data.rows.iter_mut().zip(values) {
            row[idx] = value;
        }
        self.data.schema.fields[idx].data_type = data_type;
    }

    fn project(&mut self, idxs: &[usize]) {
        let fields = idxs
            .iter()
            .map(|&i| self.data.schema.fields[i].clone())
            .collect();
        self.data.schema.fields = fields;
        for row in &mut self.data.rows {
            *row = idxs.iter().map(|&i| row[i].clone()).collect();
        }
    }
}
