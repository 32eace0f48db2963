use rustc_hash::FxHashSet;

use crate::error::ScrubResult;
use crate::types::{DataType, RowKey, Value};

use super::DataScrubber;

impl DataScrubber {
    /// Remove rows equal in every column to an earlier row, keeping the first occurrence.
    pub fn remove_duplicates(&mut self) -> &mut Self {
        let before = self.data.shape();
        let keep: Vec<bool> = {
            let mut seen = FxHashSet::default();
            self.data
                .rows
                .iter()
                .map(|row| seen.insert(RowKey::full(row)))
                .collect()
        };
        self.retain_mask(keep);
        self.applied("remove_duplicates", before);
        self
    }

    /// Remove rows whose values in `columns` repeat an earlier row, keeping the first.
    ///
    /// An empty `columns` slice compares whole rows, like [`Self::remove_duplicates`].
    pub fn remove_duplicates_by<S: AsRef<str>>(&mut self, columns: &[S]) -> ScrubResult<&mut Self> {
        if columns.is_empty() {
            return Ok(self.remove_duplicates());
        }
        let before = self.data.shape();
        let idxs = self.column_indexes(columns)?;
        let keep: Vec<bool> = {
            let mut seen = FxHashSet::default();
            self.data
                .rows
                .iter()
                .map(|row| seen.insert(RowKey::project(row, &idxs)))
                .collect()
        };
        self.retain_mask(keep);
        self.applied("remove_duplicates_by", before);
        Ok(self)
    }

    /// Drop or fill missing values.
    ///
    /// - `drop`: remove every row with at least one null; `fill_value` is ignored.
    /// - otherwise, with `fill_value`: fill every null in every column (see
    ///   [`Self::fill_missing_in`] for how the value is fitted to each column's type).
    /// - neither: no-op.
    pub fn handle_missing(&mut self, drop: bool, fill_value: Option<Value>) -> &mut Self {
        let before = self.data.shape();
        if drop {
            self.data.rows.retain(|row| !row.iter().any(Value::is_null));
            self.applied("handle_missing", before);
        } else if let Some(fill) = fill_value {
            for idx in 0..self.data.column_count() {
                self.fill_column(idx, &fill);
            }
            self.applied("handle_missing", before);
        }
        self
    }

    /// Remove every row containing a null.
    pub fn drop_missing(&mut self) -> &mut Self {
        self.handle_missing(true, None)
    }

    /// Fill nulls in every column with `value`.
    pub fn fill_missing(&mut self, value: impl Into<Value>) -> &mut Self {
        self.handle_missing(false, Some(value.into()))
    }

    /// Fill nulls in one column.
    ///
    /// The fill is fitted to the column type: used as-is when the types match, widened from
    /// integer to float for float columns, stringified for text columns, and narrowed from an
    /// integral float for integer columns. When none of these apply the column becomes `Utf8`
    /// and its existing values are stringified. Columns without nulls are left untouched.
    pub fn fill_missing_in(&mut self, column: &str, value: impl Into<Value>) -> ScrubResult<&mut Self> {
        let before = self.data.shape();
        let idx = self.column_index(column)?;
        self.fill_column(idx, &value.into());
        self.applied("fill_missing_in", before);
        Ok(self)
    }

    fn fill_column(&mut self, idx: usize, fill: &Value) {
        if fill.is_null() || !self.data.column_values(idx).any(Value::is_null) {
            return;
        }

        let field = &mut self.data.schema.fields[idx];
        match fit_fill(fill, field.data_type) {
            Some(fitted) => {
                for row in &mut self.data.rows {
                    if row[idx].is_null() {
                        row[idx] = fitted.clone();
                    }
                }
            }
            None => {
                field.data_type = DataType::Utf8;
                let text = fill.to_string();
                for row in &mut self.data.rows {
                    row[idx] = if row[idx].is_null() {
                        Value::Utf8(text.clone())
                    } else {
                        Value::Utf8(row[idx].to_string())
                    };
                }
            }
        }
    }

    fn retain_mask(&mut self, keep: Vec<bool>) {
        let rows = std::mem::take(&mut self.data.rows);
        self.data.rows = rows
            .into_iter()
            .zip(keep)
            .filter_map(|(row, k)| k.then_some(row))
            .collect();
    }
}

fn fit_fill(fill: &Value, column_type: DataType) -> Option<Value> {
    match (fill, column_type) {
        (v, t) if v.data_type() == Some(t) => Some(v.clone()),
        (Value::Int64(v), DataType::Float64) => Some(Value::Float64(*v as f64)),
        (Value::Float64(v), DataType::Int64) if v.fract() == 0.0 && v.abs() < 9.0e15 => {
            Some(Value::Int64(*v as i64))
        }
        (v, DataType::Utf8) => Some(Value::Utf8(v.to_string())),
        _ => None,
    }
}
