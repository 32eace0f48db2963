//! Core data model types.
//!
//! Tables are held in memory as a [`DataSet`]: an ordered [`Schema`] of typed [`Field`]s plus
//! row-major [`Value`] storage. Ingestion produces them, the scrubber transforms them and export
//! writes them back out.

use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Format used when rendering [`Value::DateTime`] as text.
pub const DATETIME_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Logical data type for a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    Utf8,
    /// Date and time without a timezone.
    DateTime,
}

impl DataType {
    /// `true` for [`DataType::Int64`] and [`DataType::Float64`].
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Int64 | Self::Float64)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int64 => "int64",
            Self::Float64 => "float64",
            Self::Bool => "bool",
            Self::Utf8 => "utf8",
            Self::DateTime => "datetime",
        };
        f.write_str(name)
    }
}

/// A single named, typed field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field/column name.
    pub name: String,
    /// Field data type.
    pub data_type: DataType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// A list of fields describing the shape of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Returns `true` if a field called `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// `true` if the schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A single typed value in a [`DataSet`].
///
/// Serializes untagged, so configuration files can spell fill values as plain literals
/// (`0`, `0.5`, `true`, `"N/A"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
    /// Date and time without a timezone.
    DateTime(NaiveDateTime),
}

impl Value {
    /// `true` for [`Value::Null`] and for a float `NaN`.
    pub fn is_null(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Float64(v) => v.is_nan(),
            _ => false,
        }
    }

    /// The data type this value naturally belongs to (`None` for nulls).
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Self::Null => None,
            Self::Int64(_) => Some(DataType::Int64),
            Self::Float64(_) => Some(DataType::Float64),
            Self::Bool(_) => Some(DataType::Bool),
            Self::Utf8(_) => Some(DataType::Utf8),
            Self::DateTime(_) => Some(DataType::DateTime),
        }
    }

    /// Numeric view of the value, if it is an integer or a float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int64(v) => Some(*v as f64),
            Self::Float64(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    /// Nulls render as an empty string; integral floats keep a trailing `.0`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Int64(v) => write!(f, "{v}"),
            Self::Float64(v) if v.is_nan() => Ok(()),
            Self::Float64(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 => {
                write!(f, "{v:.1}")
            }
            Self::Float64(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Utf8(s) => f.write_str(s),
            Self::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_DISPLAY_FORMAT)),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float64(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Utf8(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Utf8(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Self::DateTime(v)
    }
}

/// Hashable view of a value for equality-based grouping.
///
/// Nulls (including `NaN`) compare equal to each other. Floats compare bitwise after folding
/// `-0.0` into `0.0`, matching `Value`'s own equality.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ValueKey<'a>(pub(crate) &'a Value);

impl PartialEq for ValueKey<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self.0, other.0) {
            (a, b) if a.is_null() && b.is_null() => true,
            (Value::Float64(a), Value::Float64(b)) => float_bits(*a) == float_bits(*b),
            (a, b) => a == b,
        }
    }
}

impl Eq for ValueKey<'_> {}

impl Hash for ValueKey<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if self.0.is_null() {
            0u8.hash(state);
            return;
        }
        std::mem::discriminant(self.0).hash(state);
        match self.0 {
            Value::Null => {}
            Value::Int64(v) => v.hash(state),
            Value::Float64(v) => float_bits(*v).hash(state),
            Value::Bool(v) => v.hash(state),
            Value::Utf8(s) => s.hash(state),
            Value::DateTime(dt) => dt.hash(state),
        }
    }
}

fn float_bits(v: f64) -> u64 {
    if v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() }
}

/// Hashable key over a selection of a row's values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct RowKey<'a>(pub(crate) Vec<ValueKey<'a>>);

impl<'a> RowKey<'a> {
    /// Key over every value in `row`.
    pub(crate) fn full(row: &'a [Value]) -> Self {
        Self(row.iter().map(ValueKey).collect())
    }

    /// Key over the values at `idxs`.
    pub(crate) fn project(row: &'a [Value], idxs: &[usize]) -> Self {
        Self(idxs.iter().map(|&i| ValueKey(&row[i])).collect())
    }
}

/// In-memory tabular dataset.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`] fields. Cloning a
/// dataset is a deep copy.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl DataSet {
    /// Create a dataset from schema and rows.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        Self { schema, rows }
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns in the dataset.
    pub fn column_count(&self) -> usize {
        self.schema.len()
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.row_count(), self.column_count())
    }

    /// Column names in order.
    pub fn column_names(&self) -> Vec<String> {
        self.schema.field_names().map(str::to_owned).collect()
    }

    /// Iterate the values of the column at `idx`.
    pub fn column_values(&self, idx: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().filter_map(move |row| row.get(idx))
    }

    /// Count null values per column, in schema order.
    pub fn null_counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.schema.len()];
        for row in &self.rows {
            for (count, value) in counts.iter_mut().zip(row) {
                if value.is_null() {
                    *count += 1;
                }
            }
        }
        counts
    }

    /// Number of rows equal in every column to an earlier row.
    pub fn duplicate_row_count(&self) -> usize {
        let mut seen = rustc_hash::FxHashSet::default();
        self.rows
            .iter()
            .filter(|row| !seen.insert(RowKey::full(row)))
            .count()
    }

    /// Append a column. Returns `false` (and leaves the dataset untouched) if a column with the
    /// same name already exists or `values` does not match the row count.
    pub fn push_column(&mut self, field: Field, values: Vec<Value>) -> bool {
        if self.schema.contains(&field.name) || values.len() != self.rows.len() {
            return false;
        }
        self.schema.fields.push(field);
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        true
    }
}
