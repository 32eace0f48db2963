//! Reduction operations for [`crate::types::DataSet`].

use crate::types::{DataSet, DataType, Value};

/// Built-in reduction operations over a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOp {
    /// Count non-null values.
    CountNonNull,
    /// Minimum numeric value, ignoring nulls.
    Min,
    /// Maximum numeric value, ignoring nulls.
    Max,
    /// Arithmetic mean of numeric values, ignoring nulls. Always `Float64`.
    Mean,
    /// Sample standard deviation (n - 1) of numeric values, ignoring nulls. Always `Float64`.
    StdDev,
}

/// Reduce a column using a built-in [`ReduceOp`].
///
/// - Returns `None` if `column` does not exist in the schema.
/// - For `Min`/`Max`/`Mean`, returns `Some(Value::Null)` if there are no non-null values
///   or the column is not numeric. `StdDev` also needs at least two values.
/// - `Min`/`Max` keep the column's type; `Mean`/`StdDev` are always `Float64`.
pub fn reduce(dataset: &DataSet, column: &str, op: ReduceOp) -> Option<Value> {
    let idx = dataset.schema.index_of(column)?;
    let data_type = dataset.schema.fields.get(idx)?.data_type;

    match op {
        ReduceOp::CountNonNull => {
            let n = dataset.column_values(idx).filter(|v| !v.is_null()).count();
            Some(Value::Int64(n as i64))
        }
        ReduceOp::Min | ReduceOp::Max => Some(reduce_numeric_typed(dataset, idx, data_type, op)),
        ReduceOp::Mean | ReduceOp::StdDev => {
            if !data_type.is_numeric() {
                return Some(Value::Null);
            }
            let values: Vec<f64> = dataset
                .column_values(idx)
                .filter(|v| !v.is_null())
                .filter_map(Value::as_f64)
                .collect();
            Some(match op {
                ReduceOp::Mean => mean(&values).map(Value::Float64).unwrap_or(Value::Null),
                _ => std_dev(&values).map(Value::Float64).unwrap_or(Value::Null),
            })
        }
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(var.sqrt())
}

fn reduce_numeric_typed(dataset: &DataSet, idx: usize, data_type: DataType, op: ReduceOp) -> Value {
    match data_type {
        DataType::Int64 => {
            let mut acc: Option<i64> = None;
            for value in dataset.column_values(idx) {
                if let Value::Int64(v) = value {
                    acc = Some(match (op, acc) {
                        (ReduceOp::Min, Some(a)) => a.min(*v),
                        (ReduceOp::Max, Some(a)) => a.max(*v),
                        (_, _) => *v,
                    });
                }
            }
            acc.map(Value::Int64).unwrap_or(Value::Null)
        }
        DataType::Float64 => {
            let mut acc: Option<f64> = None;
            for value in dataset.column_values(idx) {
                match value {
                    Value::Float64(v) if !v.is_nan() => {
                        acc = Some(match (op, acc) {
                            (ReduceOp::Min, Some(a)) => a.min(*v),
                            (ReduceOp::Max, Some(a)) => a.max(*v),
                            (_, _) => *v,
                        });
                    }
                    _ => {}
                }
            }
            acc.map(Value::Float64).unwrap_or(Value::Null)
        }
        _ => Value::Null,
    }
}
