use std::fmt::Write as _;

use crate::processing::{reduce, ReduceOp};
use crate::types::Value;

use super::DataScrubber;

const DESCRIBE_STATS: [(&str, ReduceOp); 5] = [
    ("count", ReduceOp::CountNonNull),
    ("mean", ReduceOp::Mean),
    ("std", ReduceOp::StdDev),
    ("min", ReduceOp::Min),
    ("max", ReduceOp::Max),
];

impl DataScrubber {
    /// Human-readable summaries of the current table: `(info, describe)`.
    ///
    /// `info` lists every column with its non-null count and type. `describe` holds count, mean,
    /// std, min and max for the numeric columns; a table without numeric columns gets count and
    /// distinct-value counts for every column instead.
    pub fn inspect(&self) -> (String, String) {
        (self.info(), self.describe())
    }

    fn info(&self) -> String {
        let ds = &self.data;
        let non_null: Vec<usize> = ds
            .null_counts()
            .into_iter()
            .map(|nulls| ds.row_count() - nulls)
            .collect();
        let name_width = ds
            .schema
            .field_names()
            .map(str::len)
            .chain(std::iter::once("Column".len()))
            .max()
            .unwrap_or(0);

        let mut out = String::new();
        let _ = writeln!(out, "{} entries, {} columns", ds.row_count(), ds.column_count());
        let _ = writeln!(out, " #  {:<name_width$}  {:>14}  Dtype", "Column", "Non-Null Count");
        for (i, field) in ds.schema.fields.iter().enumerate() {
            let _ = writeln!(
                out,
                "{i:>2}  {:<name_width$}  {:>14}  {}",
                field.name,
                format!("{} non-null", non_null[i]),
                field.data_type
            );
        }
        out
    }

    fn describe(&self) -> String {
        let ds = &self.data;
        let numeric: Vec<&str> = ds
            .schema
            .fields
            .iter()
            .filter(|f| f.data_type.is_numeric())
            .map(|f| f.name.as_str())
            .collect();

        if numeric.is_empty() {
            return self.describe_categorical();
        }

        let rows: Vec<(&str, Vec<String>)> = DESCRIBE_STATS
            .iter()
            .map(|&(label, op)| {
                let cells = numeric
                    .iter()
                    .map(|column| format_stat(reduce(ds, column, op).unwrap_or(Value::Null)))
                    .collect();
                (label, cells)
            })
            .collect();
        render_grid(&numeric, &rows)
    }

    fn describe_categorical(&self) -> String {
        let ds = &self.data;
        let columns: Vec<&str> = ds.schema.field_names().collect();
        let count: Vec<String> = (0..ds.column_count())
            .map(|i| {
                let n = ds.column_values(i).filter(|v| !v.is_null()).count();
                n.to_string()
            })
            .collect();
        let unique: Vec<String> = (0..ds.column_count())
            .map(|i| {
                let mut seen: Vec<String> = ds
                    .column_values(i)
                    .filter(|v| !v.is_null())
                    .map(Value::to_string)
                    .collect();
                seen.sort_unstable();
                seen.dedup();
                seen.len().to_string()
            })
            .collect();
        render_grid(&columns, &[("count", count), ("unique", unique)])
    }
}

fn format_stat(value: Value) -> String {
    match value {
        Value::Float64(v) if !v.is_nan() => format!("{v:.6}"),
        Value::Int64(v) => v.to_string(),
        Value::Float64(_) | Value::Null => "NaN".to_string(),
        other => other.to_string(),
    }
}

fn render_grid(columns: &[&str], rows: &[(&str, Vec<String>)]) -> String {
    let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            rows.iter()
                .map(|(_, cells)| cells[i].len())
                .chain(std::iter::once(name.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let _ = write!(out, "{:label_width$}", "");
    for (name, width) in columns.iter().zip(&widths) {
        let _ = write!(out, "  {name:>width$}");
    }
    out.push('\n');
    for (label, cells) in rows {
        let _ = write!(out, "{label:<label_width$}");
        for (cell, width) in cells.iter().zip(&widths) {
            let _ = write!(out, "  {cell:>width$}");
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use crate::scrubber::test_support::people;
    use crate::scrubber::DataScrubber;
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    #[test]
    fn info_lists_columns_with_non_null_counts() {
        let (info, _) = DataScrubber::new(&people()).inspect();
        assert!(info.starts_with("3 entries, 3 columns\n"));
        let amount = info.lines().find(|l| l.contains("Amount")).unwrap();
        assert!(amount.contains("2 non-null"));
        assert!(amount.ends_with("float64"));
    }

    #[test]
    fn describe_summarises_numeric_columns() {
        let (_, describe) = DataScrubber::new(&people()).inspect();
        let header = describe.lines().next().unwrap();
        assert!(header.contains("ID") && header.contains("Amount"));
        assert!(!header.contains("Name"));

        let mean = describe.lines().find(|l| l.starts_with("mean")).unwrap();
        assert!(mean.contains("1.333333"));
        assert!(mean.contains("10.000000"));
        let max = describe.lines().find(|l| l.starts_with("max")).unwrap();
        assert!(max.contains(" 2 "));
    }

    #[test]
    fn describe_falls_back_to_unique_counts() {
        let ds = DataSet::new(
            Schema::new(vec![Field::new("Region", DataType::Utf8)]),
            vec![
                vec![Value::Utf8("East".into())],
                vec![Value::Utf8("East".into())],
                vec![Value::Utf8("West".into())],
                vec![Value::Null],
            ],
        );
        let (_, describe) = DataScrubber::new(&ds).inspect();
        let lines: Vec<&str> = describe.lines().collect();
        assert_eq!(lines[1].split_whitespace().collect::<Vec<_>>(), vec!["count", "3"]);
        assert_eq!(lines[2].split_whitespace().collect::<Vec<_>>(), vec!["unique", "2"]);
    }
}
