use std::collections::HashSet;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{PrepareError, PrepareResult};
use crate::scrubber::CleanOptions;
use crate::types::Value;

/// Top-level preparation config, usually loaded from TOML with [`PrepareConfig::from_path`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrepareConfig {
    /// Directory the `input` of each job is resolved against.
    #[serde(default = "default_raw_dir")]
    pub raw_dir: PathBuf,
    /// Directory the `output` of each job is resolved against. Created on demand.
    #[serde(default = "default_prepared_dir")]
    pub prepared_dir: PathBuf,
    /// Seed for placeholder columns with random choices.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Worker threads for [`super::run_all`]. `None` uses available parallelism.
    #[serde(default)]
    pub threads: Option<usize>,
    #[serde(default)]
    pub datasets: Vec<DatasetJob>,
}

fn default_raw_dir() -> PathBuf {
    PathBuf::from("data/raw")
}

fn default_prepared_dir() -> PathBuf {
    PathBuf::from("data/prepared")
}

fn default_seed() -> u64 {
    42
}

/// One raw file to prepare.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetJob {
    pub name: String,
    pub input: PathBuf,
    pub output: PathBuf,
    /// Columns identifying a record. Empty (or missing from the data) means whole-row dedupe.
    #[serde(default)]
    pub dedupe_key: Vec<String>,
    #[serde(default)]
    pub add_columns: Vec<PlaceholderColumn>,
    /// Per-column fill values, applied in order.
    #[serde(default)]
    pub fill_columns: IndexMap<String, Value>,
    #[serde(default)]
    pub fill_by_kind: Option<KindFill>,
    #[serde(default)]
    pub outliers: Vec<OutlierBounds>,
    /// Optional final pass through [`crate::scrubber::DataScrubber::clean`].
    #[serde(default)]
    pub clean: Option<CleanOptions>,
}

/// A column added when the raw data lacks it.
///
/// Exactly one of `default` and `choices` must be set.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlaceholderColumn {
    pub name: String,
    /// Constant value for every row.
    #[serde(default)]
    pub default: Option<Value>,
    /// Values drawn uniformly per row from a seeded generator.
    #[serde(default)]
    pub choices: Option<Vec<String>>,
}

/// Fill values by column kind: `numeric` for int/float columns, `text` for string columns.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KindFill {
    #[serde(default)]
    pub numeric: Option<Value>,
    #[serde(default)]
    pub text: Option<Value>,
}

/// Inclusive bounds for one column; a missing bound is unbounded.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutlierBounds {
    pub column: String,
    #[serde(default)]
    pub lower: Option<f64>,
    #[serde(default)]
    pub upper: Option<f64>,
}

impl OutlierBounds {
    pub fn range(&self) -> (f64, f64) {
        (
            self.lower.unwrap_or(f64::NEG_INFINITY),
            self.upper.unwrap_or(f64::INFINITY),
        )
    }
}

impl PrepareConfig {
    /// Load and validate a TOML config.
    ///
    /// Relative `raw_dir` and `prepared_dir` are resolved against the directory holding `path`.
    pub fn from_path(path: impl AsRef<Path>) -> PrepareResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| PrepareError::ConfigIo {
            path: path.display().to_string(),
            source,
        })?;
        let mut config = Self::from_toml_str(&text)?;
        if let Some(base) = path.parent() {
            config.raw_dir = base.join(&config.raw_dir);
            config.prepared_dir = base.join(&config.prepared_dir);
        }
        Ok(config)
    }

    /// Parse and validate a TOML document. Paths are left as written.
    pub fn from_toml_str(text: &str) -> PrepareResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Full path of a job's input file.
    pub fn input_path(&self, job: &DatasetJob) -> PathBuf {
        self.raw_dir.join(&job.input)
    }

    /// Full path of a job's output file.
    pub fn output_path(&self, job: &DatasetJob) -> PathBuf {
        self.prepared_dir.join(&job.output)
    }

    /// Look up a job by name.
    pub fn job(&self, name: &str) -> Option<&DatasetJob> {
        self.datasets.iter().find(|j| j.name == name)
    }

    fn validate(&self) -> PrepareResult<()> {
        if self.threads == Some(0) {
            return Err(config_error("threads must be > 0 when set"));
        }

        let mut names = HashSet::new();
        for job in &self.datasets {
            if job.name.trim().is_empty() {
                return Err(config_error("dataset name must not be empty"));
            }
            if !names.insert(job.name.as_str()) {
                return Err(config_error(format!("dataset '{}' is defined twice", job.name)));
            }
            job.validate()?;
        }
        Ok(())
    }
}

impl DatasetJob {
    fn validate(&self) -> PrepareResult<()> {
        for column in &self.add_columns {
            match (&column.default, &column.choices) {
                (Some(_), None) => {}
                (None, Some(choices)) if !choices.is_empty() => {}
                (None, Some(_)) => {
                    return Err(config_error(format!(
                        "dataset '{}': column '{}' has an empty choices list",
                        self.name, column.name
                    )));
                }
                _ => {
                    return Err(config_error(format!(
                        "dataset '{}': column '{}' needs exactly one of `default` or `choices`",
                        self.name, column.name
                    )));
                }
            }
        }

        for bounds in &self.outliers {
            let (lower, upper) = bounds.range();
            if lower.is_nan() || upper.is_nan() || lower > upper {
                return Err(config_error(format!(
                    "dataset '{}': invalid bounds for '{}'",
                    self.name, bounds.column
                )));
            }
        }
        Ok(())
    }
}

fn config_error(message: impl Into<String>) -> PrepareError {
    PrepareError::Config {
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::PrepareConfig;
    use crate::error::PrepareError;
    use crate::types::Value;

    const PRODUCTS: &str = r#"
seed = 7

[[datasets]]
name = "products"
input = "products_data.csv"
output = "products_prepared.csv"
dedupe_key = ["ProductID"]

[[datasets.add_columns]]
name = "StockQuantity"
default = 0.0

[[datasets.add_columns]]
name = "Condition"
choices = ["New", "Used"]

[datasets.fill_columns]
StockQuantity = 0
Condition = "Unknown"

[[datasets.outliers]]
column = "StockQuantity"
lower = 0.0

[datasets.clean]
uppercase = ["Category"]
"#;

    #[test]
    fn parses_full_job() {
        let config = PrepareConfig::from_toml_str(PRODUCTS).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.raw_dir, PathBuf::from("data/raw"));
        assert_eq!(config.threads, None);

        let job = config.job("products").unwrap();
        assert_eq!(job.dedupe_key, vec!["ProductID"]);
        assert_eq!(job.add_columns[0].default, Some(Value::Float64(0.0)));
        assert_eq!(job.fill_columns.get("StockQuantity"), Some(&Value::Int64(0)));
        assert_eq!(job.fill_columns.get("Condition"), Some(&Value::Utf8("Unknown".into())));
        assert_eq!(job.outliers[0].range(), (0.0, f64::INFINITY));

        let clean = job.clean.as_ref().unwrap();
        assert!(clean.drop_duplicates);
        assert_eq!(clean.uppercase, vec!["Category"]);
        assert_eq!(config.output_path(job), PathBuf::from("data/prepared/products_prepared.csv"));
    }

    #[test]
    fn rejects_ambiguous_placeholder() {
        let err = PrepareConfig::from_toml_str(
            r#"
[[datasets]]
name = "sales"
input = "sales.csv"
output = "out.csv"
[[datasets.add_columns]]
name = "PaymentType"
default = "Cash"
choices = ["Cash"]
"#,
        )
        .unwrap_err();
        assert!(matches!(err, PrepareError::Config { .. }));
    }

    #[test]
    fn rejects_duplicate_names_and_unknown_keys() {
        let dup = r#"
[[datasets]]
name = "a"
input = "a.csv"
output = "a.csv"
[[datasets]]
name = "a"
input = "b.csv"
output = "b.csv"
"#;
        assert!(matches!(
            PrepareConfig::from_toml_str(dup).unwrap_err(),
            PrepareError::Config { .. }
        ));
        assert!(matches!(
            PrepareConfig::from_toml_str("colour = 1").unwrap_err(),
            PrepareError::ConfigParse(_)
        ));
    }

    #[test]
    fn from_path_resolves_relative_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prepare.toml");
        std::fs::write(&path, "raw_dir = \"raw\"\nprepared_dir = \"/abs/prepared\"\n").unwrap();

        let config = PrepareConfig::from_path(&path).unwrap();
        assert_eq!(config.raw_dir, dir.path().join("raw"));
        assert_eq!(config.prepared_dir, PathBuf::from("/abs/prepared"));

        let missing = PrepareConfig::from_path(dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(missing, PrepareError::ConfigIo { .. }));
    }
}
