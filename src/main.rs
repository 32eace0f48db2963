//! data-scrubber - clean and prepare tabular CSV data

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indexmap::IndexMap;
use tracing_subscriber::EnvFilter;

use data_scrubber::export::write_csv_to_path;
use data_scrubber::ingestion::csv::ingest_csv_inferred_from_path;
use data_scrubber::ingestion::{IngestionFormat, IngestionOptions, IngestionRequest, TracingObserver};
use data_scrubber::prepare::{run_all, PrepareConfig};
use data_scrubber::scrubber::{CleanOptions, DataScrubber, TracingScrubObserver};
use data_scrubber::types::{DataSet, Value};

/// Clean and prepare tabular CSV data
#[derive(Parser, Debug)]
#[command(name = "data-scrubber")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the dataset jobs defined in a TOML config
    Prepare(PrepareArgs),
    /// Print column info, summary statistics and a consistency check for a file
    Inspect(InspectArgs),
    /// Run the standard cleaning pass over one file
    Clean(CleanArgs),
}

#[derive(Args, Debug)]
struct PrepareArgs {
    /// Path to the preparation config
    #[arg(short, long, default_value = "config/prepare.toml")]
    config: PathBuf,

    /// Only run these datasets (comma-separated)
    #[arg(long, value_delimiter = ',')]
    only: Vec<String>,

    /// Worker threads (overrides the config)
    #[arg(long)]
    threads: Option<usize>,

    /// Print the reports as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Input file
    input: PathBuf,

    /// Field delimiter (default: from the file extension)
    #[arg(short, long)]
    delimiter: Option<char>,
}

#[derive(Args, Debug)]
struct CleanArgs {
    /// Input file
    input: PathBuf,

    /// Output file
    output: PathBuf,

    /// Keep fully duplicated rows
    #[arg(long)]
    keep_duplicates: bool,

    /// Drop rows containing any missing value (takes precedence over --fill)
    #[arg(long)]
    drop_na: bool,

    /// Fill missing values with this value
    #[arg(long)]
    fill: Option<String>,

    /// Column(s) to lowercase and trim (comma-separated)
    #[arg(long, value_delimiter = ',')]
    lower: Vec<String>,

    /// Column(s) to uppercase and trim (comma-separated)
    #[arg(long, value_delimiter = ',')]
    upper: Vec<String>,

    /// Column(s) to parse as dates (comma-separated)
    #[arg(long, value_delimiter = ',')]
    dates: Vec<String>,

    /// Column renames as old=new (comma-separated)
    #[arg(long, value_delimiter = ',', value_parser = parse_rename)]
    rename: Vec<(String, String)>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Returns `Ok(false)` when the command ran but some of its work failed.
fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Command::Prepare(args) => prepare(args),
        Command::Inspect(args) => inspect(args).map(|_| true),
        Command::Clean(args) => clean(args).map(|_| true),
    }
}

fn prepare(args: PrepareArgs) -> Result<bool> {
    let config = PrepareConfig::from_path(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    let outcomes = run_all(&config, &args.only, args.threads)?;
    let all_ok = outcomes.iter().all(|o| o.is_ok());

    if args.json {
        let json: Vec<serde_json::Value> = outcomes
            .iter()
            .map(|o| match &o.result {
                Ok(report) => serde_json::json!({ "name": o.name, "ok": true, "report": report }),
                Err(e) => serde_json::json!({ "name": o.name, "ok": false, "error": e.to_string() }),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        for outcome in &outcomes {
            match &outcome.result {
                Ok(r) => println!(
                    "{}: {:?} -> {:?}, duplicates={}, nulls {} -> {}, outliers={} ({})",
                    outcome.name,
                    r.original_shape,
                    r.cleaned_shape,
                    r.duplicates_removed,
                    r.nulls_before,
                    r.nulls_after,
                    r.outliers_removed,
                    r.output_path.display()
                ),
                Err(e) => println!("{}: FAILED: {e}", outcome.name),
            }
        }
    }
    Ok(all_ok)
}

fn inspect(args: InspectArgs) -> Result<()> {
    let data = load(&args.input, args.delimiter)?;
    let scrubber = DataScrubber::from_owned(data);
    let (info, describe) = scrubber.inspect();
    let snapshot = scrubber.consistency_snapshot();

    println!("{info}");
    println!("{describe}");
    println!(
        "nulls: {} (per column: {})",
        snapshot.total_nulls(),
        serde_json::to_string(&snapshot.null_counts)?
    );
    println!("duplicate rows: {}", snapshot.duplicate_count);
    Ok(())
}

fn clean(args: CleanArgs) -> Result<()> {
    let data = load(&args.input, None)?;
    let rename_map = (!args.rename.is_empty()).then(|| args.rename.into_iter().collect::<IndexMap<_, _>>());
    let options = CleanOptions {
        drop_duplicates: !args.keep_duplicates,
        drop_na: args.drop_na,
        fill_value: args.fill.as_deref().map(parse_fill),
        lowercase: args.lower,
        uppercase: args.upper,
        date_columns: args.dates,
        rename_map,
    };

    let mut scrubber = DataScrubber::from_owned(data).with_observer(Arc::new(TracingScrubObserver));
    let cleaned = scrubber.clean(&options);
    let delimiter = delimiter_for(&args.output);
    write_csv_to_path(cleaned, &args.output, delimiter)
        .with_context(|| format!("writing {}", args.output.display()))?;
    tracing::info!(shape = ?cleaned.shape(), "Data saved to {}", args.output.display());
    Ok(())
}

fn load(path: &Path, delimiter: Option<char>) -> Result<DataSet> {
    let data = match delimiter {
        Some(c) => {
            let byte = u8::try_from(c).context("delimiter must be a single-byte character")?;
            ingest_csv_inferred_from_path(path, byte)?
        }
        None => IngestionRequest {
            path: path.to_path_buf(),
            schema: None,
            options: IngestionOptions {
                observer: Some(Arc::new(TracingObserver)),
                ..Default::default()
            },
        }
        .run()?,
    };
    Ok(data)
}

fn delimiter_for(path: &Path) -> u8 {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(IngestionFormat::from_extension)
        .unwrap_or(IngestionFormat::Csv)
        .delimiter()
}

fn parse_rename(s: &str) -> Result<(String, String), String> {
    let (old, new) = s
        .split_once('=')
        .ok_or_else(|| format!("expected old=new, got '{s}'"))?;
    if old.is_empty() || new.is_empty() {
        return Err(format!("expected old=new, got '{s}'"));
    }
    Ok((old.to_string(), new.to_string()))
}

fn parse_fill(s: &str) -> Value {
    if let Ok(v) = s.parse::<i64>() {
        Value::Int64(v)
    } else if let Ok(v) = s.parse::<f64>() {
        Value::Float64(v)
    } else {
        Value::Utf8(s.to_string())
    }
}
