//! Batch preparation of raw CSV files into cleaned outputs.
//!
//! A [`PrepareConfig`] lists dataset jobs. Each job reads one raw file, runs a fixed sequence of
//! [`crate::scrubber::DataScrubber`] steps and writes the prepared file (see [`run_job`]).
//! Jobs share nothing, so [`PrepareRunner`] runs them on a rayon pool; a failing job is reported
//! in its [`JobOutcome`] and does not stop the others.
//!
//! ```no_run
//! use data_scrubber::prepare::{run_all, PrepareConfig};
//!
//! # fn main() -> Result<(), data_scrubber::PrepareError> {
//! let config = PrepareConfig::from_path("config/prepare.toml")?;
//! for outcome in run_all(&config, &[], None)? {
//!     match &outcome.result {
//!         Ok(report) => println!("{}: {:?} -> {:?}", outcome.name, report.original_shape, report.cleaned_shape),
//!         Err(e) => eprintln!("{}: {e}", outcome.name),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod config;
mod job;
mod observer;

use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{PrepareError, PrepareResult};

pub use config::{DatasetJob, KindFill, OutlierBounds, PlaceholderColumn, PrepareConfig};
pub use job::{run_job, PreparationReport};
pub use observer::{
    PrepareEvent, PrepareMetrics, PrepareMetricsSnapshot, PrepareObserver, TracingPrepareObserver,
};

/// Result of one dataset job.
#[derive(Debug)]
pub struct JobOutcome {
    pub name: String,
    pub result: PrepareResult<PreparationReport>,
}

impl JobOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Runs dataset jobs in parallel on a dedicated thread pool.
pub struct PrepareRunner {
    pool: ThreadPool,
    threads: usize,
    observer: Option<Arc<dyn PrepareObserver>>,
    metrics: Arc<PrepareMetrics>,
}

impl PrepareRunner {
    /// Build a runner with `threads` workers, or the platform's available parallelism.
    pub fn new(threads: Option<usize>) -> PrepareResult<Self> {
        if threads == Some(0) {
            return Err(PrepareError::Config {
                message: "threads must be > 0 when set".to_string(),
            });
        }
        let threads = threads
            .unwrap_or_else(|| std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1))
            .max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("prepare-{i}"))
            .build()?;

        Ok(Self {
            pool,
            threads,
            observer: None,
            metrics: Arc::new(PrepareMetrics::new()),
        })
    }

    /// Attach an observer for job events.
    pub fn with_observer(mut self, observer: Arc<dyn PrepareObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Live counters for the current (or last) run.
    pub fn metrics(&self) -> Arc<PrepareMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Run the jobs named in `only` (every job when empty), returning outcomes in config order.
    ///
    /// Fails up front only if `only` names a job the config does not define.
    pub fn run(&self, config: &PrepareConfig, only: &[String]) -> PrepareResult<Vec<JobOutcome>> {
        if let Some(unknown) = only.iter().find(|name| config.job(name).is_none()) {
            return Err(PrepareError::Config {
                message: format!("no dataset named '{unknown}' in config"),
            });
        }
        let jobs: Vec<&DatasetJob> = config
            .datasets
            .iter()
            .filter(|job| only.is_empty() || only.contains(&job.name))
            .collect();

        let start = Instant::now();
        self.emit(PrepareEvent::RunStarted {
            jobs: jobs.len(),
            threads: self.threads,
        });

        let outcomes = self.pool.install(|| {
            jobs.par_iter()
                .map(|job| self.run_one(config, job))
                .collect::<Vec<_>>()
        });

        self.emit(PrepareEvent::RunFinished {
            elapsed: start.elapsed(),
            metrics: self.metrics.snapshot(),
        });
        Ok(outcomes)
    }

    fn run_one(&self, config: &PrepareConfig, job: &DatasetJob) -> JobOutcome {
        let start = Instant::now();
        self.metrics.on_job_start();
        self.emit(PrepareEvent::JobStarted { name: job.name.clone() });

        let result = run_job(config, job);
        match &result {
            Ok(report) => {
                self.metrics.on_job_end(Some(report.cleaned_shape.0));
                self.emit(PrepareEvent::JobFinished {
                    name: job.name.clone(),
                    rows: report.cleaned_shape.0,
                    elapsed: start.elapsed(),
                });
            }
            Err(e) => {
                self.metrics.on_job_end(None);
                self.emit(PrepareEvent::JobFailed {
                    name: job.name.clone(),
                    error: e.to_string(),
                });
            }
        }

        JobOutcome {
            name: job.name.clone(),
            result,
        }
    }

    fn emit(&self, event: PrepareEvent) {
        if let Some(obs) = &self.observer {
            obs.on_event(&event);
        }
    }
}

/// Run jobs with a [`TracingPrepareObserver`].
///
/// `threads` overrides `config.threads`; with neither set the pool uses available parallelism.
pub fn run_all(config: &PrepareConfig, only: &[String], threads: Option<usize>) -> PrepareResult<Vec<JobOutcome>> {
    PrepareRunner::new(threads.or(config.threads))?
        .with_observer(Arc::new(TracingPrepareObserver))
        .run(config, only)
}
