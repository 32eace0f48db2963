use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use serde::Serialize;

/// Events emitted by [`super::PrepareRunner`].
#[derive(Debug, Clone)]
pub enum PrepareEvent {
    RunStarted { jobs: usize, threads: usize },
    JobStarted { name: String },
    JobFinished { name: String, rows: usize, elapsed: Duration },
    JobFailed { name: String, error: String },
    RunFinished {
        elapsed: Duration,
        metrics: PrepareMetricsSnapshot,
    },
}

/// Observer hook for batch preparation events.
pub trait PrepareObserver: Send + Sync {
    fn on_event(&self, event: &PrepareEvent);
}

/// Forwards [`PrepareEvent`]s to `tracing`.
#[derive(Debug, Default)]
pub struct TracingPrepareObserver;

impl PrepareObserver for TracingPrepareObserver {
    fn on_event(&self, event: &PrepareEvent) {
        match event {
            PrepareEvent::RunStarted { jobs, threads } => {
                tracing::info!(jobs, threads, "preparation run started");
            }
            PrepareEvent::JobStarted { name } => tracing::debug!(dataset = %name, "job started"),
            PrepareEvent::JobFinished { name, rows, elapsed } => {
                tracing::info!(dataset = %name, rows, elapsed = ?elapsed, "job finished");
            }
            PrepareEvent::JobFailed { name, error } => {
                tracing::error!(dataset = %name, %error, "job failed");
            }
            PrepareEvent::RunFinished { elapsed, metrics } => {
                tracing::info!(elapsed = ?elapsed, "preparation run finished: {metrics}");
            }
        }
    }
}

/// Live counters for a preparation run. Callers can snapshot them at any time.
#[derive(Debug, Default)]
pub struct PrepareMetrics {
    jobs_started: AtomicU64,
    jobs_succeeded: AtomicU64,
    jobs_failed: AtomicU64,
    rows_written: AtomicU64,
    active_jobs: AtomicUsize,
    max_active_jobs: AtomicUsize,
}

impl PrepareMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn on_job_start(&self) {
        let _ = self.jobs_started.fetch_add(1, Ordering::SeqCst);
        let now = self.active_jobs.fetch_add(1, Ordering::SeqCst) + 1;
        let _ = self.max_active_jobs.fetch_max(now, Ordering::SeqCst);
    }

    pub(crate) fn on_job_end(&self, rows_written: Option<usize>) {
        match rows_written {
            Some(rows) => {
                let _ = self.jobs_succeeded.fetch_add(1, Ordering::SeqCst);
                let _ = self.rows_written.fetch_add(rows as u64, Ordering::SeqCst);
            }
            None => {
                let _ = self.jobs_failed.fetch_add(1, Ordering::SeqCst);
            }
        }
        let _ = self.active_jobs.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> PrepareMetricsSnapshot {
        PrepareMetricsSnapshot {
            jobs_started: self.jobs_started.load(Ordering::SeqCst),
            jobs_succeeded: self.jobs_succeeded.load(Ordering::SeqCst),
            jobs_failed: self.jobs_failed.load(Ordering::SeqCst),
            rows_written: self.rows_written.load(Ordering::SeqCst),
            max_active_jobs: self.max_active_jobs.load(Ordering::SeqCst),
        }
    }
}

/// Immutable snapshot of [`PrepareMetrics`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrepareMetricsSnapshot {
    pub jobs_started: u64,
    pub jobs_succeeded: u64,
    pub jobs_failed: u64,
    pub rows_written: u64,
    pub max_active_jobs: usize,
}

impl fmt::Display for PrepareMetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "jobs={}/{} ok, failed={}, rows_written={}, max_active_jobs={}",
            self.jobs_succeeded, self.jobs_started, self.jobs_failed, self.rows_written, self.max_active_jobs
        )
    }
}
