use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::IngestionError;

use super::unified::IngestionFormat;

/// How bad a failed read is. Ordered, so it can be compared against an alert threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IngestionSeverity {
    /// The file was reachable but its contents were rejected (bad header, unparsable cell).
    Error,
    /// The file could not be read at all.
    Critical,
}

/// What was being read.
#[derive(Debug, Clone)]
pub struct IngestionContext {
    pub path: PathBuf,
    pub format: IngestionFormat,
    /// `true` when column types were inferred rather than taken from a caller's schema.
    pub inferred: bool,
}

impl fmt::Display for IngestionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = if self.inferred { "inferred" } else { "schema" };
        write!(f, "{} ({:?}, {mode})", self.path.display(), self.format)
    }
}

/// Shape of a table that was read successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionStats {
    pub rows: usize,
    pub columns: usize,
    /// Cells that came in as missing.
    pub null_cells: usize,
}

/// Hooks invoked around every read done through [`super::unified`].
///
/// All methods default to doing nothing, so implementors override only what they record.
pub trait IngestionObserver: Send + Sync {
    fn on_success(&self, _ctx: &IngestionContext, _stats: IngestionStats) {}

    fn on_failure(&self, _ctx: &IngestionContext, _severity: IngestionSeverity, _error: &IngestionError) {}

    /// Called after [`Self::on_failure`] when the severity meets
    /// [`super::IngestionOptions::alert_at_or_above`]. Forwards to `on_failure` unless overridden.
    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.on_failure(ctx, severity, error)
    }
}

/// Forwards every callback to each wrapped observer, in order.
#[derive(Default, Clone)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn IngestionObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn IngestionObserver>>) -> Self {
        Self { observers }
    }

    /// Add another observer behind the existing ones.
    pub fn with(mut self, observer: Arc<dyn IngestionObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    fn each(&self, f: impl Fn(&dyn IngestionObserver)) {
        self.observers.iter().for_each(|o| f(o.as_ref()));
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl IngestionObserver for CompositeObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        self.each(|o| o.on_success(ctx, stats));
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.each(|o| o.on_failure(ctx, severity, error));
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.each(|o| o.on_alert(ctx, severity, error));
    }
}

/// Reports reads through `tracing`: successes at `info`, failures at `warn`, critical failures
/// and alerts at `error`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl IngestionObserver for TracingObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        tracing::info!(
            input = %ctx,
            rows = stats.rows,
            columns = stats.columns,
            null_cells = stats.null_cells,
            "read input"
        );
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        match severity {
            IngestionSeverity::Critical => tracing::error!(input = %ctx, ?severity, %error, "read failed"),
            IngestionSeverity::Error => tracing::warn!(input = %ctx, ?severity, %error, "read failed"),
        }
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        tracing::error!(alert = true, input = %ctx, ?severity, %error, "read failed");
    }
}
