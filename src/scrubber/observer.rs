use std::fmt;

/// Events emitted by [`super::DataScrubber`] operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrubEvent {
    /// An operation completed and mutated (or confirmed) the table.
    Applied {
        op: &'static str,
        rows_before: usize,
        rows_after: usize,
        columns_before: usize,
        columns_after: usize,
    },
    /// A step of [`super::DataScrubber::clean`] was skipped.
    Skipped { op: &'static str, reason: String },
}

impl fmt::Display for ScrubEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Applied {
                op,
                rows_before,
                rows_after,
                columns_before,
                columns_after,
            } => write!(
                f,
                "{op}: ({rows_before}, {columns_before}) -> ({rows_after}, {columns_after})"
            ),
            Self::Skipped { op, reason } => write!(f, "{op} skipped: {reason}"),
        }
    }
}

/// Observer hook for scrubber events.
pub trait ScrubObserver: Send + Sync {
    fn on_event(&self, event: &ScrubEvent);
}

/// Forwards scrubber events to `tracing`: applied steps at `debug`, skipped steps at `warn`.
#[derive(Debug, Default)]
pub struct TracingScrubObserver;

impl ScrubObserver for TracingScrubObserver {
    fn on_event(&self, event: &ScrubEvent) {
        match event {
            ScrubEvent::Applied {
                op,
                rows_before,
                rows_after,
                columns_after,
                ..
            } => tracing::debug!(op = *op, rows_before, rows_after, columns = columns_after, "scrub step"),
            ScrubEvent::Skipped { op, reason } => tracing::warn!(op = *op, %reason, "scrub step skipped"),
        }
    }
}
