use crate::storage::types::ArtifactStatus;

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// How one job ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The compressed homepage was persisted. `bytes` is the compressed size.
    Stored { bytes: usize },
    /// The fetch failed and its error marker was written.
    FetchFailed { error: String },
    /// Status check, compression or a write failed. No marker is guaranteed, so the
    /// next run retries the domain.
    StorageFailed { error: String },
    /// An artifact already existed. Nothing was fetched.
    Skipped(ArtifactStatus),
}

impl Outcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Stored { .. })
    }
}

/// Emitted once per claimed domain.
#[derive(Debug, Clone)]
pub struct JobReport {
    /// Global sequence number, for log correlation only. Not ordered across workers.
    pub seq: u64,
    pub worker_id: usize,
    pub domain: String,
    pub outcome: Outcome,
    pub elapsed: Duration,
}

/// Totals for a finished pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolSummary {
    pub stored: u64,
    pub fetch_failed: u64,
    pub storage_failed: u64,
    pub skipped: u64,
}

impl PoolSummary {
    pub fn total(&self) -> u64 {
        self.stored + self.fetch_failed + self.storage_failed + self.skipped
    }
}

/// Lock-free counters behind `PoolSummary`.
#[derive(Debug, Default)]
pub(crate) struct PoolStats {
    stored: AtomicU64,
    fetch_failed: AtomicU64,
    storage_failed: AtomicU64,
    skipped: AtomicU64,
}

impl PoolStats {
    pub(crate) fn record(&self, outcome: &Outcome) {
        let counter = match outcome {
            Outcome::Stored { .. } => &self.stored,
            Outcome::FetchFailed { .. } => &self.fetch_failed,
            Outcome::StorageFailed { .. } => &self.storage_failed,
            Outcome::Skipped(_) => &self.skipped,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> PoolSummary {
        PoolSummary {
            stored: self.stored.load(Ordering::Relaxed),
            fetch_failed: self.fetch_failed.load(Ordering::Relaxed),
            storage_failed: self.storage_failed.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
        }
    }
}
