//! Worker Pool Implementation
//!
//! Spawns a fixed number of workers that pull domains from one shared job queue and run
//! the fetch-and-store protocol for each of them.
//!
//! ## Responsibilities
//! - **Claiming**: each iteration waits for either the shutdown signal or the next
//!   queued domain. Shutdown wins when both are ready.
//! - **Protocol**: status check, fetch, compress, then an atomic write of the artifact
//!   or the error marker.
//! - **Reporting**: one log line and one `JobReport` per claimed domain, numbered by a
//!   shared atomic counter.
//! - **Draining**: `RunningPool::drain` closes the queue and waits for every worker.

use super::shutdown::ShutdownSignal;
use super::types::{JobReport, Outcome, PoolStats, PoolSummary};
use crate::fetcher::root_url;
use crate::fetcher::types::Fetch;
use crate::storage::codec;
use crate::storage::store::ArtifactStore;

use anyhow::{Context, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;

/// Slots in the job queue. One keeps the dispatcher in lockstep with the workers.
const JOB_QUEUE_CAPACITY: usize = 1;

type JobReceiver = Arc<Mutex<mpsc::Receiver<String>>>;

/// Shared state of all workers.
pub struct WorkerPool {
    store: Arc<ArtifactStore>,
    shutdown: ShutdownSignal,
    /// Source of `JobReport::seq`.
    sequence: AtomicU64,
    stats: PoolStats,
    /// Optional observer receiving every report.
    reports: Option<mpsc::UnboundedSender<JobReport>>,
}

impl WorkerPool {
    pub fn new(store: Arc<ArtifactStore>, shutdown: ShutdownSignal) -> Self {
        Self {
            store,
            shutdown,
            sequence: AtomicU64::new(0),
            stats: PoolStats::default(),
            reports: None,
        }
    }

    pub fn with_reports(mut self, reports: mpsc::UnboundedSender<JobReport>) -> Self {
        self.reports = Some(reports);
        self
    }

    /// Builds one fetcher per worker and spawns the workers.
    ///
    /// Fails before anything is spawned if `worker_count` is zero or a fetcher cannot be
    /// built.
    pub fn start<F, M>(self, worker_count: usize, mut make_fetcher: M) -> Result<RunningPool>
    where
        F: Fetch,
        M: FnMut(usize) -> Result<F>,
    {
        anyhow::ensure!(worker_count > 0, "worker pool needs at least one worker");

        let fetchers = (0..worker_count)
            .map(|worker_id| {
                make_fetcher(worker_id)
                    .with_context(|| {
                        format!("failed to create fetcher for worker {}", worker_id)
                    })
            })
            .collect::<Result<Vec<F>>>()?;

        let pool = Arc::new(self);
        let (jobs, receiver) = mpsc::channel(JOB_QUEUE_CAPACITY);
        let receiver: JobReceiver = Arc::new(Mutex::new(receiver));

        let mut workers = JoinSet::new();
        for (worker_id, fetcher) in fetchers.into_iter().enumerate() {
            let pool = pool.clone();
            let receiver = receiver.clone();
            workers.spawn(async move {
                pool.worker_loop(worker_id, fetcher, receiver).await;
            });
        }

        tracing::info!("Started {} workers", worker_count);

        Ok(RunningPool {
            jobs,
            workers,
            pool,
        })
    }

    /// The main loop for a single worker.
    ///
    /// Exits when shutdown is triggered or when the queue is closed and empty. A job that
    /// was already claimed always runs to completion.
    async fn worker_loop<F: Fetch>(&self, worker_id: usize, mut fetcher: F, jobs: JobReceiver) {
        tracing::debug!("Worker {} started", worker_id);

        loop {
            let next = tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => {
                    tracing::info!("{}: close received", worker_id);
                    break;
                }
                domain = next_job(&jobs) => domain,
            };

            let Some(domain) = next else {
                tracing::debug!("Worker {} found the queue closed", worker_id);
                break;
            };

            let report = self.run_job(worker_id, &mut fetcher, domain).await;
            fetcher.reset();
            self.record(report);
        }
    }

    async fn run_job<F: Fetch>(
        &self,
        worker_id: usize,
        fetcher: &mut F,
        domain: String,
    ) -> JobReport {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let started = Instant::now();

        let outcome = self
            .fetch_and_store(fetcher, &domain)
            .await
            .unwrap_or_else(|e| Outcome::StorageFailed {
                error: format!("{:#}", e),
            });

        JobReport {
            seq,
            worker_id,
            domain,
            outcome,
            elapsed: started.elapsed(),
        }
    }

    /// Runs the idempotent protocol for one domain.
    ///
    /// `Err` means storage failed and nothing may have been recorded on disk.
    async fn fetch_and_store<F: Fetch>(&self, fetcher: &mut F, domain: &str) -> Result<Outcome> {
        let shard = self.store.shard_path(domain);

        let status = self.store.status(&shard, domain).await?;
        if status.is_handled() {
            return Ok(Outcome::Skipped(status));
        }

        match fetcher.fetch(&root_url(domain)).await {
            Ok(body) => {
                let compressed = codec::gzip(&body).context("failed to compress body")?;
                let bytes = self.store.write_success(&shard, domain, &compressed).await?;
                Ok(Outcome::Stored { bytes })
            }
            Err(err) => {
                let error = err.describe();
                self.store
                    .write_failure(&shard, domain, &error)
                    .await
                    .with_context(|| format!("could not record fetch error ({})", error))?;
                Ok(Outcome::FetchFailed { error })
            }
        }
    }

    fn record(&self, report: JobReport) {
        self.stats.record(&report.outcome);

        match &report.outcome {
            Outcome::Stored { bytes } => tracing::info!(
                "[ OK] {} {} dur: {:?}, size: {}",
                report.seq,
                report.domain,
                report.elapsed,
                bytes
            ),
            Outcome::Skipped(_) => {
                tracing::info!("[NOK] {} {} exists", report.seq, report.domain)
            }
            Outcome::FetchFailed { error } | Outcome::StorageFailed { error } => tracing::warn!(
                "[NOK] {} {} dur: {:?} err: {}",
                report.seq,
                report.domain,
                report.elapsed,
                error
            ),
        }

        if let Some(reports) = &self.reports {
            // The observer may have gone away; reporting is best effort.
            let _ = reports.send(report);
        }
    }
}

async fn next_job(jobs: &Mutex<mpsc::Receiver<String>>) -> Option<String> {
    jobs.lock().await.recv().await
}

/// Handle to a started pool: the sending side of the job queue plus the workers.
///
/// Dropping it without calling `drain` aborts every worker.
pub struct RunningPool {
    jobs: mpsc::Sender<String>,
    workers: JoinSet<()>,
    pool: Arc<WorkerPool>,
}

impl RunningPool {
    /// Queues a domain, waiting while all workers are busy.
    ///
    /// Returns `false` if shutdown was triggered first or no worker is left to take it.
    pub async fn submit(&self, domain: String) -> bool {
        tokio::select! {
            biased;
            _ = self.pool.shutdown.cancelled() => false,
            sent = self.jobs.send(domain) => sent.is_ok(),
        }
    }

    pub fn shutdown_signal(&self) -> &ShutdownSignal {
        &self.pool.shutdown
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Closes the queue and waits for every worker to exit.
    ///
    /// Without shutdown, workers finish whatever is still queued. After shutdown they
    /// only finish the job they hold and leave the rest.
    pub async fn drain(self) -> PoolSummary {
        let RunningPool {
            jobs,
            mut workers,
            pool,
        } = self;
        drop(jobs);

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Worker terminated abnormally: {}", e);
            }
        }

        pool.stats.snapshot()
    }
}
