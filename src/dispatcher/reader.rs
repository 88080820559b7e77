use crate::executor::pool::RunningPool;
use crate::executor::types::PoolSummary;

use std::io;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Longest domain whose scratch file name (`<domain>.gz.tmp`) still fits in 255 bytes.
pub const MAX_DOMAIN_LEN: usize = 248;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("failed to read input")]
    Input(#[source] io::Error),
}

/// What a finished run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Domains handed to the pool.
    pub queued: u64,
    /// Lines that could not be used as a domain.
    pub rejected: u64,
    /// Whether the run ended because of the shutdown signal.
    pub interrupted: bool,
    pub pool: PoolSummary,
}

/// Pushes every domain of `input` into `pool`, then drains it.
///
/// Stops reading at end of input or once the pool's shutdown signal fires. Lines that
/// are not UTF-8 are counted as rejected like any other unusable name. On a read error
/// the pool is dropped without draining, which aborts its workers.
pub async fn dispatch<R>(input: R, pool: RunningPool) -> Result<DispatchSummary, DispatchError>
where
    R: AsyncBufRead + Unpin,
{
    let shutdown = pool.shutdown_signal().clone();
    let mut lines = input.split(b'\n');
    let mut queued = 0u64;
    let mut rejected = 0u64;

    loop {
        let next = tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            line = lines.next_segment() => line,
        };

        let Some(raw) = next.map_err(DispatchError::Input)? else {
            tracing::info!("End of input after {} domains", queued);
            break;
        };

        let Ok(line) = std::str::from_utf8(&raw) else {
            tracing::warn!(
                "Rejecting input line {:?}: not valid UTF-8",
                String::from_utf8_lossy(&raw)
            );
            rejected += 1;
            continue;
        };

        let domain = line.trim();
        if domain.is_empty() {
            continue;
        }

        if !is_valid_domain(domain) {
            tracing::warn!("Rejecting input line {:?}: not usable as a domain", domain);
            rejected += 1;
            continue;
        }

        if !pool.submit(domain.to_string()).await {
            break;
        }
        queued += 1;
    }

    let interrupted = shutdown.is_triggered();

    tracing::info!("closing..");
    let summary = pool.drain().await;
    tracing::info!(".done");

    Ok(DispatchSummary {
        queued,
        rejected,
        interrupted,
        pool: summary,
    })
}

/// Accepts anything that can safely become a file name inside a shard directory.
///
/// Ports are allowed (`host:8080`), path separators and whitespace are not.
pub fn is_valid_domain(domain: &str) -> bool {
    if domain.is_empty() || domain.len() > MAX_DOMAIN_LEN {
        return false;
    }
    if domain == "." || domain == ".." {
        return false;
    }
    !domain
        .chars()
        .any(|c| c == '/' || c == '\\' || c == '\0' || c.is_whitespace() || c.is_control())
}
