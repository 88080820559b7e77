use clap::Parser;
use shardfetch::config::Config;
use shardfetch::dispatcher::interrupt::listen_for_interrupt;
use shardfetch::dispatcher::reader::dispatch;
use shardfetch::executor::pool::WorkerPool;
use shardfetch::executor::shutdown::ShutdownSignal;
use shardfetch::fetcher::http::HttpFetcher;
use shardfetch::storage::store::ArtifactStore;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    tracing::info!(
        "Writing to {} with {} workers (ua: {:?})",
        config.root.display(),
        config.workers,
        config.ua
    );

    // 1. Storage and the shared stop flag:
    let store = Arc::new(ArtifactStore::new(&config.root));
    let shutdown = ShutdownSignal::new();
    listen_for_interrupt(shutdown.clone());

    // 2. Worker pool, one HTTP client per worker:
    let fetch_config = config.fetch_config();
    let pool = WorkerPool::new(store, shutdown).start(config.workers, |_| {
        HttpFetcher::new(fetch_config.clone())
    })?;

    // 3. Feed stdin until it ends or we get interrupted:
    let input = BufReader::new(tokio::io::stdin());
    match dispatch(input, pool).await {
        Ok(summary) => {
            tracing::info!(
                "Queued {} domains ({} rejected): {} ok, {} fetch errors, {} storage errors, {} skipped{}",
                summary.queued,
                summary.rejected,
                summary.pool.stored,
                summary.pool.fetch_failed,
                summary.pool.storage_failed,
                summary.pool.skipped,
                if summary.interrupted { ", interrupted" } else { "" }
            );
            // A blocking stdin read would otherwise hold up runtime shutdown.
            std::process::exit(0);
        }
        Err(e) => {
            tracing::error!("{:#}", anyhow::Error::from(e));
            std::process::exit(1);
        }
    }
}
