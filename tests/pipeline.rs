//! End-to-end runs of the dispatcher, pool, HTTP fetcher and store against a local
//! axum server.

use axum::extract::State;
use axum::routing::get;
use axum::Router;
use flate2::read::GzDecoder;
use shardfetch::dispatcher::reader::{dispatch, DispatchSummary};
use shardfetch::executor::pool::WorkerPool;
use shardfetch::executor::shutdown::ShutdownSignal;
use shardfetch::fetcher::http::HttpFetcher;
use shardfetch::fetcher::types::{FetchConfig, StatusPolicy};
use shardfetch::storage::store::ArtifactStore;
use std::io::Read;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

async fn spawn_server(hits: Arc<AtomicUsize>) -> SocketAddr {
    let app = Router::new()
        .route(
            "/",
            get(|State(hits): State<Arc<AtomicUsize>>| async move {
                hits.fetch_add(1, Ordering::SeqCst);
                "<html><title>home</title></html>"
            }),
        )
        .with_state(hits);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn run(root: &Path, input: &str, workers: usize) -> DispatchSummary {
    let config = FetchConfig {
        user_agent: "pipeline test".to_string(),
        timeout: Duration::from_secs(5),
        connect_timeout: Duration::from_secs(5),
        status_policy: StatusPolicy::AcceptAny,
    };

    let store = Arc::new(ArtifactStore::new(root));
    let pool = WorkerPool::new(store, ShutdownSignal::new())
        .start(workers, |_| HttpFetcher::new(config.clone()))
        .unwrap();

    dispatch(input.as_bytes(), pool).await.unwrap()
}

#[tokio::test]
async fn test_fetch_store_and_rerun() {
    let hits = Arc::new(AtomicUsize::new(0));
    let addr = spawn_server(hits.clone()).await;
    let domain = addr.to_string();
    let dir = TempDir::new().unwrap();

    // First run fetches and stores
    let first = run(dir.path(), &format!("{}\n", domain), 2).await;
    assert_eq!(first.pool.stored, 1);
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    let store = ArtifactStore::new(dir.path());
    let shard = store.shard_path(&domain);
    let artifact = shard.artifact_path(&domain);
    let compressed = std::fs::read(&artifact).unwrap();
    let mut body = String::new();
    GzDecoder::new(&compressed[..]).read_to_string(&mut body).unwrap();
    assert_eq!(body, "<html><title>home</title></html>");

    // Second run over the same input performs no request and keeps the artifact
    let second = run(dir.path(), &format!("{}\n", domain), 2).await;
    assert_eq!(second.pool.skipped, 1);
    assert_eq!(second.pool.stored, 0);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(std::fs::read(&artifact).unwrap(), compressed);
}

#[tokio::test]
async fn test_unresolvable_domain_gets_error_marker() {
    let dir = TempDir::new().unwrap();

    let summary = run(dir.path(), "bad.invalid\n", 1).await;

    assert_eq!(summary.pool.fetch_failed, 1);
    let shard = ArtifactStore::new(dir.path()).shard_path("bad.invalid");
    let marker = std::fs::read_to_string(shard.error_path("bad.invalid")).unwrap();
    assert!(marker.starts_with("request failed"), "got: {}", marker);
    assert!(!shard.artifact_path("bad.invalid").exists());
}
