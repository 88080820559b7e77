//! Scripted fetcher used by the executor and dispatcher tests.

use super::types::{Fetch, FetchError};

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, Semaphore};

#[derive(Default)]
struct Script {
    failing: HashSet<String>,
    gate: Option<Arc<Semaphore>>,
    started: Option<mpsc::UnboundedSender<String>>,
    calls: Mutex<Vec<String>>,
    resets: AtomicUsize,
}

/// Answers every URL with a small HTML body, except the ones marked as failing.
///
/// Clones share the call log, so one clone per worker still gives a global view.
#[derive(Clone, Default)]
pub(crate) struct ScriptedFetcher {
    script: Arc<Script>,
}

impl ScriptedFetcher {
    pub(crate) fn builder() -> ScriptedFetcherBuilder {
        ScriptedFetcherBuilder::default()
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.script.calls.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.script.calls.lock().unwrap().len()
    }

    pub(crate) fn resets(&self) -> usize {
        self.script.resets.load(Ordering::SeqCst)
    }

    pub(crate) fn body_for(url: &str) -> Vec<u8> {
        format!("<html><body>{}</body></html>", url).into_bytes()
    }
}

#[derive(Default)]
pub(crate) struct ScriptedFetcherBuilder {
    script: Script,
}

impl ScriptedFetcherBuilder {
    /// Makes fetches of `url` fail with a 502 status error.
    pub(crate) fn failing(mut self, url: &str) -> Self {
        self.script.failing.insert(url.to_string());
        self
    }

    /// Every fetch waits for a permit of `gate` before answering.
    pub(crate) fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.script.gate = Some(gate);
        self
    }

    /// Reports each URL on `started` as soon as its fetch begins.
    pub(crate) fn notify_started(mut self, started: mpsc::UnboundedSender<String>) -> Self {
        self.script.started = Some(started);
        self
    }

    pub(crate) fn build(self) -> ScriptedFetcher {
        ScriptedFetcher {
            script: Arc::new(self.script),
        }
    }
}

impl Fetch for ScriptedFetcher {
    async fn fetch(&mut self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.script.calls.lock().unwrap().push(url.to_string());

        if let Some(started) = &self.script.started {
            let _ = started.send(url.to_string());
        }

        if let Some(gate) = &self.script.gate {
            let _permit = gate.acquire().await.expect("gate closed");
        }

        if self.script.failing.contains(url) {
            return Err(FetchError::Status(reqwest::StatusCode::BAD_GATEWAY));
        }

        Ok(Self::body_for(url))
    }

    fn reset(&mut self) {
        self.script.resets.fetch_add(1, Ordering::SeqCst);
    }
}
