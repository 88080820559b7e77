use super::types::{Fetch, FetchConfig, FetchError, StatusPolicy};

use anyhow::{Context, Result};
use reqwest::header::CONNECTION;
use reqwest::Client;
use std::time::Duration;

const TCP_KEEPALIVE: Duration = Duration::from_secs(30);

/// `reqwest`-backed fetcher. Build one per worker.
pub struct HttpFetcher {
    config: FetchConfig,
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = build_client(&config).context("failed to build HTTP client")?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&mut self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .header(CONNECTION, "close")
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        if self.config.status_policy == StatusPolicy::RequireSuccess && !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().await.map_err(FetchError::Body)?;
        tracing::trace!("GET {} -> {} ({} bytes)", url, status, body.len());
        Ok(body.to_vec())
    }

    /// Drops the client together with any connection state it still holds.
    fn reset(&mut self) {
        match build_client(&self.config) {
            Ok(client) => self.client = client,
            Err(e) => tracing::warn!("Keeping previous HTTP client, rebuild failed: {}", e),
        }
    }
}

fn build_client(config: &FetchConfig) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .tcp_keepalive(TCP_KEEPALIVE)
        .pool_max_idle_per_host(0)
        .build()
}
