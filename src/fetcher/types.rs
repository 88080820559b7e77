use std::error::Error as _;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_USER_AGENT: &str = "shardfetch bot 1.0";

/// Retrieves the raw body behind a URL.
///
/// One value is owned by each worker, which lets implementations keep a private
/// client. `reset` runs after every job.
pub trait Fetch: Send + 'static {
    fn fetch(&mut self, url: &str) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send;

    fn reset(&mut self) {}
}

/// How HTTP status codes affect the outcome of a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusPolicy {
    /// Any response whose body can be read counts as a success.
    #[default]
    AcceptAny,
    /// Only 2xx responses count as a success.
    RequireSuccess,
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Sent as the `User-Agent` header.
    pub user_agent: String,
    /// Overall deadline for one request, body included.
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub status_policy: StatusPolicy,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(30),
            status_policy: StatusPolicy::AcceptAny,
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed")]
    Transport(#[source] reqwest::Error),

    #[error("failed to read response body")]
    Body(#[source] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
}

impl FetchError {
    /// Renders the error with its whole source chain, as stored in `.err` markers.
    pub fn describe(&self) -> String {
        let mut text = self.to_string();
        let mut source = self.source();
        while let Some(err) = source {
            text.push_str(": ");
            text.push_str(&err.to_string());
            source = err.source();
        }
        text
    }
}
