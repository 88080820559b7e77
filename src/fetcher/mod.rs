//! Homepage Fetcher Module
//!
//! Performs the single HTTP GET behind every job. The worker pool only sees the `Fetch`
//! trait, so the transport can be swapped (tests use a scripted fetcher).
//!
//! ## Behavior
//! - **One attempt**: no retries, a failure is final for this run.
//! - **No reuse**: every request asks for `Connection: close` and no idle connections are
//!   kept. Each worker rebuilds its client after a job.
//! - **Status policy**: by default any response with a readable body is a success,
//!   error statuses included. `StatusPolicy::RequireSuccess` turns non-2xx into failures.
//!
//! ## Submodules
//! - **`types`**: the `Fetch` trait, configuration and `FetchError`.
//! - **`http`**: the `reqwest`-backed implementation.

pub mod http;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;


/// URL fetched for a domain: its root page over plain HTTP.
pub fn root_url(domain: &str) -> String {
    format!("http://{}/", domain)
}
