//! Command-line configuration.
//!
//! Every flag can also be supplied through a `SHARDFETCH_*` environment variable.

use crate::fetcher::types::{FetchConfig, StatusPolicy, DEFAULT_USER_AGENT};

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Fetches the root page of every domain read from stdin and stores it gzip-compressed
/// under a hash-sharded directory tree.
#[derive(Parser, Debug, Clone)]
#[command(name = "shardfetch", version, about)]
pub struct Config {
    /// Root output directory.
    #[arg(long, env = "SHARDFETCH_ROOT", default_value = "./out")]
    pub root: PathBuf,

    /// User-Agent sent with every request.
    #[arg(long, env = "SHARDFETCH_UA", default_value = DEFAULT_USER_AGENT)]
    pub ua: String,

    /// Number of concurrent workers.
    #[arg(long = "n-workers", env = "SHARDFETCH_WORKERS", default_value_t = 50)]
    pub workers: usize,

    /// Overall timeout of one request, in seconds.
    #[arg(long, env = "SHARDFETCH_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Connect timeout, in seconds.
    #[arg(long, env = "SHARDFETCH_CONNECT_TIMEOUT_SECS", default_value_t = 30)]
    pub connect_timeout_secs: u64,

    /// Record non-2xx responses as failures instead of storing their body.
    #[arg(long, env = "SHARDFETCH_REQUIRE_SUCCESS_STATUS")]
    pub require_success_status: bool,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.workers > 0, "--n-workers must be at least 1");
        anyhow::ensure!(self.timeout_secs > 0, "--timeout-secs must be at least 1");
        anyhow::ensure!(
            self.connect_timeout_secs > 0,
            "--connect-timeout-secs must be at least 1"
        );
        Ok(())
    }

    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            user_agent: self.ua.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            status_policy: if self.require_success_status {
                StatusPolicy::RequireSuccess
            } else {
                StatusPolicy::AcceptAny
            },
        }
    }
}
