//! Bulk Domain Homepage Fetcher
//!
//! Reads domain names, fetches each domain's root page once and stores it
//! gzip-compressed under a hash-sharded directory tree. Domains that already have an
//! artifact are skipped, so re-running over the same input only retries what is missing.
//!
//! ## Architecture Modules
//! - **`storage`**: shard addressing (`root/<h0>/<h1>/<h2>`), the gzip codec and the
//!   artifact store with its atomic write and error markers.
//! - **`fetcher`**: the `Fetch` trait and its `reqwest` implementation.
//! - **`executor`**: the fixed-size worker pool, per-job outcomes and the shutdown signal.
//! - **`dispatcher`**: reads input lines into the pool and runs the shutdown sequence,
//!   including Ctrl-C handling.
//! - **`config`**: command-line flags.

pub mod config;
pub mod dispatcher;
pub mod executor;
pub mod fetcher;
pub mod storage;
