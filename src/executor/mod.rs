//! Concurrent Fetch Executor Module
//!
//! Runs the fetch-and-store protocol over a stream of domains with a fixed pool of
//! workers.
//!
//! ## Architecture Overview
//! 1. **Queue**: the dispatcher pushes domains into a single bounded channel shared by
//!    all workers. Any worker may claim any domain.
//! 2. **Execution**: a worker checks the store, fetches the root page, compresses it and
//!    persists either the artifact or an error marker.
//! 3. **Reporting**: every claimed domain yields one `JobReport` and one log line.
//! 4. **Shutdown**: a `ShutdownSignal` stops workers between jobs. In-flight fetches are
//!    never cancelled.
//!
//! ## Submodules
//! - **`pool`**: worker lifecycle, the per-domain protocol and draining.
//! - **`shutdown`**: the cooperative stop flag.
//! - **`types`**: outcomes, reports and summary counters.

pub mod pool;
pub mod shutdown;
pub mod types;
