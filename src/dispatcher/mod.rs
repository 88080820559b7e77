//! Input Dispatcher Module
//!
//! Feeds domains from a line-oriented input into the worker pool and owns the shutdown
//! sequence of a run.
//!
//! ## Workflow
//! 1. **Read**: one domain per line. Blank lines are ignored, unusable names rejected.
//! 2. **Queue**: each domain is submitted to the pool, blocking while every worker is
//!    busy. This is the only flow control.
//! 3. **Stop**: end of input or an interrupt both end in `RunningPool::drain`. A read
//!    error returns immediately and the workers are aborted.
//!
//! ## Submodules
//! - **`reader`**: the dispatch loop and domain validation.
//! - **`interrupt`**: turns Ctrl-C into the shared `ShutdownSignal`.

pub mod interrupt;
pub mod reader;
