//! Sharded Artifact Storage Module
//!
//! Maps every domain to a fixed directory and persists exactly one artifact per domain.
//!
//! ## Core Concepts
//! - **Sharding**: `ShardPath` hashes the domain three times with distinct salts to pick a
//!   `root/<h0>/<h1>/<h2>` directory, keeping per-directory file counts bounded.
//! - **Artifacts**: a domain ends as either `<domain>.gz` (compressed homepage) or
//!   `<domain>.err` (failure reason), never both.
//! - **Idempotent skip**: any existing artifact marks the domain as handled.
//! - **Codec**: response bodies are gzip-compressed before they reach the store.

pub mod codec;
pub mod shard;
pub mod store;
pub mod types;
