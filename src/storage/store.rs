//! On-disk Artifact Store
//!
//! Persists the outcome of each domain under its shard directory and answers whether a
//! domain still needs fetching.
//!
//! ## Guarantees
//! - **Atomic success**: the `.gz` artifact is written to a scratch file, synced and then
//!   renamed, so the final name is either absent or complete.
//! - **Advisory failure marker**: the `.err` marker is written in place. A torn marker only
//!   costs a re-fetch on the next run.
//! - **Idempotent directories**: shard directories are created on demand, and concurrent
//!   creation of the same directory by several workers is harmless.

use super::shard::ShardPath;
use super::types::ArtifactStatus;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn shard_path(&self, domain: &str) -> ShardPath {
        ShardPath::for_domain(&self.root, domain)
    }

    /// Checks the error marker first, then the artifact.
    ///
    /// Not transactional: two workers racing on the same domain can both observe
    /// `Absent`. Callers are expected to feed each domain once.
    pub async fn status(&self, shard: &ShardPath, domain: &str) -> Result<ArtifactStatus> {
        let error_path = shard.error_path(domain);
        if exists(&error_path).await? {
            return Ok(ArtifactStatus::Failed);
        }

        let artifact_path = shard.artifact_path(domain);
        if exists(&artifact_path).await? {
            return Ok(ArtifactStatus::Succeeded);
        }

        Ok(ArtifactStatus::Absent)
    }

    /// Writes already-compressed bytes as the domain's artifact.
    ///
    /// Returns the number of bytes persisted.
    pub async fn write_success(
        &self,
        shard: &ShardPath,
        domain: &str,
        bytes: &[u8],
    ) -> Result<usize> {
        self.ensure_dir(shard).await?;

        let temp_path = shard.temp_path(domain);
        let final_path = shard.artifact_path(domain);

        if let Err(e) = write_synced(&temp_path, bytes).await {
            discard(&temp_path).await;
            return Err(e);
        }

        // Rename atomically
        if let Err(e) = fs::rename(&temp_path, &final_path).await {
            discard(&temp_path).await;
            return Err(e).with_context(|| {
                format!(
                    "failed to rename {} to {}",
                    temp_path.display(),
                    final_path.display()
                )
            });
        }

        tracing::trace!("Stored {} bytes at {}", bytes.len(), final_path.display());
        Ok(bytes.len())
    }

    /// Records why a domain could not be fetched.
    pub async fn write_failure(
        &self,
        shard: &ShardPath,
        domain: &str,
        error_text: &str,
    ) -> Result<()> {
        self.ensure_dir(shard).await?;

        let error_path = shard.error_path(domain);
        fs::write(&error_path, error_text.as_bytes())
            .await
            .with_context(|| format!("failed to write error marker {}", error_path.display()))?;

        tracing::trace!("Stored error marker at {}", error_path.display());
        Ok(())
    }

    async fn ensure_dir(&self, shard: &ShardPath) -> Result<()> {
        // create_dir_all already treats an existing directory as success, including one
        // created by another worker a moment earlier.
        fs::create_dir_all(shard.dir())
            .await
            .with_context(|| {
                format!("failed to create shard directory {}", shard.dir().display())
            })
    }
}

async fn exists(path: &Path) -> Result<bool> {
    fs::try_exists(path)
        .await
        .with_context(|| format!("failed to stat {}", path.display()))
}

async fn write_synced(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = fs::File::create(path)
        .await
        .with_context(|| format!("failed to create {}", path.display()))?;
    file.write_all(bytes)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    file.sync_all()
        .await
        .with_context(|| format!("failed to sync {}", path.display()))?;
    Ok(())
}

async fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        tracing::debug!("Could not remove scratch file {}: {}", path.display(), e);
    }
}
