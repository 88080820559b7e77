use metrohash::MetroHash64;
use std::hash::Hasher;
use std::path::{Path, PathBuf};

/// Salts fed to the hash for each of the three directory levels.
pub const LEVEL_SALTS: [u64; 3] = [0, 1024, 2048];

/// Number of buckets per directory level. Segments fall in `[0, SHARD_FANOUT)`.
pub const SHARD_FANOUT: u64 = 255;

/// Directory that holds every artifact of one domain.
///
/// Computed from the domain alone, never persisted. Two domains that land in the same
/// bucket simply share the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardPath {
    segments: [u64; 3],
    dir: PathBuf,
}

impl ShardPath {
    pub fn for_domain(root: &Path, domain: &str) -> Self {
        let segments = LEVEL_SALTS.map(|salt| shard_segment(domain, salt));

        let dir = segments
            .iter()
            .fold(root.to_path_buf(), |dir, segment| dir.join(segment.to_string()));

        Self { segments, dir }
    }

    pub fn segments(&self) -> [u64; 3] {
        self.segments
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Final location of the compressed homepage.
    pub fn artifact_path(&self, domain: &str) -> PathBuf {
        self.dir.join(format!("{}.gz", domain))
    }

    /// Final location of the failure marker.
    pub fn error_path(&self, domain: &str) -> PathBuf {
        self.dir.join(format!("{}.err", domain))
    }

    /// Scratch file renamed over `artifact_path` once fully written.
    pub fn temp_path(&self, domain: &str) -> PathBuf {
        self.dir.join(format!("{}.gz.tmp", domain))
    }
}

fn shard_segment(domain: &str, salt: u64) -> u64 {
    let mut hasher = MetroHash64::with_seed(salt);
    hasher.write(domain.as_bytes());
    hasher.finish() % SHARD_FANOUT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shard_path_deterministic() {
        let root = Path::new("/tmp/out");

        let p1 = ShardPath::for_domain(root, "example.com");
        let p2 = ShardPath::for_domain(root, "example.com");
        assert_eq!(p1, p2);

        for segment in p1.segments() {
            assert!(segment < SHARD_FANOUT);
        }

        println!("example.com -> {}", p1.dir().display());
    }
}
