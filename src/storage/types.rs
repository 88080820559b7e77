use std::fmt;

/// What the store already holds for a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactStatus {
    /// Nothing persisted yet, eligible for a fetch.
    Absent,
    /// A compressed homepage exists.
    Succeeded,
    /// An error marker exists. The domain is skipped permanently.
    Failed,
}

impl ArtifactStatus {
    pub fn is_handled(&self) -> bool {
        !matches!(self, ArtifactStatus::Absent)
    }
}

impl fmt::Display for ArtifactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ArtifactStatus::Absent => "absent",
            ArtifactStatus::Succeeded => "succeeded",
            ArtifactStatus::Failed => "failed",
        };
        f.write_str(label)
    }
}
