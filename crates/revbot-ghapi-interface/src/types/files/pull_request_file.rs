use serde::{Deserialize, Serialize};

/// File modified by a pull request.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct GhPullRequestFile {
    /// Path.
    pub filename: String,
    /// Status (added, modified, removed, ...).
    pub status: String,
    /// Added lines.
    pub additions: u64,
    /// Removed lines.
    pub deletions: u64,
    /// Unified diff hunk, absent for binary files.
    pub patch: Option<String>,
}
