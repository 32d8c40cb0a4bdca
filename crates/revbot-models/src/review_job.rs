use serde::{Deserialize, Serialize};

use crate::ReviewType;

/// Queue payload for one review.
///
/// The in-flight representation of a [`crate::Review`]; transported through
/// the broker and never persisted on its own.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReviewJob {
    pub repo_id: u64,
    pub user_id: u64,
    pub pr_number: u64,
    pub pr_title: String,
    pub repo_full_name: String,
    pub head_sha: String,
    pub head_ref: String,
    pub base_ref: String,
    pub review_type: ReviewType,
    /// Snapshot of the owner's auto-fix opt-in at admission time.
    ///
    /// Defaults to off for payloads enqueued before the flag existed.
    #[serde(default)]
    pub auto_fix_enabled: bool,
}

impl ReviewJob {
    /// Split the repository full name into `(owner, name)`.
    pub fn repo_path_parts(&self) -> (&str, &str) {
        self.repo_full_name
            .split_once('/')
            .unwrap_or((&self.repo_full_name, ""))
    }
}
