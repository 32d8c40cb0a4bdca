use serde::{Deserialize, Serialize};

/// Tracked source-control project.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Repository {
    pub id: u64,
    pub user_id: u64,
    pub github_repo_id: String,
    /// Full name, `owner/name`.
    pub full_name: String,
    pub is_active: bool,
    pub webhook_id: Option<String>,
}

impl Repository {
    /// Split the full name into `(owner, name)`.
    pub fn path_parts(&self) -> (&str, &str) {
        self.full_name
            .split_once('/')
            .unwrap_or((&self.full_name, ""))
    }
}
