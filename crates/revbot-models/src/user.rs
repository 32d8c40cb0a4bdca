use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::PlanTier;

/// Account owning tracked repositories.
///
/// Owned by collaborator services; the pipeline reads plan, quota,
/// auto-fix preference and credential, and only ever mutates
/// `reviews_used`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub github_id: String,
    pub username: String,
    pub plan: PlanTier,
    pub reviews_limit: u32,
    pub reviews_used: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub reviews_reset_at: OffsetDateTime,
    /// Opt-in for auto-fix commits on the user's pull requests.
    pub auto_fix_enabled: bool,
    pub github_access_token: Option<String>,
}

impl Default for User {
    fn default() -> Self {
        Self {
            id: 0,
            github_id: String::new(),
            username: String::new(),
            plan: PlanTier::default(),
            reviews_limit: 30,
            reviews_used: 0,
            reviews_reset_at: OffsetDateTime::UNIX_EPOCH,
            auto_fix_enabled: false,
            github_access_token: None,
        }
    }
}
