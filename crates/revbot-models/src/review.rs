use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{ReviewStatus, ReviewType};

/// Durable record of one review's lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Review {
    pub id: u64,
    pub repository_id: u64,
    pub user_id: u64,
    pub pr_number: u64,
    pub pr_title: String,
    pub status: ReviewStatus,
    pub review_type: ReviewType,
    pub summary: Option<String>,
    pub issues_found: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
}

impl Default for Review {
    fn default() -> Self {
        Self {
            id: 0,
            repository_id: 0,
            user_id: 0,
            pr_number: 0,
            pr_title: String::new(),
            status: ReviewStatus::default(),
            review_type: ReviewType::default(),
            summary: None,
            issues_found: 0,
            created_at: OffsetDateTime::UNIX_EPOCH,
            completed_at: None,
        }
    }
}
