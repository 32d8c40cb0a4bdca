use revbot_database_interface::SimilarChunk;
use revbot_models::{Repository, Review, ReviewRule, User};
use sqlx::{postgres::PgRow, FromRow, Row};

use crate::fields::{PlanTierDecode, ReviewStatusDecode, ReviewTypeDecode};

pub(crate) struct UserRow(User);
pub(crate) struct RepositoryRow(Repository);
pub(crate) struct ReviewRow(Review);
pub(crate) struct ReviewRuleRow(ReviewRule);
pub(crate) struct SimilarChunkRow(SimilarChunk);

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        r.0
    }
}

impl From<RepositoryRow> for Repository {
    fn from(r: RepositoryRow) -> Self {
        r.0
    }
}

impl From<ReviewRow> for Review {
    fn from(r: ReviewRow) -> Self {
        r.0
    }
}

impl From<ReviewRuleRow> for ReviewRule {
    fn from(r: ReviewRuleRow) -> Self {
        r.0
    }
}

impl From<SimilarChunkRow> for SimilarChunk {
    fn from(r: SimilarChunkRow) -> Self {
        r.0
    }
}

impl<'r> FromRow<'r, PgRow> for UserRow {
    fn from_row(row: &'r PgRow) -> core::result::Result<Self, sqlx::Error> {
        Ok(Self(User {
            id: row.try_get::<i32, _>("id")? as u64,
            github_id: row.try_get("github_id")?,
            username: row.try_get("username")?,
            plan: *row.try_get::<PlanTierDecode, _>("plan")?,
            reviews_limit: row.try_get::<i32, _>("reviews_limit")? as u32,
            reviews_used: row.try_get::<i32, _>("reviews_used")? as u32,
            reviews_reset_at: row.try_get("reviews_reset_at")?,
            auto_fix_enabled: row.try_get("auto_fix_enabled")?,
            github_access_token: row.try_get("github_access_token")?,
        }))
    }
}

impl<'r> FromRow<'r, PgRow> for RepositoryRow {
    fn from_row(row: &'r PgRow) -> core::result::Result<Self, sqlx::Error> {
        Ok(Self(Repository {
            id: row.try_get::<i32, _>("id")? as u64,
            user_id: row.try_get::<i32, _>("user_id")? as u64,
            github_repo_id: row.try_get("github_repo_id")?,
            full_name: row.try_get("full_name")?,
            is_active: row.try_get("is_active")?,
            webhook_id: row.try_get("webhook_id")?,
        }))
    }
}

impl<'r> FromRow<'r, PgRow> for ReviewRow {
    fn from_row(row: &'r PgRow) -> core::result::Result<Self, sqlx::Error> {
        Ok(Self(Review {
            id: row.try_get::<i32, _>("id")? as u64,
            repository_id: row.try_get::<i32, _>("repository_id")? as u64,
            user_id: row.try_get::<i32, _>("user_id")? as u64,
            pr_number: row.try_get::<i32, _>("pr_number")? as u64,
            pr_title: row.try_get("pr_title")?,
            status: *row.try_get::<ReviewStatusDecode, _>("status")?,
            review_type: *row.try_get::<ReviewTypeDecode, _>("review_type")?,
            summary: row.try_get("summary")?,
            issues_found: row.try_get::<i32, _>("issues_found")? as u32,
            created_at: row.try_get("created_at")?,
            completed_at: row.try_get("completed_at")?,
        }))
    }
}

impl<'r> FromRow<'r, PgRow> for ReviewRuleRow {
    fn from_row(row: &'r PgRow) -> core::result::Result<Self, sqlx::Error> {
        Ok(Self(ReviewRule {
            id: row.try_get::<i32, _>("id")? as u64,
            user_id: row.try_get::<i32, _>("user_id")? as u64,
            rule: row.try_get("rule")?,
            is_active: row.try_get("is_active")?,
        }))
    }
}

impl<'r> FromRow<'r, PgRow> for SimilarChunkRow {
    fn from_row(row: &'r PgRow) -> core::result::Result<Self, sqlx::Error> {
        Ok(Self(SimilarChunk {
            file_path: row.try_get("file_path")?,
            content: row.try_get("content")?,
            distance: row.try_get::<f32, _>("distance")?,
        }))
    }
}
