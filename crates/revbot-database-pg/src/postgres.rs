use async_trait::async_trait;
use revbot_database_interface::{DatabaseError, DbService, Result, SimilarChunk};
use revbot_models::{EmbeddingChunk, Repository, Review, ReviewRule, ReviewStatus, User};

use crate::{
    row::{RepositoryRow, ReviewRow, ReviewRuleRow, SimilarChunkRow, UserRow},
    DbPool,
};

pub struct PostgresDb {
    pool: DbPool,
}

impl PostgresDb {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Statuses allowed to transition into `next`.
fn transition_sources(next: ReviewStatus) -> Vec<String> {
    [
        ReviewStatus::Pending,
        ReviewStatus::Queued,
        ReviewStatus::Processing,
        ReviewStatus::Completed,
        ReviewStatus::Failed,
    ]
    .into_iter()
    .filter(|status| status.can_transition_to(next))
    .map(|status| status.to_str().to_string())
    .collect()
}

/// Renders a vector as a pgvector literal, e.g. `[0.1,0.2,0.3]`.
fn vector_literal(embedding: &[f32]) -> String {
    let mut out = String::from("[");
    for (idx, value) in embedding.iter().enumerate() {
        if idx > 0 {
            out.push(',');
        }
        out.push_str(&value.to_string());
    }
    out.push(']');
    out
}

#[async_trait]
impl DbService for PostgresDb {
    #[tracing::instrument(skip_all, fields(username = instance.username), ret)]
    async fn users_create(&self, instance: User) -> Result<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (github_id, username, plan, reviews_limit, reviews_used, reviews_reset_at, auto_fix_enabled, github_access_token)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&instance.github_id)
        .bind(&instance.username)
        .bind(instance.plan.to_str())
        .bind(instance.reviews_limit as i32)
        .bind(instance.reviews_used as i32)
        .bind(instance.reviews_reset_at)
        .bind(instance.auto_fix_enabled)
        .bind(&instance.github_access_token)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::ImplementationError { source: e.into() })?;

        Ok(row.into())
    }

    #[tracing::instrument(skip_all, fields(id = instance.id), ret)]
    async fn users_update(&self, instance: User) -> Result<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET github_id = $1, username = $2, plan = $3, reviews_limit = $4,
                reviews_used = $5, reviews_reset_at = $6, auto_fix_enabled = $7,
                github_access_token = $8
            WHERE id = $9
            RETURNING *
            "#,
        )
        .bind(&instance.github_id)
        .bind(&instance.username)
        .bind(instance.plan.to_str())
        .bind(instance.reviews_limit as i32)
        .bind(instance.reviews_used as i32)
        .bind(instance.reviews_reset_at)
        .bind(instance.auto_fix_enabled)
        .bind(&instance.github_access_token)
        .bind(instance.id as i32)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::ImplementationError { source: e.into() })?;

        Ok(row.into())
    }

    #[tracing::instrument(skip_all, fields(id), ret)]
    async fn users_get(&self, id: u64) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(id as i32)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::ImplementationError { source: e.into() })?;

        Ok(row.map(Into::into))
    }

    #[tracing::instrument(skip_all, ret)]
    async fn users_all(&self) -> Result<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>("SELECT * FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DatabaseError::ImplementationError { source: e.into() })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[tracing::instrument(skip_all, fields(id), ret)]
    async fn users_increment_reviews_used(&self, id: u64) -> Result<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET reviews_used = reviews_used + 1
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id as i32)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::ImplementationError { source: e.into() })?;

        row.map(Into::into).ok_or(DatabaseError::UnknownUser(id))
    }

    #[tracing::instrument(skip_all, fields(full_name = instance.full_name), ret)]
    async fn repositories_create(&self, instance: Repository) -> Result<Repository> {
        let row = sqlx::query_as::<_, RepositoryRow>(
            r#"
            INSERT INTO repositories (user_id, github_repo_id, full_name, is_active, webhook_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(instance.user_id as i32)
        .bind(&instance.github_repo_id)
        .bind(&instance.full_name)
        .bind(instance.is_active)
        .bind(&instance.webhook_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::ImplementationError { source: e.into() })?;

        Ok(row.into())
    }

    #[tracing::instrument(skip_all, fields(id = instance.id), ret)]
    async fn repositories_update(&self, instance: Repository) -> Result<Repository> {
        let row = sqlx::query_as::<_, RepositoryRow>(
            r#"
            UPDATE repositories
            SET user_id = $1, github_repo_id = $2, full_name = $3, is_active = $4, webhook_id = $5
            WHERE id = $6
            RETURNING *
            "#,
        )
        .bind(instance.user_id as i32)
        .bind(&instance.github_repo_id)
        .bind(&instance.full_name)
        .bind(instance.is_active)
        .bind(&instance.webhook_id)
        .bind(instance.id as i32)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::ImplementationError { source: e.into() })?;

        Ok(row.into())
    }

    #[tracing::instrument(skip_all, fields(id), ret)]
    async fn repositories_get(&self, id: u64) -> Result<Option<Repository>> {
        let row = sqlx::query_as::<_, RepositoryRow>("SELECT * FROM repositories WHERE id = $1")
            .bind(id as i32)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::ImplementationError { source: e.into() })?;

        Ok(row.map(Into::into))
    }

    #[tracing::instrument(skip_all, fields(full_name), ret)]
    async fn repositories_get_from_full_name(
        &self,
        full_name: &str,
    ) -> Result<Option<Repository>> {
        let row =
            sqlx::query_as::<_, RepositoryRow>("SELECT * FROM repositories WHERE full_name = $1")
                .bind(full_name)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DatabaseError::ImplementationError { source: e.into() })?;

        Ok(row.map(Into::into))
    }

    #[tracing::instrument(skip_all, ret)]
    async fn repositories_all(&self) -> Result<Vec<Repository>> {
        let rows = sqlx::query_as::<_, RepositoryRow>("SELECT * FROM repositories ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DatabaseError::ImplementationError { source: e.into() })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[tracing::instrument(skip_all, fields(id), ret)]
    async fn repositories_delete(&self, id: u64) -> Result<bool> {
        // Reviews and embedding chunks cascade at the schema level.
        let result = sqlx::query("DELETE FROM repositories WHERE id = $1")
            .bind(id as i32)
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::ImplementationError { source: e.into() })?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip_all, fields(repository_id = instance.repository_id, pr_number = instance.pr_number), ret)]
    async fn reviews_create(&self, instance: Review) -> Result<Review> {
        let row = sqlx::query_as::<_, ReviewRow>(
            r#"
            INSERT INTO reviews (repository_id, user_id, pr_number, pr_title, status, review_type, summary, issues_found, created_at, completed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(instance.repository_id as i32)
        .bind(instance.user_id as i32)
        .bind(instance.pr_number as i32)
        .bind(&instance.pr_title)
        .bind(instance.status.to_str())
        .bind(instance.review_type.to_str())
        .bind(&instance.summary)
        .bind(instance.issues_found as i32)
        .bind(instance.created_at)
        .bind(instance.completed_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::ImplementationError { source: e.into() })?;

        Ok(row.into())
    }

    #[tracing::instrument(skip_all, fields(id), ret)]
    async fn reviews_get(&self, id: u64) -> Result<Option<Review>> {
        let row = sqlx::query_as::<_, ReviewRow>("SELECT * FROM reviews WHERE id = $1")
            .bind(id as i32)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::ImplementationError { source: e.into() })?;

        Ok(row.map(Into::into))
    }

    #[tracing::instrument(skip_all, fields(repository_id), ret)]
    async fn reviews_list_for_repository(&self, repository_id: u64) -> Result<Vec<Review>> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            "SELECT * FROM reviews WHERE repository_id = $1 ORDER BY id",
        )
        .bind(repository_id as i32)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::ImplementationError { source: e.into() })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[tracing::instrument(skip_all, ret)]
    async fn reviews_all(&self) -> Result<Vec<Review>> {
        let rows = sqlx::query_as::<_, ReviewRow>("SELECT * FROM reviews ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DatabaseError::ImplementationError { source: e.into() })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[tracing::instrument(skip_all, fields(repository_id, pr_number, status = %status), ret)]
    async fn reviews_set_status(
        &self,
        repository_id: u64,
        pr_number: u64,
        status: ReviewStatus,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE reviews
            SET status = $3
            WHERE repository_id = $1 AND pr_number = $2 AND status = ANY($4)
            "#,
        )
        .bind(repository_id as i32)
        .bind(pr_number as i32)
        .bind(status.to_str())
        .bind(transition_sources(status))
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::ImplementationError { source: e.into() })?;

        Ok(result.rows_affected())
    }

    #[tracing::instrument(skip_all, fields(repository_id, pr_number, issues_found), ret)]
    async fn reviews_set_completed(
        &self,
        repository_id: u64,
        pr_number: u64,
        summary: &str,
        issues_found: u32,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE reviews
            SET status = $3, summary = $4, issues_found = $5, completed_at = now()
            WHERE repository_id = $1 AND pr_number = $2 AND status = ANY($6)
            "#,
        )
        .bind(repository_id as i32)
        .bind(pr_number as i32)
        .bind(ReviewStatus::Completed.to_str())
        .bind(summary)
        .bind(issues_found as i32)
        .bind(transition_sources(ReviewStatus::Completed))
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::ImplementationError { source: e.into() })?;

        Ok(result.rows_affected())
    }

    #[tracing::instrument(skip_all, fields(user_id = instance.user_id), ret)]
    async fn review_rules_create(&self, instance: ReviewRule) -> Result<ReviewRule> {
        let row = sqlx::query_as::<_, ReviewRuleRow>(
            r#"
            INSERT INTO review_rules (user_id, rule, is_active)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(instance.user_id as i32)
        .bind(&instance.rule)
        .bind(instance.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::ImplementationError { source: e.into() })?;

        Ok(row.into())
    }

    #[tracing::instrument(skip_all, fields(user_id), ret)]
    async fn review_rules_list_active(&self, user_id: u64) -> Result<Vec<ReviewRule>> {
        let rows = sqlx::query_as::<_, ReviewRuleRow>(
            "SELECT * FROM review_rules WHERE user_id = $1 AND is_active = true ORDER BY id",
        )
        .bind(user_id as i32)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::ImplementationError { source: e.into() })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[tracing::instrument(skip_all, fields(id), ret)]
    async fn review_rules_delete(&self, id: u64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM review_rules WHERE id = $1")
            .bind(id as i32)
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::ImplementationError { source: e.into() })?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip_all, fields(repository_id = instance.repository_id, file_path = instance.file_path))]
    async fn embedding_chunks_create(&self, instance: EmbeddingChunk) -> Result<EmbeddingChunk> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO embedding_chunks (repository_id, file_path, content, embedding)
            VALUES ($1, $2, $3, $4::vector)
            RETURNING id
            "#,
        )
        .bind(instance.repository_id as i32)
        .bind(&instance.file_path)
        .bind(&instance.content)
        .bind(vector_literal(&instance.embedding))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::ImplementationError { source: e.into() })?;

        Ok(EmbeddingChunk {
            id: id as u64,
            ..instance
        })
    }

    #[tracing::instrument(skip_all, fields(repository_id), ret)]
    async fn embedding_chunks_delete_for_repository(&self, repository_id: u64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM embedding_chunks WHERE repository_id = $1")
            .bind(repository_id as i32)
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::ImplementationError { source: e.into() })?;

        Ok(result.rows_affected())
    }

    #[tracing::instrument(skip_all, fields(repository_id, limit))]
    async fn embedding_chunks_search(
        &self,
        repository_id: u64,
        embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<SimilarChunk>> {
        let rows = sqlx::query_as::<_, SimilarChunkRow>(
            r#"
            SELECT file_path, content, (embedding <=> $2::vector)::float4 AS distance
            FROM embedding_chunks
            WHERE repository_id = $1
            ORDER BY embedding <=> $2::vector
            LIMIT $3
            "#,
        )
        .bind(repository_id as i32)
        .bind(vector_literal(embedding))
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::ImplementationError { source: e.into() })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1;")
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::ImplementationError { source: e.into() })?;

        Ok(())
    }
}
