use async_trait::async_trait;
use revbot_models::{EmbeddingChunk, Repository, Review, ReviewRule, ReviewStatus, User};

use crate::{DatabaseError, Result};

/// Embedding chunk matched by a similarity search, closest first.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarChunk {
    pub file_path: String,
    pub content: String,
    /// Cosine distance to the query vector.
    pub distance: f32,
}

#[async_trait]
pub trait DbService: Send + Sync {
    async fn users_create(&self, instance: User) -> Result<User>;
    async fn users_update(&self, instance: User) -> Result<User>;
    async fn users_get(&self, id: u64) -> Result<Option<User>>;
    async fn users_get_expect(&self, id: u64) -> Result<User> {
        self.users_get(id)
            .await?
            .ok_or(DatabaseError::UnknownUser(id))
    }
    async fn users_all(&self) -> Result<Vec<User>>;
    /// Single-row atomic `reviews_used = reviews_used + 1`.
    ///
    /// The admission read happens separately, so concurrent deliveries for
    /// one user can overshoot the limit slightly. Known race, kept as-is.
    async fn users_increment_reviews_used(&self, id: u64) -> Result<User>;

    async fn repositories_create(&self, instance: Repository) -> Result<Repository>;
    async fn repositories_update(&self, instance: Repository) -> Result<Repository>;
    async fn repositories_get(&self, id: u64) -> Result<Option<Repository>>;
    async fn repositories_get_from_full_name(&self, full_name: &str)
        -> Result<Option<Repository>>;
    async fn repositories_get_from_full_name_expect(&self, full_name: &str) -> Result<Repository> {
        self.repositories_get_from_full_name(full_name)
            .await?
            .ok_or_else(|| DatabaseError::UnknownRepository(full_name.into()))
    }
    async fn repositories_all(&self) -> Result<Vec<Repository>>;
    /// Deletes a repository and cascades its reviews and embedding chunks.
    async fn repositories_delete(&self, id: u64) -> Result<bool>;

    async fn reviews_create(&self, instance: Review) -> Result<Review>;
    async fn reviews_get(&self, id: u64) -> Result<Option<Review>>;
    async fn reviews_get_expect(&self, id: u64) -> Result<Review> {
        self.reviews_get(id)
            .await?
            .ok_or(DatabaseError::UnknownReview(id))
    }
    async fn reviews_list_for_repository(&self, repository_id: u64) -> Result<Vec<Review>>;
    async fn reviews_all(&self) -> Result<Vec<Review>>;
    /// Sets the status of every review for a pull request, returning the
    /// number of affected rows.
    async fn reviews_set_status(
        &self,
        repository_id: u64,
        pr_number: u64,
        status: ReviewStatus,
    ) -> Result<u64>;
    /// Marks reviews for a pull request completed with their result.
    async fn reviews_set_completed(
        &self,
        repository_id: u64,
        pr_number: u64,
        summary: &str,
        issues_found: u32,
    ) -> Result<u64>;

    async fn review_rules_create(&self, instance: ReviewRule) -> Result<ReviewRule>;
    async fn review_rules_list_active(&self, user_id: u64) -> Result<Vec<ReviewRule>>;
    async fn review_rules_delete(&self, id: u64) -> Result<bool>;

    async fn embedding_chunks_create(&self, instance: EmbeddingChunk) -> Result<EmbeddingChunk>;
    async fn embedding_chunks_delete_for_repository(&self, repository_id: u64) -> Result<u64>;
    /// Nearest chunks by cosine distance to the query vector.
    async fn embedding_chunks_search(
        &self,
        repository_id: u64,
        embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<SimilarChunk>>;

    async fn health_check(&self) -> Result<()>;
}
