use std::{collections::HashMap, sync::RwLock};

use async_trait::async_trait;
use revbot_database_interface::{DbService, Result, SimilarChunk};
use revbot_models::{EmbeddingChunk, Repository, Review, ReviewRule, ReviewStatus, User};

#[derive(Debug, Default)]
pub struct MemoryDb {
    users: RwLock<HashMap<u64, User>>,
    repositories: RwLock<HashMap<u64, Repository>>,
    reviews: RwLock<HashMap<u64, Review>>,
    review_rules: RwLock<HashMap<u64, ReviewRule>>,
    embedding_chunks: RwLock<HashMap<u64, EmbeddingChunk>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Default::default()
    }

    fn get_last_user_id(&self) -> u64 {
        self.users.read().unwrap().keys().max().copied().unwrap_or(0) + 1
    }

    fn get_last_repository_id(&self) -> u64 {
        self.repositories
            .read()
            .unwrap()
            .keys()
            .max()
            .copied()
            .unwrap_or(0)
            + 1
    }

    fn get_last_review_id(&self) -> u64 {
        self.reviews
            .read()
            .unwrap()
            .keys()
            .max()
            .copied()
            .unwrap_or(0)
            + 1
    }

    fn get_last_review_rule_id(&self) -> u64 {
        self.review_rules
            .read()
            .unwrap()
            .keys()
            .max()
            .copied()
            .unwrap_or(0)
            + 1
    }

    fn get_last_embedding_chunk_id(&self) -> u64 {
        self.embedding_chunks
            .read()
            .unwrap()
            .keys()
            .max()
            .copied()
            .unwrap_or(0)
            + 1
    }
}

/// Cosine distance (`1 - cosine similarity`), matching the pgvector `<=>`
/// operator used by the Postgres implementation.
fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }

    1.0 - dot / (norm_a * norm_b)
}

#[async_trait]
impl DbService for MemoryDb {
    async fn users_create(&self, mut instance: User) -> Result<User> {
        instance.id = self.get_last_user_id();
        self.users
            .write()
            .unwrap()
            .insert(instance.id, instance.clone());
        Ok(instance)
    }

    async fn users_update(&self, instance: User) -> Result<User> {
        self.users
            .write()
            .unwrap()
            .insert(instance.id, instance.clone());
        Ok(instance)
    }

    async fn users_get(&self, id: u64) -> Result<Option<User>> {
        Ok(self.users.read().unwrap().get(&id).cloned())
    }

    async fn users_all(&self) -> Result<Vec<User>> {
        let mut values: Vec<_> = self.users.read().unwrap().values().cloned().collect();
        values.sort_by_key(|u| u.id);
        Ok(values)
    }

    async fn users_increment_reviews_used(&self, id: u64) -> Result<User> {
        let mut users = self.users.write().unwrap();
        let user = users
            .get_mut(&id)
            .ok_or(revbot_database_interface::DatabaseError::UnknownUser(id))?;
        user.reviews_used += 1;
        Ok(user.clone())
    }

    async fn repositories_create(&self, mut instance: Repository) -> Result<Repository> {
        instance.id = self.get_last_repository_id();
        self.repositories
            .write()
            .unwrap()
            .insert(instance.id, instance.clone());
        Ok(instance)
    }

    async fn repositories_update(&self, instance: Repository) -> Result<Repository> {
        self.repositories
            .write()
            .unwrap()
            .insert(instance.id, instance.clone());
        Ok(instance)
    }

    async fn repositories_get(&self, id: u64) -> Result<Option<Repository>> {
        Ok(self.repositories.read().unwrap().get(&id).cloned())
    }

    async fn repositories_get_from_full_name(
        &self,
        full_name: &str,
    ) -> Result<Option<Repository>> {
        Ok(self
            .repositories
            .read()
            .unwrap()
            .values()
            .find(|r| r.full_name == full_name)
            .cloned())
    }

    async fn repositories_all(&self) -> Result<Vec<Repository>> {
        let mut values: Vec<_> = self
            .repositories
            .read()
            .unwrap()
            .values()
            .cloned()
            .collect();
        values.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(values)
    }

    async fn repositories_delete(&self, id: u64) -> Result<bool> {
        if self.repositories.write().unwrap().remove(&id).is_some() {
            self.reviews
                .write()
                .unwrap()
                .retain(|_, r| r.repository_id != id);
            self.embedding_chunks
                .write()
                .unwrap()
                .retain(|_, c| c.repository_id != id);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn reviews_create(&self, mut instance: Review) -> Result<Review> {
        instance.id = self.get_last_review_id();
        self.reviews
            .write()
            .unwrap()
            .insert(instance.id, instance.clone());
        Ok(instance)
    }

    async fn reviews_get(&self, id: u64) -> Result<Option<Review>> {
        Ok(self.reviews.read().unwrap().get(&id).cloned())
    }

    async fn reviews_list_for_repository(&self, repository_id: u64) -> Result<Vec<Review>> {
        let mut values: Vec<_> = self
            .reviews
            .read()
            .unwrap()
            .values()
            .filter(|r| r.repository_id == repository_id)
            .cloned()
            .collect();
        values.sort_by_key(|r| r.id);
        Ok(values)
    }

    async fn reviews_all(&self) -> Result<Vec<Review>> {
        let mut values: Vec<_> = self.reviews.read().unwrap().values().cloned().collect();
        values.sort_by_key(|r| r.id);
        Ok(values)
    }

    async fn reviews_set_status(
        &self,
        repository_id: u64,
        pr_number: u64,
        status: ReviewStatus,
    ) -> Result<u64> {
        let mut count = 0;
        for review in self.reviews.write().unwrap().values_mut() {
            if review.repository_id == repository_id
                && review.pr_number == pr_number
                && review.status.can_transition_to(status)
            {
                review.status = status;
                count += 1;
            }
        }
        Ok(count)
    }

    async fn reviews_set_completed(
        &self,
        repository_id: u64,
        pr_number: u64,
        summary: &str,
        issues_found: u32,
    ) -> Result<u64> {
        let mut count = 0;
        for review in self.reviews.write().unwrap().values_mut() {
            if review.repository_id == repository_id
                && review.pr_number == pr_number
                && review.status.can_transition_to(ReviewStatus::Completed)
            {
                review.status = ReviewStatus::Completed;
                review.summary = Some(summary.to_string());
                review.issues_found = issues_found;
                review.completed_at = Some(time::OffsetDateTime::now_utc());
                count += 1;
            }
        }
        Ok(count)
    }

    async fn review_rules_create(&self, mut instance: ReviewRule) -> Result<ReviewRule> {
        instance.id = self.get_last_review_rule_id();
        self.review_rules
            .write()
            .unwrap()
            .insert(instance.id, instance.clone());
        Ok(instance)
    }

    async fn review_rules_list_active(&self, user_id: u64) -> Result<Vec<ReviewRule>> {
        let mut values: Vec<_> = self
            .review_rules
            .read()
            .unwrap()
            .values()
            .filter(|r| r.user_id == user_id && r.is_active)
            .cloned()
            .collect();
        values.sort_by_key(|r| r.id);
        Ok(values)
    }

    async fn review_rules_delete(&self, id: u64) -> Result<bool> {
        Ok(self.review_rules.write().unwrap().remove(&id).is_some())
    }

    async fn embedding_chunks_create(&self, mut instance: EmbeddingChunk) -> Result<EmbeddingChunk> {
        instance.id = self.get_last_embedding_chunk_id();
        self.embedding_chunks
            .write()
            .unwrap()
            .insert(instance.id, instance.clone());
        Ok(instance)
    }

    async fn embedding_chunks_delete_for_repository(&self, repository_id: u64) -> Result<u64> {
        let mut chunks = self.embedding_chunks.write().unwrap();
        let before = chunks.len();
        chunks.retain(|_, c| c.repository_id != repository_id);
        Ok((before - chunks.len()) as u64)
    }

    async fn embedding_chunks_search(
        &self,
        repository_id: u64,
        embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<SimilarChunk>> {
        let mut matches: Vec<SimilarChunk> = self
            .embedding_chunks
            .read()
            .unwrap()
            .values()
            .filter(|c| c.repository_id == repository_id && !c.embedding.is_empty())
            .map(|c| SimilarChunk {
                file_path: c.file_path.clone(),
                content: c.content.clone(),
                distance: cosine_distance(&c.embedding, embedding),
            })
            .collect();
        matches.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        matches.truncate(limit);
        Ok(matches)
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
