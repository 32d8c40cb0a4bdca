//! Domain models.

mod embedding_chunk;
mod plan_tier;
mod queue_lane;
mod repository;
mod review;
mod review_job;
mod review_rule;
mod review_status;
mod review_type;
mod user;

pub use embedding_chunk::EmbeddingChunk;
pub use plan_tier::{PlanTier, PlanTierError};
pub use queue_lane::{QueueLane, QueueLaneError};
pub use repository::Repository;
pub use review::Review;
pub use review_job::ReviewJob;
pub use review_rule::ReviewRule;
pub use review_status::{ReviewStatus, ReviewStatusError};
pub use review_type::{ReviewType, ReviewTypeError};
pub use user::User;
