use async_trait::async_trait;
use revbot_models::{QueueLane, ReviewJob};

use crate::{QueuedJob, Result};

/// Durable two-lane job queue.
///
/// Delivery is at-least-once: a job handed out by [`reserve`](Self::reserve)
/// stays owned by its worker until acknowledged through
/// [`mark_completed`](Self::mark_completed) or [`mark_failed`](Self::mark_failed).
#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait QueueService: Send + Sync {
    /// Appends a job to the lane, returning its queue-assigned ID.
    async fn enqueue(&self, lane: QueueLane, job: &ReviewJob) -> Result<u64>;

    /// Pops the next ready job on the lane, promoting due delayed jobs first.
    ///
    /// The job is held on a per-lane processing list until acknowledged, so
    /// a worker crash leaves it recoverable through [`reclaim`](Self::reclaim).
    /// Returns `None` when the lane has nothing ready.
    async fn reserve(&self, lane: QueueLane) -> Result<Option<QueuedJob>>;

    /// Acknowledges a job as done and records it in the completed history.
    async fn mark_completed(&self, job: &QueuedJob) -> Result<()>;

    /// Reschedules the job with exponential backoff while attempts remain,
    /// otherwise parks it in the failed history.
    async fn mark_failed(&self, job: &QueuedJob, reason: &str) -> Result<()>;

    /// Moves jobs still held by a dead worker back onto the ready list.
    ///
    /// Called on worker startup, before polling. Returns the number of
    /// reclaimed jobs.
    async fn reclaim(&self, lane: QueueLane) -> Result<u64>;

    /// Checks service health.
    async fn health_check(&self) -> Result<()>;
}
