//! Queue wrappers.

use std::collections::HashMap;

use async_trait::async_trait;
use revbot_models::{QueueLane, ReviewJob};
use revbot_queue_interface::{LaneConfig, QueueService, QueuedJob, Result};
use revbot_queue_redis::RedisQueueService;

use crate::metrics::QUEUE_CALLS;

/// Queue service with metrics.
pub struct MetricsQueueService {
    inner: RedisQueueService,
}

impl MetricsQueueService {
    /// Creates a new service.
    pub fn new(addr: &str, configs: HashMap<QueueLane, LaneConfig>) -> Self {
        Self {
            inner: RedisQueueService::new(addr, configs),
        }
    }
}

#[async_trait]
impl QueueService for MetricsQueueService {
    async fn enqueue(&self, lane: QueueLane, job: &ReviewJob) -> Result<u64> {
        QUEUE_CALLS.inc();
        self.inner.enqueue(lane, job).await
    }

    async fn reserve(&self, lane: QueueLane) -> Result<Option<QueuedJob>> {
        QUEUE_CALLS.inc();
        self.inner.reserve(lane).await
    }

    async fn mark_completed(&self, job: &QueuedJob) -> Result<()> {
        QUEUE_CALLS.inc();
        self.inner.mark_completed(job).await
    }

    async fn mark_failed(&self, job: &QueuedJob, reason: &str) -> Result<()> {
        QUEUE_CALLS.inc();
        self.inner.mark_failed(job, reason).await
    }

    async fn reclaim(&self, lane: QueueLane) -> Result<u64> {
        QUEUE_CALLS.inc();
        self.inner.reclaim(lane).await
    }

    async fn health_check(&self) -> Result<()> {
        QUEUE_CALLS.inc();
        self.inner.health_check().await
    }
}
