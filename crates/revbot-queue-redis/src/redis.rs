use std::{
    collections::HashMap,
    time::{SystemTime, UNIX_EPOCH},
};

use async_trait::async_trait;
use redis::{Client, Cmd, Value};
use revbot_models::{QueueLane, ReviewJob};
use revbot_queue_interface::{LaneConfig, QueueError, QueueService, QueuedJob, Result};
use serde::Serialize;

/// Redis queue service.
///
/// Each lane uses a ready list, a processing list holding reserved jobs, a
/// delayed sorted set scored by due time and two capped history lists.
#[derive(Clone)]
pub struct RedisQueueService {
    client: Client,
    configs: HashMap<QueueLane, LaneConfig>,
}

#[derive(Serialize)]
struct FailedRecord<'a> {
    job: &'a QueuedJob,
    reason: &'a str,
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

impl RedisQueueService {
    /// Creates a new redis adapter.
    pub fn new(addr: &str, configs: HashMap<QueueLane, LaneConfig>) -> Self {
        Self {
            client: Client::open(addr).unwrap_or_else(|_| panic!("Unsupported redis URL: {addr}")),
            configs,
        }
    }

    fn key(lane: QueueLane, suffix: &str) -> String {
        format!("revbot:queue:{}:{suffix}", lane.to_str())
    }

    async fn execute_command(&self, cmd: &Cmd) -> Result<Value> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| QueueError::ImplementationError { source: e.into() })?;

        cmd.query_async(&mut conn)
            .await
            .map_err(|e| QueueError::ImplementationError { source: e.into() })
    }

    /// Serializes the job as it sits on the processing list, before the
    /// attempt counter was bumped by [`QueueService::reserve`].
    fn stored_payload(job: &QueuedJob) -> Result<String> {
        serde_json::to_string(&QueuedJob {
            attempts_made: job.attempts_made.saturating_sub(1),
            ..job.clone()
        })
        .map_err(|e| QueueError::ImplementationError { source: e.into() })
    }

    /// Removes the reserved job from the lane's processing list.
    async fn acknowledge(&self, job: &QueuedJob) -> Result<()> {
        self.execute_command(
            redis::cmd("LREM")
                .arg(Self::key(job.lane, "processing"))
                .arg(1)
                .arg(Self::stored_payload(job)?),
        )
        .await?;

        Ok(())
    }

    /// Moves due jobs from the delayed set onto the ready list.
    async fn promote_due_jobs(&self, lane: QueueLane) -> Result<()> {
        let response = self
            .execute_command(
                redis::cmd("ZRANGEBYSCORE")
                    .arg(Self::key(lane, "delayed"))
                    .arg("-inf")
                    .arg(now_ms()),
            )
            .await?;

        let Value::Bulk(entries) = response else {
            return Ok(());
        };

        for entry in entries {
            if let Value::Data(payload) = entry {
                self.execute_command(
                    redis::cmd("ZREM")
                        .arg(Self::key(lane, "delayed"))
                        .arg(&payload),
                )
                .await?;
                self.execute_command(
                    redis::cmd("RPUSH")
                        .arg(Self::key(lane, "ready"))
                        .arg(&payload),
                )
                .await?;
            }
        }

        Ok(())
    }
}

#[async_trait]
impl QueueService for RedisQueueService {
    #[tracing::instrument(skip(self, job), fields(lane = %lane, pr_number = job.pr_number), ret)]
    async fn enqueue(&self, lane: QueueLane, job: &ReviewJob) -> Result<u64> {
        let response = self
            .execute_command(redis::cmd("INCR").arg(Self::key(lane, "id")))
            .await?;
        let id = match response {
            Value::Int(id) => id as u64,
            other => {
                return Err(QueueError::ImplementationError {
                    source: format!("Unsupported response: {other:?}").into(),
                })
            }
        };

        let payload = serde_json::to_string(&QueuedJob {
            id,
            lane,
            attempts_made: 0,
            data: job.clone(),
        })
        .map_err(|e| QueueError::ImplementationError { source: e.into() })?;

        self.execute_command(
            redis::cmd("RPUSH")
                .arg(Self::key(lane, "ready"))
                .arg(payload),
        )
        .await?;

        Ok(id)
    }

    #[tracing::instrument(skip(self), fields(lane = %lane))]
    async fn reserve(&self, lane: QueueLane) -> Result<Option<QueuedJob>> {
        self.promote_due_jobs(lane).await?;

        let response = self
            .execute_command(
                redis::cmd("LMOVE")
                    .arg(Self::key(lane, "ready"))
                    .arg(Self::key(lane, "processing"))
                    .arg("LEFT")
                    .arg("RIGHT"),
            )
            .await?;

        match response {
            Value::Nil => Ok(None),
            Value::Data(payload) => {
                let mut job: QueuedJob = serde_json::from_slice(&payload)
                    .map_err(|e| QueueError::InvalidJobPayload { source: e.into() })?;
                job.attempts_made += 1;
                Ok(Some(job))
            }
            other => Err(QueueError::ImplementationError {
                source: format!("Unsupported response: {other:?}").into(),
            }),
        }
    }

    #[tracing::instrument(skip(self, job), fields(id = job.id, lane = %job.lane))]
    async fn mark_completed(&self, job: &QueuedJob) -> Result<()> {
        let config = &self.configs[&job.lane];
        let payload = serde_json::to_string(job)
            .map_err(|e| QueueError::ImplementationError { source: e.into() })?;

        self.acknowledge(job).await?;

        self.execute_command(
            redis::cmd("LPUSH")
                .arg(Self::key(job.lane, "completed"))
                .arg(payload),
        )
        .await?;
        self.execute_command(
            redis::cmd("LTRIM")
                .arg(Self::key(job.lane, "completed"))
                .arg(0)
                .arg(config.keep_completed as i64 - 1),
        )
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self, job), fields(id = job.id, lane = %job.lane, attempts_made = job.attempts_made, reason))]
    async fn mark_failed(&self, job: &QueuedJob, reason: &str) -> Result<()> {
        let config = &self.configs[&job.lane];

        self.acknowledge(job).await?;

        if job.attempts_made < config.max_attempts {
            let due_at = now_ms() + config.backoff_delay(job.attempts_made);
            let payload = serde_json::to_string(job)
                .map_err(|e| QueueError::ImplementationError { source: e.into() })?;

            self.execute_command(
                redis::cmd("ZADD")
                    .arg(Self::key(job.lane, "delayed"))
                    .arg(due_at)
                    .arg(payload),
            )
            .await?;
        } else {
            let payload = serde_json::to_string(&FailedRecord { job, reason })
                .map_err(|e| QueueError::ImplementationError { source: e.into() })?;

            self.execute_command(
                redis::cmd("LPUSH")
                    .arg(Self::key(job.lane, "failed"))
                    .arg(payload),
            )
            .await?;
            self.execute_command(
                redis::cmd("LTRIM")
                    .arg(Self::key(job.lane, "failed"))
                    .arg(0)
                    .arg(config.keep_failed as i64 - 1),
            )
            .await?;
        }

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(lane = %lane), ret)]
    async fn reclaim(&self, lane: QueueLane) -> Result<u64> {
        let mut reclaimed = 0;

        loop {
            let response = self
                .execute_command(
                    redis::cmd("LMOVE")
                        .arg(Self::key(lane, "processing"))
                        .arg(Self::key(lane, "ready"))
                        .arg("RIGHT")
                        .arg("LEFT"),
                )
                .await?;

            match response {
                Value::Nil => break,
                Value::Data(_) => reclaimed += 1,
                other => {
                    return Err(QueueError::ImplementationError {
                        source: format!("Unsupported response: {other:?}").into(),
                    })
                }
            }
        }

        Ok(reclaimed)
    }

    #[tracing::instrument(skip(self))]
    async fn health_check(&self) -> Result<()> {
        self.execute_command(&redis::cmd("PING")).await?;
        Ok(())
    }
}
