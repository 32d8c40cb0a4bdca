use revbot_models::{QueueLane, ReviewJob};
use serde::{Deserialize, Serialize};

/// Per-lane retry and retention tuning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneConfig {
    /// Total attempts before a job is parked as failed.
    pub max_attempts: u32,
    /// Base delay for exponential backoff (in milliseconds).
    pub backoff_base_delay: u64,
    /// Completed job history size.
    pub keep_completed: usize,
    /// Failed job history size.
    pub keep_failed: usize,
}

impl LaneConfig {
    /// Backoff delay before the given retry, doubling per attempt already made.
    pub fn backoff_delay(&self, attempts_made: u32) -> u64 {
        self.backoff_base_delay * 2u64.pow(attempts_made.saturating_sub(1))
    }
}

/// Job handed to a worker, tagged with its delivery state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedJob {
    /// Queue-assigned job ID.
    pub id: u64,
    /// Lane the job was enqueued on.
    pub lane: QueueLane,
    /// Attempts already consumed, including the current one.
    pub attempts_made: u32,
    /// Job payload.
    pub data: ReviewJob,
}

#[cfg(test)]
mod tests {
    use super::LaneConfig;

    #[test]
    fn backoff_doubles_per_attempt() {
        let config = LaneConfig {
            max_attempts: 3,
            backoff_base_delay: 30_000,
            keep_completed: 50,
            keep_failed: 20,
        };

        assert_eq!(config.backoff_delay(1), 30_000);
        assert_eq!(config.backoff_delay(2), 60_000);
        assert_eq!(config.backoff_delay(3), 120_000);
    }
}
