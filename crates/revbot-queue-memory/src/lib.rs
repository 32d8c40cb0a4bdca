use std::{
    collections::{HashMap, VecDeque},
    sync::{
        atomic::{AtomicU64, Ordering},
        RwLock,
    },
    time::{Duration, Instant},
};

use async_trait::async_trait;
use revbot_models::{QueueLane, ReviewJob};
use revbot_queue_interface::{LaneConfig, QueueService, QueuedJob, Result};

#[derive(Debug, Default)]
struct LaneState {
    ready: VecDeque<QueuedJob>,
    // Reserved jobs, pending acknowledgement.
    processing: Vec<QueuedJob>,
    delayed: Vec<(Instant, QueuedJob)>,
    completed: VecDeque<u64>,
    failed: VecDeque<(u64, String)>,
}

/// In-memory queue, a stand-in for the Redis adapter.
pub struct MemoryQueue {
    counter: AtomicU64,
    lanes: HashMap<QueueLane, RwLock<LaneState>>,
    configs: HashMap<QueueLane, LaneConfig>,
}

impl Default for MemoryQueue {
    fn default() -> Self {
        Self::new(
            [
                (
                    QueueLane::Free,
                    LaneConfig {
                        max_attempts: 2,
                        backoff_base_delay: 30_000,
                        keep_completed: 50,
                        keep_failed: 20,
                    },
                ),
                (
                    QueueLane::Pro,
                    LaneConfig {
                        max_attempts: 2,
                        backoff_base_delay: 60_000,
                        keep_completed: 100,
                        keep_failed: 50,
                    },
                ),
            ]
            .into(),
        )
    }
}

impl MemoryQueue {
    pub fn new(configs: HashMap<QueueLane, LaneConfig>) -> Self {
        let lanes = QueueLane::all()
            .iter()
            .map(|lane| (*lane, RwLock::new(LaneState::default())))
            .collect();

        Self {
            counter: AtomicU64::new(0),
            lanes,
            configs,
        }
    }

    pub fn ready_len(&self, lane: QueueLane) -> usize {
        self.lanes[&lane].read().unwrap().ready.len()
    }

    pub fn delayed_len(&self, lane: QueueLane) -> usize {
        self.lanes[&lane].read().unwrap().delayed.len()
    }

    pub fn processing_len(&self, lane: QueueLane) -> usize {
        self.lanes[&lane].read().unwrap().processing.len()
    }

    pub fn completed_ids(&self, lane: QueueLane) -> Vec<u64> {
        self.lanes[&lane]
            .read()
            .unwrap()
            .completed
            .iter()
            .copied()
            .collect()
    }

    pub fn failed_jobs(&self, lane: QueueLane) -> Vec<(u64, String)> {
        self.lanes[&lane]
            .read()
            .unwrap()
            .failed
            .iter()
            .cloned()
            .collect()
    }
}

#[async_trait]
impl QueueService for MemoryQueue {
    async fn enqueue(&self, lane: QueueLane, job: &ReviewJob) -> Result<u64> {
        let id = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let mut state = self.lanes[&lane].write().unwrap();
        state.ready.push_back(QueuedJob {
            id,
            lane,
            attempts_made: 0,
            data: job.clone(),
        });

        Ok(id)
    }

    async fn reserve(&self, lane: QueueLane) -> Result<Option<QueuedJob>> {
        let mut state = self.lanes[&lane].write().unwrap();
        let now = Instant::now();

        // Promote due delayed jobs, earliest due first.
        state.delayed.sort_by_key(|(due_at, _)| *due_at);
        while let Some((due_at, _)) = state.delayed.first() {
            if *due_at > now {
                break;
            }

            let (_, job) = state.delayed.remove(0);
            state.ready.push_back(job);
        }

        match state.ready.pop_front() {
            Some(job) => {
                state.processing.push(job.clone());
                Ok(Some(QueuedJob {
                    attempts_made: job.attempts_made + 1,
                    ..job
                }))
            }
            None => Ok(None),
        }
    }

    async fn mark_completed(&self, job: &QueuedJob) -> Result<()> {
        let config = &self.configs[&job.lane];
        let mut state = self.lanes[&job.lane].write().unwrap();
        state.processing.retain(|held| held.id != job.id);
        state.completed.push_back(job.id);
        while state.completed.len() > config.keep_completed {
            state.completed.pop_front();
        }

        Ok(())
    }

    async fn mark_failed(&self, job: &QueuedJob, reason: &str) -> Result<()> {
        let config = &self.configs[&job.lane];
        let mut state = self.lanes[&job.lane].write().unwrap();
        state.processing.retain(|held| held.id != job.id);

        if job.attempts_made < config.max_attempts {
            let delay = Duration::from_millis(config.backoff_delay(job.attempts_made));
            state.delayed.push((Instant::now() + delay, job.clone()));
        } else {
            state.failed.push_back((job.id, reason.to_string()));
            while state.failed.len() > config.keep_failed {
                state.failed.pop_front();
            }
        }

        Ok(())
    }

    async fn reclaim(&self, lane: QueueLane) -> Result<u64> {
        let mut state = self.lanes[&lane].write().unwrap();
        let mut reclaimed = 0;

        // Oldest reservation first, ahead of jobs enqueued since.
        while let Some(job) = state.processing.pop() {
            state.ready.push_front(job);
            reclaimed += 1;
        }

        Ok(reclaimed)
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
