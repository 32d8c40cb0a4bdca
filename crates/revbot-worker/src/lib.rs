//! Lane-bound worker pools.

#![warn(clippy::all)]

use std::{sync::Arc, time::Duration};

use revbot_config::{Config, LaneTuning};
use revbot_core::{use_cases::reviews::ProcessReviewJobInterface, CoreContext, CoreModule};
use revbot_database_interface::DbService;
use revbot_ghapi_interface::ApiService;
use revbot_llm_interface::LlmService;
use revbot_models::{QueueLane, ReviewStatus};
use revbot_queue_interface::{QueueService, QueuedJob};
use shaku::HasComponent;
use tokio::sync::Semaphore;
use tracing::{info, warn};

/// Shared state for the worker pools.
pub struct WorkerContext {
    /// Config.
    pub config: Config,
    /// Core module.
    pub core_module: CoreModule,
    /// Database adapter.
    pub db_service: Arc<dyn DbService>,
    /// API adapter.
    pub api_service: Arc<dyn ApiService>,
    /// Queue adapter.
    pub queue_service: Arc<dyn QueueService>,
    /// LLM adapter.
    pub llm_service: Arc<dyn LlmService>,
}

impl WorkerContext {
    /// Convert the context for the core module.
    pub fn as_core_context(&self) -> CoreContext {
        CoreContext {
            config: &self.config,
            core_module: &self.core_module,
            api_service: self.api_service.as_ref(),
            db_service: self.db_service.as_ref(),
            queue_service: self.queue_service.as_ref(),
            llm_service: self.llm_service.as_ref(),
        }
    }
}

fn lane_tuning(config: &Config, lane: QueueLane) -> &LaneTuning {
    match lane {
        QueueLane::Free => &config.queue.free_lane,
        QueueLane::Pro => &config.queue.pro_lane,
    }
}

/// Run one pool per lane until the process stops.
pub async fn run_worker_pools(ctx: Arc<WorkerContext>) {
    let mut handles = vec![];
    for lane in QueueLane::all() {
        handles.push(tokio::spawn(run_lane_pool(ctx.clone(), lane)));
    }

    for handle in handles {
        let _ = handle.await;
    }
}

/// Poll one lane forever, running up to `concurrency` jobs at a time.
pub async fn run_lane_pool(ctx: Arc<WorkerContext>, lane: QueueLane) {
    let tuning = lane_tuning(&ctx.config, lane);
    let concurrency = tuning.concurrency;
    let drain_delay = Duration::from_millis(tuning.drain_delay);
    let semaphore = Arc::new(Semaphore::new(concurrency));

    info!(
        lane = %lane,
        concurrency,
        message = "Starting worker pool"
    );

    // Jobs reserved by a previous process that died mid-run.
    match ctx.queue_service.reclaim(lane).await {
        Ok(reclaimed) if reclaimed > 0 => {
            info!(lane = %lane, reclaimed, message = "Reclaimed in-flight jobs");
        }
        Ok(_) => {}
        Err(e) => {
            warn!(lane = %lane, error = %e, message = "Could not reclaim in-flight jobs");
        }
    }

    loop {
        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            break;
        };

        match ctx.queue_service.reserve(lane).await {
            Ok(Some(job)) => {
                let ctx = ctx.clone();
                tokio::spawn(async move {
                    handle_job(&ctx, &job).await;
                    drop(permit);
                });
            }
            Ok(None) => {
                drop(permit);
                tokio::time::sleep(drain_delay).await;
            }
            Err(e) => {
                drop(permit);
                warn!(lane = %lane, error = %e, message = "Could not reserve a job");
                tokio::time::sleep(drain_delay).await;
            }
        }
    }
}

/// Run one reserved job and acknowledge it.
///
/// A failing job is acknowledged too: the review is marked `failed` and the
/// error stops here, because a broker redelivery would re-run the billed
/// LLM calls. Retries are disabled.
pub async fn handle_job(ctx: &WorkerContext, job: &QueuedJob) {
    let core_ctx = ctx.as_core_context();
    let process_review_job: &dyn ProcessReviewJobInterface = core_ctx.core_module.resolve_ref();

    if let Err(e) = process_review_job.run(&core_ctx, &job.data).await {
        warn!(
            job_id = job.id,
            repo_path = job.data.repo_full_name,
            pr_number = job.data.pr_number,
            error = %e,
            message = "Review job failed"
        );

        if let Err(e) = ctx
            .db_service
            .reviews_set_status(job.data.repo_id, job.data.pr_number, ReviewStatus::Failed)
            .await
        {
            warn!(job_id = job.id, error = %e, message = "Could not mark review as failed");
        }
    }

    if let Err(e) = ctx.queue_service.mark_completed(job).await {
        warn!(job_id = job.id, error = %e, message = "Could not acknowledge job");
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use revbot_core::{
        use_cases::reviews::MockProcessReviewJobInterface, DomainError,
    };
    use revbot_database_memory::MemoryDb;
    use revbot_ghapi_interface::MockApiService;
    use revbot_llm_interface::MockLlmService;
    use revbot_models::{PlanTier, Repository, Review, ReviewJob, User};
    use revbot_queue_memory::MemoryQueue;

    use super::*;

    fn worker_context(core_module: CoreModule) -> (Arc<WorkerContext>, Arc<MemoryQueue>) {
        let mut config = Config::from_env_no_version();
        config.queue.free_lane.drain_delay = 10;
        config.queue.pro_lane.drain_delay = 10;

        let queue = Arc::new(MemoryQueue::default());
        let ctx = Arc::new(WorkerContext {
            config,
            core_module,
            db_service: Arc::new(MemoryDb::new()),
            api_service: Arc::new(MockApiService::new()),
            queue_service: queue.clone(),
            llm_service: Arc::new(MockLlmService::new()),
        });

        (ctx, queue)
    }

    fn module_with_process(
        mock: MockProcessReviewJobInterface,
    ) -> CoreModule {
        use revbot_core::use_cases::reviews::ProcessReviewJobInterface;

        CoreModule::builder()
            .with_component_override::<dyn ProcessReviewJobInterface>(Box::new(mock))
            .build()
    }

    async fn seed_review(ctx: &WorkerContext) -> ReviewJob {
        let user = ctx
            .db_service
            .users_create(User {
                username: "me".into(),
                plan: PlanTier::Free,
                ..Default::default()
            })
            .await
            .unwrap();
        let repository = ctx
            .db_service
            .repositories_create(Repository {
                user_id: user.id,
                full_name: "me/repo".into(),
                is_active: true,
                ..Default::default()
            })
            .await
            .unwrap();
        ctx.db_service
            .reviews_create(Review {
                repository_id: repository.id,
                user_id: user.id,
                pr_number: 1,
                status: ReviewStatus::Queued,
                ..Default::default()
            })
            .await
            .unwrap();

        ReviewJob {
            repo_id: repository.id,
            user_id: user.id,
            pr_number: 1,
            repo_full_name: "me/repo".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn successful_jobs_are_acknowledged() {
        let mut mock = MockProcessReviewJobInterface::new();
        mock.expect_run().once().returning(|_, _| Ok(()));
        let (ctx, queue) = worker_context(module_with_process(mock));

        let job = seed_review(&ctx).await;
        let id = ctx.queue_service.enqueue(QueueLane::Free, &job).await.unwrap();
        let queued = ctx
            .queue_service
            .reserve(QueueLane::Free)
            .await
            .unwrap()
            .unwrap();

        handle_job(&ctx, &queued).await;

        assert_eq!(queue.completed_ids(QueueLane::Free), vec![id]);
    }

    #[tokio::test]
    async fn failed_jobs_mark_the_review_failed_and_still_complete() {
        let mut mock = MockProcessReviewJobInterface::new();
        mock.expect_run().once().returning(|_, job| {
            Err(DomainError::MissingAccessToken {
                user_id: job.user_id,
            })
        });
        let (ctx, queue) = worker_context(module_with_process(mock));

        let job = seed_review(&ctx).await;
        let id = ctx.queue_service.enqueue(QueueLane::Free, &job).await.unwrap();
        let queued = ctx
            .queue_service
            .reserve(QueueLane::Free)
            .await
            .unwrap()
            .unwrap();

        // The real handler moves the review to processing before failing.
        ctx.db_service
            .reviews_set_status(job.repo_id, job.pr_number, ReviewStatus::Processing)
            .await
            .unwrap();

        handle_job(&ctx, &queued).await;

        let review = ctx
            .db_service
            .reviews_list_for_repository(job.repo_id)
            .await
            .unwrap()
            .remove(0);
        assert_eq!(review.status, ReviewStatus::Failed);

        assert_eq!(queue.completed_ids(QueueLane::Free), vec![id]);
        assert!(queue.failed_jobs(QueueLane::Free).is_empty());
    }

    #[tokio::test]
    async fn lane_pool_drains_queued_jobs() {
        let mut mock = MockProcessReviewJobInterface::new();
        mock.expect_run().times(3).returning(|_, _| Ok(()));
        let (ctx, queue) = worker_context(module_with_process(mock));

        let job = seed_review(&ctx).await;
        for _ in 0..3 {
            ctx.queue_service.enqueue(QueueLane::Free, &job).await.unwrap();
        }

        let pool = tokio::spawn(run_lane_pool(ctx.clone(), QueueLane::Free));
        tokio::time::sleep(Duration::from_millis(200)).await;
        pool.abort();

        assert_eq!(queue.completed_ids(QueueLane::Free).len(), 3);
        assert_eq!(queue.ready_len(QueueLane::Free), 0);
    }

    #[tokio::test]
    async fn lane_pool_recovers_jobs_from_a_crashed_worker() {
        let mut mock = MockProcessReviewJobInterface::new();
        mock.expect_run().once().returning(|_, _| Ok(()));
        let (ctx, queue) = worker_context(module_with_process(mock));

        let job = seed_review(&ctx).await;
        let id = ctx.queue_service.enqueue(QueueLane::Free, &job).await.unwrap();

        // Reserved but never acknowledged, as left behind by a dead process.
        ctx.queue_service
            .reserve(QueueLane::Free)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(queue.processing_len(QueueLane::Free), 1);

        let pool = tokio::spawn(run_lane_pool(ctx.clone(), QueueLane::Free));
        tokio::time::sleep(Duration::from_millis(200)).await;
        pool.abort();

        assert_eq!(queue.completed_ids(QueueLane::Free), vec![id]);
        assert_eq!(queue.processing_len(QueueLane::Free), 0);
    }
}
