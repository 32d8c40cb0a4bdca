use async_trait::async_trait;
use revbot_ghapi_interface::types::GhPullRequestEvent;
use revbot_models::{Review, ReviewJob, ReviewStatus};
use shaku::{Component, HasComponent, Interface};
use time::OffsetDateTime;
use tracing::info;

use crate::{use_cases::users::CheckQuotaInterface, CoreContext, Result};

#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait ProcessPullRequestEventInterface: Interface {
    /// Admits or drops one pull request event.
    ///
    /// Returns the created review, or `None` when the event is dropped.
    /// Review insert, quota increment and enqueue are deliberately not
    /// atomic; a crash in between leaves a review without a job.
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        event: GhPullRequestEvent,
    ) -> Result<Option<Review>>;
}

#[derive(Component)]
#[shaku(interface = ProcessPullRequestEventInterface)]
pub(crate) struct ProcessPullRequestEvent;

#[async_trait]
impl ProcessPullRequestEventInterface for ProcessPullRequestEvent {
    #[tracing::instrument(
        skip_all,
        fields(
            action = %event.action,
            pr_number = event.pull_request.number,
            repository_path = %event.repository.full_name,
            username = %event.pull_request.user.login
        )
    )]
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        event: GhPullRequestEvent,
    ) -> Result<Option<Review>> {
        if !event.action.triggers_review() {
            return Ok(None);
        }

        let repository = match ctx
            .db_service
            .repositories_get_from_full_name(&event.repository.full_name)
            .await?
        {
            Some(repository) if repository.is_active => repository,
            _ => {
                info!(
                    repository_path = %event.repository.full_name,
                    message = "Repository is not tracked, dropping event"
                );
                return Ok(None);
            }
        };

        let user = match ctx.db_service.users_get(repository.user_id).await? {
            Some(user) => user,
            None => {
                info!(
                    repository_path = %event.repository.full_name,
                    message = "Repository has no owner, dropping event"
                );
                return Ok(None);
            }
        };

        let check_quota: &dyn CheckQuotaInterface = ctx.core_module.resolve_ref();
        let decision = check_quota.run(ctx, &user).await?;
        if !decision.allowed {
            info!(
                user_id = user.id,
                reviews_used = user.reviews_used,
                reviews_limit = user.reviews_limit,
                message = "Review quota exhausted, dropping event"
            );
            return Ok(None);
        }

        let review = ctx
            .db_service
            .reviews_create(Review {
                repository_id: repository.id,
                user_id: user.id,
                pr_number: event.pull_request.number,
                pr_title: event.pull_request.title.clone(),
                status: ReviewStatus::Queued,
                review_type: decision.review_type,
                created_at: OffsetDateTime::now_utc(),
                ..Default::default()
            })
            .await?;

        ctx.db_service.users_increment_reviews_used(user.id).await?;

        let job_id = ctx
            .queue_service
            .enqueue(
                decision.lane,
                &ReviewJob {
                    repo_id: repository.id,
                    user_id: user.id,
                    pr_number: event.pull_request.number,
                    pr_title: event.pull_request.title,
                    repo_full_name: repository.full_name,
                    head_sha: event.pull_request.head.sha,
                    head_ref: event.pull_request.head.reference,
                    base_ref: event.pull_request.base.reference,
                    review_type: decision.review_type,
                    auto_fix_enabled: user.auto_fix_enabled,
                },
            )
            .await?;

        info!(
            review_id = review.id,
            job_id,
            lane = %decision.lane,
            message = "Review enqueued"
        );

        Ok(Some(review))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use revbot_database_interface::DbService;
    use revbot_ghapi_interface::types::{
        GhBranch, GhPullRequest, GhPullRequestAction, GhRepository, GhUser,
    };
    use revbot_models::{PlanTier, QueueLane, Repository, ReviewType, User};
    use revbot_queue_interface::QueueService;

    use super::*;
    use crate::context::tests::CoreContextTest;

    async fn seed_tracked_repository(ctx: &CoreContextTest, plan: PlanTier) -> (User, Repository) {
        let user = ctx
            .db_service
            .users_create(User {
                username: "me".into(),
                plan,
                reviews_limit: 30,
                github_access_token: Some("gh-token".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        let repository = ctx
            .db_service
            .repositories_create(Repository {
                user_id: user.id,
                full_name: "me/test".into(),
                is_active: true,
                ..Default::default()
            })
            .await
            .unwrap();

        (user, repository)
    }

    fn opened_event() -> GhPullRequestEvent {
        GhPullRequestEvent {
            action: GhPullRequestAction::Opened,
            pull_request: GhPullRequest {
                number: 1,
                title: "Add parser".into(),
                head: GhBranch {
                    reference: "feature/parser".into(),
                    sha: "abcdef".into(),
                    ..Default::default()
                },
                base: GhBranch {
                    reference: "main".into(),
                    sha: "123456".into(),
                    ..Default::default()
                },
                ..Default::default()
            },
            repository: GhRepository {
                full_name: "me/test".into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn admitted_event_creates_one_review_and_one_job() {
        let ctx = CoreContextTest::new();
        let (user, repository) = seed_tracked_repository(&ctx, PlanTier::Free).await;

        let review = ProcessPullRequestEvent
            .run(&ctx.as_context(), opened_event())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(review.repository_id, repository.id);
        assert_eq!(review.status, ReviewStatus::Queued);
        assert_eq!(review.review_type, ReviewType::Basic);

        assert_eq!(ctx.queue_service.ready_len(QueueLane::Free), 1);
        assert_eq!(ctx.queue_service.ready_len(QueueLane::Pro), 0);

        let user = ctx.db_service.users_get(user.id).await.unwrap().unwrap();
        assert_eq!(user.reviews_used, 1);

        let job = ctx
            .queue_service
            .reserve(QueueLane::Free)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(job.data.repo_id, repository.id);
        assert_eq!(job.data.head_sha, "abcdef");
        assert_eq!(job.data.review_type, ReviewType::Basic);
        assert!(!job.data.auto_fix_enabled);
    }

    #[tokio::test]
    async fn owner_auto_fix_opt_in_is_carried_on_the_job() {
        let ctx = CoreContextTest::new();
        let (user, _) = seed_tracked_repository(&ctx, PlanTier::Pro).await;
        ctx.db_service
            .users_update(User {
                auto_fix_enabled: true,
                ..user
            })
            .await
            .unwrap();

        ProcessPullRequestEvent
            .run(&ctx.as_context(), opened_event())
            .await
            .unwrap()
            .unwrap();

        let job = ctx
            .queue_service
            .reserve(QueueLane::Pro)
            .await
            .unwrap()
            .unwrap();
        assert!(job.data.auto_fix_enabled);
    }

    #[tokio::test]
    async fn pro_plan_enqueues_a_full_review_on_the_pro_lane() {
        let ctx = CoreContextTest::new();
        seed_tracked_repository(&ctx, PlanTier::Pro).await;

        let review = ProcessPullRequestEvent
            .run(&ctx.as_context(), opened_event())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(review.review_type, ReviewType::Full);
        assert_eq!(ctx.queue_service.ready_len(QueueLane::Pro), 1);
    }

    #[tokio::test]
    async fn synchronize_action_triggers_a_review() {
        let ctx = CoreContextTest::new();
        seed_tracked_repository(&ctx, PlanTier::Free).await;

        let review = ProcessPullRequestEvent
            .run(
                &ctx.as_context(),
                GhPullRequestEvent {
                    action: GhPullRequestAction::Synchronize,
                    ..opened_event()
                },
            )
            .await
            .unwrap();

        assert!(review.is_some());
    }

    #[tokio::test]
    async fn other_actions_are_dropped() {
        let ctx = CoreContextTest::new();
        seed_tracked_repository(&ctx, PlanTier::Free).await;

        let review = ProcessPullRequestEvent
            .run(
                &ctx.as_context(),
                GhPullRequestEvent {
                    action: GhPullRequestAction::Assigned,
                    ..opened_event()
                },
            )
            .await
            .unwrap();

        assert!(review.is_none());
        assert_eq!(ctx.queue_service.ready_len(QueueLane::Free), 0);
        assert_eq!(ctx.db_service.reviews_all().await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn untracked_repository_is_dropped() {
        let ctx = CoreContextTest::new();

        let review = ProcessPullRequestEvent
            .run(&ctx.as_context(), opened_event())
            .await
            .unwrap();

        assert!(review.is_none());
        assert_eq!(ctx.queue_service.ready_len(QueueLane::Free), 0);
    }

    #[tokio::test]
    async fn inactive_repository_is_dropped() {
        let ctx = CoreContextTest::new();
        let (_, repository) = seed_tracked_repository(&ctx, PlanTier::Free).await;
        ctx.db_service
            .repositories_update(Repository {
                is_active: false,
                ..repository
            })
            .await
            .unwrap();

        let review = ProcessPullRequestEvent
            .run(&ctx.as_context(), opened_event())
            .await
            .unwrap();

        assert!(review.is_none());
    }

    #[tokio::test]
    async fn exhausted_quota_is_dropped_without_state_change() {
        let ctx = CoreContextTest::new();
        let (user, _) = seed_tracked_repository(&ctx, PlanTier::Free).await;
        ctx.db_service
            .users_update(User {
                reviews_used: 30,
                ..user.clone()
            })
            .await
            .unwrap();

        let review = ProcessPullRequestEvent
            .run(&ctx.as_context(), opened_event())
            .await
            .unwrap();

        assert!(review.is_none());
        assert_eq!(ctx.queue_service.ready_len(QueueLane::Free), 0);
        assert_eq!(ctx.db_service.reviews_all().await.unwrap().len(), 0);

        let user = ctx.db_service.users_get(user.id).await.unwrap().unwrap();
        assert_eq!(user.reviews_used, 30);
    }
}
