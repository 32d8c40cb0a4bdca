use async_trait::async_trait;
use revbot_models::{ReviewJob, ReviewStatus, ReviewType};
use shaku::{Component, HasComponent, Interface};

use super::{
    build_diff, GenerateBasicReviewInterface, GenerateFullReviewInterface,
    PublishReviewInterface,
};
use crate::{CoreContext, DomainError, Result};

#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait ProcessReviewJobInterface: Interface {
    /// Runs one review job end to end: fetch the diff, generate the review
    /// for the job's tier, publish it and persist the result.
    async fn run<'a>(&self, ctx: &CoreContext<'a>, job: &ReviewJob) -> Result<()>;
}

#[derive(Component)]
#[shaku(interface = ProcessReviewJobInterface)]
pub(crate) struct ProcessReviewJob;

#[async_trait]
impl ProcessReviewJobInterface for ProcessReviewJob {
    #[tracing::instrument(
        skip(self, ctx),
        fields(
            repo_path = job.repo_full_name,
            pr_number = job.pr_number,
            review_type = %job.review_type
        )
    )]
    async fn run<'a>(&self, ctx: &CoreContext<'a>, job: &ReviewJob) -> Result<()> {
        ctx.db_service
            .reviews_set_status(job.repo_id, job.pr_number, ReviewStatus::Processing)
            .await?;

        let user = ctx.db_service.users_get_expect(job.user_id).await?;
        let token = user
            .github_access_token
            .ok_or(DomainError::MissingAccessToken {
                user_id: job.user_id,
            })?;

        let (owner, name) = job.repo_path_parts();
        let files = ctx
            .api_service
            .pull_files_list(&token, owner, name, job.pr_number)
            .await?;
        let diff = build_diff(&files);

        let output = match job.review_type {
            ReviewType::Basic => {
                let generate: &dyn GenerateBasicReviewInterface = ctx.core_module.resolve_ref();
                generate.run(ctx, job, &diff).await?
            }
            ReviewType::Full => {
                let generate: &dyn GenerateFullReviewInterface = ctx.core_module.resolve_ref();
                generate.run(ctx, job, &diff).await?
            }
        };

        let publish: &dyn PublishReviewInterface = ctx.core_module.resolve_ref();
        publish.run(ctx, &token, job, &output).await?;

        let updated = ctx
            .db_service
            .reviews_set_completed(
                job.repo_id,
                job.pr_number,
                &output.summary,
                output.issues.len() as u32,
            )
            .await?;

        tracing::info!(
            repo_path = job.repo_full_name,
            pr_number = job.pr_number,
            issues_found = output.issues.len(),
            reviews_updated = updated,
            message = "Review job processed"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use revbot_database_interface::DbService;
    use revbot_models::{PlanTier, Repository, Review, ReviewJob, ReviewType, User};

    use super::*;
    use crate::context::tests::CoreContextTest;

    async fn seed(ctx: &CoreContextTest, token: Option<&str>) -> ReviewJob {
        let user = ctx
            .db_service
            .users_create(User {
                username: "me".into(),
                plan: PlanTier::Free,
                github_access_token: token.map(Into::into),
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
                pr_number: 4,
                status: ReviewStatus::Queued,
                ..Default::default()
            })
            .await
            .unwrap();

        ReviewJob {
            repo_id: repository.id,
            user_id: user.id,
            pr_number: 4,
            pr_title: "Add feature".into(),
            repo_full_name: "me/repo".into(),
            head_sha: "abc123".into(),
            head_ref: "feature".into(),
            base_ref: "main".into(),
            review_type: ReviewType::Basic,
            auto_fix_enabled: false,
        }
    }

    async fn stored_review(ctx: &CoreContextTest, job: &ReviewJob) -> Review {
        ctx.db_service
            .reviews_list_for_repository(job.repo_id)
            .await
            .unwrap()
            .remove(0)
    }

    #[tokio::test]
    async fn basic_job_completes_the_review_with_the_generated_summary() {
        let mut ctx = CoreContextTest::new();
        ctx.api_service
            .expect_pull_files_list()
            .once()
            .returning(|_, _, _, _| Ok(vec![]));
        ctx.api_service
            .expect_comments_post()
            .once()
            .returning(|_, _, _, _, _| Ok(1));
        ctx.llm_service
            .expect_generate_text()
            .once()
            .returning(|_, _| Ok("A tidy change.".into()));

        let job = seed(&ctx, Some("token")).await;

        ProcessReviewJob.run(&ctx.as_context(), &job).await.unwrap();

        let review = stored_review(&ctx, &job).await;
        assert_eq!(review.status, ReviewStatus::Completed);
        assert_eq!(review.summary.as_deref(), Some("A tidy change."));
        assert_eq!(review.issues_found, 0);
        assert!(review.completed_at.is_some());
    }

    #[tokio::test]
    async fn full_job_parses_issues_and_publishes_inline_comments() {
        let mut ctx = CoreContextTest::new();
        ctx.api_service
            .expect_pull_files_list()
            .once()
            .returning(|_, _, _, _| Ok(vec![]));
        ctx.api_service
            .expect_comments_post()
            .once()
            .returning(|_, _, _, _, _| Ok(1));
        ctx.api_service
            .expect_reviews_create()
            .once()
            .withf(|_, _, _, _, commit_id, _, comments| {
                commit_id == "abc123" && comments.len() == 1
            })
            .returning(|_, _, _, _, _, _, _| Ok(()));
        ctx.llm_service
            .expect_embed_text()
            .returning(|_, _| Ok(vec![1.0]));
        ctx.llm_service
            .expect_generate_text()
            .once()
            .returning(|_, _| {
                Ok(r#"{"summary": "One issue.", "issues": [
                    {"file": "src/lib.rs", "line": 5, "severity": "warning",
                     "category": "style", "message": "naming"}
                ]}"#
                .into())
            });

        let mut job = seed(&ctx, Some("token")).await;
        job.review_type = ReviewType::Full;

        ProcessReviewJob.run(&ctx.as_context(), &job).await.unwrap();

        let review = stored_review(&ctx, &job).await;
        assert_eq!(review.status, ReviewStatus::Completed);
        assert_eq!(review.issues_found, 1);
    }

    #[tokio::test]
    async fn unparseable_full_output_still_completes_with_the_placeholder() {
        let mut ctx = CoreContextTest::new();
        ctx.api_service
            .expect_pull_files_list()
            .once()
            .returning(|_, _, _, _| Ok(vec![]));
        ctx.api_service
            .expect_comments_post()
            .once()
            .returning(|_, _, _, _, _| Ok(1));
        ctx.llm_service
            .expect_embed_text()
            .returning(|_, _| Ok(vec![1.0]));
        ctx.llm_service
            .expect_generate_text()
            .once()
            .returning(|_, _| Ok("no json here".into()));

        let mut job = seed(&ctx, Some("token")).await;
        job.review_type = ReviewType::Full;

        ProcessReviewJob.run(&ctx.as_context(), &job).await.unwrap();

        let review = stored_review(&ctx, &job).await;
        assert_eq!(review.status, ReviewStatus::Completed);
        assert_eq!(
            review.summary.as_deref(),
            Some("Unable to parse review output.")
        );
        assert_eq!(review.issues_found, 0);
    }

    #[tokio::test]
    async fn missing_access_token_fails_before_touching_the_api() {
        let mut ctx = CoreContextTest::new();
        ctx.api_service.expect_pull_files_list().never();

        let job = seed(&ctx, None).await;

        let result = ProcessReviewJob.run(&ctx.as_context(), &job).await;

        assert!(matches!(
            result,
            Err(DomainError::MissingAccessToken { user_id }) if user_id == job.user_id
        ));
        let review = stored_review(&ctx, &job).await;
        assert_eq!(review.status, ReviewStatus::Processing);
    }

    #[tokio::test]
    async fn publish_failure_propagates_and_leaves_the_review_processing() {
        let mut ctx = CoreContextTest::new();
        ctx.api_service
            .expect_pull_files_list()
            .once()
            .returning(|_, _, _, _| Ok(vec![]));
        ctx.api_service
            .expect_comments_post()
            .once()
            .returning(|_, _, _, _, _| {
                Err(revbot_ghapi_interface::ApiError::ImplementationError {
                    source: "boom".into(),
                })
            });
        ctx.llm_service
            .expect_generate_text()
            .once()
            .returning(|_, _| Ok("summary".into()));

        let job = seed(&ctx, Some("token")).await;

        let result = ProcessReviewJob.run(&ctx.as_context(), &job).await;

        assert!(result.is_err());
        let review = stored_review(&ctx, &job).await;
        assert_eq!(review.status, ReviewStatus::Processing);
    }
}
