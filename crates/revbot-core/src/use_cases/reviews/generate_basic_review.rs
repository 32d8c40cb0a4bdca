use async_trait::async_trait;
use revbot_models::ReviewJob;
use shaku::{Component, Interface};

use super::ReviewOutput;
use crate::{CoreContext, Result};

#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait GenerateBasicReviewInterface: Interface {
    /// Generates a summary-only review of the diff.
    ///
    /// The raw model response becomes the summary as-is, so the output
    /// never carries issues.
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        job: &ReviewJob,
        diff: &str,
    ) -> Result<ReviewOutput>;
}

#[derive(Component)]
#[shaku(interface = GenerateBasicReviewInterface)]
pub(crate) struct GenerateBasicReview;

fn build_prompt(job: &ReviewJob, diff: &str) -> String {
    format!(
        "You are a code reviewer. Summarize the following pull request in a few short \
        paragraphs: what it changes, and anything risky a maintainer should look at.\n\
        Respond with plain text only.\n\n\
        Pull request: {} (#{})\n\n\
        Diff:\n{}",
        job.pr_title, job.pr_number, diff
    )
}

#[async_trait]
impl GenerateBasicReviewInterface for GenerateBasicReview {
    #[tracing::instrument(skip(self, ctx, diff), fields(repo_path = job.repo_full_name, pr_number = job.pr_number))]
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        job: &ReviewJob,
        diff: &str,
    ) -> Result<ReviewOutput> {
        let raw = ctx
            .llm_service
            .generate_text(&ctx.config.llm.gemini.basic_model, &build_prompt(job, diff))
            .await?;

        Ok(ReviewOutput {
            summary: raw.trim().to_string(),
            issues: vec![],
        })
    }
}
