use async_trait::async_trait;
use revbot_models::ReviewJob;
use shaku::{Component, HasComponent, Interface};

use super::ReviewOutput;
use crate::{
    use_cases::retrieval::RetrieveSimilarChunksInterface, CoreContext, Result,
};

#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait GenerateFullReviewInterface: Interface {
    /// Generates a structured review with issues, using indexed repository
    /// context and the user's active review rules.
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        job: &ReviewJob,
        diff: &str,
    ) -> Result<ReviewOutput>;
}

#[derive(Component)]
#[shaku(interface = GenerateFullReviewInterface)]
pub(crate) struct GenerateFullReview;

fn build_prompt(job: &ReviewJob, diff: &str, context: &str, rules: &[String]) -> String {
    let mut prompt = format!(
        "You are a thorough code reviewer. Review the following pull request.\n\n\
        Pull request: {} (#{})\n",
        job.pr_title, job.pr_number
    );

    if !context.is_empty() {
        prompt.push_str("\nRelevant code from the repository:\n");
        prompt.push_str(context);
    }

    if !rules.is_empty() {
        prompt.push_str("\nProject-specific review rules to enforce:\n");
        for (position, rule) in rules.iter().enumerate() {
            prompt.push_str(&format!("{}. {}\n", position + 1, rule));
        }
    }

    prompt.push_str(
        "\nRespond with a single JSON object and nothing else, using this shape:\n\
        {\"summary\": \"<overall assessment>\", \"issues\": [{\"file\": \"<path>\", \
        \"line\": <line number on the new side, 0 if file-level>, \
        \"severity\": \"critical\" | \"warning\" | \"suggestion\", \
        \"category\": \"<short category>\", \"message\": \"<what is wrong>\", \
        \"fix\": \"<full corrected file contents, or omit>\"}]}\n\n\
        Diff:\n",
    );
    prompt.push_str(diff);
    prompt
}

#[async_trait]
impl GenerateFullReviewInterface for GenerateFullReview {
    #[tracing::instrument(skip(self, ctx, diff), fields(repo_path = job.repo_full_name, pr_number = job.pr_number))]
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        job: &ReviewJob,
        diff: &str,
    ) -> Result<ReviewOutput> {
        let retrieve: &dyn RetrieveSimilarChunksInterface = ctx.core_module.resolve_ref();
        let context = retrieve.run(ctx, job.repo_id, diff).await?;

        let rules: Vec<String> = ctx
            .db_service
            .review_rules_list_active(job.user_id)
            .await?
            .into_iter()
            .map(|rule| rule.rule)
            .collect();

        let raw = ctx
            .llm_service
            .generate_text(
                &ctx.config.llm.gemini.full_model,
                &build_prompt(job, diff, &context, &rules),
            )
            .await?;

        Ok(ReviewOutput::parse(&raw))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use revbot_database_interface::DbService;
    use revbot_models::{ReviewJob, ReviewRule};

    use super::*;
    use crate::{use_cases::reviews::IssueSeverity, context::tests::CoreContextTest};

    fn ctx_with_embeddings() -> CoreContextTest {
        let mut ctx = CoreContextTest::new();
        ctx.llm_service
            .expect_embed_text()
            .returning(|_, _| Ok(vec![1.0, 0.0]));
        ctx
    }

    #[tokio::test]
    async fn model_json_is_parsed_into_issues() {
        let mut ctx = ctx_with_embeddings();
        ctx.llm_service
            .expect_generate_text()
            .once()
            .returning(|_, _| {
                Ok(r#"```json
                {"summary": "One problem found.", "issues": [
                    {"file": "src/db.rs", "line": 12, "severity": "critical",
                     "category": "security", "message": "unsanitized input"}
                ]}
                ```"#
                    .into())
            });

        let output = GenerateFullReview
            .run(&ctx.as_context(), &ReviewJob::default(), "+diff")
            .await
            .unwrap();

        assert_eq!(output.summary, "One problem found.");
        assert_eq!(output.issues.len(), 1);
        assert_eq!(output.issues[0].severity, IssueSeverity::Critical);
    }

    #[tokio::test]
    async fn active_rules_are_numbered_into_the_prompt() {
        let mut ctx = ctx_with_embeddings();
        for (rule, is_active) in [("Prefer iterators over loops", true), ("Old rule", false)] {
            ctx.db_service
                .review_rules_create(ReviewRule {
                    user_id: 7,
                    rule: rule.into(),
                    is_active,
                    ..Default::default()
                })
                .await
                .unwrap();
        }
        ctx.llm_service
            .expect_generate_text()
            .once()
            .withf(|_, prompt| {
                prompt.contains("1. Prefer iterators over loops") && !prompt.contains("Old rule")
            })
            .returning(|_, _| Ok(r#"{"summary": "ok", "issues": []}"#.into()));

        GenerateFullReview
            .run(
                &ctx.as_context(),
                &ReviewJob {
                    user_id: 7,
                    ..Default::default()
                },
                "+diff",
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn unparseable_response_degrades_to_the_fallback_output() {
        let mut ctx = ctx_with_embeddings();
        ctx.llm_service
            .expect_generate_text()
            .once()
            .returning(|_, _| Ok("I refuse to answer in JSON.".into()));

        let output = GenerateFullReview
            .run(&ctx.as_context(), &ReviewJob::default(), "+diff")
            .await
            .unwrap();

        assert_eq!(output, ReviewOutput::fallback());
    }
}
