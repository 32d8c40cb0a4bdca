use async_trait::async_trait;
use revbot_models::{ReviewJob, ReviewType};
use shaku::{Component, Interface};

use revbot_ghapi_interface::types::{GhFileContents, GhReviewComment};

use super::ReviewOutput;
use crate::{CoreContext, Result};

/// Keeps model-produced text from breaking the markdown table.
fn sanitize_cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}

#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait PublishReviewInterface: Interface {
    /// Publishes a generated review to the pull request.
    ///
    /// Always posts the summary comment. For full reviews, also posts
    /// inline comments for line-anchored issues and, when the user opted
    /// into auto-fix, pushes fixes for critical and warning issues that
    /// carry one.
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        token: &str,
        job: &ReviewJob,
        output: &ReviewOutput,
    ) -> Result<()>;
}

#[derive(Component)]
#[shaku(interface = PublishReviewInterface)]
pub(crate) struct PublishReview;

pub(crate) fn build_summary_comment(job: &ReviewJob, output: &ReviewOutput) -> String {
    let mut comment = format!(
        "## 🤖 Automated review ({})\n\n{}\n",
        job.review_type, output.summary
    );

    if !output.issues.is_empty() {
        comment.push_str(&format!("\n### Issues found ({})\n\n", output.issues.len()));
        comment.push_str("| Severity | File | Line | Category | Message |\n");
        comment.push_str("| --- | --- | --- | --- | --- |\n");
        for issue in &output.issues {
            comment.push_str(&format!(
                "| {} {} | {} | {} | {} | {} |\n",
                issue.severity.emoji(),
                issue.severity,
                sanitize_cell(&issue.file),
                issue.line,
                sanitize_cell(&issue.category),
                sanitize_cell(&issue.message)
            ));
        }
    }

    comment
}

#[async_trait]
impl PublishReviewInterface for PublishReview {
    #[tracing::instrument(skip(self, ctx, token, output), fields(repo_path = job.repo_full_name, pr_number = job.pr_number))]
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        token: &str,
        job: &ReviewJob,
        output: &ReviewOutput,
    ) -> Result<()> {
        let (owner, name) = job.repo_path_parts();

        ctx.api_service
            .comments_post(
                token,
                owner,
                name,
                job.pr_number,
                &build_summary_comment(job, output),
            )
            .await?;

        if job.review_type != ReviewType::Full {
            return Ok(());
        }

        // Inline anchors need a concrete line on the new side.
        let comments: Vec<GhReviewComment> = output
            .issues
            .iter()
            .filter(|issue| issue.line > 0)
            .map(|issue| {
                GhReviewComment::on_right_side(
                    &issue.file,
                    issue.line,
                    &format!("{} **{}**: {}", issue.severity.emoji(), issue.category, issue.message),
                )
            })
            .collect();

        if !comments.is_empty() {
            ctx.api_service
                .reviews_create(
                    token,
                    owner,
                    name,
                    job.pr_number,
                    &job.head_sha,
                    &format!("Automated review: {} inline issue(s).", comments.len()),
                    &comments,
                )
                .await?;
        }

        if !job.auto_fix_enabled {
            return Ok(());
        }

        for issue in &output.issues {
            let Some(fix) = &issue.fix else { continue };
            if !issue.severity.fix_worthy() || issue.file.is_empty() {
                continue;
            }

            if let Err(e) = self
                .push_fix(ctx, token, job, &issue.file, fix)
                .await
            {
                tracing::warn!(
                    repo_path = job.repo_full_name,
                    file = issue.file,
                    error = %e,
                    message = "Could not push auto-fix, skipping file"
                );
            }
        }

        Ok(())
    }
}

impl PublishReview {
    async fn push_fix<'a>(
        &self,
        ctx: &CoreContext<'a>,
        token: &str,
        job: &ReviewJob,
        path: &str,
        fix: &str,
    ) -> Result<()> {
        let (owner, name) = job.repo_path_parts();

        let sha = ctx
            .api_service
            .contents_get(token, owner, name, path, &job.head_ref)
            .await?
            .map(|contents| contents.sha);

        ctx.api_service
            .contents_create_or_update(
                token,
                owner,
                name,
                path,
                &format!("fix: apply automated review fix to {path}"),
                &GhFileContents::encode(fix),
                sha.as_deref(),
                &job.head_ref,
            )
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use revbot_ghapi_interface::{types::GhFileContents, ApiError};
    use revbot_models::{ReviewJob, ReviewType};

    use super::*;
    use crate::{
        context::tests::CoreContextTest,
        use_cases::reviews::{IssueSeverity, ReviewIssue},
    };

    fn full_job() -> ReviewJob {
        ReviewJob {
            repo_full_name: "me/repo".into(),
            pr_number: 4,
            head_sha: "abc123".into(),
            head_ref: "feature".into(),
            review_type: ReviewType::Full,
            ..Default::default()
        }
    }

    fn full_job_with_auto_fix() -> ReviewJob {
        ReviewJob {
            auto_fix_enabled: true,
            ..full_job()
        }
    }

    fn issue(line: u64, severity: IssueSeverity, fix: Option<&str>) -> ReviewIssue {
        ReviewIssue {
            file: "src/lib.rs".into(),
            line,
            severity,
            category: "style".into(),
            message: "problem".into(),
            fix: fix.map(Into::into),
        }
    }

    #[test]
    fn summary_comment_contains_tier_and_issue_table() {
        let comment = build_summary_comment(
            &full_job(),
            &ReviewOutput {
                summary: "Mostly fine.".into(),
                issues: vec![issue(3, IssueSeverity::Critical, None)],
            },
        );

        assert!(comment.starts_with("## 🤖 Automated review (full)"));
        assert!(comment.contains("Mostly fine."));
        assert!(comment.contains("### Issues found (1)"));
        assert!(comment.contains("| 🔴 critical | src/lib.rs | 3 | style | problem |"));
    }

    #[test]
    fn summary_comment_without_issues_has_no_table() {
        let comment = build_summary_comment(
            &ReviewJob::default(),
            &ReviewOutput {
                summary: "All good.".into(),
                issues: vec![],
            },
        );

        assert!(comment.starts_with("## 🤖 Automated review (basic)"));
        assert!(!comment.contains("Issues found"));
    }

    #[tokio::test]
    async fn basic_review_only_posts_the_summary_comment() {
        let mut ctx = CoreContextTest::new();
        ctx.api_service
            .expect_comments_post()
            .once()
            .returning(|_, _, _, _, _| Ok(1));

        PublishReview
            .run(
                &ctx.as_context(),
                "token",
                &ReviewJob {
                    repo_full_name: "me/repo".into(),
                    ..Default::default()
                },
                &ReviewOutput {
                    summary: "ok".into(),
                    issues: vec![],
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn inline_comments_skip_file_level_issues() {
        let mut ctx = CoreContextTest::new();
        ctx.api_service
            .expect_comments_post()
            .once()
            .returning(|_, _, _, _, _| Ok(1));
        ctx.api_service
            .expect_reviews_create()
            .once()
            .withf(|_, owner, name, number, commit_id, _, comments| {
                owner == "me"
                    && name == "repo"
                    && *number == 4
                    && commit_id == "abc123"
                    && comments.len() == 1
                    && comments[0].line == 8
            })
            .returning(|_, _, _, _, _, _, _| Ok(()));

        PublishReview
            .run(
                &ctx.as_context(),
                "token",
                &full_job(),
                &ReviewOutput {
                    summary: "s".into(),
                    issues: vec![
                        issue(0, IssueSeverity::Warning, None),
                        issue(8, IssueSeverity::Suggestion, None),
                    ],
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn fixes_are_pushed_with_the_existing_file_sha() {
        let mut ctx = CoreContextTest::new();
        ctx.api_service
            .expect_comments_post()
            .once()
            .returning(|_, _, _, _, _| Ok(1));
        ctx.api_service
            .expect_reviews_create()
            .once()
            .returning(|_, _, _, _, _, _, _| Ok(()));
        ctx.api_service
            .expect_contents_get()
            .once()
            .with(
                eq("token"),
                eq("me"),
                eq("repo"),
                eq("src/lib.rs"),
                eq("feature"),
            )
            .returning(|_, _, _, _, _| {
                Ok(Some(GhFileContents {
                    path: "src/lib.rs".into(),
                    sha: "filesha".into(),
                    content: String::new(),
                }))
            });
        ctx.api_service
            .expect_contents_create_or_update()
            .once()
            .withf(|_, _, _, path, _, content, sha, branch| {
                path == "src/lib.rs"
                    && content == GhFileContents::encode("fixed contents")
                    && *sha == Some("filesha")
                    && branch == "feature"
            })
            .returning(|_, _, _, _, _, _, _, _| Ok(()));

        PublishReview
            .run(
                &ctx.as_context(),
                "token",
                &full_job_with_auto_fix(),
                &ReviewOutput {
                    summary: "s".into(),
                    issues: vec![issue(2, IssueSeverity::Critical, Some("fixed contents"))],
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn suggestion_fixes_are_not_pushed() {
        let mut ctx = CoreContextTest::new();
        ctx.api_service
            .expect_comments_post()
            .once()
            .returning(|_, _, _, _, _| Ok(1));
        ctx.api_service
            .expect_reviews_create()
            .once()
            .returning(|_, _, _, _, _, _, _| Ok(()));
        ctx.api_service.expect_contents_get().never();
        ctx.api_service.expect_contents_create_or_update().never();

        PublishReview
            .run(
                &ctx.as_context(),
                "token",
                &full_job_with_auto_fix(),
                &ReviewOutput {
                    summary: "s".into(),
                    issues: vec![issue(2, IssueSeverity::Suggestion, Some("nicer contents"))],
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn fixes_are_not_pushed_when_the_user_has_not_opted_in() {
        let mut ctx = CoreContextTest::new();
        ctx.api_service
            .expect_comments_post()
            .once()
            .returning(|_, _, _, _, _| Ok(1));
        ctx.api_service
            .expect_reviews_create()
            .once()
            .returning(|_, _, _, _, _, _, _| Ok(()));
        ctx.api_service.expect_contents_get().never();
        ctx.api_service.expect_contents_create_or_update().never();

        PublishReview
            .run(
                &ctx.as_context(),
                "token",
                &full_job(),
                &ReviewOutput {
                    summary: "s".into(),
                    issues: vec![issue(2, IssueSeverity::Critical, Some("fixed contents"))],
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn failed_fix_does_not_abort_publication() {
        let mut ctx = CoreContextTest::new();
        ctx.api_service
            .expect_comments_post()
            .once()
            .returning(|_, _, _, _, _| Ok(1));
        ctx.api_service
            .expect_reviews_create()
            .once()
            .returning(|_, _, _, _, _, _, _| Ok(()));
        ctx.api_service
            .expect_contents_get()
            .once()
            .returning(|_, _, _, _, _| {
                Err(ApiError::ImplementationError {
                    source: "boom".into(),
                })
            });

        let result = PublishReview
            .run(
                &ctx.as_context(),
                "token",
                &full_job_with_auto_fix(),
                &ReviewOutput {
                    summary: "s".into(),
                    issues: vec![issue(2, IssueSeverity::Critical, Some("fixed"))],
                },
            )
            .await;

        assert!(result.is_ok());
    }
}
