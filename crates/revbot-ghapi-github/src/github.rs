//! GitHub adapter.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use revbot_config::Config;
use revbot_ghapi_interface::{
    types::{GhFileContents, GhPullRequestFile, GhReviewComment},
    ApiService, Result,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    client::{build_github_url, get_client_builder},
    errors::GitHubError,
};

#[derive(Debug, Deserialize)]
struct CommentResponse {
    id: u64,
}

/// GitHub API service.
#[derive(Clone)]
pub struct GithubApiService {
    config: Config,
    client: Client,
}

impl GithubApiService {
    /// Creates a new GitHub adapter.
    pub fn new(config: Config) -> Result<Self> {
        let client = get_client_builder(&config)
            .build()
            .map_err(GitHubError::from)?;

        Ok(Self { config, client })
    }

    fn url<T: Into<String>>(&self, path: T) -> String {
        build_github_url(&self.config, path)
    }
}

#[async_trait]
impl ApiService for GithubApiService {
    #[tracing::instrument(skip(self, token))]
    async fn pull_files_list(
        &self,
        token: &str,
        owner: &str,
        name: &str,
        number: u64,
    ) -> Result<Vec<GhPullRequestFile>> {
        let response = self
            .client
            .get(self.url(format!(
                "/repos/{owner}/{name}/pulls/{number}/files?per_page=100"
            )))
            .bearer_auth(token)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(GitHubError::from)?;

        Ok(response
            .json::<Vec<GhPullRequestFile>>()
            .await
            .map_err(GitHubError::from)?)
    }

    #[tracing::instrument(skip(self, token, body), ret)]
    async fn comments_post(
        &self,
        token: &str,
        owner: &str,
        name: &str,
        issue_number: u64,
        body: &str,
    ) -> Result<u64> {
        let response = self
            .client
            .post(self.url(format!(
                "/repos/{owner}/{name}/issues/{issue_number}/comments"
            )))
            .bearer_auth(token)
            .json(&json!({ "body": body }))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(GitHubError::from)?;

        let comment = response
            .json::<CommentResponse>()
            .await
            .map_err(GitHubError::from)?;

        Ok(comment.id)
    }

    #[tracing::instrument(skip(self, token, body, comments), fields(comment_count = comments.len()))]
    async fn reviews_create(
        &self,
        token: &str,
        owner: &str,
        name: &str,
        number: u64,
        commit_id: &str,
        body: &str,
        comments: &[GhReviewComment],
    ) -> Result<()> {
        self.client
            .post(self.url(format!("/repos/{owner}/{name}/pulls/{number}/reviews")))
            .bearer_auth(token)
            .json(&json!({
                "commit_id": commit_id,
                "event": "COMMENT",
                "body": body,
                "comments": comments,
            }))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(GitHubError::from)?;

        Ok(())
    }

    #[tracing::instrument(skip(self, token))]
    async fn contents_get(
        &self,
        token: &str,
        owner: &str,
        name: &str,
        path: &str,
        git_ref: &str,
    ) -> Result<Option<GhFileContents>> {
        let response = self
            .client
            .get(self.url(format!(
                "/repos/{owner}/{name}/contents/{path}?ref={git_ref}"
            )))
            .bearer_auth(token)
            .send()
            .await
            .map_err(GitHubError::from)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = response.error_for_status().map_err(GitHubError::from)?;
        let contents = response
            .json::<GhFileContents>()
            .await
            .map_err(GitHubError::from)?;

        Ok(Some(contents))
    }

    #[allow(clippy::too_many_arguments)]
    #[tracing::instrument(skip(self, token, message, content, sha))]
    async fn contents_create_or_update<'a>(
        &self,
        token: &str,
        owner: &str,
        name: &str,
        path: &str,
        message: &str,
        content: &str,
        sha: Option<&'a str>,
        branch: &str,
    ) -> Result<()> {
        let mut payload = json!({
            "message": message,
            "content": content,
            "branch": branch,
        });
        if let Some(sha) = sha {
            payload["sha"] = json!(sha);
        }

        self.client
            .put(self.url(format!("/repos/{owner}/{name}/contents/{path}")))
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(GitHubError::from)?;

        Ok(())
    }
}
