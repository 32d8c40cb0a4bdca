//! GitHub Api wrappers.

use async_trait::async_trait;
use revbot_config::Config;
use revbot_ghapi_github::GithubApiService;
use revbot_ghapi_interface::{
    types::{GhFileContents, GhPullRequestFile, GhReviewComment},
    ApiService, Result,
};

use crate::metrics::GITHUB_API_CALLS;

/// GitHub Api Service with metrics.
pub struct MetricsApiService {
    inner: GithubApiService,
}

impl MetricsApiService {
    /// Creates a new service.
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            inner: GithubApiService::new(config)?,
        })
    }
}

#[async_trait]
impl ApiService for MetricsApiService {
    async fn pull_files_list(
        &self,
        token: &str,
        owner: &str,
        name: &str,
        number: u64,
    ) -> Result<Vec<GhPullRequestFile>> {
        GITHUB_API_CALLS.inc();
        self.inner.pull_files_list(token, owner, name, number).await
    }

    async fn comments_post(
        &self,
        token: &str,
        owner: &str,
        name: &str,
        issue_number: u64,
        body: &str,
    ) -> Result<u64> {
        GITHUB_API_CALLS.inc();
        self.inner
            .comments_post(token, owner, name, issue_number, body)
            .await
    }

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
        GITHUB_API_CALLS.inc();
        self.inner
            .reviews_create(token, owner, name, number, commit_id, body, comments)
            .await
    }

    async fn contents_get(
        &self,
        token: &str,
        owner: &str,
        name: &str,
        path: &str,
        git_ref: &str,
    ) -> Result<Option<GhFileContents>> {
        GITHUB_API_CALLS.inc();
        self.inner
            .contents_get(token, owner, name, path, git_ref)
            .await
    }

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
        GITHUB_API_CALLS.inc();
        self.inner
            .contents_create_or_update(token, owner, name, path, message, content, sha, branch)
            .await
    }
}
