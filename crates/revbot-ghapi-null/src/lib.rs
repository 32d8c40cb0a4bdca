//! Null driver for GH API.

#![warn(missing_docs)]
#![warn(clippy::all)]

use async_trait::async_trait;
use revbot_ghapi_interface::{
    types::{GhFileContents, GhPullRequestFile, GhReviewComment},
    ApiService, Result,
};

/// Null API service.
#[derive(Clone, Default)]
pub struct NullApiService {
    _private: (),
}

impl NullApiService {
    /// Build a null API service.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

#[async_trait]
impl ApiService for NullApiService {
    #[tracing::instrument(skip(self, _token), ret)]
    async fn pull_files_list(
        &self,
        _token: &str,
        owner: &str,
        name: &str,
        number: u64,
    ) -> Result<Vec<GhPullRequestFile>> {
        Ok(vec![])
    }

    #[tracing::instrument(skip(self, _token, body), ret)]
    async fn comments_post(
        &self,
        _token: &str,
        owner: &str,
        name: &str,
        issue_number: u64,
        body: &str,
    ) -> Result<u64> {
        Ok(0)
    }

    #[tracing::instrument(skip(self, _token, body, comments))]
    async fn reviews_create(
        &self,
        _token: &str,
        owner: &str,
        name: &str,
        number: u64,
        commit_id: &str,
        body: &str,
        comments: &[GhReviewComment],
    ) -> Result<()> {
        Ok(())
    }

    #[tracing::instrument(skip(self, _token), ret)]
    async fn contents_get(
        &self,
        _token: &str,
        owner: &str,
        name: &str,
        path: &str,
        git_ref: &str,
    ) -> Result<Option<GhFileContents>> {
        Ok(None)
    }

    #[allow(clippy::too_many_arguments)]
    #[tracing::instrument(skip(self, _token, message, content, sha))]
    async fn contents_create_or_update<'a>(
        &self,
        _token: &str,
        owner: &str,
        name: &str,
        path: &str,
        message: &str,
        content: &str,
        sha: Option<&'a str>,
        branch: &str,
    ) -> Result<()> {
        Ok(())
    }
}
