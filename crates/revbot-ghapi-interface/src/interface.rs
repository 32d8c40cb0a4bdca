use async_trait::async_trait;

use crate::{
    types::{GhFileContents, GhPullRequestFile, GhReviewComment},
    Result,
};

/// GitHub API Adapter interface
///
/// Every call authenticates with the repository owner's access token.
#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait ApiService: Send + Sync {
    /// List files modified by a pull request.
    async fn pull_files_list(
        &self,
        token: &str,
        owner: &str,
        name: &str,
        number: u64,
    ) -> Result<Vec<GhPullRequestFile>>;
    /// Post a comment on a pull request.
    async fn comments_post(
        &self,
        token: &str,
        owner: &str,
        name: &str,
        issue_number: u64,
        body: &str,
    ) -> Result<u64>;
    /// Create a pull request review carrying inline comments.
    async fn reviews_create(
        &self,
        token: &str,
        owner: &str,
        name: &str,
        number: u64,
        commit_id: &str,
        body: &str,
        comments: &[GhReviewComment],
    ) -> Result<()>;
    /// Fetch file contents at a git reference, `None` when the file is absent.
    async fn contents_get(
        &self,
        token: &str,
        owner: &str,
        name: &str,
        path: &str,
        git_ref: &str,
    ) -> Result<Option<GhFileContents>>;
    /// Create or update a file on a branch.
    ///
    /// `sha` is the current blob SHA, required when updating an existing file.
    #[allow(clippy::too_many_arguments)]
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
    ) -> Result<()>;
}
