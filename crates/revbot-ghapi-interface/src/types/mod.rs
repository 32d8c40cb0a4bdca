//! Types module.

mod common;
mod contents;
mod files;
mod ping;
mod pulls;
mod reviews;

pub use common::{GhBranch, GhRepository, GhUser};
pub use contents::GhFileContents;
pub use files::GhPullRequestFile;
pub use ping::GhPingEvent;
pub use pulls::{GhPullRequest, GhPullRequestAction, GhPullRequestEvent};
pub use reviews::GhReviewComment;
