//! Logic module.

#![warn(clippy::all)]
#![allow(clippy::new_without_default)]

mod context;
pub mod errors;
pub mod use_cases;

pub use context::CoreContext;
pub use errors::{DomainError, Result};
use shaku::module;
use use_cases::{
    pulls::process_pull_request_event::ProcessPullRequestEvent,
    retrieval::{
        index_file_chunks::IndexFileChunks, retrieve_similar_chunks::RetrieveSimilarChunks,
    },
    reviews::{
        generate_basic_review::GenerateBasicReview, generate_full_review::GenerateFullReview,
        process_review_job::ProcessReviewJob, publish_review::PublishReview,
    },
    users::check_quota::CheckQuota,
};

module! {
    pub CoreModule {
        components = [
            CheckQuota, ProcessPullRequestEvent, ProcessReviewJob,
            GenerateBasicReview, GenerateFullReview, PublishReview,
            RetrieveSimilarChunks, IndexFileChunks
        ],
        providers = []
    }
}
