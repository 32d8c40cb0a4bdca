pub(crate) mod diff;
pub(crate) mod generate_basic_review;
pub(crate) mod generate_full_review;
pub(crate) mod process_review_job;
pub(crate) mod publish_review;
pub(crate) mod review_output;

pub use diff::build_diff;
pub use generate_basic_review::GenerateBasicReviewInterface;
pub use generate_full_review::GenerateFullReviewInterface;
pub use process_review_job::ProcessReviewJobInterface;
pub use publish_review::PublishReviewInterface;
pub use review_output::{IssueSeverity, ReviewIssue, ReviewOutput};

#[cfg(any(test, feature = "testkit"))]
pub use self::{
    generate_basic_review::MockGenerateBasicReviewInterface,
    generate_full_review::MockGenerateFullReviewInterface,
    process_review_job::MockProcessReviewJobInterface,
    publish_review::MockPublishReviewInterface,
};
