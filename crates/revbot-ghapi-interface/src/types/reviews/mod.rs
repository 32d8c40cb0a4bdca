mod review_comment;

pub use review_comment::GhReviewComment;
