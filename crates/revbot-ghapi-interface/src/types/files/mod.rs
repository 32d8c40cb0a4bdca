mod pull_request_file;

pub use pull_request_file::GhPullRequestFile;
