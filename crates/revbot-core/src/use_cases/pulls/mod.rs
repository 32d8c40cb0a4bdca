pub(crate) mod process_pull_request_event;

pub use process_pull_request_event::ProcessPullRequestEventInterface;

#[cfg(any(test, feature = "testkit"))]
pub use process_pull_request_event::MockProcessPullRequestEventInterface;
