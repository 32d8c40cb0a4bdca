//! Queue interface

#![warn(missing_docs)]
#![warn(clippy::all)]

mod errors;
mod interface;
mod queued_job;

pub use errors::{QueueError, Result};
#[cfg(any(test, feature = "testkit"))]
pub use interface::MockQueueService;
pub use interface::QueueService;
pub use queued_job::{LaneConfig, QueuedJob};
