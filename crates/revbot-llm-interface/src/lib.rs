//! LLM interface

#![warn(missing_docs)]
#![warn(clippy::all)]

mod errors;
mod interface;

pub use errors::{LlmError, Result};
pub use interface::LlmService;
#[cfg(any(test, feature = "testkit"))]
pub use interface::MockLlmService;
