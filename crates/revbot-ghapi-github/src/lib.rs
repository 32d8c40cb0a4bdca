//! API crate.
//!
//! Contains functions to communicate with GitHub API.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod client;
mod errors;
mod github;

pub use github::GithubApiService;
