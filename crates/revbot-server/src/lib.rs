//! Server module.

#![warn(clippy::all)]

pub mod constants;
pub mod errors;
mod event_type;
pub mod ghapi;
mod health;
pub mod llm;
mod metrics;
pub mod middlewares;
pub mod queue;
pub mod server;
pub mod utils;
mod webhook;

pub use errors::{Result, ServerError};
