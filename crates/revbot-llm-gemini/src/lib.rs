//! Gemini driver for the LLM interface.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod errors;
mod gemini;

pub use gemini::GeminiLlmService;
