use thiserror::Error;

/// LLM error.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The provider returned a response with no usable candidate.
    #[error("Empty response from model '{model}'")]
    EmptyResponse {
        /// Model name.
        model: String,
    },

    /// Implementation error.
    #[error("Implementation error,\n  caused by: {source}")]
    ImplementationError {
        /// Source error.
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

/// Result alias for `LlmError`.
pub type Result<T, E = LlmError> = core::result::Result<T, E>;
