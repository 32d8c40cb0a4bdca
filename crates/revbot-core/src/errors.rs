//! Logic errors.

use thiserror::Error;

/// Logic error.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum DomainError {
    /// The user has no stored GitHub access token.
    #[error("Missing GitHub access token for user ID '{user_id}'")]
    MissingAccessToken { user_id: u64 },

    /// Wraps [`revbot_ghapi_interface::ApiError`].
    #[error("API error: {source}")]
    ApiError {
        source: revbot_ghapi_interface::ApiError,
    },

    /// Wraps [`revbot_database_interface::DatabaseError`].
    #[error("Database error: {source}")]
    DatabaseError {
        source: revbot_database_interface::DatabaseError,
    },

    #[error("Queue service error: {source}")]
    QueueError {
        source: revbot_queue_interface::QueueError,
    },

    #[error("LLM service error: {source}")]
    LlmError {
        source: revbot_llm_interface::LlmError,
    },
}

impl From<revbot_ghapi_interface::ApiError> for DomainError {
    fn from(e: revbot_ghapi_interface::ApiError) -> Self {
        Self::ApiError { source: e }
    }
}

impl From<revbot_database_interface::DatabaseError> for DomainError {
    fn from(e: revbot_database_interface::DatabaseError) -> Self {
        Self::DatabaseError { source: e }
    }
}

impl From<revbot_queue_interface::QueueError> for DomainError {
    fn from(e: revbot_queue_interface::QueueError) -> Self {
        Self::QueueError { source: e }
    }
}

impl From<revbot_llm_interface::LlmError> for DomainError {
    fn from(e: revbot_llm_interface::LlmError) -> Self {
        Self::LlmError { source: e }
    }
}

/// Result alias for `DomainError`.
pub type Result<T> = core::result::Result<T, DomainError>;
