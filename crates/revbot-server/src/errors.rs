//! Server errors.

use actix_web::{http::StatusCode, ResponseError};
use thiserror::Error;

use crate::event_type::EventType;

/// Server error.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(
        "Error while parsing webhook event for type {},\n  caused by: {}",
        event_type,
        source
    )]
    EventParseError {
        event_type: EventType,
        source: serde_json::Error,
    },

    #[error("Missing webhook signature.")]
    MissingWebhookSignature,

    #[error("Invalid webhook signature.")]
    InvalidWebhookSignature,

    #[error("I/O error,\n  caused by: {}", source)]
    IoError { source: std::io::Error },

    #[error("Domain error,\n  caused by: {}", source)]
    DomainError { source: revbot_core::DomainError },

    #[error("GitHub API error,\n  caused by: {}", source)]
    ApiError {
        source: revbot_ghapi_interface::ApiError,
    },

    #[error("LLM API error,\n  caused by: {}", source)]
    LlmError {
        source: revbot_llm_interface::LlmError,
    },
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match &self {
            // Unauthenticated callers get the same answer either way.
            ServerError::InvalidWebhookSignature | ServerError::MissingWebhookSignature => {
                StatusCode::UNAUTHORIZED
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Result alias for `ServerError`.
pub type Result<T> = core::result::Result<T, ServerError>;
