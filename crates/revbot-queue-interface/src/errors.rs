use thiserror::Error;

/// Queue error.
#[derive(Debug, Error)]
pub enum QueueError {
    /// A stored job payload could not be decoded.
    #[error("Invalid job payload,\n  caused by: {source}")]
    InvalidJobPayload {
        /// Source error.
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// Implementation error.
    #[error("Implementation error,\n  caused by: {source}")]
    ImplementationError {
        /// Source error.
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

/// Result alias for `QueueError`.
pub type Result<T, E = QueueError> = core::result::Result<T, E>;
