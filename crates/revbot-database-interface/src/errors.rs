use thiserror::Error;

/// Database error.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Unknown user with id: {0}")]
    UnknownUser(u64),

    #[error("Unknown repository: {0}")]
    UnknownRepository(String),

    #[error("Unknown review with id: {0}")]
    UnknownReview(u64),

    #[error("Implementation error,\n  caused by: {source}")]
    ImplementationError {
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

/// Result alias for `DatabaseError`.
pub type Result<T> = core::result::Result<T, DatabaseError>;
