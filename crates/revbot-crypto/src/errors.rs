//! Crypto errors.

use thiserror::Error;

/// Crypto error.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Invalid signature format: {sig}")]
    InvalidSignatureFormat { sig: String },

    #[error("Invalid secret key length")]
    InvalidSecretKeyLength,
}

/// Result alias for `CryptoError`.
pub type Result<T> = core::result::Result<T, CryptoError>;
