use thiserror::Error;

pub type Result<T> = std::result::Result<T, SigningError>;

/// Custom error type for click-token signing
#[derive(Debug, Error)]
pub enum SigningError {
    #[error("Invalid signing key: {0}")]
    InvalidKey(String),
    #[error("Signature verification failed")]
    InvalidSignature,
    #[error("Unknown bid type: {0}")]
    UnknownBidType(String),
}
