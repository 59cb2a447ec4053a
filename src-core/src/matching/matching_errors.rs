use thiserror::Error;

use crate::advertisers::AdvertiserError;

pub type Result<T> = std::result::Result<T, MatchingError>;

/// Custom error type for advertiser-matching operations
#[derive(Debug, Error)]
pub enum MatchingError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] AdvertiserError),
    #[error("Database error: {0}")]
    DatabaseError(String),
}
