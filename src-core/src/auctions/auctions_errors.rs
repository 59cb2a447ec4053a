use diesel::result::Error as DieselError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AuctionError>;

/// Custom error type for auction operations
#[derive(Debug, Error)]
pub enum AuctionError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Invalid auction state: {0}")]
    InvalidState(String),
}

impl From<DieselError> for AuctionError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => AuctionError::NotFound("Record not found".to_string()),
            _ => AuctionError::DatabaseError(err.to_string()),
        }
    }
}
