use diesel::result::Error as DieselError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AdvertiserError>;

/// Custom error type for advertiser-catalog operations
#[derive(Debug, Error)]
pub enum AdvertiserError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<DieselError> for AdvertiserError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => AdvertiserError::NotFound("Record not found".to_string()),
            _ => AdvertiserError::DatabaseError(err.to_string()),
        }
    }
}
