use diesel::result::Error as DieselError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DeliveryError>;

/// Custom error type for delivery-verification operations
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<DieselError> for DeliveryError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => DeliveryError::NotFound("Record not found".to_string()),
            _ => DeliveryError::DatabaseError(err.to_string()),
        }
    }
}
