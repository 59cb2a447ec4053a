use diesel::result::Error as DieselError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SettlementError>;

/// Custom error type for settlement operations
#[derive(Debug, Error)]
pub enum SettlementError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<DieselError> for SettlementError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => SettlementError::NotFound("Record not found".to_string()),
            _ => SettlementError::DatabaseError(err.to_string()),
        }
    }
}
