use diesel::result::Error as DieselError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, UserError>;

/// Custom error type for user balance operations
#[derive(Debug, Error)]
pub enum UserError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<DieselError> for UserError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => UserError::NotFound("Record not found".to_string()),
            _ => UserError::DatabaseError(err.to_string()),
        }
    }
}
