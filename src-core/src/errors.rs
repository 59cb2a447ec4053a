use diesel::result::Error as DieselError;
use thiserror::Error;

use crate::advertisers::AdvertiserError;
use crate::auctions::AuctionError;
use crate::delivery::DeliveryError;
use crate::matching::MatchingError;
use crate::settlement::SettlementError;
use crate::signing::SigningError;
use crate::trades::TradeError;
use crate::users::UserError;

// Create a type alias for Result using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the marketplace core
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Advertiser error: {0}")]
    Advertiser(#[from] AdvertiserError),

    #[error("Matching error: {0}")]
    Matching(#[from] MatchingError),

    #[error("Auction error: {0}")]
    Auction(#[from] AuctionError),

    #[error("Signing error: {0}")]
    Signing(#[from] SigningError),

    #[error("Trade error: {0}")]
    Trade(#[from] TradeError),

    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("Settlement error: {0}")]
    Settlement(#[from] SettlementError),

    #[error("User error: {0}")]
    User(#[from] UserError),
}

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(#[from] diesel::result::ConnectionError),

    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(#[from] r2d2::Error),

    #[error("Database query failed: {0}")]
    QueryFailed(#[from] DieselError),

    #[error("Database migration failed: {0}")]
    MigrationFailed(String),
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Value out of range: {0}")]
    OutOfRange(String),
}

// Implement From for DieselError to Error directly
impl From<DieselError> for Error {
    fn from(err: DieselError) -> Self {
        Error::Database(DatabaseError::QueryFailed(err))
    }
}

impl From<r2d2::Error> for Error {
    fn from(e: r2d2::Error) -> Self {
        Error::Database(DatabaseError::PoolCreationFailed(e))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}
