use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use reverso_core::advertisers::AdvertiserError;
use reverso_core::auctions::AuctionError;
use reverso_core::delivery::DeliveryError;
use reverso_core::errors::Error as CoreError;
use reverso_core::matching::MatchingError;
use reverso_core::settlement::SettlementError;
use reverso_core::trades::TradeError;
use reverso_core::users::UserError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("Not Found")]
    NotFound,
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Internal(String),
    // Surface the underlying error message to help debugging during development
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match &self {
            ApiError::Core(e) => (core_status(e), e.to_string()),
            ApiError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason.clone()),
            ApiError::Unauthorized(reason) => (StatusCode::UNAUTHORIZED, reason.clone()),
            ApiError::Internal(reason) => (StatusCode::INTERNAL_SERVER_ERROR, reason.clone()),
            ApiError::Anyhow(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message: msg,
        });
        (status, body).into_response()
    }
}

fn core_status(e: &CoreError) -> StatusCode {
    match e {
        CoreError::Validation(_) => StatusCode::BAD_REQUEST,
        CoreError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
        CoreError::Signing(_) => StatusCode::UNAUTHORIZED,
        CoreError::Advertiser(AdvertiserError::NotFound(_))
        | CoreError::Auction(AuctionError::NotFound(_))
        | CoreError::Trade(TradeError::NotFound(_))
        | CoreError::User(UserError::NotFound(_))
        | CoreError::Delivery(DeliveryError::NotFound(_))
        | CoreError::Settlement(SettlementError::NotFound(_))
        | CoreError::Matching(MatchingError::Catalog(AdvertiserError::NotFound(_))) => {
            StatusCode::NOT_FOUND
        }
        CoreError::Auction(AuctionError::InvalidState(_))
        | CoreError::Trade(TradeError::InvalidTransition(_)) => StatusCode::CONFLICT,
        CoreError::Auction(AuctionError::InvalidData(_))
        | CoreError::Trade(TradeError::InvalidData(_))
        | CoreError::Delivery(DeliveryError::InvalidData(_))
        | CoreError::Settlement(SettlementError::InvalidData(_))
        | CoreError::Advertiser(AdvertiserError::InvalidData(_)) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
