use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};

use crate::{
    error::ApiResult,
    main_lib::AppState,
    models::{
        AuctionData, AuctionEnvelope, SelectBidRequest, SelectData, SelectEnvelope,
        StartAuctionRequest, StatusData, StatusEnvelope,
    },
};

/// Rate limiting keys on the caller: the gateway's forwarded address when
/// present, the process-local bucket otherwise.
fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(',').next().unwrap_or(v).trim().to_string())
        .unwrap_or_else(|| "local".to_string())
}

#[utoipa::path(post, path = "/api/v1/auctions/start", request_body = StartAuctionRequest,
    responses((status = 200, body = AuctionEnvelope), (status = 429, description = "Rate limited")))]
pub(crate) async fn start_auction(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<StartAuctionRequest>,
) -> ApiResult<Json<AuctionEnvelope>> {
    let result = state.auction_service.start_auction(
        &payload.query,
        payload.value_score,
        &client_key(&headers),
    )?;
    Ok(Json(AuctionEnvelope {
        success: true,
        data: AuctionData::from(result),
    }))
}

#[utoipa::path(get, path = "/api/v1/auctions/status/{search_id}",
    responses((status = 200, body = StatusEnvelope), (status = 404, description = "Unknown auction")))]
pub(crate) async fn auction_status(
    Path(search_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<StatusEnvelope>> {
    let result = state.auction_service.get_auction_status(&search_id)?;
    Ok(Json(StatusEnvelope {
        success: true,
        data: StatusData::from(result),
    }))
}

#[utoipa::path(post, path = "/api/v1/auctions/select", request_body = SelectBidRequest,
    responses((status = 200, body = SelectEnvelope), (status = 409, description = "Already completed")))]
pub(crate) async fn select_bid(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SelectBidRequest>,
) -> ApiResult<Json<SelectEnvelope>> {
    let outcome = state.auction_service.select_bid(
        &payload.search_id,
        &payload.selected_bid_id,
        &payload.user_id,
    )?;
    Ok(Json(SelectEnvelope {
        success: true,
        data: SelectData {
            reward_amount: outcome.reward_amount,
            search_id: outcome.search_id,
            selected_bid_id: outcome.selected_bid_id,
            trade_id: outcome.trade_id,
        },
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auctions/start", post(start_auction))
        .route("/auctions/select", post(select_bid))
        .route("/auctions/status/{search_id}", get(auction_status))
}
