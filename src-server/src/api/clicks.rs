use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use tracing::debug;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::{VerifyClickRequest, VerifyClickResponse},
};
use reverso_core::signing::{BidType, PLATFORM_CLICK_PAYOUT};

/// Authorizes a reward claim at redirect time. The HMAC binds bid id, payout
/// and bid type, so authorization needs no database read; the bid lookup only
/// resolves the destination, and the click itself is still recorded.
#[utoipa::path(post, path = "/api/v1/clicks/verify-click", request_body = VerifyClickRequest,
    responses((status = 200, body = VerifyClickResponse), (status = 401, description = "Invalid signature")))]
pub(crate) async fn verify_click(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<VerifyClickRequest>,
) -> ApiResult<Json<VerifyClickResponse>> {
    let bid_type = BidType::parse(&payload.bid_type)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    if !state
        .click_signer
        .verify(&payload.bid_id, payload.payout, bid_type, &payload.sig)
    {
        return Err(ApiError::Unauthorized("Invalid click signature".to_string()));
    }

    let bid = state
        .auction_repository
        .get_bid(&payload.bid_id)
        .map_err(reverso_core::Error::from)?;

    // The signature is the authority, but a signed payout that disagrees
    // with the stored bid means a stale or mixed-up token.
    let expected_payout = match bid_type {
        BidType::Platform => PLATFORM_CLICK_PAYOUT,
        BidType::Advertiser => bid.price,
    };
    if payload.payout != expected_payout {
        return Err(ApiError::Unauthorized(
            "Signed payout does not match the bid".to_string(),
        ));
    }

    // Record the click against the claiming trade, when one exists already.
    match state
        .trade_repository
        .find_by_bid_id(&payload.bid_id)
        .map_err(reverso_core::Error::from)?
    {
        Some(trade) => {
            state.delivery_service.record_click(&trade.id)?;
        }
        None => debug!("Click on bid {} before any claim", payload.bid_id),
    }

    Ok(Json(VerifyClickResponse {
        user_id: payload.user_id,
        bid_type: bid_type.as_str().to_string(),
        payout: payload.payout,
        destination: bid.landing_url,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/clicks/verify-click", post(verify_click))
}
