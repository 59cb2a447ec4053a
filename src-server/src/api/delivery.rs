use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};

use crate::{
    error::ApiResult,
    main_lib::AppState,
    models::{
        PendingReturnRequest, PendingReturnResponse, VerifyDeliveryRequest,
        VerifyDeliveryResponse, VerifyReturnRequest, VerifyReturnResponse,
    },
};

#[utoipa::path(post, path = "/api/v1/delivery/update-pending-return", request_body = PendingReturnRequest,
    responses((status = 200, body = PendingReturnResponse), (status = 409, description = "Already finalized")))]
pub(crate) async fn update_pending_return(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PendingReturnRequest>,
) -> ApiResult<Json<PendingReturnResponse>> {
    let status = state.delivery_service.mark_pending_return(&payload.trade_id)?;
    Ok(Json(PendingReturnResponse {
        status: status.as_str().to_string(),
        decision: None,
        message: "Click recorded, awaiting return".to_string(),
    }))
}

#[utoipa::path(post, path = "/api/v1/delivery/verify-return", request_body = VerifyReturnRequest,
    responses((status = 200, body = VerifyReturnResponse)))]
pub(crate) async fn verify_return(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<VerifyReturnRequest>,
) -> ApiResult<Json<VerifyReturnResponse>> {
    let verdict = state
        .delivery_service
        .verify_return(&payload.trade_id, payload.dwell_time)?;
    Ok(Json(VerifyReturnResponse {
        status: verdict.final_status.as_str().to_string(),
        decision: verdict.decision.as_str().to_string(),
        trade_id: verdict.trade_id,
        dwell_time: verdict.dwell_time,
        message: format!("Delivery verified as {}", verdict.decision.as_str()),
    }))
}

#[utoipa::path(post, path = "/api/v1/delivery/verify-delivery", request_body = VerifyDeliveryRequest,
    responses((status = 200, body = VerifyDeliveryResponse)))]
pub(crate) async fn verify_delivery(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<VerifyDeliveryRequest>,
) -> ApiResult<Json<VerifyDeliveryResponse>> {
    let verdict = state.delivery_service.verify_delivery(
        &payload.trade_id,
        payload.v_atf,
        payload.clicked,
        payload.t_dwell_on_ad_site,
    )?;
    Ok(Json(VerifyDeliveryResponse {
        status: verdict.final_status.as_str().to_string(),
        decision: verdict.decision.as_str().to_string(),
        trade_id: verdict.trade_id,
        message: format!("Delivery verified as {}", verdict.decision.as_str()),
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/delivery/update-pending-return", post(update_pending_return))
        .route("/delivery/verify-return", post(verify_return))
        .route("/delivery/verify-delivery", post(verify_delivery))
}
