use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::{SettleTradeRequest, SettleTradeResponse},
};
use reverso_core::delivery::SlaDecision;

#[utoipa::path(post, path = "/api/v1/settlement/settle-trade", request_body = SettleTradeRequest,
    responses((status = 200, body = SettleTradeResponse), (status = 404, description = "Unknown trade")))]
pub(crate) async fn settle_trade(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SettleTradeRequest>,
) -> ApiResult<Json<SettleTradeResponse>> {
    let decision = SlaDecision::parse(&payload.verification_decision)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let dwell_time = payload
        .dwell_time
        .or_else(|| payload.metrics.as_ref().and_then(|m| m.t_dwell_on_ad_site))
        .unwrap_or(0.0);

    let outcome = state
        .settlement_service
        .settle(&payload.trade_id, decision, dwell_time)?;

    // The ledger is committed; mirroring the balance change is best-effort.
    state.notifier.notify_settlement(&outcome).await;

    let message = if outcome.is_noop() {
        "Settlement re-applied with no balance change".to_string()
    } else {
        format!("Applied {} to user balance", outcome.applied_delta)
    };

    Ok(Json(SettleTradeResponse {
        success: true,
        trade_id: outcome.trade_id,
        verification_decision: outcome.decision.as_str().to_string(),
        payable_amount: outcome.payable_amount,
        final_status: outcome.final_status.as_str().to_string(),
        message,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/settlement/settle-trade", post(settle_trade))
}
