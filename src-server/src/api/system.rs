use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use crate::{
    error::ApiResult,
    main_lib::AppState,
    models::{FeatureFlags, SystemStatusResponse},
};

#[utoipa::path(get, path = "/api/v1/healthz", responses((status = 200, description = "Health")))]
pub async fn healthz() -> &'static str {
    "ok"
}

#[utoipa::path(get, path = "/api/v1/system-status", responses((status = 200, body = SystemStatusResponse)))]
pub(crate) async fn system_status(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<SystemStatusResponse>> {
    let catalog = state
        .advertiser_repository
        .get_catalog_counts()
        .map_err(reverso_core::Error::from)?;
    let auctions = state.auction_service.auction_count()?;
    let trades = state
        .trade_repository
        .count()
        .map_err(reverso_core::Error::from)?;
    let settlements = state
        .settlement_repository
        .count()
        .map_err(reverso_core::Error::from)?;

    Ok(Json(SystemStatusResponse {
        advertisers: catalog.advertisers,
        keywords: catalog.keywords,
        category_links: catalog.category_links,
        auctions,
        trades,
        settlements,
        match_cache_entries: state.auction_service.match_cache_entries(),
        features: FeatureFlags {
            auto_bidding: true,
            fallback_bids: true,
            match_cache: true,
            rate_limiter: true,
        },
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/system-status", get(system_status))
        .route("/healthz", get(healthz))
}
