use std::sync::Arc;

use axum::{http::HeaderValue, routing::get, Json, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::{config::Config, main_lib::AppState, models};

pub mod auctions;
pub mod clicks;
pub mod delivery;
pub mod settlement;
pub mod system;

#[derive(OpenApi)]
#[openapi(
    paths(
        auctions::start_auction,
        auctions::select_bid,
        auctions::auction_status,
        clicks::verify_click,
        delivery::update_pending_return,
        delivery::verify_return,
        delivery::verify_delivery,
        settlement::settle_trade,
        system::system_status,
        system::healthz,
    ),
    components(schemas(
        models::StartAuctionRequest,
        models::BidView,
        models::AuctionData,
        models::AuctionEnvelope,
        models::AuctionView,
        models::StatusData,
        models::StatusEnvelope,
        models::SelectBidRequest,
        models::SelectData,
        models::SelectEnvelope,
        models::VerifyClickRequest,
        models::VerifyClickResponse,
        models::PendingReturnRequest,
        models::PendingReturnResponse,
        models::VerifyReturnRequest,
        models::VerifyReturnResponse,
        models::VerifyDeliveryRequest,
        models::VerifyDeliveryResponse,
        models::MetricsPayload,
        models::SettleTradeRequest,
        models::SettleTradeResponse,
        models::FeatureFlags,
        models::SystemStatusResponse,
    ))
)]
struct ApiDoc;

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let cors = build_cors(&config.cors_allow);

    let api = Router::new()
        .merge(auctions::router())
        .merge(clicks::router())
        .merge(delivery::router())
        .merge(settlement::router())
        .merge(system::router());

    let openapi = ApiDoc::openapi();

    Router::new()
        .nest("/api/v1", api)
        .route("/openapi.json", get(|| async { Json(openapi) }))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(cors)
        .with_state(state)
}

fn build_cors(allowed: &[String]) -> CorsLayer {
    if allowed.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }
    let origins: Vec<HeaderValue> = allowed
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
