use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use reverso_core::auctions as core_auctions;

#[derive(Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StartAuctionRequest {
    pub query: String,
    pub value_score: f64,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BidView {
    pub id: String,
    pub buyer_name: String,
    pub price: f64,
    pub bonus: Option<String>,
    pub timestamp: NaiveDateTime,
    pub landing_url: String,
}

impl From<core_auctions::Bid> for BidView {
    fn from(b: core_auctions::Bid) -> Self {
        Self {
            id: b.id,
            buyer_name: b.buyer_name,
            price: b.price,
            bonus: b.bonus,
            timestamp: b.created_at,
            landing_url: b.landing_url,
        }
    }
}

#[derive(Serialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AuctionData {
    pub search_id: String,
    pub query: String,
    pub bids: Vec<BidView>,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub expires_at: NaiveDateTime,
}

impl From<core_auctions::AuctionWithBids> for AuctionData {
    fn from(a: core_auctions::AuctionWithBids) -> Self {
        Self {
            search_id: a.auction.search_id,
            query: a.auction.query,
            bids: a.bids.into_iter().map(BidView::from).collect(),
            status: a.auction.status.as_str().to_string(),
            created_at: a.auction.created_at,
            expires_at: a.auction.expires_at,
        }
    }
}

#[derive(Serialize, ToSchema, Debug, Clone)]
pub struct AuctionEnvelope {
    pub success: bool,
    pub data: AuctionData,
}

#[derive(Serialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AuctionView {
    pub search_id: String,
    pub query: String,
    pub status: String,
    pub selected_bid_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub expires_at: NaiveDateTime,
}

/// Status endpoint payload: the auction, its ranked bids, and the effective
/// status (expiry folded in) surfaced once more at the top level.
#[derive(Serialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StatusData {
    pub auction: AuctionView,
    pub bids: Vec<BidView>,
    pub status: String,
}

#[derive(Serialize, ToSchema, Debug, Clone)]
pub struct StatusEnvelope {
    pub success: bool,
    pub data: StatusData,
}

impl From<core_auctions::AuctionWithBids> for StatusData {
    fn from(a: core_auctions::AuctionWithBids) -> Self {
        let status = a.auction.status.as_str().to_string();
        Self {
            auction: AuctionView {
                search_id: a.auction.search_id,
                query: a.auction.query,
                status: status.clone(),
                selected_bid_id: a.auction.selected_bid_id,
                created_at: a.auction.created_at,
                expires_at: a.auction.expires_at,
            },
            bids: a.bids.into_iter().map(BidView::from).collect(),
            status,
        }
    }
}

#[derive(Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SelectBidRequest {
    pub search_id: String,
    pub selected_bid_id: String,
    /// Injected by the gateway from the caller's session.
    pub user_id: String,
}

#[derive(Serialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SelectData {
    pub reward_amount: f64,
    pub search_id: String,
    pub selected_bid_id: String,
    pub trade_id: String,
}

#[derive(Serialize, ToSchema, Debug, Clone)]
pub struct SelectEnvelope {
    pub success: bool,
    pub data: SelectData,
}

#[derive(Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VerifyClickRequest {
    pub bid_id: String,
    pub payout: f64,
    pub bid_type: String,
    pub sig: String,
    /// Injected by the gateway from the caller's session.
    pub user_id: String,
}

#[derive(Serialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VerifyClickResponse {
    pub user_id: String,
    #[serde(rename = "type")]
    pub bid_type: String,
    pub payout: f64,
    pub destination: String,
}

#[derive(Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PendingReturnRequest {
    #[serde(alias = "trade_id")]
    pub trade_id: String,
}

#[derive(Serialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PendingReturnResponse {
    pub status: String,
    pub decision: Option<String>,
    pub message: String,
}

#[derive(Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VerifyReturnRequest {
    #[serde(alias = "trade_id")]
    pub trade_id: String,
    #[serde(alias = "dwell_time")]
    pub dwell_time: f64,
}

#[derive(Serialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VerifyReturnResponse {
    pub status: String,
    pub decision: String,
    pub trade_id: String,
    pub dwell_time: f64,
    pub message: String,
}

#[derive(Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VerifyDeliveryRequest {
    #[serde(alias = "trade_id")]
    pub trade_id: String,
    #[serde(alias = "v_atf")]
    pub v_atf: f64,
    pub clicked: bool,
    #[serde(alias = "t_dwell_on_ad_site")]
    pub t_dwell_on_ad_site: f64,
}

#[derive(Serialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VerifyDeliveryResponse {
    pub status: String,
    pub decision: String,
    pub trade_id: String,
    pub message: String,
}

#[derive(Deserialize, ToSchema, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct MetricsPayload {
    #[serde(alias = "v_atf")]
    pub v_atf: Option<f64>,
    pub clicked: Option<bool>,
    #[serde(alias = "t_dwell_on_ad_site")]
    pub t_dwell_on_ad_site: Option<f64>,
}

#[derive(Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SettleTradeRequest {
    #[serde(alias = "trade_id")]
    pub trade_id: String,
    #[serde(alias = "verification_decision")]
    pub verification_decision: String,
    #[serde(alias = "dwell_time")]
    pub dwell_time: Option<f64>,
    pub metrics: Option<MetricsPayload>,
}

#[derive(Serialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SettleTradeResponse {
    pub success: bool,
    pub trade_id: String,
    pub verification_decision: String,
    pub payable_amount: f64,
    pub final_status: String,
    pub message: String,
}

#[derive(Serialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FeatureFlags {
    pub auto_bidding: bool,
    pub fallback_bids: bool,
    pub match_cache: bool,
    pub rate_limiter: bool,
}

#[derive(Serialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatusResponse {
    pub advertisers: i64,
    pub keywords: i64,
    pub category_links: i64,
    pub auctions: i64,
    pub trades: i64,
    pub settlements: i64,
    pub match_cache_entries: usize,
    pub features: FeatureFlags,
}
