/// Bounds every bid price must respect, regardless of advertiser settings.
pub const GLOBAL_MIN_BID: f64 = 10.0;
pub const GLOBAL_MAX_BID: f64 = 50_000.0;

/// How long an auction stays selectable after creation.
pub const AUCTION_TTL_MINUTES: i64 = 30;

/// Auctions are topped up with fallback bids until they hold this many.
pub const MIN_BID_COUNT: usize = 3;

/// Primary reward drawn at selection time. Placeholder pricing policy: a
/// uniform draw, pending a real one.
pub const PRIMARY_REWARD_MIN: f64 = 500.0;
pub const PRIMARY_REWARD_MAX: f64 = 1500.0;

/// Fixed-window limiter for auction starts, keyed (client, query hash).
pub const RATE_LIMIT_WINDOW_SECS: u64 = 10;
pub const RATE_LIMIT_MAX_STARTS: u32 = 5;

/// Id prefix marking platform-owned fallback bids. These are never charged
/// to an advertiser and never counted against any budget.
pub const FALLBACK_BID_PREFIX: &str = "fallback-";

/// Catalogue of well-known destinations used to top auctions up. Order is
/// the top-up order; prices are fixed so fallback ranking is deterministic.
pub const FALLBACK_CATALOGUE: &[FallbackEntry] = &[
    FallbackEntry {
        buyer_name: "Amazon",
        landing_url: "https://www.amazon.com",
        price: 90.0,
        bonus: "Free shipping on first order",
    },
    FallbackEntry {
        buyer_name: "eBay",
        landing_url: "https://www.ebay.com",
        price: 70.0,
        bonus: "Daily deals up to 60% off",
    },
    FallbackEntry {
        buyer_name: "AliExpress",
        landing_url: "https://www.aliexpress.com",
        price: 50.0,
        bonus: "New user coupon",
    },
];

pub struct FallbackEntry {
    pub buyer_name: &'static str,
    pub landing_url: &'static str,
    pub price: f64,
    pub bonus: &'static str,
}
