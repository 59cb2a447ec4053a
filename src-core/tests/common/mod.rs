use std::sync::Arc;

use chrono::{Duration, Utc};
use diesel::prelude::*;
use tempfile::TempDir;
use uuid::Uuid;

use reverso_core::db::{self, DbPool};
use reverso_core::schema::{advertisers, auctions, bids, keywords, users};
use reverso_core::trades::{NewTrade, TradeRepository};
use reverso_core::users::{NewUser, UserRepository};

/// A pooled SQLite database in a temp directory, migrated and ready.
pub struct TestDb {
    pub pool: Arc<DbPool>,
    _dir: TempDir,
}

pub fn setup_db() -> TestDb {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir
        .path()
        .join("marketplace.db")
        .to_str()
        .expect("utf-8 path")
        .to_string();
    let db_path = db::init(&db_path).expect("db init");
    let pool = db::create_pool(&db_path).expect("pool");
    db::run_migrations(&pool).expect("migrations");
    TestDb { pool, _dir: dir }
}

#[allow(dead_code)]
pub fn seed_advertiser(
    pool: &Arc<DbPool>,
    id: &str,
    daily_budget: f64,
    max_bid: f64,
    min_quality: f64,
    review: Option<(f64, f64)>,
) {
    let mut conn = pool.get().unwrap();
    let now = Utc::now().naive_utc();
    diesel::insert_into(advertisers::table)
        .values((
            advertisers::id.eq(id),
            advertisers::name.eq(format!("Advertiser {id}")),
            advertisers::landing_url.eq(format!("https://{id}.example.com")),
            advertisers::daily_budget.eq(daily_budget),
            advertisers::max_bid_per_keyword.eq(max_bid),
            advertisers::min_quality_score.eq(min_quality),
            advertisers::auto_bid_enabled.eq(true),
            advertisers::review_approved.eq(review.is_some()),
            advertisers::recommended_bid_min.eq(review.map(|r| r.0)),
            advertisers::recommended_bid_max.eq(review.map(|r| r.1)),
            advertisers::created_at.eq(now),
            advertisers::updated_at.eq(now),
        ))
        .execute(&mut conn)
        .unwrap();
}

#[allow(dead_code)]
pub fn seed_keyword(
    pool: &Arc<DbPool>,
    advertiser_id: &str,
    text: &str,
    priority: i32,
    match_type: &str,
) {
    let mut conn = pool.get().unwrap();
    diesel::insert_into(keywords::table)
        .values((
            keywords::id.eq(format!("kw-{}", Uuid::new_v4())),
            keywords::advertiser_id.eq(advertiser_id),
            keywords::keyword.eq(text),
            keywords::priority.eq(priority),
            keywords::match_type.eq(match_type),
            keywords::created_at.eq(Utc::now().naive_utc()),
        ))
        .execute(&mut conn)
        .unwrap();
}

#[allow(dead_code)]
pub fn seed_user(pool: &Arc<DbPool>, id: &str) {
    UserRepository::new(pool.clone())
        .create(NewUser {
            id: Some(id.to_string()),
            display_name: format!("User {id}"),
        })
        .unwrap();
}

#[allow(dead_code)]
pub fn get_balance(pool: &Arc<DbPool>, user_id: &str) -> f64 {
    UserRepository::new(pool.clone())
        .get_by_id(user_id)
        .unwrap()
        .balance
}

#[allow(dead_code)]
pub fn set_balance(pool: &Arc<DbPool>, user_id: &str, amount: f64) {
    let mut conn = pool.get().unwrap();
    diesel::update(users::table.find(user_id))
        .set(users::balance.eq(amount))
        .execute(&mut conn)
        .unwrap();
}

/// Inserts an auction already past its advisory expiry, still marked
/// active, with one fallback-style bid. Returns (search_id, bid_id).
#[allow(dead_code)]
pub fn seed_expired_auction(pool: &Arc<DbPool>) -> (String, String) {
    let mut conn = pool.get().unwrap();
    let now = Utc::now().naive_utc();

    let search_id = format!("srch-{}", Uuid::new_v4());
    diesel::insert_into(auctions::table)
        .values((
            auctions::search_id.eq(&search_id),
            auctions::query.eq("stale query"),
            auctions::status.eq("active"),
            auctions::selected_bid_id.eq(Option::<String>::None),
            auctions::created_at.eq(now - Duration::minutes(45)),
            auctions::expires_at.eq(now - Duration::minutes(15)),
        ))
        .execute(&mut conn)
        .unwrap();

    let bid_id = format!("bid-{}", Uuid::new_v4());
    diesel::insert_into(bids::table)
        .values((
            bids::id.eq(&bid_id),
            bids::auction_id.eq(&search_id),
            bids::buyer_name.eq("Stale Advertiser"),
            bids::price.eq(80.0_f64),
            bids::bonus.eq(Option::<String>::None),
            bids::landing_url.eq("https://stale.example.com"),
            bids::advertiser_id.eq(Option::<String>::None),
            bids::created_at.eq(now - Duration::minutes(45)),
        ))
        .execute(&mut conn)
        .unwrap();

    (search_id, bid_id)
}

/// Inserts the auction/bid scaffolding a trade needs and the trade itself,
/// already claimed and awaiting verification. Returns the trade id.
#[allow(dead_code)]
pub fn seed_claimed_trade(pool: &Arc<DbPool>, user_id: &str, primary_reward: f64) -> String {
    let mut conn = pool.get().unwrap();
    let now = Utc::now().naive_utc();

    let search_id = format!("srch-{}", Uuid::new_v4());
    diesel::insert_into(auctions::table)
        .values((
            auctions::search_id.eq(&search_id),
            auctions::query.eq("fixture query"),
            auctions::status.eq("completed"),
            auctions::selected_bid_id.eq(Option::<String>::None),
            auctions::created_at.eq(now),
            auctions::expires_at.eq(now + Duration::minutes(30)),
        ))
        .execute(&mut conn)
        .unwrap();

    let bid_id = format!("bid-{}", Uuid::new_v4());
    diesel::insert_into(bids::table)
        .values((
            bids::id.eq(&bid_id),
            bids::auction_id.eq(&search_id),
            bids::buyer_name.eq("Fixture Advertiser"),
            bids::price.eq(100.0_f64),
            bids::bonus.eq(Option::<String>::None),
            bids::landing_url.eq("https://fixture.example.com"),
            bids::advertiser_id.eq(Option::<String>::None),
            bids::created_at.eq(now),
        ))
        .execute(&mut conn)
        .unwrap();

    let trade = TradeRepository::new(pool.clone())
        .create(NewTrade {
            user_id: user_id.to_string(),
            bid_id,
            primary_reward,
        })
        .unwrap();

    trade.id
}
