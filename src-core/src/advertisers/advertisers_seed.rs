use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use log::info;
use std::sync::Arc;

use crate::advertisers::advertisers_errors::{AdvertiserError, Result};
use crate::advertisers::advertisers_model::{AdvertiserDB, Category, KeywordDB};
use crate::db::get_connection;
use crate::schema::{advertiser_categories, advertisers, categories, keywords, users};

/// Populates a small demo catalog (advertisers, keywords, categories) and a
/// demo user so a fresh database can serve auctions immediately.
///
/// No-op when the catalog already has advertisers. Returns whether anything
/// was written.
pub fn seed_demo_catalog(
    pool: &Arc<Pool<ConnectionManager<SqliteConnection>>>,
) -> Result<bool> {
    let mut conn =
        get_connection(pool).map_err(|e| AdvertiserError::DatabaseError(e.to_string()))?;

    let existing: i64 = advertisers::table.count().get_result(&mut conn)?;
    if existing > 0 {
        return Ok(false);
    }

    let now = Utc::now().naive_utc();

    let demo_advertisers = vec![
        demo_advertiser("adv-demo-coupang", "Coupang", "https://www.coupang.com", 5000.0, 300.0, 0.2, true, Some(120.0), Some(280.0), now),
        demo_advertiser("adv-demo-gmarket", "Gmarket", "https://www.gmarket.co.kr", 3000.0, 200.0, 0.3, false, None, None, now),
        demo_advertiser("adv-demo-musinsa", "Musinsa", "https://www.musinsa.com", 2000.0, 150.0, 0.0, true, Some(60.0), Some(140.0), now),
    ];

    let demo_keywords = vec![
        demo_keyword("kw-demo-1", "adv-demo-coupang", "shopping", 5, "broad", now),
        demo_keyword("kw-demo-2", "adv-demo-coupang", "delivery", 4, "phrase", now),
        demo_keyword("kw-demo-3", "adv-demo-gmarket", "shopping", 3, "broad", now),
        demo_keyword("kw-demo-4", "adv-demo-gmarket", "electronics", 4, "exact", now),
        demo_keyword("kw-demo-5", "adv-demo-musinsa", "fashion", 5, "exact", now),
        demo_keyword("kw-demo-6", "adv-demo-musinsa", "sneakers", 3, "broad", now),
    ];

    let demo_categories = vec![
        Category { path: "retail/general".to_string(), name: "shopping".to_string() },
        Category { path: "retail/fashion".to_string(), name: "fashion".to_string() },
        Category { path: "retail/electronics".to_string(), name: "electronics".to_string() },
    ];

    conn.transaction::<_, diesel::result::Error, _>(|tx_conn| {
        diesel::insert_into(advertisers::table)
            .values(&demo_advertisers)
            .execute(tx_conn)?;
        diesel::insert_into(keywords::table)
            .values(&demo_keywords)
            .execute(tx_conn)?;
        diesel::insert_into(categories::table)
            .values(&demo_categories)
            .execute(tx_conn)?;
        diesel::insert_into(advertiser_categories::table)
            .values(&vec![
                (
                    advertiser_categories::id.eq("advcat-demo-1"),
                    advertiser_categories::advertiser_id.eq("adv-demo-coupang"),
                    advertiser_categories::category_path.eq("retail/general"),
                    advertiser_categories::is_primary.eq(true),
                ),
                (
                    advertiser_categories::id.eq("advcat-demo-2"),
                    advertiser_categories::advertiser_id.eq("adv-demo-gmarket"),
                    advertiser_categories::category_path.eq("retail/electronics"),
                    advertiser_categories::is_primary.eq(false),
                ),
                (
                    advertiser_categories::id.eq("advcat-demo-3"),
                    advertiser_categories::advertiser_id.eq("adv-demo-musinsa"),
                    advertiser_categories::category_path.eq("retail/fashion"),
                    advertiser_categories::is_primary.eq(true),
                ),
            ])
            .execute(tx_conn)?;
        diesel::insert_into(users::table)
            .values(&vec![(
                users::id.eq("user-demo"),
                users::display_name.eq("Demo User"),
                users::balance.eq(0.0_f64),
                users::created_at.eq(now),
                users::updated_at.eq(now),
            )])
            .execute(tx_conn)?;
        Ok(())
    })?;

    info!("Seeded demo catalog: 3 advertisers, 6 keywords, 3 categories");
    Ok(true)
}

#[allow(clippy::too_many_arguments)]
fn demo_advertiser(
    id: &str,
    name: &str,
    landing_url: &str,
    daily_budget: f64,
    max_bid: f64,
    min_quality: f64,
    review_approved: bool,
    rec_min: Option<f64>,
    rec_max: Option<f64>,
    now: chrono::NaiveDateTime,
) -> AdvertiserDB {
    AdvertiserDB {
        id: id.to_string(),
        name: name.to_string(),
        landing_url: landing_url.to_string(),
        daily_budget,
        max_bid_per_keyword: max_bid,
        min_quality_score: min_quality,
        auto_bid_enabled: true,
        review_approved,
        recommended_bid_min: rec_min,
        recommended_bid_max: rec_max,
        created_at: now,
        updated_at: now,
    }
}

fn demo_keyword(
    id: &str,
    advertiser_id: &str,
    keyword: &str,
    priority: i32,
    match_type: &str,
    now: chrono::NaiveDateTime,
) -> KeywordDB {
    KeywordDB {
        id: id.to_string(),
        advertiser_id: advertiser_id.to_string(),
        keyword: keyword.to_string(),
        priority,
        match_type: match_type.to_string(),
        created_at: now,
    }
}
