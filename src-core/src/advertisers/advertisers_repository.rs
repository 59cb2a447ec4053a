use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use crate::advertisers::advertisers_errors::{AdvertiserError, Result};
use crate::advertisers::advertisers_model::*;
use crate::db::get_connection;
use crate::schema::{advertiser_categories, advertisers, categories, keywords};

/// Read-only repository over the advertiser catalog.
///
/// Matching issues a bounded, constant number of batch queries per request;
/// nothing here queries per-advertiser.
pub struct AdvertiserRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl AdvertiserRepository {
    /// Creates a new AdvertiserRepository instance
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    /// Retrieves all advertisers with auto-bidding enabled, including their
    /// budget and review settings. Ordering is stable (creation order) so the
    /// matcher's tie-breaking is deterministic.
    pub fn get_auto_bid_advertisers(&self) -> Result<Vec<Advertiser>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| AdvertiserError::DatabaseError(e.to_string()))?;

        advertisers::table
            .filter(advertisers::auto_bid_enabled.eq(true))
            .order((advertisers::created_at.asc(), advertisers::id.asc()))
            .select(AdvertiserDB::as_select())
            .load::<AdvertiserDB>(&mut conn)
            .map(|rows| rows.into_iter().map(Advertiser::from).collect())
            .map_err(AdvertiserError::from)
    }

    /// Retrieves a single advertiser by id.
    pub fn get_by_id(&self, advertiser_id: &str) -> Result<Advertiser> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| AdvertiserError::DatabaseError(e.to_string()))?;

        advertisers::table
            .find(advertiser_id)
            .select(AdvertiserDB::as_select())
            .first::<AdvertiserDB>(&mut conn)
            .map(Advertiser::from)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => AdvertiserError::NotFound(format!(
                    "Advertiser with id {} not found",
                    advertiser_id
                )),
                _ => AdvertiserError::DatabaseError(e.to_string()),
            })
    }

    /// One batch query: all keywords whose text contains (or equals) any of
    /// the given tokens.
    pub fn find_keywords_matching(&self, tokens: &[String]) -> Result<Vec<Keyword>> {
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = get_connection(&self.pool)
            .map_err(|e| AdvertiserError::DatabaseError(e.to_string()))?;

        let mut query = keywords::table.into_boxed();
        for token in tokens {
            query = query.or_filter(keywords::keyword.like(format!("%{}%", token)));
        }

        query
            .order((keywords::advertiser_id.asc(), keywords::id.asc()))
            .load::<KeywordDB>(&mut conn)
            .map(|rows| rows.into_iter().map(Keyword::from).collect())
            .map_err(AdvertiserError::from)
    }

    /// One batch query: category definitions whose display name contains any
    /// of the given tokens.
    pub fn find_categories_matching(&self, tokens: &[String]) -> Result<Vec<Category>> {
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = get_connection(&self.pool)
            .map_err(|e| AdvertiserError::DatabaseError(e.to_string()))?;

        let mut query = categories::table.into_boxed();
        for token in tokens {
            query = query.or_filter(categories::name.like(format!("%{}%", token)));
        }

        query
            .order(categories::path.asc())
            .load::<Category>(&mut conn)
            .map_err(AdvertiserError::from)
    }

    /// One batch query: all advertiser-category links on the given paths.
    pub fn get_category_links(&self, paths: &[String]) -> Result<Vec<AdvertiserCategory>> {
        if paths.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = get_connection(&self.pool)
            .map_err(|e| AdvertiserError::DatabaseError(e.to_string()))?;

        advertiser_categories::table
            .filter(advertiser_categories::category_path.eq_any(paths))
            .order((
                advertiser_categories::advertiser_id.asc(),
                advertiser_categories::id.asc(),
            ))
            .select(AdvertiserCategory::as_select())
            .load::<AdvertiserCategory>(&mut conn)
            .map_err(AdvertiserError::from)
    }

    /// Entity counts for the diagnostics endpoint.
    pub fn get_catalog_counts(&self) -> Result<CatalogCounts> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| AdvertiserError::DatabaseError(e.to_string()))?;

        let advertiser_count: i64 = advertisers::table.count().get_result(&mut conn)?;
        let keyword_count: i64 = keywords::table.count().get_result(&mut conn)?;
        let link_count: i64 = advertiser_categories::table.count().get_result(&mut conn)?;

        Ok(CatalogCounts {
            advertisers: advertiser_count,
            keywords: keyword_count,
            category_links: link_count,
        })
    }
}
