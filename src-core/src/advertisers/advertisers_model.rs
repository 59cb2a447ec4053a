use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Database model for advertisers
#[derive(Queryable, Insertable, Identifiable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::advertisers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct AdvertiserDB {
    pub id: String,
    pub name: String,
    pub landing_url: String,
    pub daily_budget: f64,
    pub max_bid_per_keyword: f64,
    pub min_quality_score: f64,
    pub auto_bid_enabled: bool,
    pub review_approved: bool,
    pub recommended_bid_min: Option<f64>,
    pub recommended_bid_max: Option<f64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Advertiser as seen by the bidding pipeline. The catalog is owned by the
/// advertiser-management service and is read-only here.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Advertiser {
    pub id: String,
    pub name: String,
    pub landing_url: String,
    pub daily_budget: f64,
    pub max_bid_per_keyword: f64,
    pub min_quality_score: f64,
    pub auto_bid_enabled: bool,
    pub review_approved: bool,
    pub recommended_bid_min: Option<f64>,
    pub recommended_bid_max: Option<f64>,
}

impl From<AdvertiserDB> for Advertiser {
    fn from(a: AdvertiserDB) -> Self {
        Self {
            id: a.id,
            name: a.name,
            landing_url: a.landing_url,
            daily_budget: a.daily_budget,
            max_bid_per_keyword: a.max_bid_per_keyword,
            min_quality_score: a.min_quality_score,
            auto_bid_enabled: a.auto_bid_enabled,
            review_approved: a.review_approved,
            recommended_bid_min: a.recommended_bid_min,
            recommended_bid_max: a.recommended_bid_max,
        }
    }
}

/// Keyword match strictness. Unknown values read back as `Broad`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Exact,
    Phrase,
    Broad,
}

impl MatchType {
    pub fn from_str_lossy(s: &str) -> Self {
        match s {
            "exact" => MatchType::Exact,
            "phrase" => MatchType::Phrase,
            _ => MatchType::Broad,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Exact => "exact",
            MatchType::Phrase => "phrase",
            MatchType::Broad => "broad",
        }
    }

    /// Scoring weight per match strictness.
    pub fn weight(&self) -> f64 {
        match self {
            MatchType::Exact => 1.0,
            MatchType::Phrase => 0.85,
            MatchType::Broad => 0.7,
        }
    }
}

/// Database model for advertiser keywords
#[derive(Queryable, Insertable, Identifiable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::keywords)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct KeywordDB {
    pub id: String,
    pub advertiser_id: String,
    pub keyword: String,
    pub priority: i32,
    pub match_type: String,
    pub created_at: NaiveDateTime,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Keyword {
    pub id: String,
    pub advertiser_id: String,
    pub keyword: String,
    pub priority: i32,
    pub match_type: MatchType,
}

impl From<KeywordDB> for Keyword {
    fn from(k: KeywordDB) -> Self {
        Self {
            id: k.id,
            advertiser_id: k.advertiser_id,
            keyword: k.keyword,
            priority: k.priority,
            match_type: MatchType::from_str_lossy(&k.match_type),
        }
    }
}

/// Category definition (shared taxonomy node)
#[derive(Queryable, Insertable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::categories)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub path: String,
    pub name: String,
}

/// Link between an advertiser and a category path
#[derive(Queryable, Insertable, Identifiable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::advertiser_categories)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct AdvertiserCategory {
    pub id: String,
    pub advertiser_id: String,
    pub category_path: String,
    pub is_primary: bool,
}

/// Catalog entity counts for the diagnostics endpoint
#[derive(Serialize, Debug, Clone, Copy, Default)]
#[serde(rename_all = "camelCase")]
pub struct CatalogCounts {
    pub advertisers: i64,
    pub keywords: i64,
    pub category_links: i64,
}
