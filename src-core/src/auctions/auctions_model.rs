use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::auctions::auctions_constants::FALLBACK_BID_PREFIX;
use crate::auctions::auctions_errors::{AuctionError, Result};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuctionStatus {
    Active,
    Completed,
    Cancelled,
}

impl AuctionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuctionStatus::Active => "active",
            AuctionStatus::Completed => "completed",
            AuctionStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "active" => Ok(AuctionStatus::Active),
            "completed" => Ok(AuctionStatus::Completed),
            "cancelled" => Ok(AuctionStatus::Cancelled),
            other => Err(AuctionError::InvalidData(format!(
                "Unknown auction status '{}'",
                other
            ))),
        }
    }
}

/// Database model for auctions
#[derive(Queryable, Insertable, Identifiable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::auctions)]
#[diesel(primary_key(search_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct AuctionDB {
    pub search_id: String,
    pub query: String,
    pub status: String,
    pub selected_bid_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub expires_at: NaiveDateTime,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Auction {
    pub search_id: String,
    pub query: String,
    pub status: AuctionStatus,
    pub selected_bid_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub expires_at: NaiveDateTime,
}

impl Auction {
    /// Expiry is advisory and evaluated on read: an active auction past its
    /// expires_at reads as cancelled. The row itself is never rewritten.
    pub fn effective_status(&self, now: NaiveDateTime) -> AuctionStatus {
        if self.status == AuctionStatus::Active && now > self.expires_at {
            AuctionStatus::Cancelled
        } else {
            self.status
        }
    }

}

impl TryFrom<AuctionDB> for Auction {
    type Error = AuctionError;

    fn try_from(a: AuctionDB) -> Result<Self> {
        Ok(Self {
            status: AuctionStatus::parse(&a.status)?,
            search_id: a.search_id,
            query: a.query,
            selected_bid_id: a.selected_bid_id,
            created_at: a.created_at,
            expires_at: a.expires_at,
        })
    }
}

/// Database model for bids. Immutable once the auction is created.
#[derive(Queryable, Insertable, Identifiable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::bids)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct BidDB {
    pub id: String,
    pub auction_id: String,
    pub buyer_name: String,
    pub price: f64,
    pub bonus: Option<String>,
    pub landing_url: String,
    pub advertiser_id: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    pub id: String,
    pub buyer_name: String,
    pub price: f64,
    pub bonus: Option<String>,
    pub landing_url: String,
    pub advertiser_id: Option<String>,
    #[serde(rename = "timestamp")]
    pub created_at: NaiveDateTime,
}

impl Bid {
    /// Fallback bids are platform-owned: never budget-charged, fixed payout.
    pub fn is_fallback(&self) -> bool {
        self.id.starts_with(FALLBACK_BID_PREFIX)
    }
}

impl From<BidDB> for Bid {
    fn from(b: BidDB) -> Self {
        Self {
            id: b.id,
            buyer_name: b.buyer_name,
            price: b.price,
            bonus: b.bonus,
            landing_url: b.landing_url,
            advertiser_id: b.advertiser_id,
            created_at: b.created_at,
        }
    }
}

/// An auction together with its ranked bid list.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AuctionWithBids {
    pub auction: Auction,
    pub bids: Vec<Bid>,
}

/// Result of selecting a bid: the auction completes and a trade opens.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SelectOutcome {
    pub search_id: String,
    pub selected_bid_id: String,
    pub trade_id: String,
    pub reward_amount: f64,
}
