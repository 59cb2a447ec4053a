use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use crate::auctions::auctions_errors::{AuctionError, Result};
use crate::auctions::auctions_model::{Auction, AuctionDB, AuctionStatus, Bid, BidDB};
use crate::db::get_connection;
use crate::schema::{auctions, bids};

/// Repository for reading auctions and bids. Creation happens inside the
/// orchestrating service's transaction; rows are immutable afterwards except
/// for the one conditional completion update.
pub struct AuctionRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl AuctionRepository {
    /// Creates a new AuctionRepository instance
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    /// Retrieves an auction by its search ID
    pub fn get_by_search_id(&self, search_id: &str) -> Result<Auction> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| AuctionError::DatabaseError(e.to_string()))?;

        auctions::table
            .find(search_id)
            .select(AuctionDB::as_select())
            .first::<AuctionDB>(&mut conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    AuctionError::NotFound(format!("Auction with id {} not found", search_id))
                }
                _ => AuctionError::DatabaseError(e.to_string()),
            })
            .and_then(Auction::try_from)
    }

    /// Ranked bid list for an auction, highest price first.
    pub fn get_bids(&self, search_id: &str) -> Result<Vec<Bid>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| AuctionError::DatabaseError(e.to_string()))?;

        bids::table
            .filter(bids::auction_id.eq(search_id))
            .order((bids::price.desc(), bids::created_at.asc(), bids::id.asc()))
            .select(BidDB::as_select())
            .load::<BidDB>(&mut conn)
            .map(|rows| rows.into_iter().map(Bid::from).collect())
            .map_err(AuctionError::from)
    }

    /// Retrieves a bid by its ID
    pub fn get_bid(&self, bid_id: &str) -> Result<Bid> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| AuctionError::DatabaseError(e.to_string()))?;

        bids::table
            .find(bid_id)
            .select(BidDB::as_select())
            .first::<BidDB>(&mut conn)
            .map(Bid::from)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    AuctionError::NotFound(format!("Bid with id {} not found", bid_id))
                }
                _ => AuctionError::DatabaseError(e.to_string()),
            })
    }

    /// Completes an active auction with the selected bid. The update is
    /// conditional on the row still being active, so a repeated or
    /// concurrent select cannot overwrite an earlier winner.
    pub fn complete_if_active(
        conn: &mut SqliteConnection,
        search_id: &str,
        selected_bid: &str,
    ) -> QueryResult<bool> {
        let affected = diesel::update(
            auctions::table
                .find(search_id)
                .filter(auctions::status.eq(AuctionStatus::Active.as_str())),
        )
        .set((
            auctions::status.eq(AuctionStatus::Completed.as_str()),
            auctions::selected_bid_id.eq(selected_bid),
        ))
        .execute(conn)?;

        Ok(affected == 1)
    }

    /// Total number of auctions, for the diagnostics endpoint.
    pub fn count(&self) -> Result<i64> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| AuctionError::DatabaseError(e.to_string()))?;

        auctions::table
            .count()
            .get_result(&mut conn)
            .map_err(AuctionError::from)
    }
}
