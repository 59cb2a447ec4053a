use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::get_connection;
use crate::schema::trades;
use crate::trades::trades_errors::{Result, TradeError};
use crate::trades::trades_model::{NewTrade, Trade, TradeDB, TradeStatus};

/// Repository for managing trade data in the database
pub struct TradeRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl TradeRepository {
    /// Creates a new TradeRepository instance
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    /// Creates a trade in PENDING_VERIFICATION for a claimed bid.
    pub fn create(&self, new_trade: NewTrade) -> Result<Trade> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| TradeError::DatabaseError(e.to_string()))?;

        let now = Utc::now().naive_utc();
        let trade_db = TradeDB {
            id: format!("trade-{}", Uuid::new_v4()),
            user_id: new_trade.user_id,
            bid_id: new_trade.bid_id,
            primary_reward: new_trade.primary_reward,
            secondary_reward: None,
            status: TradeStatus::PendingVerification.as_str().to_string(),
            settlement_decision: None,
            created_at: now,
            updated_at: now,
        };

        diesel::insert_into(trades::table)
            .values(&trade_db)
            .execute(&mut conn)?;

        Trade::try_from(trade_db)
    }

    /// Retrieves a trade by its ID
    pub fn get_by_id(&self, trade_id: &str) -> Result<Trade> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| TradeError::DatabaseError(e.to_string()))?;

        trades::table
            .find(trade_id)
            .select(TradeDB::as_select())
            .first::<TradeDB>(&mut conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    TradeError::NotFound(format!("Trade with id {} not found", trade_id))
                }
                _ => TradeError::DatabaseError(e.to_string()),
            })
            .and_then(Trade::try_from)
    }

    /// Retrieves the most recent trade claiming a given bid.
    pub fn find_by_bid_id(&self, bid_id: &str) -> Result<Option<Trade>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| TradeError::DatabaseError(e.to_string()))?;

        trades::table
            .filter(trades::bid_id.eq(bid_id))
            .order(trades::created_at.desc())
            .select(TradeDB::as_select())
            .first::<TradeDB>(&mut conn)
            .optional()?
            .map(Trade::try_from)
            .transpose()
    }

    /// Moves a PENDING_VERIFICATION trade to PENDING_RETURN. Returns whether
    /// the row was actually transitioned (false when it already was).
    pub fn mark_pending_return(&self, trade_id: &str) -> Result<bool> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| TradeError::DatabaseError(e.to_string()))?;

        let affected = diesel::update(
            trades::table
                .find(trade_id)
                .filter(trades::status.eq(TradeStatus::PendingVerification.as_str())),
        )
        .set((
            trades::status.eq(TradeStatus::PendingReturn.as_str()),
            trades::updated_at.eq(Utc::now().naive_utc()),
        ))
        .execute(&mut conn)?;

        Ok(affected == 1)
    }

    /// Stamps a terminal SLA decision status on the trade ahead of
    /// settlement. Decisions may be recomputed, so this overwrites earlier
    /// terminal values but never resurrects a pending state.
    pub fn record_decision(&self, trade_id: &str, status: TradeStatus) -> Result<()> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| TradeError::DatabaseError(e.to_string()))?;

        diesel::update(trades::table.find(trade_id))
            .set((
                trades::status.eq(status.as_str()),
                trades::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(&mut conn)?;

        Ok(())
    }

    /// Total number of trades, for the diagnostics endpoint.
    pub fn count(&self) -> Result<i64> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| TradeError::DatabaseError(e.to_string()))?;

        trades::table
            .count()
            .get_result(&mut conn)
            .map_err(TradeError::from)
    }
}
