use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use crate::db::get_connection;
use crate::schema::settlements;
use crate::settlement::settlement_errors::{Result, SettlementError};
use crate::settlement::settlement_model::{Settlement, SettlementDB};

/// Read access to the settlement ledger. Appending happens inside the
/// settlement transaction; nothing ever updates or deletes a row.
pub struct SettlementRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl SettlementRepository {
    /// Creates a new SettlementRepository instance
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    /// Most recent ledger row for a trade; None before first settlement.
    pub fn latest_for_trade(&self, trade_id: &str) -> Result<Option<Settlement>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| SettlementError::DatabaseError(e.to_string()))?;

        settlements::table
            .filter(settlements::trade_id.eq(trade_id))
            .order(settlements::created_at.desc())
            .select(SettlementDB::as_select())
            .first::<SettlementDB>(&mut conn)
            .optional()?
            .map(|row| {
                Settlement::try_from(row)
                    .map_err(|e| SettlementError::InvalidData(e.to_string()))
            })
            .transpose()
    }

    /// Full audit history for a trade, oldest first.
    pub fn history_for_trade(&self, trade_id: &str) -> Result<Vec<Settlement>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| SettlementError::DatabaseError(e.to_string()))?;

        settlements::table
            .filter(settlements::trade_id.eq(trade_id))
            .order(settlements::created_at.asc())
            .select(SettlementDB::as_select())
            .load::<SettlementDB>(&mut conn)?
            .into_iter()
            .map(|row| {
                Settlement::try_from(row)
                    .map_err(|e| SettlementError::InvalidData(e.to_string()))
            })
            .collect()
    }

    /// Total number of ledger rows, for the diagnostics endpoint.
    pub fn count(&self) -> Result<i64> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| SettlementError::DatabaseError(e.to_string()))?;

        settlements::table
            .count()
            .get_result(&mut conn)
            .map_err(SettlementError::from)
    }
}
