use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use crate::auctions::auctions_errors::{AuctionError, Result};
use crate::db::get_connection;
use crate::schema::advertiser_daily_spend;

/// Budget admission for candidate bids.
///
/// Spend is tracked per (advertiser, calendar day) in a counter row, and
/// admission is a single conditional increment: the update only matches while
/// `spent + bid <= daily_budget`, so two concurrent auctions cannot both
/// admit past the budget. Admitted spend is never refunded.
pub struct BudgetGate;

impl BudgetGate {
    /// Charges `bid_price` against the advertiser's budget for `day` if it
    /// fits. Runs on the caller's (transaction) connection; returns whether
    /// the bid was admitted.
    pub fn try_admit(
        conn: &mut SqliteConnection,
        advertiser_id: &str,
        day: NaiveDate,
        bid_price: f64,
        daily_budget: f64,
    ) -> QueryResult<bool> {
        diesel::insert_into(advertiser_daily_spend::table)
            .values((
                advertiser_daily_spend::advertiser_id.eq(advertiser_id),
                advertiser_daily_spend::day.eq(day),
                advertiser_daily_spend::spent.eq(0.0_f64),
            ))
            .on_conflict_do_nothing()
            .execute(conn)?;

        let affected = diesel::update(
            advertiser_daily_spend::table
                .filter(advertiser_daily_spend::advertiser_id.eq(advertiser_id))
                .filter(advertiser_daily_spend::day.eq(day))
                .filter(advertiser_daily_spend::spent.le(daily_budget - bid_price)),
        )
        .set(advertiser_daily_spend::spent.eq(advertiser_daily_spend::spent + bid_price))
        .execute(conn)?;

        Ok(affected == 1)
    }

    /// Today-to-date spend for an advertiser, zero when no counter exists.
    pub fn spent_on(
        pool: &Arc<Pool<ConnectionManager<SqliteConnection>>>,
        advertiser_id: &str,
        day: NaiveDate,
    ) -> Result<f64> {
        let mut conn = get_connection(pool)
            .map_err(|e| AuctionError::DatabaseError(e.to_string()))?;

        advertiser_daily_spend::table
            .filter(advertiser_daily_spend::advertiser_id.eq(advertiser_id))
            .filter(advertiser_daily_spend::day.eq(day))
            .select(advertiser_daily_spend::spent)
            .first::<f64>(&mut conn)
            .optional()
            .map(|spent| spent.unwrap_or(0.0))
            .map_err(AuctionError::from)
    }
}
