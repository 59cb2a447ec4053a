use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use crate::db::get_connection;
use crate::delivery::delivery_errors::{DeliveryError, Result};
use crate::delivery::delivery_model::{DeliveryMetrics, DeliveryMetricsDB, DeliveryReport};
use crate::schema::delivery_metrics;

/// Repository for per-trade delivery metrics.
pub struct DeliveryRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl DeliveryRepository {
    /// Creates a new DeliveryRepository instance
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    /// Merges a client report into the trade's metrics row.
    ///
    /// Reports are duplicate- and out-of-order-tolerant: dwell keeps the
    /// maximum seen so far, clicked sticks once set. The read-merge-write
    /// runs under the write lock so racing reports serialise.
    pub fn upsert_report(&self, trade_id: &str, report: DeliveryReport) -> Result<DeliveryMetrics> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| DeliveryError::DatabaseError(e.to_string()))?;

        let now = Utc::now().naive_utc();
        let merged = conn.immediate_transaction::<DeliveryMetricsDB, diesel::result::Error, _>(
            |tx_conn| {
                let existing = delivery_metrics::table
                    .find(trade_id)
                    .select(DeliveryMetricsDB::as_select())
                    .first::<DeliveryMetricsDB>(tx_conn)
                    .optional()?;

                let row = match existing {
                    Some(mut row) => {
                        if let Some(v) = report.viewability {
                            row.viewability = Some(v);
                        }
                        if report.clicked == Some(true) {
                            row.clicked = true;
                        }
                        if let Some(dwell) = report.dwell_time {
                            row.dwell_time = row.dwell_time.max(dwell);
                        }
                        row.updated_at = now;
                        diesel::update(delivery_metrics::table.find(trade_id))
                            .set((
                                delivery_metrics::viewability.eq(row.viewability),
                                delivery_metrics::clicked.eq(row.clicked),
                                delivery_metrics::dwell_time.eq(row.dwell_time),
                                delivery_metrics::updated_at.eq(row.updated_at),
                            ))
                            .execute(tx_conn)?;
                        row
                    }
                    None => {
                        let row = DeliveryMetricsDB {
                            trade_id: trade_id.to_string(),
                            viewability: report.viewability,
                            clicked: report.clicked.unwrap_or(false),
                            dwell_time: report.dwell_time.unwrap_or(0.0),
                            created_at: now,
                            updated_at: now,
                        };
                        diesel::insert_into(delivery_metrics::table)
                            .values(&row)
                            .execute(tx_conn)?;
                        row
                    }
                };
                Ok(row)
            },
        )?;

        Ok(merged.into())
    }

    /// Current metrics for a trade, if any report arrived yet.
    pub fn get_by_trade_id(&self, trade_id: &str) -> Result<Option<DeliveryMetrics>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| DeliveryError::DatabaseError(e.to_string()))?;

        delivery_metrics::table
            .find(trade_id)
            .select(DeliveryMetricsDB::as_select())
            .first::<DeliveryMetricsDB>(&mut conn)
            .optional()
            .map(|row| row.map(DeliveryMetrics::from))
            .map_err(DeliveryError::from)
    }
}
