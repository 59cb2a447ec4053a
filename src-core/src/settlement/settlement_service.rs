use std::sync::Arc;

use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use log::info;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

use crate::db::get_connection;
use crate::delivery::{SlaDecision, PARTIAL_DWELL_SECS, PASS_DWELL_SECS};
use crate::errors::{Error, Result};
use crate::schema::{settlements, trades, users};
use crate::settlement::settlement_model::{SettlementDB, SettlementOutcome};
use crate::trades::{TradeDB, TradeError, TradeStatus};
use crate::users::{UserDB, UserError};
use crate::utils::validation;

/// Reward fraction granted right above the partial floor.
const PARTIAL_FLOOR_RATIO: f64 = 0.25;

/// Effective payout fraction for a dwell time: zero up to the failure floor,
/// then linear from 25% at the floor to 100% at the pass bar.
pub fn reward_ratio(dwell_time: f64) -> f64 {
    if dwell_time <= PARTIAL_DWELL_SECS {
        return 0.0;
    }
    let progress = (dwell_time - PARTIAL_DWELL_SECS) / (PASS_DWELL_SECS - PARTIAL_DWELL_SECS);
    (PARTIAL_FLOOR_RATIO + (1.0 - PARTIAL_FLOOR_RATIO) * progress).clamp(0.0, 1.0)
}

/// Amount payable for a decision, in whole units. Partial rewards go through
/// Decimal so the ledger never accumulates float dust.
pub fn payable_amount(primary_reward: f64, decision: SlaDecision, dwell_time: f64) -> f64 {
    match decision {
        SlaDecision::Passed => primary_reward,
        SlaDecision::Failed => 0.0,
        SlaDecision::Partial => {
            let primary = Decimal::from_f64(primary_reward).unwrap_or_default();
            let ratio = Decimal::from_f64(reward_ratio(dwell_time)).unwrap_or_default();
            (primary * ratio)
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_f64()
                .unwrap_or(0.0)
        }
    }
}

/// Applies SLA decisions to money. The ledger is append-only and every call
/// applies only the difference against the latest prior row, which makes
/// re-submission and correction of decisions safe.
pub struct SettlementService {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl SettlementService {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    /// Settles a trade under a terminal decision.
    ///
    /// One write-locking transaction covers the whole unit: trade lookup,
    /// diff against the latest ledger row, balance update, trade status
    /// update, ledger append. Any failure rolls the whole unit back.
    /// Concurrent calls for the same trade serialise on the write lock.
    pub fn settle(
        &self,
        trade_id: &str,
        decision: SlaDecision,
        dwell_time: f64,
    ) -> Result<SettlementOutcome> {
        validation::require_id("tradeId", trade_id)?;
        validation::require_non_negative("dwellTime", dwell_time)?;

        let now = Utc::now().naive_utc();
        let mut conn = get_connection(&self.pool)?;

        let outcome = conn.immediate_transaction::<SettlementOutcome, Error, _>(|tx_conn| {
            let trade_db = trades::table
                .find(trade_id)
                .select(TradeDB::as_select())
                .first::<TradeDB>(tx_conn)
                .map_err(|e| match e {
                    diesel::result::Error::NotFound => Error::Trade(TradeError::NotFound(
                        format!("Trade with id {} not found", trade_id),
                    )),
                    other => Error::from(other),
                })?;

            let previous_amount = settlements::table
                .filter(settlements::trade_id.eq(trade_id))
                .order(settlements::created_at.desc())
                .select(settlements::payable_amount)
                .first::<f64>(tx_conn)
                .optional()?
                .unwrap_or(0.0);

            let payable = payable_amount(trade_db.primary_reward, decision, dwell_time);
            let delta = (Decimal::from_f64(payable).unwrap_or_default()
                - Decimal::from_f64(previous_amount).unwrap_or_default())
            .to_f64()
            .unwrap_or(0.0);

            let user_db = users::table
                .find(&trade_db.user_id)
                .select(UserDB::as_select())
                .first::<UserDB>(tx_conn)
                .map_err(|e| match e {
                    diesel::result::Error::NotFound => Error::User(UserError::NotFound(
                        format!("User with id {} not found", trade_db.user_id),
                    )),
                    other => Error::from(other),
                })?;
            let new_balance = (user_db.balance + delta).max(0.0);

            diesel::update(users::table.find(&trade_db.user_id))
                .set((users::balance.eq(new_balance), users::updated_at.eq(now)))
                .execute(tx_conn)?;

            let final_status = if payable > 0.0 {
                TradeStatus::Settled
            } else {
                TradeStatus::Failed
            };
            diesel::update(trades::table.find(trade_id))
                .set((
                    trades::status.eq(final_status.as_str()),
                    trades::secondary_reward.eq(Some(payable)),
                    trades::settlement_decision.eq(Some(decision.as_str())),
                    trades::updated_at.eq(now),
                ))
                .execute(tx_conn)?;

            let ledger_row = SettlementDB {
                id: format!("stl-{}", Uuid::new_v4()),
                trade_id: trade_id.to_string(),
                decision: decision.as_str().to_string(),
                payable_amount: payable,
                dwell_time,
                created_at: now,
            };
            diesel::insert_into(settlements::table)
                .values(&ledger_row)
                .execute(tx_conn)?;

            Ok(SettlementOutcome {
                trade_id: trade_id.to_string(),
                decision,
                payable_amount: payable,
                previous_amount,
                applied_delta: delta,
                final_status,
                user_id: trade_db.user_id,
                user_balance: new_balance,
            })
        })?;

        info!(
            "Settled trade {} as {}: payable {} (delta {}), balance {}",
            outcome.trade_id,
            outcome.decision.as_str(),
            outcome.payable_amount,
            outcome.applied_delta,
            outcome.user_balance
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_ratio_endpoints() {
        assert_eq!(reward_ratio(3.0), 0.0);
        assert!((reward_ratio(20.0) - 1.0).abs() < 1e-12);
        assert_eq!(reward_ratio(0.0), 0.0);
        assert!((reward_ratio(60.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_ratio_midpoint() {
        assert!((reward_ratio(10.0) - 0.559).abs() < 1e-3);
    }

    #[test]
    fn test_ratio_strictly_increasing_between_floor_and_pass() {
        let mut last = reward_ratio(3.0001);
        let mut dwell = 3.1;
        while dwell < 20.0 {
            let current = reward_ratio(dwell);
            assert!(current > last, "ratio not increasing at dwell {dwell}");
            last = current;
            dwell += 0.1;
        }
    }

    #[test]
    fn test_payable_passed_and_failed() {
        assert_eq!(payable_amount(1000.0, SlaDecision::Passed, 25.0), 1000.0);
        assert_eq!(payable_amount(1000.0, SlaDecision::Failed, 25.0), 0.0);
    }

    #[test]
    fn test_payable_partial_rounds_to_whole_units() {
        // ratio(5) = 0.25 + 0.75 x 2/17 ~ 0.3382
        let payable = payable_amount(1000.0, SlaDecision::Partial, 5.0);
        assert_eq!(Decimal::from_f64(payable).unwrap(), dec!(338));
    }

    #[test]
    fn test_partial_at_floor_pays_nothing() {
        assert_eq!(payable_amount(1000.0, SlaDecision::Partial, 3.0), 0.0);
    }
}
