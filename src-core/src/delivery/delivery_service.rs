use std::sync::Arc;

use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use log::debug;

use crate::delivery::delivery_model::{DeliveryMetrics, DeliveryReport, DeliveryVerdict, SlaDecision};
use crate::delivery::delivery_repository::DeliveryRepository;
use crate::errors::{Error, Result};
use crate::settlement::SettlementService;
use crate::trades::{TradeError, TradeRepository, TradeStatus};
use crate::utils::validation;

/// Clicks with less of the ad visible than this are treated as non-human.
pub const MIN_VIEWABILITY: f64 = 0.3;
/// Dwell at or above this passes in full.
pub const PASS_DWELL_SECS: f64 = 20.0;
/// Dwell above this (but below the pass bar) earns a partial reward.
pub const PARTIAL_DWELL_SECS: f64 = 3.0;

/// The SLA decision rule, evaluated strictly in order. Unreported
/// viewability does not trip the anti-fraud gate.
pub fn evaluate_delivery(metrics: &DeliveryMetrics) -> SlaDecision {
    if !metrics.clicked {
        return SlaDecision::Failed;
    }
    if metrics.viewability.unwrap_or(1.0) < MIN_VIEWABILITY {
        return SlaDecision::Failed;
    }
    if metrics.dwell_time >= PASS_DWELL_SECS {
        SlaDecision::Passed
    } else if metrics.dwell_time > PARTIAL_DWELL_SECS {
        SlaDecision::Partial
    } else {
        SlaDecision::Failed
    }
}

/// Two-phase delivery verification: a click moves the trade to
/// PENDING_RETURN; the return report produces a terminal decision and hands
/// it to settlement. Reports may repeat; decisions are recomputed from the
/// merged metrics each time.
pub struct DeliveryService {
    trade_repository: TradeRepository,
    metrics_repository: DeliveryRepository,
    settlement_service: SettlementService,
}

impl DeliveryService {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self {
            trade_repository: TradeRepository::new(pool.clone()),
            metrics_repository: DeliveryRepository::new(pool.clone()),
            settlement_service: SettlementService::new(pool),
        }
    }

    /// Click observed: PENDING_VERIFICATION -> PENDING_RETURN. Idempotent
    /// for repeated clicks; rejected once the trade is past the pending
    /// stages (transitions never move backward).
    pub fn mark_pending_return(&self, trade_id: &str) -> Result<TradeStatus> {
        validation::require_id("tradeId", trade_id)?;

        let trade = self.trade_repository.get_by_id(trade_id)?;
        match trade.status {
            TradeStatus::PendingVerification => {
                self.metrics_repository.upsert_report(
                    trade_id,
                    DeliveryReport {
                        clicked: Some(true),
                        ..Default::default()
                    },
                )?;
                self.trade_repository.mark_pending_return(trade_id)?;
                Ok(TradeStatus::PendingReturn)
            }
            TradeStatus::PendingReturn => Ok(TradeStatus::PendingReturn),
            finalized => Err(Error::Trade(TradeError::InvalidTransition(format!(
                "Trade {} already finalized as {}",
                trade_id,
                finalized.as_str()
            )))),
        }
    }

    /// Records a click claim without insisting on a transition; used by the
    /// redirect path where a duplicate click after finalization is noise,
    /// not an error.
    pub fn record_click(&self, trade_id: &str) -> Result<()> {
        validation::require_id("tradeId", trade_id)?;

        self.trade_repository.get_by_id(trade_id)?;
        self.metrics_repository.upsert_report(
            trade_id,
            DeliveryReport {
                clicked: Some(true),
                ..Default::default()
            },
        )?;
        self.trade_repository.mark_pending_return(trade_id)?;
        Ok(())
    }

    /// The user returned from the landing page: merge the dwell report,
    /// decide, and settle. Safe to call repeatedly; dwell keeps its maximum
    /// and settlement applies only the delta.
    pub fn verify_return(&self, trade_id: &str, dwell_time: f64) -> Result<DeliveryVerdict> {
        validation::require_id("tradeId", trade_id)?;
        validation::require_non_negative("dwellTime", dwell_time)?;

        let trade = self.trade_repository.get_by_id(trade_id)?;
        if trade.status == TradeStatus::PendingVerification {
            debug!("Return reported before any click for trade {}", trade_id);
        }

        let metrics = self.metrics_repository.upsert_report(
            trade_id,
            DeliveryReport {
                dwell_time: Some(dwell_time),
                ..Default::default()
            },
        )?;

        self.decide_and_settle(trade_id, metrics)
    }

    /// Legacy single-shot path: every signal arrives in one report.
    pub fn verify_delivery(
        &self,
        trade_id: &str,
        viewability: f64,
        clicked: bool,
        dwell_time: f64,
    ) -> Result<DeliveryVerdict> {
        validation::require_id("tradeId", trade_id)?;
        validation::require_unit_interval("vAtf", viewability)?;
        validation::require_non_negative("tDwellOnAdSite", dwell_time)?;

        self.trade_repository.get_by_id(trade_id)?;

        let metrics = self.metrics_repository.upsert_report(
            trade_id,
            DeliveryReport {
                viewability: Some(viewability),
                clicked: Some(clicked),
                dwell_time: Some(dwell_time),
            },
        )?;

        self.decide_and_settle(trade_id, metrics)
    }

    fn decide_and_settle(&self, trade_id: &str, metrics: DeliveryMetrics) -> Result<DeliveryVerdict> {
        let decision = evaluate_delivery(&metrics);
        self.trade_repository
            .record_decision(trade_id, decision.as_trade_status())?;
        let settlement = self
            .settlement_service
            .settle(trade_id, decision, metrics.dwell_time)?;

        Ok(DeliveryVerdict {
            trade_id: trade_id.to_string(),
            decision,
            final_status: settlement.final_status,
            dwell_time: metrics.dwell_time,
            payable_amount: settlement.payable_amount,
        })
    }
}
