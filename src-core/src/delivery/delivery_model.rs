use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::delivery::delivery_errors::{DeliveryError, Result};
use crate::trades::TradeStatus;

/// Terminal verdict on whether a delivered click met minimum engagement.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlaDecision {
    Passed,
    Partial,
    Failed,
}

impl SlaDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlaDecision::Passed => "PASSED",
            SlaDecision::Partial => "PARTIAL",
            SlaDecision::Failed => "FAILED",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "PASSED" => Ok(SlaDecision::Passed),
            "PARTIAL" => Ok(SlaDecision::Partial),
            "FAILED" => Ok(SlaDecision::Failed),
            other => Err(DeliveryError::InvalidData(format!(
                "Unknown verification decision '{}'",
                other
            ))),
        }
    }

    /// The trade status a decision maps onto before settlement runs.
    pub fn as_trade_status(&self) -> TradeStatus {
        match self {
            SlaDecision::Passed => TradeStatus::Passed,
            SlaDecision::Partial => TradeStatus::Partial,
            SlaDecision::Failed => TradeStatus::Failed,
        }
    }
}

/// Database model for delivery metrics, one row per trade (upsert target).
#[derive(Queryable, Insertable, Identifiable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::delivery_metrics)]
#[diesel(primary_key(trade_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct DeliveryMetricsDB {
    pub trade_id: String,
    pub viewability: Option<f64>,
    pub clicked: bool,
    pub dwell_time: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryMetrics {
    pub trade_id: String,
    pub viewability: Option<f64>,
    pub clicked: bool,
    pub dwell_time: f64,
}

impl From<DeliveryMetricsDB> for DeliveryMetrics {
    fn from(m: DeliveryMetricsDB) -> Self {
        Self {
            trade_id: m.trade_id,
            viewability: m.viewability,
            clicked: m.clicked,
            dwell_time: m.dwell_time,
        }
    }
}

/// One client report. Fields are merged into the stored metrics: clicked
/// sticks once true, dwell keeps the maximum seen, viewability keeps the
/// latest explicit value.
#[derive(Deserialize, Debug, Clone, Copy, Default)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryReport {
    pub viewability: Option<f64>,
    pub clicked: Option<bool>,
    pub dwell_time: Option<f64>,
}

/// Outcome of evaluating a report: the decision and what settlement did.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryVerdict {
    pub trade_id: String,
    pub decision: SlaDecision,
    pub final_status: TradeStatus,
    pub dwell_time: f64,
    pub payable_amount: f64,
}
