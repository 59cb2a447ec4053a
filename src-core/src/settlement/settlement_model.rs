use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::delivery::SlaDecision;
use crate::trades::TradeStatus;

/// Database model for the append-only settlement ledger. Rows are never
/// updated or deleted; the most recent row per trade is the effective
/// payable amount and older rows stay for audit.
#[derive(Queryable, Insertable, Identifiable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::settlements)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct SettlementDB {
    pub id: String,
    pub trade_id: String,
    pub decision: String,
    pub payable_amount: f64,
    pub dwell_time: f64,
    pub created_at: NaiveDateTime,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    pub trade_id: String,
    #[serde(rename = "verificationDecision")]
    pub decision: SlaDecision,
    pub payable_amount: f64,
    pub dwell_time: f64,
    pub created_at: NaiveDateTime,
}

impl TryFrom<SettlementDB> for Settlement {
    type Error = crate::delivery::DeliveryError;

    fn try_from(s: SettlementDB) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            decision: SlaDecision::parse(&s.decision)?,
            trade_id: s.trade_id,
            payable_amount: s.payable_amount,
            dwell_time: s.dwell_time,
            created_at: s.created_at,
        })
    }
}

/// What one settlement call did: the computed amount, the delta actually
/// applied against the previous ledger entry, and where the trade ended up.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SettlementOutcome {
    pub trade_id: String,
    pub decision: SlaDecision,
    pub payable_amount: f64,
    pub previous_amount: f64,
    pub applied_delta: f64,
    pub final_status: TradeStatus,
    pub user_id: String,
    pub user_balance: f64,
}

impl SettlementOutcome {
    /// A re-submission of an already-applied decision changes nothing.
    pub fn is_noop(&self) -> bool {
        self.applied_delta == 0.0
    }
}
