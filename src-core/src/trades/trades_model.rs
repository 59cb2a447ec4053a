use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::trades::trades_errors::{Result, TradeError};

/// Trade lifecycle. Transitions only move forward:
/// PENDING_VERIFICATION -> PENDING_RETURN -> {PASSED, PARTIAL, FAILED} ->
/// SETTLED (or FAILED when nothing is payable). Re-settlement may move
/// between the settled terminals but never back to a pending state.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeStatus {
    PendingVerification,
    PendingReturn,
    Passed,
    Partial,
    Failed,
    Settled,
}

impl TradeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeStatus::PendingVerification => "PENDING_VERIFICATION",
            TradeStatus::PendingReturn => "PENDING_RETURN",
            TradeStatus::Passed => "PASSED",
            TradeStatus::Partial => "PARTIAL",
            TradeStatus::Failed => "FAILED",
            TradeStatus::Settled => "SETTLED",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "PENDING_VERIFICATION" => Ok(TradeStatus::PendingVerification),
            "PENDING_RETURN" => Ok(TradeStatus::PendingReturn),
            "PASSED" => Ok(TradeStatus::Passed),
            "PARTIAL" => Ok(TradeStatus::Partial),
            "FAILED" => Ok(TradeStatus::Failed),
            "SETTLED" => Ok(TradeStatus::Settled),
            other => Err(TradeError::InvalidData(format!(
                "Unknown trade status '{}'",
                other
            ))),
        }
    }

    /// Whether the delivery pipeline has reached a terminal decision.
    pub fn is_terminal(&self) -> bool {
        !matches!(
            self,
            TradeStatus::PendingVerification | TradeStatus::PendingReturn
        )
    }
}

/// Database model for trades
#[derive(Queryable, Insertable, Identifiable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::trades)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct TradeDB {
    pub id: String,
    pub user_id: String,
    pub bid_id: String,
    pub primary_reward: f64,
    pub secondary_reward: Option<f64>,
    pub status: String,
    pub settlement_decision: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: String,
    pub user_id: String,
    pub bid_id: String,
    pub primary_reward: f64,
    pub secondary_reward: Option<f64>,
    pub status: TradeStatus,
    pub settlement_decision: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<TradeDB> for Trade {
    type Error = TradeError;

    fn try_from(t: TradeDB) -> Result<Self> {
        Ok(Self {
            status: TradeStatus::parse(&t.status)?,
            id: t.id,
            user_id: t.user_id,
            bid_id: t.bid_id,
            primary_reward: t.primary_reward,
            secondary_reward: t.secondary_reward,
            settlement_decision: t.settlement_decision,
            created_at: t.created_at,
            updated_at: t.updated_at,
        })
    }
}

/// Payload for creating a trade when a user claims a bid.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewTrade {
    pub user_id: String,
    pub bid_id: String,
    pub primary_reward: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in [
            TradeStatus::PendingVerification,
            TradeStatus::PendingReturn,
            TradeStatus::Passed,
            TradeStatus::Partial,
            TradeStatus::Failed,
            TradeStatus::Settled,
        ] {
            assert_eq!(TradeStatus::parse(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        assert!(TradeStatus::parse("REFUNDED").is_err());
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!TradeStatus::PendingVerification.is_terminal());
        assert!(!TradeStatus::PendingReturn.is_terminal());
        assert!(TradeStatus::Passed.is_terminal());
        assert!(TradeStatus::Settled.is_terminal());
    }
}
