mod common;

use reverso_core::delivery::SlaDecision;
use reverso_core::errors::Error;
use reverso_core::settlement::{SettlementRepository, SettlementService};
use reverso_core::trades::{TradeRepository, TradeStatus};

#[test]
fn test_failed_settlement_pays_nothing() {
    let db = common::setup_db();
    common::seed_user(&db.pool, "user-1");
    let trade_id = common::seed_claimed_trade(&db.pool, "user-1", 1000.0);

    let service = SettlementService::new(db.pool.clone());
    let outcome = service
        .settle(&trade_id, SlaDecision::Failed, 1.0)
        .expect("settles");

    assert_eq!(outcome.payable_amount, 0.0);
    assert_eq!(outcome.applied_delta, 0.0);
    assert_eq!(outcome.final_status, TradeStatus::Failed);
    assert_eq!(common::get_balance(&db.pool, "user-1"), 0.0);

    let trade = TradeRepository::new(db.pool.clone())
        .get_by_id(&trade_id)
        .unwrap();
    assert_eq!(trade.status, TradeStatus::Failed);
    assert_eq!(trade.secondary_reward, Some(0.0));
    assert_eq!(trade.settlement_decision.as_deref(), Some("FAILED"));
}

#[test]
fn test_settlement_is_idempotent() {
    let db = common::setup_db();
    common::seed_user(&db.pool, "user-1");
    let trade_id = common::seed_claimed_trade(&db.pool, "user-1", 1000.0);

    let service = SettlementService::new(db.pool.clone());
    let first = service
        .settle(&trade_id, SlaDecision::Partial, 5.0)
        .expect("first settlement");
    assert_eq!(first.payable_amount, 338.0);
    assert_eq!(first.applied_delta, 338.0);
    assert_eq!(common::get_balance(&db.pool, "user-1"), 338.0);

    let second = service
        .settle(&trade_id, SlaDecision::Partial, 5.0)
        .expect("identical re-submission");
    assert_eq!(second.payable_amount, 338.0);
    assert!(second.is_noop());
    assert_eq!(common::get_balance(&db.pool, "user-1"), 338.0);

    let history = SettlementRepository::new(db.pool.clone())
        .history_for_trade(&trade_id)
        .unwrap();
    assert_eq!(history.len(), 2, "every call appends a ledger row");
    assert_eq!(history[0].payable_amount, history[1].payable_amount);
}

#[test]
fn test_settlement_correction_applies_only_the_difference() {
    let db = common::setup_db();
    common::seed_user(&db.pool, "user-1");
    let trade_id = common::seed_claimed_trade(&db.pool, "user-1", 1000.0);

    let service = SettlementService::new(db.pool.clone());
    let partial = service
        .settle(&trade_id, SlaDecision::Partial, 5.0)
        .expect("partial settlement");
    assert_eq!(partial.payable_amount, 338.0);

    // the client later reports a full engagement
    let passed = service
        .settle(&trade_id, SlaDecision::Passed, 22.0)
        .expect("correction");
    assert_eq!(passed.payable_amount, 1000.0);
    assert_eq!(passed.applied_delta, 662.0);
    assert_eq!(passed.final_status, TradeStatus::Settled);
    assert_eq!(common::get_balance(&db.pool, "user-1"), 1000.0);
}

#[test]
fn test_downgrade_correction_floors_balance_at_zero() {
    let db = common::setup_db();
    common::seed_user(&db.pool, "user-1");
    let trade_id = common::seed_claimed_trade(&db.pool, "user-1", 1000.0);

    let service = SettlementService::new(db.pool.clone());
    service
        .settle(&trade_id, SlaDecision::Passed, 25.0)
        .expect("full settlement");
    assert_eq!(common::get_balance(&db.pool, "user-1"), 1000.0);

    // the user spent most of the balance elsewhere before the correction
    common::set_balance(&db.pool, "user-1", 100.0);

    let corrected = service
        .settle(&trade_id, SlaDecision::Failed, 1.0)
        .expect("downgrade correction");
    assert_eq!(corrected.payable_amount, 0.0);
    assert_eq!(corrected.applied_delta, -1000.0);
    assert_eq!(
        common::get_balance(&db.pool, "user-1"),
        0.0,
        "balance never goes negative"
    );
}

#[test]
fn test_settling_unknown_trade_is_not_found() {
    let db = common::setup_db();

    let service = SettlementService::new(db.pool.clone());
    let err = service
        .settle("trade-missing", SlaDecision::Passed, 25.0)
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Trade(reverso_core::trades::TradeError::NotFound(_))
    ));

    // nothing was written
    assert_eq!(SettlementRepository::new(db.pool.clone()).count().unwrap(), 0);
}

#[test]
fn test_latest_ledger_row_wins() {
    let db = common::setup_db();
    common::seed_user(&db.pool, "user-1");
    let trade_id = common::seed_claimed_trade(&db.pool, "user-1", 1000.0);

    let service = SettlementService::new(db.pool.clone());
    service.settle(&trade_id, SlaDecision::Partial, 5.0).unwrap();
    service.settle(&trade_id, SlaDecision::Passed, 25.0).unwrap();

    let latest = SettlementRepository::new(db.pool.clone())
        .latest_for_trade(&trade_id)
        .unwrap()
        .expect("ledger has rows");
    assert_eq!(latest.payable_amount, 1000.0);
    assert_eq!(latest.decision, SlaDecision::Passed);
}
