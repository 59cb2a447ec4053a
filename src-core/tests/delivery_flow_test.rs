mod common;

use reverso_core::delivery::{DeliveryRepository, DeliveryService, SlaDecision};
use reverso_core::errors::Error;
use reverso_core::trades::{TradeRepository, TradeStatus};

#[test]
fn test_click_then_return_passes_and_settles_in_full() {
    let db = common::setup_db();
    common::seed_user(&db.pool, "user-1");
    let trade_id = common::seed_claimed_trade(&db.pool, "user-1", 1000.0);

    let service = DeliveryService::new(db.pool.clone());
    let status = service.mark_pending_return(&trade_id).expect("click observed");
    assert_eq!(status, TradeStatus::PendingReturn);

    let verdict = service.verify_return(&trade_id, 25.0).expect("return verified");
    assert_eq!(verdict.decision, SlaDecision::Passed);
    assert_eq!(verdict.final_status, TradeStatus::Settled);
    assert_eq!(verdict.payable_amount, 1000.0);
    assert_eq!(common::get_balance(&db.pool, "user-1"), 1000.0);

    let trade = TradeRepository::new(db.pool.clone())
        .get_by_id(&trade_id)
        .unwrap();
    assert_eq!(trade.status, TradeStatus::Settled);
    assert_eq!(trade.secondary_reward, Some(1000.0));
}

#[test]
fn test_pending_return_is_idempotent_but_never_moves_backward() {
    let db = common::setup_db();
    common::seed_user(&db.pool, "user-1");
    let trade_id = common::seed_claimed_trade(&db.pool, "user-1", 1000.0);

    let service = DeliveryService::new(db.pool.clone());
    assert_eq!(
        service.mark_pending_return(&trade_id).unwrap(),
        TradeStatus::PendingReturn
    );
    // duplicate click report is fine
    assert_eq!(
        service.mark_pending_return(&trade_id).unwrap(),
        TradeStatus::PendingReturn
    );

    service.verify_return(&trade_id, 25.0).unwrap();

    // once terminal, a click report cannot rewind the trade
    let err = service.mark_pending_return(&trade_id).unwrap_err();
    assert!(matches!(err, Error::Trade(_)));
}

#[test]
fn test_duplicate_reports_keep_the_maximum_dwell() {
    let db = common::setup_db();
    common::seed_user(&db.pool, "user-1");
    let trade_id = common::seed_claimed_trade(&db.pool, "user-1", 1000.0);

    let service = DeliveryService::new(db.pool.clone());
    service.mark_pending_return(&trade_id).unwrap();

    let first = service.verify_return(&trade_id, 10.0).expect("first report");
    assert_eq!(first.decision, SlaDecision::Partial);
    let balance_after_first = common::get_balance(&db.pool, "user-1");

    // a late, shorter duplicate must not shrink dwell or the reward
    let second = service.verify_return(&trade_id, 4.0).expect("late duplicate");
    assert_eq!(second.dwell_time, 10.0);
    assert_eq!(second.payable_amount, first.payable_amount);
    assert_eq!(common::get_balance(&db.pool, "user-1"), balance_after_first);

    let metrics = DeliveryRepository::new(db.pool.clone())
        .get_by_trade_id(&trade_id)
        .unwrap()
        .expect("metrics row exists");
    assert_eq!(metrics.dwell_time, 10.0);
}

#[test]
fn test_return_without_click_fails() {
    let db = common::setup_db();
    common::seed_user(&db.pool, "user-1");
    let trade_id = common::seed_claimed_trade(&db.pool, "user-1", 1000.0);

    let service = DeliveryService::new(db.pool.clone());
    let verdict = service.verify_return(&trade_id, 30.0).expect("evaluated");
    assert_eq!(verdict.decision, SlaDecision::Failed);
    assert_eq!(verdict.payable_amount, 0.0);
    assert_eq!(common::get_balance(&db.pool, "user-1"), 0.0);
}

#[test]
fn test_legacy_single_shot_path() {
    let db = common::setup_db();
    common::seed_user(&db.pool, "user-1");
    let trade_id = common::seed_claimed_trade(&db.pool, "user-1", 1000.0);

    let service = DeliveryService::new(db.pool.clone());
    let verdict = service
        .verify_delivery(&trade_id, 0.8, true, 25.0)
        .expect("single-shot verification");
    assert_eq!(verdict.decision, SlaDecision::Passed);
    assert_eq!(common::get_balance(&db.pool, "user-1"), 1000.0);
}

#[test]
fn test_low_viewability_is_treated_as_fraud() {
    let db = common::setup_db();
    common::seed_user(&db.pool, "user-1");
    let trade_id = common::seed_claimed_trade(&db.pool, "user-1", 1000.0);

    let service = DeliveryService::new(db.pool.clone());
    let verdict = service
        .verify_delivery(&trade_id, 0.1, true, 120.0)
        .expect("evaluated");
    assert_eq!(verdict.decision, SlaDecision::Failed);
    assert_eq!(verdict.final_status, TradeStatus::Failed);
    assert_eq!(common::get_balance(&db.pool, "user-1"), 0.0);
}

#[test]
fn test_verify_return_on_unknown_trade_is_not_found() {
    let db = common::setup_db();

    let service = DeliveryService::new(db.pool.clone());
    let err = service.verify_return("trade-missing", 10.0).unwrap_err();
    assert!(matches!(err, Error::Trade(_)));
}

#[test]
fn test_partial_upgrade_after_longer_dwell_report() {
    let db = common::setup_db();
    common::seed_user(&db.pool, "user-1");
    let trade_id = common::seed_claimed_trade(&db.pool, "user-1", 1000.0);

    let service = DeliveryService::new(db.pool.clone());
    service.mark_pending_return(&trade_id).unwrap();

    let partial = service.verify_return(&trade_id, 5.0).expect("partial");
    assert_eq!(partial.decision, SlaDecision::Partial);
    assert_eq!(partial.payable_amount, 338.0);

    let passed = service.verify_return(&trade_id, 21.0).expect("upgrade");
    assert_eq!(passed.decision, SlaDecision::Passed);
    assert_eq!(passed.payable_amount, 1000.0);
    // only the difference lands on the balance
    assert_eq!(common::get_balance(&db.pool, "user-1"), 1000.0);
}
