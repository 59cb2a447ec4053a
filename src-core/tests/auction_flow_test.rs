mod common;

use reverso_core::auctions::{AuctionService, AuctionStatus, BudgetGate, FALLBACK_BID_PREFIX};
use reverso_core::errors::Error;
use reverso_core::matching::MatcherService;
use reverso_core::trades::{TradeRepository, TradeStatus};

#[test]
fn test_start_auction_persists_ranked_bids() {
    let db = common::setup_db();
    common::seed_advertiser(&db.pool, "adv-big", 10_000.0, 300.0, 0.0, None);
    common::seed_keyword(&db.pool, "adv-big", "shopping", 5, "exact");
    common::seed_advertiser(&db.pool, "adv-small", 10_000.0, 80.0, 0.0, None);
    common::seed_keyword(&db.pool, "adv-small", "shopping", 3, "broad");

    let service = AuctionService::new(db.pool.clone());
    let result = service
        .start_auction("shopping", 0.5, "client-1")
        .expect("auction starts");

    assert_eq!(result.auction.status, AuctionStatus::Active);
    assert!(result.bids.len() >= 3, "real bids topped up with fallbacks");
    for pair in result.bids.windows(2) {
        assert!(pair[0].price >= pair[1].price, "bids sorted by price desc");
    }
    // both advertisers bid at their cap (score >= 1.0)
    let advertiser_bids: Vec<_> = result
        .bids
        .iter()
        .filter(|b| b.advertiser_id.is_some())
        .collect();
    assert_eq!(advertiser_bids.len(), 2);
    assert_eq!(advertiser_bids[0].price, 300.0);

    // status endpoint sees the same auction
    let fetched = service
        .get_auction_status(&result.auction.search_id)
        .expect("status");
    assert_eq!(fetched.auction.search_id, result.auction.search_id);
    assert_eq!(fetched.bids.len(), result.bids.len());
}

#[test]
fn test_auction_is_never_empty() {
    let db = common::setup_db();

    let service = AuctionService::new(db.pool.clone());
    let result = service
        .start_auction("query matching nothing at all", 0.0, "client-1")
        .expect("auction starts");

    assert!(!result.bids.is_empty());
    assert!(result.bids.iter().all(|b| b.is_fallback()));
    assert!(result.bids.iter().all(|b| b.advertiser_id.is_none()));
    assert!(result
        .bids
        .iter()
        .all(|b| b.id.starts_with(FALLBACK_BID_PREFIX)));
}

#[test]
fn test_budget_gate_excludes_over_budget_bids() {
    let db = common::setup_db();
    // cap bid 100, budget 150: the first auction fits, the second must not
    common::seed_advertiser(&db.pool, "adv-capped", 150.0, 100.0, 0.0, None);
    common::seed_keyword(&db.pool, "adv-capped", "sneakers", 5, "exact");

    let service = AuctionService::new(db.pool.clone());
    let first = service
        .start_auction("sneakers", 0.5, "client-1")
        .expect("first auction");
    assert!(first
        .bids
        .iter()
        .any(|b| b.advertiser_id.as_deref() == Some("adv-capped")));

    let second = service
        .start_auction("sneakers", 0.5, "client-1")
        .expect("second auction");
    assert!(
        second.bids.iter().all(|b| b.advertiser_id.is_none()),
        "over-budget candidate must be silently excluded"
    );

    let today = chrono::Utc::now().naive_utc().date();
    let spent = BudgetGate::spent_on(&db.pool, "adv-capped", today).unwrap();
    assert_eq!(spent, 100.0);
    assert!(spent <= 150.0, "spend never exceeds the daily budget");
}

#[test]
fn test_select_bid_opens_trade_and_rejects_double_select() {
    let db = common::setup_db();
    common::seed_user(&db.pool, "user-1");

    let service = AuctionService::new(db.pool.clone());
    let auction = service
        .start_auction("anything", 0.0, "client-1")
        .expect("auction starts");
    let bid = &auction.bids[0];

    let outcome = service
        .select_bid(&auction.auction.search_id, &bid.id, "user-1")
        .expect("select succeeds");
    assert_eq!(outcome.selected_bid_id, bid.id);
    assert!(outcome.reward_amount >= 500.0 && outcome.reward_amount <= 1500.0);

    let trade = TradeRepository::new(db.pool.clone())
        .get_by_id(&outcome.trade_id)
        .expect("trade exists");
    assert_eq!(trade.status, TradeStatus::PendingVerification);
    assert_eq!(trade.primary_reward, outcome.reward_amount);

    let completed = service
        .get_auction_status(&auction.auction.search_id)
        .unwrap();
    assert_eq!(completed.auction.status, AuctionStatus::Completed);
    assert_eq!(completed.auction.selected_bid_id.as_deref(), Some(bid.id.as_str()));

    // a second selection must be rejected, not overwrite the winner
    let err = service
        .select_bid(&auction.auction.search_id, &bid.id, "user-1")
        .unwrap_err();
    assert!(matches!(err, Error::Auction(_)), "got {err:?}");
}

#[test]
fn test_select_unknown_auction_is_not_found() {
    let db = common::setup_db();
    common::seed_user(&db.pool, "user-1");

    let service = AuctionService::new(db.pool.clone());
    let err = service
        .select_bid("srch-missing", "bid-missing", "user-1")
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Auction(reverso_core::auctions::AuctionError::NotFound(_))
    ));
}

#[test]
fn test_auction_starts_are_rate_limited() {
    let db = common::setup_db();

    let service = AuctionService::new(db.pool.clone());
    for _ in 0..5 {
        service
            .start_auction("popular query", 0.0, "client-1")
            .expect("within the window allowance");
    }
    let err = service
        .start_auction("popular query", 0.0, "client-1")
        .unwrap_err();
    assert!(matches!(err, Error::RateLimited(_)));

    // a different client is unaffected
    service
        .start_auction("popular query", 0.0, "client-2")
        .expect("other client still allowed");
}

#[test]
fn test_matching_is_deterministic() {
    let db = common::setup_db();
    common::seed_advertiser(&db.pool, "adv-a", 10_000.0, 100.0, 0.0, None);
    common::seed_keyword(&db.pool, "adv-a", "fashion", 4, "phrase");
    common::seed_advertiser(&db.pool, "adv-b", 10_000.0, 100.0, 0.0, None);
    common::seed_keyword(&db.pool, "adv-b", "fashion", 4, "phrase");
    common::seed_advertiser(&db.pool, "adv-c", 10_000.0, 100.0, 0.9, None);

    let matcher = MatcherService::new(db.pool.clone());
    let first = matcher.match_advertisers("fashion", 0.5).unwrap();
    let second = matcher.match_advertisers("fashion", 0.5).unwrap();

    let ids = |rs: &[reverso_core::matching::MatchResult]| {
        rs.iter()
            .map(|r| (r.advertiser_id().to_string(), r.score))
            .collect::<Vec<_>>()
    };
    assert_eq!(ids(&first), ids(&second));
    // equal scores keep catalog order
    assert_eq!(first[0].advertiser_id(), "adv-a");
    assert_eq!(first[1].advertiser_id(), "adv-b");
    // adv-c requires quality 0.9 and the query only carries 0.5
    assert!(first.iter().all(|r| r.advertiser_id() != "adv-c"));
}

#[test]
fn test_expired_auction_reads_cancelled_and_rejects_selection() {
    let db = common::setup_db();
    common::seed_user(&db.pool, "user-1");
    let (search_id, bid_id) = common::seed_expired_auction(&db.pool);

    let service = AuctionService::new(db.pool.clone());
    let status = service.get_auction_status(&search_id).unwrap();
    assert_eq!(status.auction.status, AuctionStatus::Cancelled);
    assert!(!status.bids.is_empty(), "bids stay readable after expiry");

    let err = service.select_bid(&search_id, &bid_id, "user-1").unwrap_err();
    assert!(matches!(
        err,
        Error::Auction(reverso_core::auctions::AuctionError::InvalidState(_))
    ));
}

#[test]
fn test_review_bounds_clamp_admitted_bid() {
    let db = common::setup_db();
    common::seed_advertiser(&db.pool, "adv-rev", 10_000.0, 300.0, 0.0, Some((120.0, 200.0)));
    common::seed_keyword(&db.pool, "adv-rev", "camera", 5, "exact");

    let service = AuctionService::new(db.pool.clone());
    let result = service
        .start_auction("camera", 0.5, "client-1")
        .expect("auction starts");

    let bid = result
        .bids
        .iter()
        .find(|b| b.advertiser_id.as_deref() == Some("adv-rev"))
        .expect("advertiser bid present");
    assert_eq!(bid.price, 200.0, "bid clamped into review bounds");
}
