use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use log::{debug, info, warn};
use rand::Rng;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::auctions::auctions_constants::*;
use crate::auctions::auctions_model::{
    Auction, AuctionDB, AuctionStatus, AuctionWithBids, Bid, BidDB, SelectOutcome,
};
use crate::auctions::auctions_repository::AuctionRepository;
use crate::auctions::bid_pricer::price_bid;
use crate::auctions::budget_gate::BudgetGate;
use crate::auctions::AuctionError;
use crate::db::get_connection;
use crate::errors::{Error, Result};
use crate::matching::MatcherService;
use crate::ratelimit::RateLimiter;
use crate::schema::{auctions, bids, trades, users};
use crate::trades::{TradeDB, TradeStatus};
use crate::users::UserError;
use crate::utils::validation;

const MAX_QUERY_CHARS: usize = 512;

/// Runs the reverse auction: matches advertisers, prices and budget-gates
/// their bids, tops up with fallback bids, and persists the auction with its
/// ranked bid list in one transaction.
pub struct AuctionService {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    repository: AuctionRepository,
    matcher: MatcherService,
    rate_limiter: RateLimiter,
}

impl AuctionService {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self {
            repository: AuctionRepository::new(pool.clone()),
            matcher: MatcherService::new(pool.clone()),
            rate_limiter: RateLimiter::new(
                StdDuration::from_secs(RATE_LIMIT_WINDOW_SECS),
                RATE_LIMIT_MAX_STARTS,
            ),
            pool,
        }
    }

    /// Starts an auction for a query. Always yields at least one bid.
    pub fn start_auction(
        &self,
        query: &str,
        quality_score: f64,
        client_key: &str,
    ) -> Result<AuctionWithBids> {
        validation::require_text("query", query, MAX_QUERY_CHARS)?;
        validation::require_unit_interval("valueScore", quality_score)?;

        let limiter_key = format!("{}:{}", client_key, query_fingerprint(query));
        if !self.rate_limiter.check(&limiter_key) {
            warn!("Rate limited auction start from {}", client_key);
            return Err(Error::RateLimited(
                "Too many auction starts for this query, slow down".to_string(),
            ));
        }

        let candidates = self.matcher.match_advertisers(query, quality_score)?;

        let now = Utc::now().naive_utc();
        let today = now.date();
        let auction_db = AuctionDB {
            search_id: format!("srch-{}", Uuid::new_v4()),
            query: query.trim().to_string(),
            status: AuctionStatus::Active.as_str().to_string(),
            selected_bid_id: None,
            created_at: now,
            expires_at: now + Duration::minutes(AUCTION_TTL_MINUTES),
        };

        let mut conn = get_connection(&self.pool)?;
        let result = conn.transaction::<AuctionWithBids, Error, _>(|tx_conn| {
            diesel::insert_into(auctions::table)
                .values(&auction_db)
                .execute(tx_conn)?;

            let mut bid_rows: Vec<BidDB> = Vec::new();
            for candidate in &candidates {
                let Some(price) = price_bid(candidate) else {
                    continue;
                };
                let advertiser = &candidate.advertiser;
                let admitted = BudgetGate::try_admit(
                    tx_conn,
                    &advertiser.id,
                    today,
                    price,
                    advertiser.daily_budget,
                )?;
                if !admitted {
                    debug!(
                        "Budget exhausted for advertiser {}, excluding bid of {}",
                        advertiser.id, price
                    );
                    continue;
                }
                bid_rows.push(BidDB {
                    id: format!("bid-{}", Uuid::new_v4()),
                    auction_id: auction_db.search_id.clone(),
                    buyer_name: advertiser.name.clone(),
                    price,
                    bonus: None,
                    landing_url: advertiser.landing_url.clone(),
                    advertiser_id: Some(advertiser.id.clone()),
                    created_at: now,
                });
            }

            // Fallback guarantee: top up to the minimum, and never return an
            // empty list even with an empty catalogue.
            if bid_rows.len() < MIN_BID_COUNT {
                for (idx, entry) in FALLBACK_CATALOGUE.iter().enumerate() {
                    if bid_rows.len() >= MIN_BID_COUNT {
                        break;
                    }
                    bid_rows.push(BidDB {
                        id: format!("{}{}-{}", FALLBACK_BID_PREFIX, idx, Uuid::new_v4()),
                        auction_id: auction_db.search_id.clone(),
                        buyer_name: entry.buyer_name.to_string(),
                        price: entry.price,
                        bonus: Some(entry.bonus.to_string()),
                        landing_url: entry.landing_url.to_string(),
                        advertiser_id: None,
                        created_at: now,
                    });
                }
            }
            if bid_rows.is_empty() {
                bid_rows.push(BidDB {
                    id: format!("{}min-{}", FALLBACK_BID_PREFIX, Uuid::new_v4()),
                    auction_id: auction_db.search_id.clone(),
                    buyer_name: "Featured".to_string(),
                    price: GLOBAL_MIN_BID,
                    bonus: None,
                    landing_url: "https://www.example.com".to_string(),
                    advertiser_id: None,
                    created_at: now,
                });
            }

            bid_rows.sort_by(|a, b| b.price.partial_cmp(&a.price).unwrap_or(Ordering::Equal));

            diesel::insert_into(bids::table)
                .values(&bid_rows)
                .execute(tx_conn)?;

            Ok(AuctionWithBids {
                auction: Auction::try_from(auction_db.clone()).map_err(Error::from)?,
                bids: bid_rows.into_iter().map(Bid::from).collect(),
            })
        })?;

        info!(
            "Started auction {} with {} bids for query '{}'",
            result.auction.search_id,
            result.bids.len(),
            result.auction.query
        );
        Ok(result)
    }

    /// Auction and ranked bids; the reported status folds in advisory expiry.
    pub fn get_auction_status(&self, search_id: &str) -> Result<AuctionWithBids> {
        validation::require_id("searchId", search_id)?;

        let mut auction = self.repository.get_by_search_id(search_id)?;
        auction.status = auction.effective_status(Utc::now().naive_utc());
        let bids = self.repository.get_bids(search_id)?;
        Ok(AuctionWithBids { auction, bids })
    }

    /// Selects the winning bid: completes the auction and opens the trade
    /// that the delivery pipeline will verify. Selection on an auction that
    /// is no longer active is rejected.
    pub fn select_bid(
        &self,
        search_id: &str,
        bid_id: &str,
        user_id: &str,
    ) -> Result<SelectOutcome> {
        validation::require_id("searchId", search_id)?;
        validation::require_id("selectedBidId", bid_id)?;
        validation::require_id("userId", user_id)?;

        let now = Utc::now().naive_utc();
        let primary_reward = draw_primary_reward();

        let mut conn = get_connection(&self.pool)?;
        let outcome = conn.transaction::<SelectOutcome, Error, _>(|tx_conn| {
            let auction_db = auctions::table
                .find(search_id)
                .select(AuctionDB::as_select())
                .first::<AuctionDB>(tx_conn)
                .map_err(|e| match e {
                    diesel::result::Error::NotFound => Error::Auction(AuctionError::NotFound(
                        format!("Auction with id {} not found", search_id),
                    )),
                    other => Error::from(other),
                })?;
            let auction = Auction::try_from(auction_db).map_err(Error::from)?;

            match auction.effective_status(now) {
                AuctionStatus::Active => {}
                AuctionStatus::Completed => {
                    return Err(Error::Auction(AuctionError::InvalidState(format!(
                        "Auction {} already completed",
                        search_id
                    ))));
                }
                AuctionStatus::Cancelled => {
                    return Err(Error::Auction(AuctionError::InvalidState(format!(
                        "Auction {} is no longer selectable",
                        search_id
                    ))));
                }
            }

            let bid_db = bids::table
                .find(bid_id)
                .select(BidDB::as_select())
                .first::<BidDB>(tx_conn)
                .map_err(|e| match e {
                    diesel::result::Error::NotFound => Error::Auction(AuctionError::NotFound(
                        format!("Bid with id {} not found", bid_id),
                    )),
                    other => Error::from(other),
                })?;
            if bid_db.auction_id != search_id {
                return Err(Error::Auction(AuctionError::InvalidData(format!(
                    "Bid {} does not belong to auction {}",
                    bid_id, search_id
                ))));
            }

            users::table
                .find(user_id)
                .select(users::id)
                .first::<String>(tx_conn)
                .map_err(|e| match e {
                    diesel::result::Error::NotFound => Error::User(UserError::NotFound(format!(
                        "User with id {} not found",
                        user_id
                    ))),
                    other => Error::from(other),
                })?;

            let completed =
                AuctionRepository::complete_if_active(tx_conn, search_id, bid_id)?;
            if !completed {
                return Err(Error::Auction(AuctionError::InvalidState(format!(
                    "Auction {} already completed",
                    search_id
                ))));
            }

            let trade_db = TradeDB {
                id: format!("trade-{}", Uuid::new_v4()),
                user_id: user_id.to_string(),
                bid_id: bid_id.to_string(),
                primary_reward,
                secondary_reward: None,
                status: TradeStatus::PendingVerification.as_str().to_string(),
                settlement_decision: None,
                created_at: now,
                updated_at: now,
            };
            diesel::insert_into(trades::table)
                .values(&trade_db)
                .execute(tx_conn)?;

            Ok(SelectOutcome {
                search_id: search_id.to_string(),
                selected_bid_id: bid_id.to_string(),
                trade_id: trade_db.id,
                reward_amount: primary_reward,
            })
        })?;

        info!(
            "Auction {} completed, bid {} selected, trade {} opened",
            outcome.search_id, outcome.selected_bid_id, outcome.trade_id
        );
        Ok(outcome)
    }

    pub fn auction_count(&self) -> Result<i64> {
        Ok(self.repository.count()?)
    }

    pub fn match_cache_entries(&self) -> usize {
        self.matcher.cache_entry_count()
    }
}

/// Placeholder for the real pricing policy: a uniform whole-unit draw.
fn draw_primary_reward() -> f64 {
    rand::thread_rng()
        .gen_range(PRIMARY_REWARD_MIN..=PRIMARY_REWARD_MAX)
        .round()
}

fn query_fingerprint(query: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(query.trim().to_lowercase().as_bytes());
    hex::encode(&hasher.finalize()[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_reward_is_within_bounds() {
        for _ in 0..100 {
            let reward = draw_primary_reward();
            assert!((PRIMARY_REWARD_MIN..=PRIMARY_REWARD_MAX).contains(&reward));
            assert_eq!(reward, reward.round());
        }
    }

    #[test]
    fn test_query_fingerprint_normalizes() {
        assert_eq!(query_fingerprint("  Shopping "), query_fingerprint("shopping"));
        assert_ne!(query_fingerprint("shopping"), query_fingerprint("sneakers"));
    }
}
