// Module declarations
pub(crate) mod auctions_constants;
pub(crate) mod auctions_errors;
pub(crate) mod auctions_model;
pub(crate) mod auctions_repository;
pub(crate) mod auctions_service;
pub(crate) mod bid_pricer;
pub(crate) mod budget_gate;

// Re-export the public interface
pub use auctions_constants::*;
pub use auctions_model::{
    Auction, AuctionDB, AuctionStatus, AuctionWithBids, Bid, BidDB, SelectOutcome,
};
pub use auctions_repository::AuctionRepository;
pub use auctions_service::AuctionService;
pub use bid_pricer::price_bid;
pub use budget_gate::BudgetGate;

// Re-export error types for convenience
pub use auctions_errors::{AuctionError, Result};
