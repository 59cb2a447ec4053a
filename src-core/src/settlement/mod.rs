// Module declarations
pub(crate) mod settlement_errors;
pub(crate) mod settlement_model;
pub(crate) mod settlement_repository;
pub(crate) mod settlement_service;

// Re-export the public interface
pub use settlement_model::{Settlement, SettlementDB, SettlementOutcome};
pub use settlement_repository::SettlementRepository;
pub use settlement_service::{payable_amount, reward_ratio, SettlementService};

// Re-export error types for convenience
pub use settlement_errors::{Result, SettlementError};
