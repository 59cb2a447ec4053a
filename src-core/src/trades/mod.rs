// Module declarations
pub(crate) mod trades_errors;
pub(crate) mod trades_model;
pub(crate) mod trades_repository;

// Re-export the public interface
pub use trades_model::{NewTrade, Trade, TradeDB, TradeStatus};
pub use trades_repository::TradeRepository;

// Re-export error types for convenience
pub use trades_errors::{Result, TradeError};
