// Module declarations
pub(crate) mod click_signer;
pub(crate) mod signing_errors;

// Re-export the public interface
pub use click_signer::{BidType, ClickSigner, PLATFORM_CLICK_PAYOUT};

// Re-export error types for convenience
pub use signing_errors::{Result, SigningError};
