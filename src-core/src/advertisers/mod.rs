// Module declarations
pub(crate) mod advertisers_errors;
pub(crate) mod advertisers_model;
pub(crate) mod advertisers_repository;
pub(crate) mod advertisers_seed;

// Re-export the public interface
pub use advertisers_model::{
    Advertiser, AdvertiserCategory, AdvertiserDB, CatalogCounts, Category, Keyword, MatchType,
};
pub use advertisers_repository::AdvertiserRepository;
pub use advertisers_seed::seed_demo_catalog;

// Re-export error types for convenience
pub use advertisers_errors::{AdvertiserError, Result};
