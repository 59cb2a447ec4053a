// Module declarations
pub(crate) mod delivery_errors;
pub(crate) mod delivery_model;
pub(crate) mod delivery_repository;
pub(crate) mod delivery_service;

// Re-export the public interface
pub use delivery_model::{
    DeliveryMetrics, DeliveryMetricsDB, DeliveryReport, DeliveryVerdict, SlaDecision,
};
pub use delivery_repository::DeliveryRepository;
pub use delivery_service::{
    evaluate_delivery, DeliveryService, MIN_VIEWABILITY, PARTIAL_DWELL_SECS, PASS_DWELL_SECS,
};

// Re-export error types for convenience
pub use delivery_errors::{DeliveryError, Result};
