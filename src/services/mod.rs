//! Business logic services.
//!
//! Services orchestrate the store and the duplicate detector and provide
//! the operations the intake desk performs.

pub mod deduplication;
mod registration;
mod scan_history;
mod stock;

pub use deduplication::{DuplicateCheck, DuplicateDetector, check_duplicate, suggest_merge};
pub use registration::{
    LookupOutcome, PendingDuplicate, RegistrationService, Resolution, ResolutionOutcome,
    Submission,
};
pub use scan_history::{DEFAULT_HISTORY_LIMIT, ScanHistory};
pub use stock::{MovementRequest, StockService};
