//! # Acopio
//!
//! Inventory intake for collection centers: barcode registration, stock
//! movements and duplicate detection.
//!
//! Donated goods arrive with inconsistent labels. The same bag of rice may
//! be scanned under two barcodes, or typed in twice with different spelling.
//! Acopio checks every new registration against the catalog and proposes a
//! merge when it finds a likely duplicate.
//!
//! ## Features
//!
//! - Exact barcode matching plus fuzzy name/description/metadata scoring
//! - Accent- and case-insensitive text normalization
//! - Merge suggestions that never lose stock
//! - Pluggable storage (in-memory, JSON files)
//! - Stock movement log and recent scan history
//!
//! ## Example
//!
//! ```rust
//! use acopio::models::{Product, ProductDraft};
//! use acopio::services::check_duplicate;
//!
//! let catalog = vec![Product::new("7501", "Leche entera 1L").with_description("Caja tetra pak")];
//! let candidate = ProductDraft::new()
//!     .with_barcode("7599")
//!     .with_name("Leche Entera 1L")
//!     .with_description("caja tetra pak");
//!
//! // Name and description agree; metadata is absent on both sides.
//! let result = check_duplicate(&candidate, &catalog);
//! assert!(!result.is_duplicate);
//! assert_eq!(result.reason.to_string(), "no duplicates found");
//! assert!((result.confidence - 0.8).abs() < 1e-9);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

pub mod config;
pub mod models;
pub mod observability;
pub mod services;
pub mod storage;

pub use config::AcopioConfig;
pub use models::{MovementType, Product, ProductDraft, ProductMetadata, ProductStatus};
pub use services::{RegistrationService, ScanHistory, StockService};
pub use storage::{JsonFileStore, MemoryStore, ProductStore};

/// Error type for acopio operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Missing barcode or name, zero or overdrawn movement, bad configuration |
/// | `NotFound` | Updating or moving stock for an unknown barcode |
/// | `Conflict` | Registering a barcode that already exists |
/// | `OperationFailed` | File I/O, (de)serialization, logging setup |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A referenced record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The write would violate catalog uniqueness.
    #[error("conflict: {0}")]
    Conflict(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - Filesystem I/O errors occur
    /// - A store or config document cannot be parsed
    /// - The logging subscriber cannot be installed
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

/// Result type alias for acopio operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Returns the current Unix timestamp in seconds.
///
/// Falls back to 0 if the system clock is before the Unix epoch.
///
/// # Examples
///
/// ```rust
/// use acopio::current_timestamp;
///
/// let ts = current_timestamp();
/// assert!(ts > 0);
/// ```
#[must_use]
pub fn current_timestamp() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidInput("test error".to_string());
        assert_eq!(err.to_string(), "invalid input: test error");

        let err = Error::NotFound("product 7501".to_string());
        assert_eq!(err.to_string(), "not found: product 7501");

        let err = Error::Conflict("barcode 7501 is already registered".to_string());
        assert_eq!(err.to_string(), "conflict: barcode 7501 is already registered");

        let err = Error::OperationFailed {
            operation: "test".to_string(),
            cause: "failed".to_string(),
        };
        assert_eq!(err.to_string(), "operation 'test' failed: failed");
    }

    #[test]
    fn test_current_timestamp() {
        let ts = current_timestamp();
        // 2020-01-01
        assert!(ts > 1_577_836_800);
    }
}
