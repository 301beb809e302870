//! Duplicate detection for product registration.
//!
//! Decides whether a product about to be registered already exists in the
//! catalog under another barcode (or the same one), and proposes a merged
//! record when it does.
//!
//! # Pipeline
//!
//! ```text
//! normalize ──▶ edit distance ──▶ per-field similarity ──▶ weighted confidence
//!                                  (name, description,      (0.5 / 0.3 / 0.2)
//!                                   metadata)                     │
//!                                                                 ▼
//!                       exact barcode ──short-circuit──▶ best match ≥ 0.85 ?
//! ```
//!
//! Everything here is a pure function of its inputs: the catalog is a
//! read-only snapshot supplied by the caller and nothing is retained
//! between calls.
//!
//! # Example
//!
//! ```rust
//! use acopio::models::{Product, ProductDraft};
//! use acopio::services::deduplication::check_duplicate;
//!
//! let catalog = vec![Product::new("7501", "Café molido").with_quantity(2)];
//! let candidate = ProductDraft::new().with_barcode("7501").with_name("cafe molido");
//!
//! let result = check_duplicate(&candidate, &catalog);
//! assert!(result.is_duplicate);
//! ```

mod config;
mod detector;
mod distance;
mod merge;
mod normalize;
mod similarity;
mod types;

pub use config::{DEFAULT_THRESHOLD, DeduplicationConfig};
pub use detector::{DuplicateDetector, check_duplicate, find_exact_match, score};
pub use distance::levenshtein_distance;
pub use merge::{FieldChoice, MergeChoices, suggest_merge};
pub use normalize::{normalize_optional, normalize_text};
pub use similarity::{
    SimilarityMetrics, SimilarityWeights, metadata_similarity, optional_text_similarity,
    text_similarity,
};
pub use types::{DuplicateCheck, DuplicateReason};
