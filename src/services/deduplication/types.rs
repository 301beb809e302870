//! Deduplication result types.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::similarity::SimilarityMetrics;
use crate::models::Product;

/// Result of a duplicate check.
///
/// # Example
///
/// ```rust
/// use acopio::services::deduplication::{DuplicateCheck, DuplicateReason};
///
/// let result = DuplicateCheck::not_duplicate(0.4, None);
/// assert!(!result.is_duplicate);
/// assert_eq!(result.reason, DuplicateReason::NoDuplicates);
/// assert_eq!(result.reason.to_string(), "no duplicates found");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateCheck {
    /// Whether the candidate duplicates a catalog entry.
    pub is_duplicate: bool,

    /// Match confidence (0.0 to 1.0). Forced to 1.0 on a barcode match.
    pub confidence: f64,

    /// Why the verdict was reached.
    pub reason: DuplicateReason,

    /// The catalog entry the candidate duplicates.
    ///
    /// Set if and only if `is_duplicate` is true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub existing_product: Option<Product>,

    /// Channel scores of the best-scoring entry.
    ///
    /// `None` for barcode matches (no scoring ran) and for empty catalogs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<SimilarityMetrics>,
}

impl DuplicateCheck {
    /// Creates a result for an exact barcode match.
    #[must_use]
    pub const fn exact_barcode(product: Product) -> Self {
        Self {
            is_duplicate: true,
            confidence: 1.0,
            reason: DuplicateReason::ExactBarcode,
            existing_product: Some(product),
            metrics: None,
        }
    }

    /// Creates a result for a similarity match.
    #[must_use]
    pub fn similar(product: Product, confidence: f64, metrics: SimilarityMetrics) -> Self {
        Self {
            is_duplicate: true,
            confidence,
            reason: DuplicateReason::SimilarProduct {
                percent: percent(confidence),
            },
            existing_product: Some(product),
            metrics: Some(metrics),
        }
    }

    /// Creates a result indicating no duplicate was found.
    #[must_use]
    pub const fn not_duplicate(confidence: f64, metrics: Option<SimilarityMetrics>) -> Self {
        Self {
            is_duplicate: false,
            confidence,
            reason: DuplicateReason::NoDuplicates,
            existing_product: None,
            metrics,
        }
    }

    /// Returns true if the verdict came from the barcode short-circuit.
    #[must_use]
    pub const fn is_exact_match(&self) -> bool {
        matches!(self.reason, DuplicateReason::ExactBarcode)
    }
}

/// Rounds a confidence to a whole percentage.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn percent(confidence: f64) -> u32 {
    (confidence.clamp(0.0, 1.0) * 100.0).round() as u32
}

/// The reason behind a duplicate verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DuplicateReason {
    /// Candidate barcode equals a catalog barcode.
    ExactBarcode,

    /// Weighted similarity reached the threshold.
    SimilarProduct {
        /// Confidence rounded to a whole percentage.
        percent: u32,
    },

    /// Nothing reached the threshold.
    NoDuplicates,
}

impl fmt::Display for DuplicateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExactBarcode => write!(f, "exact barcode match"),
            Self::SimilarProduct { percent } => {
                write!(f, "similar product found ({percent}% similar)")
            },
            Self::NoDuplicates => write!(f, "no duplicates found"),
        }
    }
}
