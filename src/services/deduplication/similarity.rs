//! Per-field similarity scores.
//!
//! Three channels feed the duplicate decision: name, description and
//! packaging metadata. Each produces a score in `[0.0, 1.0]`; the weighted
//! sum of the three is the match confidence.

use serde::{Deserialize, Serialize};

use super::distance::levenshtein_distance;
use super::normalize::normalize_text;
use crate::models::{ProductMetadata, present};

/// Similarity of two free-text values, in `[0.0, 1.0]`.
///
/// Returns `0.0` when either input is empty, and also when either side
/// normalizes to nothing (e.g. `"!!!"`): text with no comparable content is
/// never a match. Otherwise the score is `1 - distance / max_len` over the
/// normalized forms.
///
/// # Example
///
/// ```rust
/// use acopio::services::deduplication::text_similarity;
///
/// assert_eq!(text_similarity("Café", "cafe"), 1.0);
/// assert_eq!(text_similarity("", "cafe"), 0.0);
/// assert!(text_similarity("arroz", "arros") > 0.7);
/// ```
#[must_use]
pub fn text_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    normalized_similarity(&normalize_text(a), &normalize_text(b))
}

/// [`text_similarity`] over optional values; `None` scores `0.0`.
#[must_use]
pub fn optional_text_similarity(a: Option<&str>, b: Option<&str>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) => text_similarity(a, b),
        _ => 0.0,
    }
}

#[allow(clippy::cast_precision_loss)]
fn normalized_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let max_len = a.chars().count().max(b.chars().count());
    let distance = levenshtein_distance(a, b);
    1.0 - (distance as f64 / max_len as f64)
}

/// Similarity of two packaging records, in `[0.0, 1.0]`.
///
/// Only fields filled on both sides take part. `brand` is compared fuzzily
/// with [`text_similarity`]; `size`, `weight` and `unit` are categorical and
/// score 1 or 0 on equality of their normalized forms. The result is the
/// mean over the compared fields, or `0.0` when nothing was comparable.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn metadata_similarity(a: Option<&ProductMetadata>, b: Option<&ProductMetadata>) -> f64 {
    let (Some(a), Some(b)) = (a, b) else {
        return 0.0;
    };

    let mut total = 0.0;
    let mut compared = 0usize;

    if let (Some(x), Some(y)) = (present(a.brand.as_deref()), present(b.brand.as_deref())) {
        total += text_similarity(x, y);
        compared += 1;
    }

    let categorical = [
        (a.size.as_deref(), b.size.as_deref()),
        (a.weight.as_deref(), b.weight.as_deref()),
        (a.unit.as_deref(), b.unit.as_deref()),
    ];
    for (x, y) in categorical {
        if let (Some(x), Some(y)) = (present(x), present(y)) {
            if normalize_text(x) == normalize_text(y) {
                total += 1.0;
            }
            compared += 1;
        }
    }

    if compared == 0 {
        0.0
    } else {
        total / compared as f64
    }
}

/// Weights applied to each similarity channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityWeights {
    /// Weight of the name channel.
    pub name: f64,
    /// Weight of the description channel.
    pub description: f64,
    /// Weight of the metadata channel.
    pub metadata: f64,
}

impl SimilarityWeights {
    /// Sum of all weights.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.name + self.description + self.metadata
    }
}

impl Default for SimilarityWeights {
    fn default() -> Self {
        Self {
            name: 0.5,
            description: 0.3,
            metadata: 0.2,
        }
    }
}

/// Per-channel scores for one candidate/entry comparison.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SimilarityMetrics {
    /// Name similarity.
    pub name: f64,
    /// Description similarity.
    pub description: f64,
    /// Metadata similarity.
    pub metadata: f64,
}

impl SimilarityMetrics {
    /// Weighted sum of the channels.
    #[must_use]
    pub fn confidence(&self, weights: &SimilarityWeights) -> f64 {
        self.name * weights.name
            + self.description * weights.description
            + self.metadata * weights.metadata
    }
}
