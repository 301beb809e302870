//! Duplicate detector.
//!
//! Two-stage check of a candidate against a catalog snapshot:
//! 1. **Exact barcode**: a non-empty candidate barcode equal to a catalog
//!    barcode is a duplicate with confidence 1.0; nothing else is scored.
//! 2. **Weighted similarity**: every entry is scored over the name,
//!    description and metadata channels; the best entry is a duplicate if
//!    its confidence reaches the threshold.
//!
//! The catalog is never modified and nothing is cached between calls.

use std::time::Instant;
use tracing::instrument;

use super::config::DeduplicationConfig;
use super::similarity::{
    SimilarityMetrics, metadata_similarity, optional_text_similarity, text_similarity,
};
use super::types::DuplicateCheck;
use crate::models::{Product, ProductDraft, present};

/// Checks a candidate against a catalog with the default configuration.
///
/// Ties between equally scored entries go to the one that comes first in
/// `catalog`, so callers that care about the winner must pass a stable order.
///
/// # Example
///
/// ```rust
/// use acopio::models::{Product, ProductDraft};
/// use acopio::services::deduplication::check_duplicate;
///
/// let catalog = vec![Product::new("7501", "Arroz blanco")];
/// let candidate = ProductDraft::new().with_barcode("7501").with_name("Frijol");
///
/// let result = check_duplicate(&candidate, &catalog);
/// assert!(result.is_duplicate);
/// assert_eq!(result.confidence, 1.0);
/// ```
#[must_use]
pub fn check_duplicate(candidate: &ProductDraft, catalog: &[Product]) -> DuplicateCheck {
    DuplicateDetector::default().check(candidate, catalog)
}

/// Returns the first catalog entry whose barcode equals `barcode`.
///
/// An empty or absent barcode never matches.
#[must_use]
pub fn find_exact_match<'a>(barcode: Option<&str>, catalog: &'a [Product]) -> Option<&'a Product> {
    let barcode = present(barcode)?;
    catalog.iter().find(|p| p.barcode == barcode)
}

/// Scores one candidate/entry pair on every channel.
#[must_use]
pub fn score(candidate: &ProductDraft, entry: &Product) -> SimilarityMetrics {
    SimilarityMetrics {
        name: text_similarity(candidate.name.as_deref().unwrap_or_default(), &entry.name),
        description: optional_text_similarity(
            candidate.description.as_deref(),
            entry.description.as_deref(),
        ),
        metadata: metadata_similarity(candidate.metadata.as_ref(), entry.metadata.as_ref()),
    }
}

/// Duplicate detector with a fixed configuration.
///
/// Stateless apart from its configuration; a single instance can be shared
/// freely.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateDetector {
    config: DeduplicationConfig,
}

impl DuplicateDetector {
    /// Creates a detector with the given configuration.
    #[must_use]
    pub const fn new(config: DeduplicationConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &DeduplicationConfig {
        &self.config
    }

    /// Checks whether `candidate` duplicates an entry of `catalog`.
    #[instrument(
        skip(self, candidate, catalog),
        fields(
            operation = "dedup_check",
            catalog_size = catalog.len(),
            has_barcode = candidate.barcode.is_some()
        )
    )]
    pub fn check(&self, candidate: &ProductDraft, catalog: &[Product]) -> DuplicateCheck {
        let start = Instant::now();

        if let Some(existing) = find_exact_match(candidate.barcode.as_deref(), catalog) {
            tracing::info!(barcode = %existing.barcode, "Exact barcode duplicate found");
            record_check("exact_barcode", start);
            return DuplicateCheck::exact_barcode(existing.clone());
        }

        let Some((best, confidence, metrics)) = self.best_match(candidate, catalog) else {
            tracing::debug!("No catalog entry scored above zero");
            record_check("unique", start);
            return DuplicateCheck::not_duplicate(0.0, None);
        };

        if confidence >= self.config.threshold {
            tracing::info!(
                barcode = %best.barcode,
                confidence = confidence,
                name_score = metrics.name,
                description_score = metrics.description,
                metadata_score = metrics.metadata,
                "Similar product duplicate found"
            );
            record_check("similar", start);
            return DuplicateCheck::similar(best.clone(), confidence, metrics);
        }

        tracing::debug!(
            best_barcode = %best.barcode,
            confidence = confidence,
            threshold = self.config.threshold,
            "Best match below threshold"
        );
        record_check("unique", start);
        DuplicateCheck::not_duplicate(confidence, Some(metrics))
    }

    /// Finds the highest-scoring entry.
    ///
    /// Only a strictly greater score replaces the current best, so the
    /// earliest entry wins ties. Entries scoring zero are never selected.
    fn best_match<'a>(
        &self,
        candidate: &ProductDraft,
        catalog: &'a [Product],
    ) -> Option<(&'a Product, f64, SimilarityMetrics)> {
        let weights = &self.config.weights;
        let mut best: Option<(&Product, f64, SimilarityMetrics)> = None;
        let mut best_confidence = 0.0;

        for entry in catalog {
            let metrics = score(candidate, entry);
            let confidence = metrics.confidence(weights);
            if confidence > best_confidence {
                best_confidence = confidence;
                best = Some((entry, confidence, metrics));
            }
        }

        best
    }
}

fn record_check(result: &'static str, start: Instant) {
    metrics::counter!("dedup_checks_total", "result" => result).increment(1);
    metrics::histogram!("dedup_check_duration_ms").record(start.elapsed().as_secs_f64() * 1000.0);
}
