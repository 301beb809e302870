//! Property-based tests for duplicate detection.
//!
//! Uses proptest to verify invariants across random inputs:
//! - Normalization is idempotent and ASCII-only
//! - Text similarity is reflexive, symmetric and bounded
//! - Empty inputs never match
//! - Exact barcodes always short-circuit to full confidence
//! - Merge suggestions never lose stock or change the kept barcode

// Property tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use acopio::models::{Product, ProductDraft, ProductMetadata};
use acopio::services::deduplication::{
    DuplicateDetector, SimilarityWeights, check_duplicate, levenshtein_distance,
    metadata_similarity, normalize_text, score, suggest_merge, text_similarity,
};
use proptest::prelude::*;

fn product_name() -> impl Strategy<Value = String> {
    "[A-Za-zÁÉÍÓÚáéíóúñÑ0-9 ]{1,24}"
}

fn optional_text() -> impl Strategy<Value = Option<String>> {
    prop::option::of("[A-Za-z0-9 ]{0,16}")
}

fn metadata() -> impl Strategy<Value = Option<ProductMetadata>> {
    prop::option::of(
        (optional_text(), optional_text(), optional_text(), optional_text()).prop_map(
            |(brand, size, weight, unit)| ProductMetadata {
                brand,
                size,
                weight,
                unit,
            },
        ),
    )
}

fn product(barcode: &'static str) -> impl Strategy<Value = Product> {
    (product_name(), optional_text(), optional_text(), 0u32..10_000, metadata()).prop_map(
        move |(name, description, category, quantity, metadata)| Product {
            barcode: barcode.to_string(),
            name,
            description,
            category,
            quantity,
            metadata,
            ..Product::new(barcode, "")
        },
    )
}

proptest! {
    /// Property: normalizing twice is the same as normalizing once.
    #[test]
    fn prop_normalize_is_idempotent(s in "\\PC{0,40}") {
        let once = normalize_text(&s);
        prop_assert_eq!(normalize_text(&once), once);
    }

    /// Property: normalized text has no uppercase letters, accents or punctuation.
    #[test]
    fn prop_normalize_output_alphabet(s in "\\PC{0,40}") {
        let normalized = normalize_text(&s);
        prop_assert!(normalized
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace()));
        prop_assert_eq!(normalized.trim(), normalized.as_str());
    }

    /// Property: text with comparable content is fully similar to itself.
    #[test]
    fn prop_text_similarity_reflexive(s in "[a-zA-Z0-9 ]{0,10}[a-zA-Z][a-zA-Z0-9 ]{0,10}") {
        prop_assert!((text_similarity(&s, &s) - 1.0).abs() < f64::EPSILON);
    }

    /// Property: similarity does not depend on argument order.
    #[test]
    fn prop_text_similarity_symmetric(a in "\\PC{0,30}", b in "\\PC{0,30}") {
        prop_assert_eq!(text_similarity(&a, &b).to_bits(), text_similarity(&b, &a).to_bits());
    }

    /// Property: similarity stays in [0, 1].
    #[test]
    fn prop_text_similarity_bounded(a in "\\PC{0,30}", b in "\\PC{0,30}") {
        let sim = text_similarity(&a, &b);
        prop_assert!((0.0..=1.0).contains(&sim), "similarity {} out of range", sim);
    }

    /// Property: an empty side always scores zero.
    #[test]
    fn prop_empty_never_matches(s in "\\PC{0,30}") {
        prop_assert!(text_similarity("", &s).abs() < f64::EPSILON);
        prop_assert!(text_similarity(&s, "").abs() < f64::EPSILON);
    }

    /// Property: edit distance is bounded by the longer input.
    #[test]
    fn prop_distance_bounded(a in "\\PC{0,20}", b in "\\PC{0,20}") {
        let d = levenshtein_distance(&a, &b);
        prop_assert!(d <= a.chars().count().max(b.chars().count()));
        prop_assert_eq!(levenshtein_distance(&a, &a), 0);
    }

    /// Property: metadata similarity stays in [0, 1] and is symmetric.
    #[test]
    fn prop_metadata_similarity_bounded(a in metadata(), b in metadata()) {
        let ab = metadata_similarity(a.as_ref(), b.as_ref());
        let ba = metadata_similarity(b.as_ref(), a.as_ref());
        prop_assert!((0.0..=1.0).contains(&ab));
        prop_assert!((ab - ba).abs() < 1e-12);
    }

    /// Property: weighted confidence stays in [0, 1] with the default weights.
    #[test]
    fn prop_confidence_bounded(kept in product("1"), incoming in product("2")) {
        let metrics = score(&ProductDraft::from(&incoming), &kept);
        let confidence = metrics.confidence(&SimilarityWeights::default());
        prop_assert!((0.0..=1.0 + 1e-9).contains(&confidence));
    }

    /// Property: a shared barcode always wins with confidence 1.
    #[test]
    fn prop_exact_barcode_short_circuits(kept in product("7501"), incoming in product("7501")) {
        let result = check_duplicate(&ProductDraft::from(&incoming), &[kept]);
        prop_assert!(result.is_duplicate);
        prop_assert!(result.is_exact_match());
        prop_assert!((result.confidence - 1.0).abs() < f64::EPSILON);
    }

    /// Property: checking is deterministic.
    #[test]
    fn prop_check_is_deterministic(
        a in product("1"),
        b in product("2"),
        incoming in product("3"),
    ) {
        let detector = DuplicateDetector::default();
        let catalog = vec![a, b];
        let draft = ProductDraft::from(&incoming);
        prop_assert_eq!(detector.check(&draft, &catalog), detector.check(&draft, &catalog));
    }

    /// Property: a merge keeps the kept barcode and sums quantities.
    #[test]
    fn prop_merge_preserves_stock(kept in product("1"), incoming in product("2")) {
        let merged = suggest_merge(&kept, &incoming);
        prop_assert_eq!(merged.barcode.as_deref(), Some("1"));
        prop_assert_eq!(merged.quantity, Some(kept.quantity + incoming.quantity));
        prop_assert_eq!(merged.status, Some(kept.status));
    }

    /// Property: the merged name is never shorter than either input.
    #[test]
    fn prop_merge_keeps_longer_name(kept in product("1"), incoming in product("2")) {
        let merged = suggest_merge(&kept, &incoming);
        let len = merged.name.as_deref().map_or(0, |n| n.chars().count());
        prop_assert!(len >= kept.name.chars().count());
        prop_assert!(len >= incoming.name.chars().count());
    }
}
