//! Deduplication configuration.
//!
//! Holds the duplicate threshold and the per-channel weights. The defaults
//! are the values the intake floor has been tuned on; overrides come from a
//! config file section or environment variables.

use super::similarity::SimilarityWeights;
use crate::{Error, Result};

/// Confidence at or above which a candidate is reported as a duplicate.
pub const DEFAULT_THRESHOLD: f64 = 0.85;

/// Tolerance when checking that the weights sum to one.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Configuration for duplicate detection.
///
/// # Environment Variables
///
/// | Variable | Type | Default | Description |
/// |----------|------|---------|-------------|
/// | `ACOPIO_DEDUP_THRESHOLD` | f64 | `0.85` | Duplicate threshold |
/// | `ACOPIO_DEDUP_WEIGHT_NAME` | f64 | `0.5` | Name channel weight |
/// | `ACOPIO_DEDUP_WEIGHT_DESCRIPTION` | f64 | `0.3` | Description channel weight |
/// | `ACOPIO_DEDUP_WEIGHT_METADATA` | f64 | `0.2` | Metadata channel weight |
///
/// # Example
///
/// ```rust
/// use acopio::services::deduplication::DeduplicationConfig;
///
/// let config = DeduplicationConfig::default();
/// assert_eq!(config.threshold, 0.85);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeduplicationConfig {
    /// Minimum confidence for a similarity match.
    pub threshold: f64,
    /// Channel weights.
    pub weights: SimilarityWeights,
}

impl DeduplicationConfig {
    /// Creates a configuration from environment variables.
    ///
    /// Unset or unparsable variables keep their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Applies environment overrides on top of this configuration.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(v) = env_f64("ACOPIO_DEDUP_THRESHOLD") {
            self.threshold = v;
        }
        if let Some(v) = env_f64("ACOPIO_DEDUP_WEIGHT_NAME") {
            self.weights.name = v;
        }
        if let Some(v) = env_f64("ACOPIO_DEDUP_WEIGHT_DESCRIPTION") {
            self.weights.description = v;
        }
        if let Some(v) = env_f64("ACOPIO_DEDUP_WEIGHT_METADATA") {
            self.weights.metadata = v;
        }
        self
    }

    /// Checks that the threshold and weights are usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the threshold is outside `(0, 1]`,
    /// a weight is negative or not finite, or the weights do not sum to 1.
    pub fn validate(&self) -> Result<()> {
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err(Error::InvalidInput(format!(
                "dedup threshold must be in (0, 1], got {}",
                self.threshold
            )));
        }

        let w = &self.weights;
        for (label, value) in [
            ("name", w.name),
            ("description", w.description),
            ("metadata", w.metadata),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidInput(format!(
                    "dedup weight '{label}' must be a non-negative number, got {value}"
                )));
            }
        }

        if (w.total() - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(Error::InvalidInput(format!(
                "dedup weights must sum to 1, got {}",
                w.total()
            )));
        }

        Ok(())
    }

    /// Builder method to set the threshold.
    #[must_use]
    pub const fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Builder method to set the weights.
    #[must_use]
    pub const fn with_weights(mut self, weights: SimilarityWeights) -> Self {
        self.weights = weights;
        self
    }
}

impl Default for DeduplicationConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            weights: SimilarityWeights::default(),
        }
    }
}

fn env_f64(key: &str) -> Option<f64> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
