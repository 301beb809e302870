//! Product registration workflow.
//!
//! Mirrors what happens at the intake desk: scan a barcode, look it up, and
//! if it is unknown fill in a form. Before anything is written the form is
//! checked against the catalog. A likely duplicate is handed back to the
//! operator together with a merge suggestion, and nothing is stored until
//! the operator picks a [`Resolution`].

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::models::{Product, ProductDraft};
use crate::services::deduplication::{
    DuplicateCheck, DuplicateDetector, MergeChoices, suggest_merge,
};
use crate::storage::ProductStore;
use crate::{Error, Result, current_timestamp};

/// Result of looking up a scanned barcode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "product", rename_all = "snake_case")]
pub enum LookupOutcome {
    /// The barcode is in the catalog.
    Found(Product),
    /// The barcode is unknown; the operator should register it.
    NotFound,
}

/// A registration that matched an existing product and awaits a decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingDuplicate {
    /// The submitted form.
    pub candidate: ProductDraft,
    /// The detector verdict. `existing_product` is always set.
    pub check: DuplicateCheck,
    /// Pre-filled merge of the existing record and the candidate.
    pub suggestion: ProductDraft,
}

impl PendingDuplicate {
    /// Returns the catalog record the candidate collided with.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the check carries no product, which
    /// only happens for a hand-built value.
    pub fn existing(&self) -> Result<&Product> {
        self.check
            .existing_product
            .as_ref()
            .ok_or_else(|| {
                Error::InvalidInput("pending duplicate has no existing product".to_string())
            })
    }
}

/// Result of submitting a registration form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Submission {
    /// No duplicate was found and the product was stored.
    Registered(Product),
    /// A duplicate was found; nothing was stored.
    Duplicate(Box<PendingDuplicate>),
}

/// How the operator settles a detected duplicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Resolution {
    /// Fold the candidate into the existing record.
    Merge(MergeChoices),
    /// Store the candidate as a separate record.
    KeepBoth,
    /// Discard the candidate.
    Cancel,
}

/// What a resolution did to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "product", rename_all = "snake_case")]
pub enum ResolutionOutcome {
    /// The existing record was updated with the merged values.
    Merged(Product),
    /// The candidate was stored as a new record.
    Registered(Product),
    /// Nothing was written.
    Cancelled,
}

/// Service driving product registration against a store.
pub struct RegistrationService<S: ProductStore> {
    store: S,
    detector: DuplicateDetector,
}

impl<S: ProductStore> RegistrationService<S> {
    /// Creates a registration service with the default detector.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            detector: DuplicateDetector::default(),
        }
    }

    /// Replaces the detector.
    #[must_use]
    pub const fn with_detector(mut self, detector: DuplicateDetector) -> Self {
        self.detector = detector;
        self
    }

    /// Returns the underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the service and returns the store.
    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }

    /// Looks up a scanned barcode.
    ///
    /// # Errors
    ///
    /// Returns an error if the barcode is empty or the store fails.
    #[instrument(skip(self), fields(operation = "lookup"))]
    pub fn lookup(&self, barcode: &str) -> Result<LookupOutcome> {
        let barcode = barcode.trim();
        if barcode.is_empty() {
            return Err(Error::InvalidInput("barcode cannot be empty".to_string()));
        }

        let outcome = self
            .store
            .find_by_barcode(barcode)?
            .map_or(LookupOutcome::NotFound, LookupOutcome::Found);
        tracing::debug!(found = matches!(outcome, LookupOutcome::Found(_)), "Barcode lookup");
        Ok(outcome)
    }

    /// Submits a registration form.
    ///
    /// The draft is checked against a snapshot of the catalog. If it
    /// duplicates an entry the pending decision is returned and nothing is
    /// written; otherwise the product is stored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the draft lacks a barcode or name,
    /// or a store error.
    #[instrument(skip(self, draft), fields(operation = "submit", barcode = ?draft.barcode))]
    pub fn submit(&mut self, mut draft: ProductDraft) -> Result<Submission> {
        let start = Instant::now();
        let now = current_timestamp();
        // Validate before touching the catalog so a bad form never reports a duplicate.
        let product = Product::from_draft(&draft, now)?;
        draft.barcode = Some(product.barcode.clone());
        draft.name = Some(product.name.clone());

        let catalog = self.store.get_all_products()?;
        let check = self.detector.check(&draft, &catalog);

        let matched = check.existing_product.clone().filter(|_| check.is_duplicate);
        let result = match matched {
            Some(existing) => {
                let suggestion = suggest_merge(&existing, &product);
                tracing::info!(
                    existing = %existing.barcode,
                    confidence = check.confidence,
                    reason = %check.reason,
                    "Registration held for duplicate review"
                );
                Submission::Duplicate(Box::new(PendingDuplicate {
                    candidate: draft,
                    check,
                    suggestion,
                }))
            },
            None => {
                self.store.add_product(product.clone())?;
                tracing::info!(barcode = %product.barcode, "Registered product");
                Submission::Registered(product)
            },
        };

        let outcome = match &result {
            Submission::Registered(_) => "registered",
            Submission::Duplicate(_) => "duplicate",
        };
        metrics::counter!("registrations_total", "outcome" => outcome).increment(1);
        metrics::histogram!("registration_duration_ms", "operation" => "submit")
            .record(start.elapsed().as_secs_f64() * 1000.0);

        Ok(result)
    }

    /// Settles a pending duplicate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conflict`] when asked to keep both records after an
    /// exact barcode match, [`Error::NotFound`] if the existing record has
    /// disappeared, or a store error.
    #[instrument(skip(self, pending, resolution), fields(operation = "resolve"))]
    pub fn resolve(
        &mut self,
        pending: &PendingDuplicate,
        resolution: &Resolution,
    ) -> Result<ResolutionOutcome> {
        let existing = pending.existing()?;

        let (outcome, label) = match resolution {
            Resolution::Merge(choices) => {
                let incoming = Product::from_draft(&pending.candidate, current_timestamp())?;
                let merged = choices.apply(pending.suggestion.clone(), existing, &incoming);
                let product = self.store.update_product(&existing.barcode, &merged)?;
                tracing::info!(
                    kept = %product.barcode,
                    quantity = product.quantity,
                    "Merged duplicate into existing product"
                );
                (ResolutionOutcome::Merged(product), "merged")
            },
            Resolution::KeepBoth => {
                if pending.check.is_exact_match() {
                    tracing::warn!(barcode = %existing.barcode, "Refused to keep both records");
                    return Err(Error::Conflict(format!(
                        "barcode {} is already registered; merge or cancel instead",
                        existing.barcode
                    )));
                }
                let product = Product::from_draft(&pending.candidate, current_timestamp())?;
                self.store.add_product(product.clone())?;
                tracing::info!(
                    barcode = %product.barcode,
                    "Registered product alongside similar one"
                );
                (ResolutionOutcome::Registered(product), "kept_both")
            },
            Resolution::Cancel => {
                tracing::debug!("Registration cancelled");
                (ResolutionOutcome::Cancelled, "cancelled")
            },
        };

        metrics::counter!("registrations_total", "outcome" => label).increment(1);
        Ok(outcome)
    }
}
