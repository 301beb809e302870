//! Product records and drafts.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Error, Result};

/// Lifecycle status of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    /// Product is in circulation.
    #[default]
    Active,
    /// Product is kept for history but no longer received.
    Inactive,
}

impl ProductStatus {
    /// Returns the status as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    /// Parses a status string (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Optional packaging details attached to a product.
///
/// Every field is independently optional; an empty string is treated the
/// same as an absent value by the duplicate detector and the merge.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductMetadata {
    /// Brand or manufacturer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Package size, e.g. "1 L".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Net weight, e.g. "500 g".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    /// Unit of measure, e.g. "pieza".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl ProductMetadata {
    /// Returns true when no field carries a non-empty value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        [&self.brand, &self.size, &self.weight, &self.unit]
            .into_iter()
            .all(|field| present(field.as_deref()).is_none())
    }

    /// Sets the brand.
    #[must_use]
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    /// Sets the size.
    #[must_use]
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    /// Sets the weight.
    #[must_use]
    pub fn with_weight(mut self, weight: impl Into<String>) -> Self {
        self.weight = Some(weight.into());
        self
    }

    /// Sets the unit.
    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }
}

/// A product in the catalog, keyed by barcode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Barcode, the catalog key.
    pub barcode: String,
    /// Display name.
    pub name: String,
    /// Free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Category label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Units currently in stock.
    pub quantity: u32,
    /// Lifecycle status.
    #[serde(default)]
    pub status: ProductStatus,
    /// Last modification (Unix epoch seconds).
    #[serde(default)]
    pub last_updated: u64,
    /// Packaging details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ProductMetadata>,
}

impl Product {
    /// Creates an active product with no stock.
    #[must_use]
    pub fn new(barcode: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            barcode: barcode.into(),
            name: name.into(),
            description: None,
            category: None,
            quantity: 0,
            status: ProductStatus::Active,
            last_updated: 0,
            metadata: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the quantity.
    #[must_use]
    pub const fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Sets the status.
    #[must_use]
    pub const fn with_status(mut self, status: ProductStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: ProductMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Builds a catalog record from a draft.
    ///
    /// Barcode and name are trimmed, the same way lookups trim their input.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the barcode or name is missing or
    /// blank.
    pub fn from_draft(draft: &ProductDraft, now: u64) -> Result<Self> {
        let barcode = present(draft.barcode.as_deref().map(str::trim))
            .ok_or_else(|| Error::InvalidInput("product barcode is required".to_string()))?;
        let name = present(draft.name.as_deref().map(str::trim))
            .ok_or_else(|| Error::InvalidInput("product name is required".to_string()))?;

        Ok(Self {
            barcode: barcode.to_string(),
            name: name.to_string(),
            description: draft.description.clone(),
            category: draft.category.clone(),
            quantity: draft.quantity.unwrap_or(0),
            status: draft.status.unwrap_or_default(),
            last_updated: now,
            metadata: draft.metadata.clone().filter(|m| !m.is_empty()),
        })
    }

    /// Overlays every field the draft sets.
    ///
    /// A description or category set to the empty string clears the field,
    /// and so does metadata with no non-empty value. The barcode is the
    /// catalog key and is never rewritten here.
    pub fn apply(&mut self, draft: &ProductDraft, now: u64) {
        if let Some(name) = present(draft.name.as_deref().map(str::trim)) {
            self.name = name.to_string();
        }
        if let Some(description) = draft.description.as_deref() {
            self.description = present(Some(description)).map(str::to_string);
        }
        if let Some(category) = draft.category.as_deref() {
            self.category = present(Some(category)).map(str::to_string);
        }
        if let Some(quantity) = draft.quantity {
            self.quantity = quantity;
        }
        if let Some(status) = draft.status {
            self.status = status;
        }
        if let Some(metadata) = &draft.metadata {
            self.metadata = Some(metadata.clone()).filter(|m| !m.is_empty());
        }
        self.last_updated = now;
    }
}

/// A partially filled product.
///
/// Used as the candidate for duplicate checks, as the merge suggestion,
/// and as the patch passed to store updates.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductDraft {
    /// Barcode, if one was scanned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Category label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Units in stock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    /// Lifecycle status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,
    /// Packaging details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ProductMetadata>,
}

impl ProductDraft {
    /// Creates an empty draft.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the barcode.
    #[must_use]
    pub fn with_barcode(mut self, barcode: impl Into<String>) -> Self {
        self.barcode = Some(barcode.into());
        self
    }

    /// Sets the name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the quantity.
    #[must_use]
    pub const fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Sets the status.
    #[must_use]
    pub const fn with_status(mut self, status: ProductStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: ProductMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

impl From<&Product> for ProductDraft {
    fn from(product: &Product) -> Self {
        Self {
            barcode: Some(product.barcode.clone()),
            name: Some(product.name.clone()),
            description: product.description.clone(),
            category: product.category.clone(),
            quantity: Some(product.quantity),
            status: Some(product.status),
            metadata: product.metadata.clone(),
        }
    }
}

/// Returns the value if it is present and non-empty.
pub(crate) fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
