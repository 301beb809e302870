//! Merge suggestions for duplicate pairs.
//!
//! [`suggest_merge`] pre-fills the merge form shown to the operator when a
//! duplicate is detected. The operator may override any field through
//! [`MergeChoices`] before the merge is committed.

use serde::{Deserialize, Serialize};

use crate::models::{Product, ProductDraft, ProductMetadata, ProductStatus, present};

/// Suggests a merged record for two products known to be the same item.
///
/// `kept` is the record already in the catalog; its barcode and status
/// survive. The longer name wins (ties keep `kept`'s). Description,
/// category and each metadata field come from `kept` when non-empty,
/// otherwise from `incoming`. Quantities are added so a merge never loses
/// stock.
///
/// # Example
///
/// ```rust
/// use acopio::models::Product;
/// use acopio::services::deduplication::suggest_merge;
///
/// let kept = Product::new("7501", "Arroz").with_quantity(5);
/// let incoming = Product::new("7502", "Arroz blanco").with_quantity(3);
///
/// let merged = suggest_merge(&kept, &incoming);
/// assert_eq!(merged.barcode.as_deref(), Some("7501"));
/// assert_eq!(merged.name.as_deref(), Some("Arroz blanco"));
/// assert_eq!(merged.quantity, Some(8));
/// ```
#[must_use]
pub fn suggest_merge(kept: &Product, incoming: &Product) -> ProductDraft {
    let name = if incoming.name.chars().count() > kept.name.chars().count() {
        &incoming.name
    } else {
        &kept.name
    };

    ProductDraft {
        barcode: Some(kept.barcode.clone()),
        name: Some(name.clone()),
        description: first_present(kept.description.as_deref(), incoming.description.as_deref()),
        category: first_present(kept.category.as_deref(), incoming.category.as_deref()),
        quantity: Some(kept.quantity.saturating_add(incoming.quantity)),
        status: Some(kept.status),
        metadata: merge_metadata(kept.metadata.as_ref(), incoming.metadata.as_ref()),
    }
}

fn merge_metadata(
    kept: Option<&ProductMetadata>,
    incoming: Option<&ProductMetadata>,
) -> Option<ProductMetadata> {
    let kept = kept.cloned().unwrap_or_default();
    let incoming = incoming.cloned().unwrap_or_default();

    let merged = ProductMetadata {
        brand: first_present(kept.brand.as_deref(), incoming.brand.as_deref()),
        size: first_present(kept.size.as_deref(), incoming.size.as_deref()),
        weight: first_present(kept.weight.as_deref(), incoming.weight.as_deref()),
        unit: first_present(kept.unit.as_deref(), incoming.unit.as_deref()),
    };

    (!merged.is_empty()).then_some(merged)
}

fn first_present(preferred: Option<&str>, fallback: Option<&str>) -> Option<String> {
    present(preferred).or_else(|| present(fallback)).map(str::to_string)
}

/// Which value the operator picked for a merged field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldChoice {
    /// Take the value from the record already in the catalog.
    Kept,
    /// Take the value from the incoming record.
    Incoming,
    /// Use a value typed by the operator.
    Custom(String),
}

impl FieldChoice {
    fn resolve(&self, kept: Option<&str>, incoming: Option<&str>) -> Option<String> {
        match self {
            Self::Kept => present(kept).map(str::to_string),
            Self::Incoming => present(incoming).map(str::to_string),
            Self::Custom(value) => present(Some(value.as_str())).map(str::to_string),
        }
    }
}

/// Operator overrides applied on top of a merge suggestion.
///
/// Fields left as `None` keep the suggested value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MergeChoices {
    /// Name override.
    #[serde(default)]
    pub name: Option<FieldChoice>,
    /// Description override.
    #[serde(default)]
    pub description: Option<FieldChoice>,
    /// Category override.
    #[serde(default)]
    pub category: Option<FieldChoice>,
    /// Brand override.
    #[serde(default)]
    pub brand: Option<FieldChoice>,
    /// Size override.
    #[serde(default)]
    pub size: Option<FieldChoice>,
    /// Weight override.
    #[serde(default)]
    pub weight: Option<FieldChoice>,
    /// Unit override.
    #[serde(default)]
    pub unit: Option<FieldChoice>,
    /// Total quantity override.
    #[serde(default)]
    pub quantity: Option<u32>,
    /// Status override.
    #[serde(default)]
    pub status: Option<ProductStatus>,
}

impl MergeChoices {
    /// Creates an empty set of overrides (accept the suggestion as-is).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the name.
    #[must_use]
    pub fn with_name(mut self, choice: FieldChoice) -> Self {
        self.name = Some(choice);
        self
    }

    /// Overrides the description.
    #[must_use]
    pub fn with_description(mut self, choice: FieldChoice) -> Self {
        self.description = Some(choice);
        self
    }

    /// Overrides the category.
    #[must_use]
    pub fn with_category(mut self, choice: FieldChoice) -> Self {
        self.category = Some(choice);
        self
    }

    /// Overrides the brand.
    #[must_use]
    pub fn with_brand(mut self, choice: FieldChoice) -> Self {
        self.brand = Some(choice);
        self
    }

    /// Overrides the size.
    #[must_use]
    pub fn with_size(mut self, choice: FieldChoice) -> Self {
        self.size = Some(choice);
        self
    }

    /// Overrides the weight.
    #[must_use]
    pub fn with_weight(mut self, choice: FieldChoice) -> Self {
        self.weight = Some(choice);
        self
    }

    /// Overrides the unit.
    #[must_use]
    pub fn with_unit(mut self, choice: FieldChoice) -> Self {
        self.unit = Some(choice);
        self
    }

    /// Overrides the total quantity.
    #[must_use]
    pub const fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Overrides the status.
    #[must_use]
    pub const fn with_status(mut self, status: ProductStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Applies the overrides to a suggestion built from `kept` and `incoming`.
    ///
    /// A chosen side with no value is written as an empty string (or empty
    /// metadata), which [`Product::apply`] stores as a cleared field. The
    /// name is required and keeps the suggestion when the choice is blank.
    /// The barcode is never overridden: a merge always lands on the kept
    /// record's key.
    #[must_use]
    pub fn apply(
        &self,
        mut suggestion: ProductDraft,
        kept: &Product,
        incoming: &Product,
    ) -> ProductDraft {
        if let Some(choice) = &self.name {
            let name = choice.resolve(Some(kept.name.as_str()), Some(incoming.name.as_str()));
            if name.is_some() {
                suggestion.name = name;
            }
        }
        if let Some(choice) = &self.description {
            let description =
                choice.resolve(kept.description.as_deref(), incoming.description.as_deref());
            suggestion.description = Some(description.unwrap_or_default());
        }
        if let Some(choice) = &self.category {
            let category = choice.resolve(kept.category.as_deref(), incoming.category.as_deref());
            suggestion.category = Some(category.unwrap_or_default());
        }
        if let Some(quantity) = self.quantity {
            suggestion.quantity = Some(quantity);
        }
        if let Some(status) = self.status {
            suggestion.status = Some(status);
        }

        let metadata_choices = [&self.brand, &self.size, &self.weight, &self.unit];
        if metadata_choices.iter().any(|c| c.is_some()) {
            let mut metadata = suggestion.metadata.take().unwrap_or_default();
            let k = kept.metadata.clone().unwrap_or_default();
            let i = incoming.metadata.clone().unwrap_or_default();

            if let Some(choice) = &self.brand {
                metadata.brand = choice.resolve(k.brand.as_deref(), i.brand.as_deref());
            }
            if let Some(choice) = &self.size {
                metadata.size = choice.resolve(k.size.as_deref(), i.size.as_deref());
            }
            if let Some(choice) = &self.weight {
                metadata.weight = choice.resolve(k.weight.as_deref(), i.weight.as_deref());
            }
            if let Some(choice) = &self.unit {
                metadata.unit = choice.resolve(k.unit.as_deref(), i.unit.as_deref());
            }

            suggestion.metadata = Some(metadata);
        }

        suggestion.barcode = Some(kept.barcode.clone());
        suggestion
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kept() -> Product {
        Product::new("7501", "Frijol negro")
            .with_description("Bolsa 1 kg")
            .with_quantity(10)
            .with_status(ProductStatus::Inactive)
            .with_metadata(ProductMetadata::default().with_brand("Verde Valle"))
    }

    fn incoming() -> Product {
        Product::new("7502", "Frijol negro entero")
            .with_description("Bolsa de 1 kg")
            .with_category("granos")
            .with_quantity(4)
            .with_metadata(
                ProductMetadata::default()
                    .with_brand("La Merced")
                    .with_weight("1 kg")
                    .with_unit("bolsa"),
            )
    }

    #[test]
    fn test_barcode_and_status_come_from_kept() {
        let merged = suggest_merge(&kept(), &incoming());
        assert_eq!(merged.barcode.as_deref(), Some("7501"));
        assert_eq!(merged.status, Some(ProductStatus::Inactive));
    }

    #[test]
    fn test_quantity_is_summed() {
        let merged = suggest_merge(&kept(), &incoming());
        assert_eq!(merged.quantity, Some(14));

        let full = Product::new("1", "a").with_quantity(u32::MAX);
        let merged = suggest_merge(&full, &incoming());
        assert_eq!(merged.quantity, Some(u32::MAX));
    }

    #[test]
    fn test_longer_name_wins_and_ties_keep_kept() {
        let merged = suggest_merge(&kept(), &incoming());
        assert_eq!(merged.name.as_deref(), Some("Frijol negro entero"));

        let a = Product::new("1", "Sal fina");
        let b = Product::new("2", "Sal gris");
        assert_eq!(suggest_merge(&a, &b).name.as_deref(), Some("Sal fina"));
        assert_eq!(suggest_merge(&b, &a).name.as_deref(), Some("Sal gris"));
    }

    #[test]
    fn test_name_length_counts_characters() {
        // "Azúcar" is 6 characters but 7 bytes
        let a = Product::new("1", "Azúcar");
        let b = Product::new("2", "Azucar");
        assert_eq!(suggest_merge(&b, &a).name.as_deref(), Some("Azucar"));
    }

    #[test]
    fn test_text_fields_prefer_kept_when_present() {
        let merged = suggest_merge(&kept(), &incoming());
        assert_eq!(merged.description.as_deref(), Some("Bolsa 1 kg"));
        assert_eq!(merged.category.as_deref(), Some("granos"));

        let mut blank = kept();
        blank.description = Some(String::new());
        let merged = suggest_merge(&blank, &incoming());
        assert_eq!(merged.description.as_deref(), Some("Bolsa de 1 kg"));
    }

    #[test]
    fn test_metadata_fields_merge_independently() {
        let merged = suggest_merge(&kept(), &incoming());
        let metadata = merged.metadata.unwrap();
        assert_eq!(metadata.brand.as_deref(), Some("Verde Valle"));
        assert_eq!(metadata.weight.as_deref(), Some("1 kg"));
        assert_eq!(metadata.unit.as_deref(), Some("bolsa"));
        assert!(metadata.size.is_none());
    }

    #[test]
    fn test_no_metadata_on_either_side() {
        let a = Product::new("1", "Sal");
        let b = Product::new("2", "Sal");
        assert!(suggest_merge(&a, &b).metadata.is_none());
    }

    #[test]
    fn test_empty_choices_keep_suggestion() {
        let suggestion = suggest_merge(&kept(), &incoming());
        let applied = MergeChoices::new().apply(suggestion.clone(), &kept(), &incoming());
        assert_eq!(applied, suggestion);
    }

    #[test]
    fn test_choices_override_fields() {
        let suggestion = suggest_merge(&kept(), &incoming());
        let choices = MergeChoices::new()
            .with_name(FieldChoice::Kept)
            .with_description(FieldChoice::Custom("Bolsa 1 kg, grano entero".to_string()))
            .with_brand(FieldChoice::Incoming)
            .with_quantity(12)
            .with_status(ProductStatus::Active);

        let merged = choices.apply(suggestion, &kept(), &incoming());
        assert_eq!(merged.barcode.as_deref(), Some("7501"));
        assert_eq!(merged.name.as_deref(), Some("Frijol negro"));
        assert_eq!(merged.description.as_deref(), Some("Bolsa 1 kg, grano entero"));
        assert_eq!(merged.quantity, Some(12));
        assert_eq!(merged.status, Some(ProductStatus::Active));

        let metadata = merged.metadata.unwrap();
        assert_eq!(metadata.brand.as_deref(), Some("La Merced"));
        assert_eq!(metadata.unit.as_deref(), Some("bolsa"));
    }

    #[test]
    fn test_choice_of_empty_side_clears_field() {
        let suggestion = suggest_merge(&kept(), &incoming());
        let merged = MergeChoices::new()
            .with_category(FieldChoice::Kept)
            .apply(suggestion, &kept(), &incoming());
        assert_eq!(merged.category.as_deref(), Some(""));

        let mut stored = kept().with_category("granos");
        stored.apply(&merged, 1);
        assert!(stored.category.is_none());
    }

    #[test]
    fn test_clearing_every_metadata_field() {
        let suggestion = suggest_merge(&kept(), &incoming());
        let merged = MergeChoices::new()
            .with_brand(FieldChoice::Custom(String::new()))
            .with_weight(FieldChoice::Kept)
            .with_unit(FieldChoice::Kept)
            .apply(suggestion, &kept(), &incoming());
        assert_eq!(merged.metadata, Some(ProductMetadata::default()));

        let mut stored = kept();
        stored.apply(&merged, 1);
        assert!(stored.metadata.is_none());
    }

    #[test]
    fn test_packaging_choices() {
        let suggestion = suggest_merge(&kept(), &incoming());
        let merged = MergeChoices::new()
            .with_size(FieldChoice::Custom("grande".to_string()))
            .with_weight(FieldChoice::Incoming)
            .with_unit(FieldChoice::Custom("costal".to_string()))
            .apply(suggestion, &kept(), &incoming());

        let metadata = merged.metadata.unwrap();
        assert_eq!(metadata.brand.as_deref(), Some("Verde Valle"));
        assert_eq!(metadata.size.as_deref(), Some("grande"));
        assert_eq!(metadata.weight.as_deref(), Some("1 kg"));
        assert_eq!(metadata.unit.as_deref(), Some("costal"));
    }

    #[test]
    fn test_blank_name_choice_keeps_suggestion() {
        let suggestion = suggest_merge(&kept(), &incoming());
        let merged = MergeChoices::new()
            .with_name(FieldChoice::Custom(String::new()))
            .apply(suggestion, &kept(), &incoming());
        assert_eq!(merged.name.as_deref(), Some("Frijol negro entero"));
    }
}
