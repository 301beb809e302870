//! In-memory product store.

use crate::models::{Product, ProductDraft, StockMovement};
use crate::storage::traits::ProductStore;
use crate::{Error, Result, current_timestamp};

/// Product store backed by vectors.
///
/// Keeps insertion order, so it behaves exactly like the file backend from
/// the detector's point of view.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    products: Vec<Product>,
    movements: Vec<StockMovement>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with `products`.
    #[must_use]
    pub const fn with_products(products: Vec<Product>) -> Self {
        Self {
            products,
            movements: Vec::new(),
        }
    }
}

impl ProductStore for MemoryStore {
    fn get_all_products(&self) -> Result<Vec<Product>> {
        Ok(self.products.clone())
    }

    fn find_by_barcode(&self, barcode: &str) -> Result<Option<Product>> {
        Ok(self.products.iter().find(|p| p.barcode == barcode).cloned())
    }

    fn add_product(&mut self, product: Product) -> Result<()> {
        if self.products.iter().any(|p| p.barcode == product.barcode) {
            return Err(Error::Conflict(format!(
                "barcode {} is already registered",
                product.barcode
            )));
        }
        self.products.push(product);
        Ok(())
    }

    fn update_product(&mut self, barcode: &str, draft: &ProductDraft) -> Result<Product> {
        let product = self
            .products
            .iter_mut()
            .find(|p| p.barcode == barcode)
            .ok_or_else(|| Error::NotFound(format!("product {barcode}")))?;
        product.apply(draft, current_timestamp());
        Ok(product.clone())
    }

    fn append_movement(&mut self, movement: StockMovement) -> Result<()> {
        self.movements.push(movement);
        Ok(())
    }

    fn movements(&self, barcode: &str) -> Result<Vec<StockMovement>> {
        Ok(self
            .movements
            .iter()
            .filter(|m| m.barcode == barcode)
            .cloned()
            .collect())
    }

    fn count(&self) -> Result<usize> {
        Ok(self.products.len())
    }
}
