//! Product store trait.

use crate::Result;
use crate::models::{Product, ProductDraft, StockMovement};

/// Trait for catalog storage backends.
///
/// A store is the authoritative source for products and their stock
/// movements. Product order is insertion order; duplicate detection relies
/// on it to break ties.
pub trait ProductStore: Send + Sync {
    /// Returns every product in insertion order.
    fn get_all_products(&self) -> Result<Vec<Product>>;

    /// Retrieves a product by barcode.
    fn find_by_barcode(&self, barcode: &str) -> Result<Option<Product>>;

    /// Adds a new product.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Conflict`] if the barcode is already taken.
    fn add_product(&mut self, product: Product) -> Result<()>;

    /// Overlays a draft onto an existing product and returns the result.
    ///
    /// The barcode of the stored record never changes.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] if no product has `barcode`.
    fn update_product(&mut self, barcode: &str, draft: &ProductDraft) -> Result<Product>;

    /// Appends a movement to the log.
    fn append_movement(&mut self, movement: StockMovement) -> Result<()>;

    /// Returns the movements recorded for `barcode`, oldest first.
    fn movements(&self, barcode: &str) -> Result<Vec<StockMovement>>;

    /// Returns the number of products in the catalog.
    fn count(&self) -> Result<usize> {
        Ok(self.get_all_products()?.len())
    }
}
