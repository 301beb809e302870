//! JSON file product store.
//!
//! Stores the catalog in `products.json`, the movement log in
//! `movements.json` and recent scans in `scans.json` inside a data
//! directory. Every write rewrites the whole
//! document through a temporary file followed by a rename, so a crash mid
//! write leaves the previous document in place.
//!
//! # Security
//!
//! Documents larger than [`MAX_FILE_SIZE`] are refused on read.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::models::{Product, ProductDraft, ScanRecord, StockMovement};
use crate::storage::traits::ProductStore;
use crate::{Error, Result, current_timestamp};

/// Maximum size of a store document (16 MiB).
pub const MAX_FILE_SIZE: u64 = 16 * 1024 * 1024;

const PRODUCTS_FILE: &str = "products.json";
const MOVEMENTS_FILE: &str = "movements.json";
const SCANS_FILE: &str = "scans.json";

/// Filesystem-backed product store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    base_path: PathBuf,
}

impl JsonFileStore {
    /// Opens a store rooted at `base_path`, creating the directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn with_create(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).map_err(|e| Error::OperationFailed {
            operation: "create_data_dir".to_string(),
            cause: e.to_string(),
        })?;

        tracing::debug!(path = %base_path.display(), "Opened JSON product store");
        Ok(Self { base_path })
    }

    /// Returns the base path.
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Loads the saved scan history, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_scans(&self) -> Result<Vec<ScanRecord>> {
        self.read_document(SCANS_FILE)
    }

    /// Replaces the saved scan history.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_scans(&self, scans: &[ScanRecord]) -> Result<()> {
        self.write_document(SCANS_FILE, scans)
    }

    fn read_document<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>> {
        let path = self.base_path.join(file);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let metadata = fs::metadata(&path).map_err(|e| Error::OperationFailed {
            operation: "read_file_metadata".to_string(),
            cause: e.to_string(),
        })?;
        if metadata.len() > MAX_FILE_SIZE {
            return Err(Error::InvalidInput(format!(
                "store file exceeds maximum size of {MAX_FILE_SIZE} bytes: {}",
                path.display()
            )));
        }

        let data = fs::read(&path).map_err(|e| Error::OperationFailed {
            operation: "read_store_file".to_string(),
            cause: e.to_string(),
        })?;
        serde_json::from_slice(&data).map_err(|e| Error::OperationFailed {
            operation: "deserialize_store_file".to_string(),
            cause: format!("{}: {e}", path.display()),
        })
    }

    fn write_document<T: Serialize>(&self, file: &str, items: &[T]) -> Result<()> {
        let path = self.base_path.join(file);
        let tmp = self.base_path.join(format!("{file}.tmp"));

        let json = serde_json::to_vec_pretty(items).map_err(|e| Error::OperationFailed {
            operation: "serialize_store_file".to_string(),
            cause: e.to_string(),
        })?;

        fs::write(&tmp, json).map_err(|e| Error::OperationFailed {
            operation: "write_store_file".to_string(),
            cause: e.to_string(),
        })?;
        fs::rename(&tmp, &path).map_err(|e| Error::OperationFailed {
            operation: "rename_store_file".to_string(),
            cause: e.to_string(),
        })
    }
}

impl ProductStore for JsonFileStore {
    fn get_all_products(&self) -> Result<Vec<Product>> {
        self.read_document(PRODUCTS_FILE)
    }

    fn find_by_barcode(&self, barcode: &str) -> Result<Option<Product>> {
        Ok(self
            .get_all_products()?
            .into_iter()
            .find(|p| p.barcode == barcode))
    }

    fn add_product(&mut self, product: Product) -> Result<()> {
        let mut products = self.get_all_products()?;
        if products.iter().any(|p| p.barcode == product.barcode) {
            return Err(Error::Conflict(format!(
                "barcode {} is already registered",
                product.barcode
            )));
        }
        products.push(product);
        self.write_document(PRODUCTS_FILE, &products)
    }

    fn update_product(&mut self, barcode: &str, draft: &ProductDraft) -> Result<Product> {
        let mut products = self.get_all_products()?;
        let product = products
            .iter_mut()
            .find(|p| p.barcode == barcode)
            .ok_or_else(|| Error::NotFound(format!("product {barcode}")))?;
        product.apply(draft, current_timestamp());
        let updated = product.clone();

        self.write_document(PRODUCTS_FILE, &products)?;
        Ok(updated)
    }

    fn append_movement(&mut self, movement: StockMovement) -> Result<()> {
        let mut movements: Vec<StockMovement> = self.read_document(MOVEMENTS_FILE)?;
        movements.push(movement);
        self.write_document(MOVEMENTS_FILE, &movements)
    }

    fn movements(&self, barcode: &str) -> Result<Vec<StockMovement>> {
        let movements: Vec<StockMovement> = self.read_document(MOVEMENTS_FILE)?;
        Ok(movements
            .into_iter()
            .filter(|m| m.barcode == barcode)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MovementType;
    use tempfile::TempDir;

    fn store() -> (TempDir, JsonFileStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::with_create(dir.path().join("data")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_missing_files_read_as_empty() {
        let (_dir, store) = store();
        assert!(store.get_all_products().unwrap().is_empty());
        assert!(store.movements("7501").unwrap().is_empty());
    }

    #[test]
    fn test_products_persist_across_instances() {
        let (dir, mut store) = store();
        store.add_product(Product::new("7501", "Arroz").with_quantity(3)).unwrap();
        store.add_product(Product::new("7502", "Frijol")).unwrap();

        let reopened = JsonFileStore::with_create(dir.path().join("data")).unwrap();
        let products = reopened.get_all_products().unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].barcode, "7501");
        assert_eq!(products[0].quantity, 3);
        assert!(!dir.path().join("data").join("products.json.tmp").exists());
    }

    #[test]
    fn test_scans_persist_in_order() {
        let (_dir, store) = store();
        assert!(store.load_scans().unwrap().is_empty());

        let scans = vec![
            ScanRecord {
                id: "b".to_string(),
                code: "7502".to_string(),
                symbology: crate::models::Symbology::Ean13,
                scanned_at: 20,
            },
            ScanRecord {
                id: "a".to_string(),
                code: "7501".to_string(),
                symbology: crate::models::Symbology::Qr,
                scanned_at: 10,
            },
        ];
        store.save_scans(&scans).unwrap();
        assert_eq!(store.load_scans().unwrap(), scans);
    }

    #[test]
    fn test_add_rejects_existing_barcode() {
        let (_dir, mut store) = store();
        store.add_product(Product::new("7501", "Arroz")).unwrap();
        let err = store.add_product(Product::new("7501", "Otro")).unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[test]
    fn test_update_product() {
        let (_dir, mut store) = store();
        store.add_product(Product::new("7501", "Arroz")).unwrap();

        let updated = store
            .update_product("7501", &ProductDraft::new().with_name("Arroz blanco"))
            .unwrap();
        assert_eq!(updated.name, "Arroz blanco");

        let stored = store.find_by_barcode("7501").unwrap().unwrap();
        assert_eq!(stored.name, "Arroz blanco");

        let err = store.update_product("0000", &ProductDraft::new()).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_movements_filtered_by_barcode() {
        let (_dir, mut store) = store();
        for (id, barcode) in [("m1", "7501"), ("m2", "7502"), ("m3", "7501")] {
            store
                .append_movement(StockMovement {
                    id: id.to_string(),
                    barcode: barcode.to_string(),
                    movement_type: MovementType::Inbound,
                    quantity: 1,
                    recorded_at: 0,
                    operator: "test".to_string(),
                    notes: None,
                    reason: None,
                })
                .unwrap();
        }

        let ids: Vec<_> = store
            .movements("7501")
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec!["m1", "m3"]);
    }

    #[test]
    fn test_corrupt_document_is_an_error() {
        let (_dir, store) = store();
        fs::write(store.base_path().join(PRODUCTS_FILE), b"not json").unwrap();
        assert!(matches!(
            store.get_all_products(),
            Err(Error::OperationFailed { .. })
        ));
    }
}
