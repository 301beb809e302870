//! Stock movement recording.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::models::{MovementType, Product, ProductDraft, StockMovement};
use crate::storage::ProductStore;
use crate::{Error, Result, current_timestamp};

/// A movement as entered by the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementRequest {
    /// Product barcode.
    pub barcode: String,
    /// Movement kind.
    pub movement_type: MovementType,
    /// Units moved. Must be positive.
    pub quantity: u32,
    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Reason code.
    #[serde(default)]
    pub reason: Option<String>,
}

impl MovementRequest {
    /// Creates a request without notes or reason.
    #[must_use]
    pub fn new(barcode: impl Into<String>, movement_type: MovementType, quantity: u32) -> Self {
        Self {
            barcode: barcode.into(),
            movement_type,
            quantity,
            notes: None,
            reason: None,
        }
    }

    /// Adds notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Adds a reason code.
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Service that applies stock movements to catalog quantities.
pub struct StockService<S: ProductStore> {
    store: S,
    operator: String,
}

impl<S: ProductStore> StockService<S> {
    /// Creates a stock service recording movements under `operator`.
    #[must_use]
    pub fn new(store: S, operator: impl Into<String>) -> Self {
        Self {
            store,
            operator: operator.into(),
        }
    }

    /// Returns the underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Records a movement and updates the product quantity.
    ///
    /// Inbound movements add to stock; every other kind subtracts. The
    /// quantity is written first; if the movement log then fails to append,
    /// the previous quantity is restored before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for a zero quantity or when the
    /// movement would take stock below zero, [`Error::NotFound`] for an
    /// unknown barcode, or a store error.
    #[instrument(
        skip(self, request),
        fields(
            operation = "record_movement",
            barcode = %request.barcode,
            kind = %request.movement_type
        )
    )]
    pub fn record(&mut self, request: MovementRequest) -> Result<(Product, StockMovement)> {
        if request.quantity == 0 {
            return Err(Error::InvalidInput("movement quantity must be positive".to_string()));
        }

        let product = self
            .store
            .find_by_barcode(&request.barcode)?
            .ok_or_else(|| Error::NotFound(format!("product {}", request.barcode)))?;

        let new_quantity = if request.movement_type.is_inbound() {
            product.quantity.saturating_add(request.quantity)
        } else {
            product.quantity.checked_sub(request.quantity).ok_or_else(|| {
                tracing::warn!(
                    available = product.quantity,
                    requested = request.quantity,
                    "Movement rejected: insufficient stock"
                );
                Error::InvalidInput(format!(
                    "insufficient stock for {}: {} available, {} requested",
                    product.barcode, product.quantity, request.quantity
                ))
            })?
        };

        let updated = self
            .store
            .update_product(&product.barcode, &ProductDraft::new().with_quantity(new_quantity))?;

        let movement = StockMovement {
            id: uuid::Uuid::new_v4().to_string(),
            barcode: product.barcode,
            movement_type: request.movement_type,
            quantity: request.quantity,
            recorded_at: current_timestamp(),
            operator: self.operator.clone(),
            notes: request.notes,
            reason: request.reason,
        };
        if let Err(e) = self.store.append_movement(movement.clone()) {
            tracing::error!(error = %e, "Movement log append failed, restoring quantity");
            let restore = ProductDraft::new().with_quantity(product.quantity);
            self.store.update_product(&movement.barcode, &restore)?;
            return Err(e);
        }

        metrics::counter!("stock_movements_total", "type" => movement.movement_type.as_str())
            .increment(1);
        tracing::info!(quantity = updated.quantity, "Recorded stock movement");

        Ok((updated, movement))
    }

    /// Returns the movement log for a product.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub fn history(&self, barcode: &str) -> Result<Vec<StockMovement>> {
        self.store.movements(barcode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn service() -> StockService<MemoryStore> {
        let catalog = vec![Product::new("7501", "Atún").with_quantity(10)];
        let store = MemoryStore::with_products(catalog);
        StockService::new(store, "turno-a")
    }

    #[test]
    fn test_inbound_adds() {
        let mut service = service();
        let (product, movement) = service
            .record(MovementRequest::new("7501", MovementType::Inbound, 5))
            .unwrap();
        assert_eq!(product.quantity, 15);
        assert_eq!(movement.operator, "turno-a");
        assert!(uuid::Uuid::parse_str(&movement.id).is_ok());
    }

    #[test]
    fn test_non_inbound_subtracts() {
        for kind in [MovementType::Outbound, MovementType::Adjustment, MovementType::Shrinkage] {
            let mut service = service();
            let (product, _) = service.record(MovementRequest::new("7501", kind, 4)).unwrap();
            assert_eq!(product.quantity, 6, "{kind}");
        }
    }

    #[test]
    fn test_rejects_negative_stock() {
        let mut service = service();
        let err = service
            .record(MovementRequest::new("7501", MovementType::Outbound, 11))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(service.history("7501").unwrap().is_empty());
        let stored = service.store().find_by_barcode("7501").unwrap().unwrap();
        assert_eq!(stored.quantity, 10);
    }

    #[test]
    fn test_rejects_zero_and_unknown() {
        let mut service = service();
        let zero = service.record(MovementRequest::new("7501", MovementType::Inbound, 0));
        assert!(matches!(zero, Err(Error::InvalidInput(_))));

        let unknown = service.record(MovementRequest::new("0000", MovementType::Inbound, 1));
        assert!(matches!(unknown, Err(Error::NotFound(_))));
    }

    /// Store whose movement log always fails.
    struct BrokenLog(MemoryStore);

    impl ProductStore for BrokenLog {
        fn get_all_products(&self) -> Result<Vec<Product>> {
            self.0.get_all_products()
        }

        fn find_by_barcode(&self, barcode: &str) -> Result<Option<Product>> {
            self.0.find_by_barcode(barcode)
        }

        fn add_product(&mut self, product: Product) -> Result<()> {
            self.0.add_product(product)
        }

        fn update_product(&mut self, barcode: &str, draft: &ProductDraft) -> Result<Product> {
            self.0.update_product(barcode, draft)
        }

        fn append_movement(&mut self, _movement: StockMovement) -> Result<()> {
            Err(Error::OperationFailed {
                operation: "append_movement".to_string(),
                cause: "disk full".to_string(),
            })
        }

        fn movements(&self, barcode: &str) -> Result<Vec<StockMovement>> {
            self.0.movements(barcode)
        }
    }

    #[test]
    fn test_failed_log_append_restores_quantity() {
        let catalog = vec![Product::new("7501", "Atún").with_quantity(10)];
        let mut service = StockService::new(BrokenLog(MemoryStore::with_products(catalog)), "x");

        let err = service
            .record(MovementRequest::new("7501", MovementType::Outbound, 4))
            .unwrap_err();
        assert!(matches!(err, Error::OperationFailed { .. }));

        let stored = service.store().find_by_barcode("7501").unwrap().unwrap();
        assert_eq!(stored.quantity, 10);
    }

    #[test]
    fn test_history_keeps_notes() {
        let mut service = service();
        service
            .record(
                MovementRequest::new("7501", MovementType::Shrinkage, 1)
                    .with_reason("caducado")
                    .with_notes("lata abollada"),
            )
            .unwrap();

        let history = service.history("7501").unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].reason.as_deref(), Some("caducado"));
        assert_eq!(history[0].notes.as_deref(), Some("lata abollada"));
    }
}
