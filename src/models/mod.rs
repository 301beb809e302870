//! Data models for acopio.
//!
//! Catalog records, stock movements and scan results shared by the
//! services and storage backends.

mod movement;
mod product;
mod scan;

pub use movement::{MovementType, StockMovement};
pub use product::{Product, ProductDraft, ProductMetadata, ProductStatus};
pub(crate) use product::present;
pub use scan::{ScanRecord, Symbology};
