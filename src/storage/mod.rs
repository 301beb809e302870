//! Storage layer abstraction.
//!
//! The catalog and the stock movement log live behind [`ProductStore`].
//! Two backends are provided:
//! - [`MemoryStore`]: in-process, used by tests and one-shot commands
//! - [`JsonFileStore`]: JSON documents in a data directory

mod filesystem;
mod memory;
mod traits;

pub use filesystem::JsonFileStore;
pub use memory::MemoryStore;
pub use traits::ProductStore;
