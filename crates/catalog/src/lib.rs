//! Catalog domain module.
//!
//! Read-only view of the entries a merchant can pick from (products, variants,
//! brochures), the `CatalogQuery` port the selection logic depends on, and an
//! in-memory adapter for tests/dev.

pub mod in_memory;
pub mod item;
pub mod query;

pub use in_memory::InMemoryCatalog;
pub use item::{ItemKind, SelectableItem};
pub use query::{CatalogFilter, CatalogQuery, SortDirection, SortKey};
