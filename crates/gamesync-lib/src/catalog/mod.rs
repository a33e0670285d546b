mod loader;
mod types;

pub use loader::{CatalogError, load_catalog, read_catalog};
pub use types::{ArchiveLayout, Catalog, CatalogEntry, ItemDescriptor};
