//! Catalogs - named data-source configurations.
//!
//! Each catalog records which source its cards come from and carries a
//! free-form JSON blob for source specific settings.

mod init;
mod sqlite;
mod types;

pub use init::{initialize_mtgjson_catalog, MTGJSON_CATALOG_NAME};
pub use sqlite::SqliteCatalogStore;
pub use types::*;

pub(crate) use sqlite::parse_timestamp;

use serde_json::{Map, Value};

/// Trait for catalog storage.
pub trait CatalogStore: Send + Sync {
    /// Validate and persist a new catalog.
    ///
    /// A UUID primary key is generated unless the request carries one.
    fn create(&self, request: NewCatalog) -> Result<Catalog, CatalogError>;

    /// Get a catalog by ID.
    fn get(&self, id: &str) -> Result<Catalog, CatalogError>;

    /// List all catalogs, oldest first.
    fn list(&self) -> Result<Vec<Catalog>, CatalogError>;

    /// List catalogs with the given source type.
    fn find_by_source_type(&self, source_type: SourceType) -> Result<Vec<Catalog>, CatalogError>;

    /// Replace a catalog's source_config and bump updated_at.
    fn update_source_config(
        &self,
        id: &str,
        source_config: Map<String, Value>,
    ) -> Result<Catalog, CatalogError>;

    /// Insert `entries` into a catalog's source_config, keeping other keys.
    ///
    /// The read and the write happen in one transaction, so concurrent
    /// merges of different keys never lose each other's updates.
    fn merge_source_config(
        &self,
        id: &str,
        entries: Map<String, Value>,
    ) -> Result<Catalog, CatalogError>;

    /// Delete a catalog.
    fn delete(&self, id: &str) -> Result<(), CatalogError>;

    /// Number of catalogs.
    fn count(&self) -> Result<u64, CatalogError>;
}
