use std::sync::Arc;

use cardcatalog_core::{
    adapter_for, AdapterError, CardAdapter, CardStore, Catalog, CatalogStore, Config,
    MetaTracker,
};

/// Shared application state
pub struct AppState {
    config: Config,
    catalogs: Arc<dyn CatalogStore>,
    cards: Arc<dyn CardStore>,
}

impl AppState {
    pub fn new(config: Config, catalogs: Arc<dyn CatalogStore>, cards: Arc<dyn CardStore>) -> Self {
        Self {
            config,
            catalogs,
            cards,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalogs(&self) -> &dyn CatalogStore {
        self.catalogs.as_ref()
    }

    pub fn cards(&self) -> &dyn CardStore {
        self.cards.as_ref()
    }

    /// Metadata tracker for a catalog.
    pub fn tracker(&self, catalog_id: &str) -> MetaTracker {
        MetaTracker::new(Arc::clone(&self.catalogs), catalog_id)
    }

    /// Adapter for a catalog's source type.
    pub fn adapter(&self, catalog: Catalog) -> Result<Box<CardAdapter>, AdapterError> {
        adapter_for(catalog, Arc::clone(&self.cards))
    }
}
