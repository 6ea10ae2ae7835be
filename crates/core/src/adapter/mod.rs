//! Catalog adapters - one per catalog source type.
//!
//! An adapter is the seam between a catalog and the place its entries come
//! from. Only the MTGJSON adapter exists today; catalogs of the other source
//! types report their adapter as not implemented.

mod mtgjson;
mod types;

pub use mtgjson::MtgjsonAdapter;
pub use types::*;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::catalog::{Catalog, SourceType};
use crate::metrics::ADAPTER_OPERATIONS;
use crate::mtg::{CardStore, MtgCard, MtgError};

/// Errors that can occur in catalog adapters.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The adapter (or one of its operations) does not exist yet.
    #[error("{0}")]
    NotImplemented(String),

    /// The underlying store failed.
    #[error(transparent)]
    Store(#[from] MtgError),
}

impl AdapterError {
    /// `"<adapter> must implement #<operation>"`.
    pub fn not_implemented(adapter: &str, operation: &str) -> Self {
        AdapterError::NotImplemented(format!("{} must implement #{}", adapter, operation))
    }
}

/// Trait for catalog adapters.
///
/// Every operation defaults to [`AdapterError::NotImplemented`]; adapters
/// override what their source supports.
#[async_trait]
pub trait CatalogAdapter: Send + Sync {
    /// The kind of entry this adapter serves.
    type Entry: Send + Sync + 'static;

    /// Adapter name used in error messages (e.g. "MtgjsonAdapter").
    fn name(&self) -> &'static str;

    /// The catalog this adapter serves.
    fn catalog(&self) -> &Catalog;

    /// Search for entries matching `query`.
    async fn search(
        &self,
        _query: &str,
        _options: &SearchOptions,
    ) -> Result<Vec<Self::Entry>, AdapterError> {
        Err(AdapterError::not_implemented(self.name(), "search"))
    }

    /// Fetch a single entry by its source identifier. `Ok(None)` when absent.
    async fn fetch_entry(&self, _identifier: &str) -> Result<Option<Self::Entry>, AdapterError> {
        Err(AdapterError::not_implemented(self.name(), "fetch_entry"))
    }

    /// Refresh an entry from the source.
    async fn refresh(&self, _entry: Self::Entry) -> Result<Self::Entry, AdapterError> {
        Err(AdapterError::not_implemented(self.name(), "refresh"))
    }

    /// Import the full data set from the source.
    async fn bulk_import(&self, _options: &ImportOptions) -> Result<ImportStats, AdapterError> {
        Err(AdapterError::not_implemented(self.name(), "bulk_import"))
    }
}

/// Adapter serving card printings.
pub type CardAdapter = dyn CatalogAdapter<Entry = MtgCard>;

/// Build the adapter for a catalog's source type.
pub fn adapter_for(
    catalog: Catalog,
    cards: Arc<dyn CardStore>,
) -> Result<Box<CardAdapter>, AdapterError> {
    let source = catalog.source_type;
    let adapter: Result<Box<CardAdapter>, AdapterError> = match source {
        SourceType::Mtgjson => Ok(Box::new(MtgjsonAdapter::new(catalog, cards))),
        SourceType::Api => Err(AdapterError::NotImplemented(
            "ApiAdapter not yet implemented".to_string(),
        )),
        SourceType::Custom => Err(AdapterError::NotImplemented(
            "CustomAdapter not yet implemented".to_string(),
        )),
    };

    if adapter.is_err() {
        record_operation(source, "adapter", &adapter);
    }
    adapter
}

/// Count an adapter operation by outcome.
pub(crate) fn record_operation<T>(
    source: SourceType,
    operation: &str,
    result: &Result<T, AdapterError>,
) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(AdapterError::NotImplemented(_)) => "not_implemented",
        Err(AdapterError::Store(_)) => "error",
    };
    ADAPTER_OPERATIONS
        .with_label_values(&[source.as_str(), operation, outcome])
        .inc();
}
