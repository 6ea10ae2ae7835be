//! Adapter for MTGJSON-backed catalogs.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, info};

use super::{
    record_operation, AdapterError, CatalogAdapter, ImportOptions, ImportStats, SearchOptions,
};
use crate::catalog::Catalog;
use crate::metrics;
use crate::mtg::{CardStore, MtgCard};

/// Serves MTGJSON card printings from the local card store.
///
/// Search and lookup read the store. Import and refresh do not contact
/// MTGJSON yet: import reports an empty successful run and refresh hands
/// the entry back as is.
pub struct MtgjsonAdapter {
    catalog: Catalog,
    cards: Arc<dyn CardStore>,
}

impl MtgjsonAdapter {
    pub fn new(catalog: Catalog, cards: Arc<dyn CardStore>) -> Self {
        Self { catalog, cards }
    }
}

#[async_trait]
impl CatalogAdapter for MtgjsonAdapter {
    type Entry = MtgCard;

    fn name(&self) -> &'static str {
        "MtgjsonAdapter"
    }

    fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<MtgCard>, AdapterError> {
        let search = options.to_query(query);
        let result = self.cards.search_cards(&search);
        metrics::record_search(&result);

        let result = result.map_err(AdapterError::from);
        record_operation(self.catalog.source_type, "search", &result);

        let cards = result?;
        debug!(
            catalog = %self.catalog.id,
            query,
            results = cards.len(),
            "Searched MTGJSON catalog"
        );
        Ok(cards)
    }

    /// Identifiers are MTGJSON card UUIDs.
    async fn fetch_entry(&self, identifier: &str) -> Result<Option<MtgCard>, AdapterError> {
        let result = self
            .cards
            .find_card_by_uuid(identifier)
            .map_err(AdapterError::from);
        record_operation(self.catalog.source_type, "fetch_entry", &result);
        result
    }

    async fn refresh(&self, entry: MtgCard) -> Result<MtgCard, AdapterError> {
        let result = Ok(entry);
        record_operation(self.catalog.source_type, "refresh", &result);
        result
    }

    async fn bulk_import(&self, options: &ImportOptions) -> Result<ImportStats, AdapterError> {
        let start = Instant::now();
        info!(
            catalog = %self.catalog.id,
            source_path = ?options.source_path,
            batch_size = ?options.batch_size,
            "MTGJSON bulk import is a placeholder, nothing imported"
        );

        let result = Ok(ImportStats {
            success: true,
            sets_imported: 0,
            cards_imported: 0,
            cards_failed: 0,
            duration_secs: start.elapsed().as_secs_f64(),
        });
        record_operation(self.catalog.source_type, "bulk_import", &result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogStore, SourceType, SqliteCatalogStore};
    use crate::mtg::SqliteCardStore;
    use crate::testing::fixtures::{new_card, new_catalog, new_set};

    struct Setup {
        adapter: MtgjsonAdapter,
        cards: Arc<SqliteCardStore>,
    }

    fn setup() -> Setup {
        let catalogs = SqliteCatalogStore::in_memory().unwrap();
        let catalog = catalogs
            .create(new_catalog(
                "MTGJSON Catalog",
                SourceType::Mtgjson,
                serde_json::json!({}),
            ))
            .unwrap();
        let cards = Arc::new(SqliteCardStore::in_memory().unwrap());
        let adapter = MtgjsonAdapter::new(catalog, Arc::clone(&cards) as Arc<dyn CardStore>);
        Setup { adapter, cards }
    }

    #[tokio::test]
    async fn test_search_finds_cards() {
        let Setup { adapter, cards } = setup();
        let set = cards.create_set(new_set("LEA")).unwrap();
        let lotus = cards.create_card(new_card(&set, "Black Lotus", "232")).unwrap();

        let results = adapter
            .search("lotus", &SearchOptions::default())
            .await
            .unwrap();

        assert!(results.contains(&lotus));
    }

    #[tokio::test]
    async fn test_search_honors_limit() {
        let Setup { adapter, cards } = setup();
        let set = cards.create_set(new_set("TST")).unwrap();
        for i in 0..15 {
            cards
                .create_card(new_card(&set, &format!("Test Card {}", i), &i.to_string()))
                .unwrap();
        }

        let results = adapter
            .search("test", &SearchOptions::default().with_limit(10))
            .await
            .unwrap();

        assert_eq!(results.len(), 10);
    }

    #[tokio::test]
    async fn test_fetch_entry_by_uuid() {
        let Setup { adapter, cards } = setup();
        let set = cards.create_set(new_set("TST")).unwrap();
        let mut request = new_card(&set, "Test Card", "1");
        request.uuid = "test-uuid-123".to_string();
        let card = cards.create_card(request).unwrap();

        let result = adapter.fetch_entry("test-uuid-123").await.unwrap();

        assert_eq!(result, Some(card));
    }

    #[tokio::test]
    async fn test_fetch_entry_missing() {
        let Setup { adapter, .. } = setup();
        assert_eq!(adapter.fetch_entry("nonexistent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_refresh_returns_entry_unchanged() {
        let Setup { adapter, cards } = setup();
        let set = cards.create_set(new_set("TST")).unwrap();
        let card = cards.create_card(new_card(&set, "Test Card", "1")).unwrap();

        let refreshed = adapter.refresh(card.clone()).await.unwrap();

        assert_eq!(refreshed, card);
    }

    #[tokio::test]
    async fn test_bulk_import_reports_empty_success() {
        let Setup { adapter, .. } = setup();

        let stats = adapter
            .bulk_import(&ImportOptions {
                source_path: Some("AllPrintings.json".into()),
                batch_size: Some(1000),
            })
            .await
            .unwrap();

        assert!(stats.success);
        assert_eq!(stats.sets_imported, 0);
        assert_eq!(stats.cards_imported, 0);
        assert_eq!(stats.cards_failed, 0);
    }

    #[test]
    fn test_adapter_keeps_catalog() {
        let Setup { adapter, .. } = setup();
        assert_eq!(adapter.catalog().name, "MTGJSON Catalog");
        assert_eq!(adapter.catalog().source_type, SourceType::Mtgjson);
    }
}
