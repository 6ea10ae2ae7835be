//! MTGJSON version and import bookkeeping stored on a catalog.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

use crate::catalog::{CatalogError, CatalogStore};
use crate::metrics::{IMPORTS_RECORDED, VERSION_UPDATES};

const VERSION_KEY: &str = "version";
const LAST_UPDATED_KEY: &str = "last_updated";
const IMPORT_STATS_KEY: &str = "import_stats";

/// Source of the current time.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// What a catalog knows about its MTGJSON data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogMeta {
    pub version: Option<String>,
    pub last_updated: Option<String>,
    pub import_stats: Map<String, Value>,
}

/// Reads and writes MTGJSON metadata in a catalog's `source_config`.
///
/// Writes merge into the existing blob, so keys the tracker does not own
/// (source URLs, custom settings) survive every update. The catalog is
/// re-read on each call.
pub struct MetaTracker {
    store: Arc<dyn CatalogStore>,
    catalog_id: String,
    clock: Clock,
}

impl MetaTracker {
    pub fn new(store: Arc<dyn CatalogStore>, catalog_id: impl Into<String>) -> Self {
        Self {
            store,
            catalog_id: catalog_id.into(),
            clock: Arc::new(Utc::now),
        }
    }

    /// Use `clock` instead of the system time for `last_updated`.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn catalog_id(&self) -> &str {
        &self.catalog_id
    }

    fn source_config(&self) -> Result<Map<String, Value>, CatalogError> {
        Ok(self.store.get(&self.catalog_id)?.source_config)
    }

    fn merge(&self, entries: Vec<(&str, Value)>) -> Result<(), CatalogError> {
        let entries: Map<String, Value> = entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect();
        self.store.merge_source_config(&self.catalog_id, entries)?;
        Ok(())
    }

    /// The stored MTGJSON version, if any.
    pub fn current_version(&self) -> Result<Option<String>, CatalogError> {
        Ok(self
            .source_config()?
            .get(VERSION_KEY)
            .and_then(Value::as_str)
            .map(String::from))
    }

    /// Store `version` and stamp `last_updated` with the current time.
    pub fn update_version(&self, version: &str) -> Result<(), CatalogError> {
        let now = (self.clock)().to_rfc3339_opts(SecondsFormat::Secs, true);
        self.merge(vec![
            (VERSION_KEY, Value::String(version.to_string())),
            (LAST_UPDATED_KEY, Value::String(now)),
        ])?;

        VERSION_UPDATES.inc();
        info!(catalog = %self.catalog_id, version, "Recorded MTGJSON version");
        Ok(())
    }

    /// True when no version is stored or the stored one differs.
    pub fn needs_update(&self, new_version: &str) -> Result<bool, CatalogError> {
        Ok(self.current_version()?.as_deref() != Some(new_version))
    }

    /// Statistics of the last recorded import (empty when none).
    pub fn import_stats(&self) -> Result<Map<String, Value>, CatalogError> {
        Ok(import_stats_of(&self.source_config()?))
    }

    /// Replace the stored import statistics.
    pub fn record_import_stats(&self, stats: Map<String, Value>) -> Result<(), CatalogError> {
        self.merge(vec![(IMPORT_STATS_KEY, Value::Object(stats))])?;

        IMPORTS_RECORDED.inc();
        info!(catalog = %self.catalog_id, "Recorded MTGJSON import statistics");
        Ok(())
    }

    /// Version, last update time and import statistics in one read.
    pub fn meta(&self) -> Result<CatalogMeta, CatalogError> {
        let config = self.source_config()?;
        Ok(CatalogMeta {
            version: config
                .get(VERSION_KEY)
                .and_then(Value::as_str)
                .map(String::from),
            last_updated: config
                .get(LAST_UPDATED_KEY)
                .and_then(Value::as_str)
                .map(String::from),
            import_stats: import_stats_of(&config),
        })
    }
}

fn import_stats_of(config: &Map<String, Value>) -> Map<String, Value> {
    match config.get(IMPORT_STATS_KEY) {
        Some(Value::Object(stats)) => stats.clone(),
        _ => Map::new(),
    }
}
