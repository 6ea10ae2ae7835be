//! Default MTGJSON catalog bootstrap.

use serde_json::{Map, Value};
use tracing::info;

use super::{Catalog, CatalogError, CatalogStore, NewCatalog, SourceType};

/// Name of the catalog created on first start.
pub const MTGJSON_CATALOG_NAME: &str = "MTGJSON Catalog";

/// Make sure the default MTGJSON catalog exists.
///
/// Returns the catalog and whether this call created it. A catalog of
/// source type `mtgjson` with the default name is reused as is, so running
/// this on every start never creates duplicates. A new catalog records
/// `version` in its `source_config` (null when no version is known yet).
pub fn initialize_mtgjson_catalog(
    store: &dyn CatalogStore,
    version: Option<&str>,
) -> Result<(Catalog, bool), CatalogError> {
    let existing = store
        .find_by_source_type(SourceType::Mtgjson)?
        .into_iter()
        .find(|catalog| catalog.name == MTGJSON_CATALOG_NAME);

    if let Some(catalog) = existing {
        info!(id = %catalog.id, "MTGJSON catalog already initialized");
        return Ok((catalog, false));
    }

    let mut source_config = Map::new();
    source_config.insert(
        "version".to_string(),
        version.map_or(Value::Null, |v| Value::String(v.to_string())),
    );

    let catalog = store.create(
        NewCatalog::new(MTGJSON_CATALOG_NAME, SourceType::Mtgjson)
            .with_source_config(source_config),
    )?;

    info!(id = %catalog.id, version = ?version, "MTGJSON catalog initialized");
    Ok((catalog, true))
}
