pub mod adapter;
pub mod catalog;
pub mod config;
pub mod metrics;
pub mod mtg;
pub mod mtgjson;
pub mod testing;
pub mod validation;

pub use adapter::{
    adapter_for, AdapterError, CardAdapter, CatalogAdapter, ImportOptions, ImportStats,
    MtgjsonAdapter, SearchOptions,
};
pub use catalog::{
    initialize_mtgjson_catalog, Catalog, CatalogError, CatalogStore, NewCatalog, SourceType,
    SqliteCatalogStore,
};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, DatabaseConfig,
    MtgjsonConfig, ServerConfig,
};
pub use mtg::{
    CardFace, CardSearchQuery, CardStats, CardStore, ImageSize, MtgCard, MtgError, MtgSet,
    NewMtgCard, NewMtgSet, SqliteCardStore,
};
pub use mtgjson::{CatalogMeta, MetaTracker};
pub use validation::ValidationErrors;
