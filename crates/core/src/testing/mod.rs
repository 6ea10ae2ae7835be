//! Test fixtures shared by unit and integration tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use cardcatalog_core::testing::fixtures;
//!
//! let set = store.create_set(fixtures::new_set("TST"))?;
//! let card = store.create_card(fixtures::new_card(&set, "Black Lotus", "1"))?;
//! ```

/// Builders for valid requests with reasonable defaults.
pub mod fixtures {
    use chrono::NaiveDate;
    use serde_json::{Map, Value};

    use crate::catalog::{NewCatalog, SourceType};
    use crate::mtg::{MtgSet, NewMtgCard, NewMtgSet};

    /// A valid expansion set request.
    pub fn new_set(code: &str) -> NewMtgSet {
        NewMtgSet {
            id: None,
            code: code.to_string(),
            name: format!("Test Set {}", code),
            release_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            set_type: Some("expansion".to_string()),
            card_count: Some(300),
            icon_uri: None,
        }
    }

    /// A valid white creature printing in `set` with fresh identifiers.
    pub fn new_card(set: &MtgSet, name: &str, collector_number: &str) -> NewMtgCard {
        NewMtgCard {
            scryfall_id: Some(uuid::Uuid::new_v4().to_string()),
            rarity: Some("common".to_string()),
            mana_cost: Some("{1}{W}".to_string()),
            mana_value: Some(2.0),
            type_line: Some("Creature — Human".to_string()),
            colors: vec!["W".to_string()],
            color_identity: vec!["W".to_string()],
            finishes: vec!["nonfoil".to_string()],
            ..NewMtgCard::new(set, uuid::Uuid::new_v4().to_string(), name, collector_number)
        }
    }

    /// An instant with rules text, for search tests.
    pub fn new_instant(
        set: &MtgSet,
        name: &str,
        collector_number: &str,
        oracle_text: &str,
    ) -> NewMtgCard {
        NewMtgCard {
            type_line: Some("Instant".to_string()),
            oracle_text: Some(oracle_text.to_string()),
            ..new_card(set, name, collector_number)
        }
    }

    /// A catalog request with the given source type and config.
    pub fn new_catalog(name: &str, source_type: SourceType, source_config: Value) -> NewCatalog {
        let source_config: Map<String, Value> = match source_config {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        NewCatalog::new(name, source_type).with_source_config(source_config)
    }
}
