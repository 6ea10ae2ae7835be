//! Types shared by catalog adapters.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::mtg::CardSearchQuery;

/// Options for adapter search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Maximum number of entries (store default when absent).
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
}

impl SearchOptions {
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Build the card store query for `query` with these options applied.
    pub fn to_query(&self, query: &str) -> CardSearchQuery {
        let mut search = CardSearchQuery::new(query);
        if let Some(limit) = self.limit {
            search = search.with_limit(limit);
        }
        if let Some(offset) = self.offset {
            search = search.with_offset(offset);
        }
        search
    }
}

/// Options for a bulk import.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportOptions {
    /// Local file to import from instead of downloading.
    #[serde(default)]
    pub source_path: Option<PathBuf>,
    #[serde(default)]
    pub batch_size: Option<usize>,
}

/// Outcome of a bulk import.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportStats {
    pub success: bool,
    pub sets_imported: u64,
    pub cards_imported: u64,
    pub cards_failed: u64,
    pub duration_secs: f64,
}

impl ImportStats {
    /// The stats as a JSON object, as stored in a catalog's `source_config`.
    pub fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}
