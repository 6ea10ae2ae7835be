//! Types for data-source catalogs.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::validation::{self, ValidationErrors};

/// Where a catalog gets its card data from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    /// MTGJSON bulk data files.
    Mtgjson,
    /// A remote HTTP API.
    Api,
    /// User maintained data.
    Custom,
}

impl SourceType {
    pub const ALL: [SourceType; 3] = [SourceType::Mtgjson, SourceType::Api, SourceType::Custom];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Mtgjson => "mtgjson",
            SourceType::Api => "api",
            SourceType::Custom => "custom",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("Unknown source type: {0}")]
pub struct UnknownSourceType(pub String);

impl FromStr for SourceType {
    type Err = UnknownSourceType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SourceType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownSourceType(s.to_string()))
    }
}

/// A named data-source configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub id: String,
    pub name: String,
    pub source_type: SourceType,
    /// Free-form source settings (MTGJSON version, import stats, ...).
    pub source_config: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a catalog.
///
/// `source_type` is kept as a raw string so that unknown values surface as a
/// validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCatalog {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub source_type: String,
    #[serde(default)]
    pub source_config: Option<Map<String, Value>>,
}

impl NewCatalog {
    pub fn new(name: impl Into<String>, source_type: SourceType) -> Self {
        Self {
            id: None,
            name: name.into(),
            source_type: source_type.as_str().to_string(),
            source_config: None,
        }
    }

    pub fn with_source_config(mut self, source_config: Map<String, Value>) -> Self {
        self.source_config = Some(source_config);
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Check presence and inclusion rules, returning the parsed source type.
    pub fn validate(&self) -> Result<SourceType, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::require_present(&mut errors, "name", &self.name);

        let source_type = if self.source_type.trim().is_empty() {
            errors.add("source_type", validation::BLANK);
            None
        } else {
            match self.source_type.parse::<SourceType>() {
                Ok(source_type) => Some(source_type),
                Err(_) => {
                    errors.add("source_type", validation::NOT_INCLUDED);
                    None
                }
            }
        };

        match source_type {
            Some(source_type) if errors.is_empty() => Ok(source_type),
            _ => Err(errors),
        }
    }
}

/// Errors for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Catalog not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_type_parses_own_names() {
        for source_type in SourceType::ALL {
            assert_eq!(
                source_type.as_str().parse::<SourceType>().unwrap(),
                source_type
            );
        }
        assert_eq!(SourceType::Mtgjson.to_string(), "mtgjson");
    }

    #[test]
    fn test_source_type_serialization() {
        assert_eq!(
            serde_json::to_string(&SourceType::Mtgjson).unwrap(),
            "\"mtgjson\""
        );
        assert_eq!(serde_json::to_string(&SourceType::Api).unwrap(), "\"api\"");
    }

    #[test]
    fn test_unknown_source_type() {
        let err = "unknown".parse::<SourceType>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown source type: unknown");
    }

    #[test]
    fn test_validate_requires_name() {
        let request = NewCatalog {
            source_type: "mtgjson".to_string(),
            ..Default::default()
        };
        let errors = request.validate().unwrap_err();
        assert_eq!(errors.get("name"), &["can't be blank".to_string()]);
    }

    #[test]
    fn test_validate_requires_source_type() {
        let request = NewCatalog {
            name: "Test".to_string(),
            ..Default::default()
        };
        let errors = request.validate().unwrap_err();
        assert_eq!(errors.get("source_type"), &["can't be blank".to_string()]);
    }

    #[test]
    fn test_validate_accepts_all_source_types() {
        for source_type in ["mtgjson", "api", "custom"] {
            let request = NewCatalog {
                name: "Test Catalog".to_string(),
                source_type: source_type.to_string(),
                ..Default::default()
            };
            assert_eq!(request.validate().unwrap().as_str(), source_type);
        }
    }

    #[test]
    fn test_validate_rejects_unknown_source_type() {
        let request = NewCatalog {
            name: "Test Catalog".to_string(),
            source_type: "invalid_type".to_string(),
            ..Default::default()
        };
        let errors = request.validate().unwrap_err();
        assert_eq!(
            errors.get("source_type"),
            &["is not included in the list".to_string()]
        );
    }

    #[test]
    fn test_new_catalog_deserializes_without_config() {
        let request: NewCatalog =
            serde_json::from_str(r#"{"name": "Test", "source_type": "api"}"#).unwrap();
        assert!(request.source_config.is_none());
        assert!(request.id.is_none());
    }
}
