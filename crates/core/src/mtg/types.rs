//! Types for Magic: The Gathering sets and card printings.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::validation::{self, ValidationErrors};

/// Scryfall CDN host serving card images.
pub const SCRYFALL_IMAGE_HOST: &str = "https://cards.scryfall.io";

/// A set/expansion (e.g. "MH3" Modern Horizons 3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MtgSet {
    pub id: String,
    /// Set code, unique across sets.
    pub code: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<NaiveDate>,
    /// expansion, core, masters, ...
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_count: Option<u32>,
    /// Set symbol image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_uri: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewMtgSet {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub set_type: Option<String>,
    #[serde(default)]
    pub card_count: Option<u32>,
    #[serde(default)]
    pub icon_uri: Option<String>,
}

impl NewMtgSet {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Presence checks; uniqueness is checked by the store.
    pub fn validate_fields(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        validation::require_present(&mut errors, "code", &self.code);
        validation::require_present(&mut errors, "name", &self.name);
        errors
    }
}

/// A single card printing. One card name can have many printings across sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MtgCard {
    pub id: String,
    pub mtg_set_id: String,
    /// Stable MTGJSON identifier.
    pub uuid: String,
    /// Scryfall identifier, used for image URLs.
    pub scryfall_id: Option<String>,
    pub name: String,
    pub set_code: String,
    pub collector_number: String,
    pub rarity: Option<String>,
    pub mana_cost: Option<String>,
    pub mana_value: Option<f64>,
    pub type_line: Option<String>,
    pub oracle_text: Option<String>,
    pub power: Option<String>,
    pub toughness: Option<String>,
    pub colors: Vec<String>,
    pub color_identity: Vec<String>,
    /// nonfoil, foil, etched
    pub finishes: Vec<String>,
    pub frame_effects: Vec<String>,
    pub promo_types: Vec<String>,
    pub prices: Map<String, Value>,
    /// Complete upstream payload.
    pub source_data: Value,
    pub cached_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MtgCard {
    /// Catalog entry identifier (the MTGJSON UUID).
    pub fn identifier(&self) -> &str {
        &self.uuid
    }

    /// Catalog entry display name.
    pub fn display_name(&self) -> &str {
        &self.name
    }

    /// Scryfall CDN image URL for this printing.
    ///
    /// The CDN shards images by the first two characters of the Scryfall id:
    /// `https://cards.scryfall.io/{size}/{face}/{c0}/{c1}/{id}.jpg`.
    /// Returns `None` when the card has no Scryfall id.
    pub fn image_url(&self, size: ImageSize, face: CardFace) -> Option<String> {
        let scryfall_id = self.scryfall_id.as_deref().filter(|id| !id.is_empty())?;

        let mut chars = scryfall_id.chars();
        let dir1: String = chars.next().map(String::from).unwrap_or_default();
        let dir2: String = chars.next().map(String::from).unwrap_or_default();

        Some(format!(
            "{}/{}/{}/{}/{}/{}.jpg",
            SCRYFALL_IMAGE_HOST, size, face, dir1, dir2, scryfall_id
        ))
    }
}

/// Request to create a card printing.
///
/// The set is resolved from `mtg_set_id` when given, otherwise from `set_code`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewMtgCard {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub mtg_set_id: Option<String>,
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub scryfall_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub set_code: String,
    #[serde(default)]
    pub collector_number: String,
    #[serde(default)]
    pub rarity: Option<String>,
    #[serde(default)]
    pub mana_cost: Option<String>,
    #[serde(default)]
    pub mana_value: Option<f64>,
    #[serde(default)]
    pub type_line: Option<String>,
    #[serde(default)]
    pub oracle_text: Option<String>,
    #[serde(default)]
    pub power: Option<String>,
    #[serde(default)]
    pub toughness: Option<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub color_identity: Vec<String>,
    #[serde(default)]
    pub finishes: Vec<String>,
    #[serde(default)]
    pub frame_effects: Vec<String>,
    #[serde(default)]
    pub promo_types: Vec<String>,
    #[serde(default)]
    pub prices: Map<String, Value>,
    #[serde(default)]
    pub source_data: Option<Value>,
    #[serde(default)]
    pub cached_at: Option<DateTime<Utc>>,
}

impl NewMtgCard {
    /// Minimal card in the given set.
    pub fn new(
        set: &MtgSet,
        uuid: impl Into<String>,
        name: impl Into<String>,
        collector_number: impl Into<String>,
    ) -> Self {
        Self {
            mtg_set_id: Some(set.id.clone()),
            uuid: uuid.into(),
            name: name.into(),
            set_code: set.code.clone(),
            collector_number: collector_number.into(),
            ..Default::default()
        }
    }

    /// Presence checks; uniqueness and the set reference are checked by the store.
    pub fn validate_fields(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        validation::require_present(&mut errors, "uuid", &self.uuid);
        validation::require_present(&mut errors, "name", &self.name);
        validation::require_present(&mut errors, "set_code", &self.set_code);
        validation::require_present(&mut errors, "collector_number", &self.collector_number);
        errors
    }
}

/// Scryfall image versions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSize {
    Small,
    #[default]
    Normal,
    Large,
    Png,
    ArtCrop,
    BorderCrop,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::Small => "small",
            ImageSize::Normal => "normal",
            ImageSize::Large => "large",
            ImageSize::Png => "png",
            ImageSize::ArtCrop => "art_crop",
            ImageSize::BorderCrop => "border_crop",
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Card face for double-faced cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardFace {
    #[default]
    Front,
    Back,
}

impl CardFace {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardFace::Front => "front",
            CardFace::Back => "back",
        }
    }
}

impl fmt::Display for CardFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full-text card search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardSearchQuery {
    /// Free text, matched by prefix against name, type line and rules text.
    pub query: String,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

pub const DEFAULT_SEARCH_LIMIT: u32 = 50;
pub const MAX_SEARCH_LIMIT: u32 = 1000;

fn default_limit() -> u32 {
    DEFAULT_SEARCH_LIMIT
}

impl CardSearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            limit: DEFAULT_SEARCH_LIMIT,
            offset: 0,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    /// Limit clamped to `1..=MAX_SEARCH_LIMIT`.
    pub fn effective_limit(&self) -> u32 {
        self.limit.clamp(1, MAX_SEARCH_LIMIT)
    }
}

/// Card store statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardStats {
    pub total_sets: u64,
    pub total_cards: u64,
}

/// Errors for set and card operations.
#[derive(Debug, Error)]
pub enum MtgError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card_with_scryfall_id(scryfall_id: Option<&str>) -> MtgCard {
        let now = Utc::now();
        MtgCard {
            id: "id-1".to_string(),
            mtg_set_id: "set-1".to_string(),
            uuid: "test-uuid-123".to_string(),
            scryfall_id: scryfall_id.map(String::from),
            name: "Lightning Bolt".to_string(),
            set_code: "LEB".to_string(),
            collector_number: "161".to_string(),
            rarity: Some("common".to_string()),
            mana_cost: Some("{R}".to_string()),
            mana_value: Some(1.0),
            type_line: Some("Instant".to_string()),
            oracle_text: Some("Lightning Bolt deals 3 damage to any target.".to_string()),
            power: None,
            toughness: None,
            colors: vec!["R".to_string()],
            color_identity: vec!["R".to_string()],
            finishes: vec!["nonfoil".to_string()],
            frame_effects: vec![],
            promo_types: vec![],
            prices: Map::new(),
            source_data: Value::Object(Map::new()),
            cached_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_identifier_and_display_name() {
        let card = card_with_scryfall_id(None);
        assert_eq!(card.identifier(), "test-uuid-123");
        assert_eq!(card.display_name(), "Lightning Bolt");
    }

    #[test]
    fn test_image_url_uses_first_two_characters() {
        let card = card_with_scryfall_id(Some("abc123"));
        assert_eq!(
            card.image_url(ImageSize::Normal, CardFace::Front).as_deref(),
            Some("https://cards.scryfall.io/normal/front/a/b/abc123.jpg")
        );
    }

    #[test]
    fn test_image_url_sizes_and_faces() {
        let card = card_with_scryfall_id(Some("abc123"));
        let small = card.image_url(ImageSize::Small, CardFace::Front).unwrap();
        let large = card.image_url(ImageSize::Large, CardFace::Back).unwrap();
        let art = card.image_url(ImageSize::ArtCrop, CardFace::Front).unwrap();

        assert!(small.contains("/small/"));
        assert!(large.contains("/large/back/"));
        assert!(art.contains("/art_crop/"));
    }

    #[test]
    fn test_image_url_defaults_to_normal_front() {
        let card = card_with_scryfall_id(Some("abc123"));
        let url = card
            .image_url(ImageSize::default(), CardFace::default())
            .unwrap();
        assert!(url.contains("/normal/front/"));
    }

    #[test]
    fn test_image_url_without_scryfall_id() {
        assert!(card_with_scryfall_id(None)
            .image_url(ImageSize::Normal, CardFace::Front)
            .is_none());
        assert!(card_with_scryfall_id(Some(""))
            .image_url(ImageSize::Normal, CardFace::Front)
            .is_none());
    }

    #[test]
    fn test_image_url_single_character_id() {
        let card = card_with_scryfall_id(Some("a"));
        assert_eq!(
            card.image_url(ImageSize::Normal, CardFace::Front).as_deref(),
            Some("https://cards.scryfall.io/normal/front/a//a.jpg")
        );
    }

    #[test]
    fn test_image_size_serialization() {
        assert_eq!(
            serde_json::to_string(&ImageSize::BorderCrop).unwrap(),
            "\"border_crop\""
        );
        let size: ImageSize = serde_json::from_str("\"png\"").unwrap();
        assert_eq!(size, ImageSize::Png);
    }

    #[test]
    fn test_new_set_validation() {
        let errors = NewMtgSet::default().validate_fields();
        assert_eq!(errors.get("code"), &["can't be blank".to_string()]);
        assert_eq!(errors.get("name"), &["can't be blank".to_string()]);

        assert!(NewMtgSet::new("LEB", "Limited Edition Beta")
            .validate_fields()
            .is_empty());
    }

    #[test]
    fn test_new_card_validation() {
        let errors = NewMtgCard::default().validate_fields();
        for field in ["uuid", "name", "set_code", "collector_number"] {
            assert_eq!(errors.get(field), &["can't be blank".to_string()], "{}", field);
        }
    }

    #[test]
    fn test_new_card_json_defaults() {
        let card: NewMtgCard = serde_json::from_str(
            r#"{"uuid": "u-1", "name": "Island", "set_code": "LEB", "collector_number": "1"}"#,
        )
        .unwrap();
        assert!(card.colors.is_empty());
        assert!(card.finishes.is_empty());
        assert!(card.prices.is_empty());
        assert!(card.mtg_set_id.is_none());
    }

    #[test]
    fn test_search_query_limit_clamped() {
        assert_eq!(CardSearchQuery::new("bolt").effective_limit(), 50);
        assert_eq!(CardSearchQuery::new("bolt").with_limit(0).effective_limit(), 1);
        assert_eq!(
            CardSearchQuery::new("bolt").with_limit(50_000).effective_limit(),
            MAX_SEARCH_LIMIT
        );
    }

    #[test]
    fn test_search_query_default_limit_from_json() {
        let query: CardSearchQuery = serde_json::from_str(r#"{"query": "lotus"}"#).unwrap();
        assert_eq!(query.limit, 50);
        assert_eq!(query.offset, 0);
    }
}
