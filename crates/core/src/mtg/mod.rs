//! Magic: The Gathering sets and card printings.
//!
//! Cards belong to a set and are indexed for full-text prefix search on
//! name, type line and rules text.

mod search;
mod sqlite;
mod types;

pub use search::match_expression;
pub use sqlite::SqliteCardStore;
pub use types::*;

/// Trait for set and card storage.
pub trait CardStore: Send + Sync {
    /// Validate and persist a new set. Set codes are unique.
    fn create_set(&self, request: NewMtgSet) -> Result<MtgSet, MtgError>;

    /// Get a set by ID.
    fn get_set(&self, id: &str) -> Result<MtgSet, MtgError>;

    /// Find a set by its code.
    fn get_set_by_code(&self, code: &str) -> Result<Option<MtgSet>, MtgError>;

    /// List all sets, newest release first.
    fn list_sets(&self) -> Result<Vec<MtgSet>, MtgError>;

    /// Delete a set together with all of its cards.
    fn delete_set(&self, id: &str) -> Result<(), MtgError>;

    /// Validate and persist a new card printing.
    ///
    /// Rejects duplicate UUIDs, duplicate Scryfall ids and duplicate
    /// (set code, collector number) pairs.
    fn create_card(&self, request: NewMtgCard) -> Result<MtgCard, MtgError>;

    /// Get a card by its primary key.
    fn get_card(&self, id: &str) -> Result<MtgCard, MtgError>;

    /// Find a card by its MTGJSON UUID.
    fn find_card_by_uuid(&self, uuid: &str) -> Result<Option<MtgCard>, MtgError>;

    /// Cards of a set in collector number order.
    fn cards_in_set(&self, set_id: &str) -> Result<Vec<MtgCard>, MtgError>;

    /// Delete a single card.
    fn delete_card(&self, id: &str) -> Result<(), MtgError>;

    /// Ranked full-text prefix search.
    fn search_cards(&self, query: &CardSearchQuery) -> Result<Vec<MtgCard>, MtgError>;

    /// Set and card counts.
    fn stats(&self) -> Result<CardStats, MtgError>;
}
