//! SQLite-backed set and card store with an FTS5 card index.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, ToSql};
use serde_json::{Map, Value};
use tracing::debug;

use super::search::match_expression;
use super::{
    CardSearchQuery, CardStats, CardStore, MtgCard, MtgError, MtgSet, NewMtgCard, NewMtgSet,
};
use crate::catalog::parse_timestamp;
use crate::validation::{self, assign_id};

const SET_COLUMNS: &str =
    "id, code, name, release_date, set_type, card_count, icon_uri, created_at, updated_at";

const CARD_COLUMNS: &str = "c.id, c.mtg_set_id, c.uuid, c.scryfall_id, c.name, c.set_code, \
     c.collector_number, c.rarity, c.mana_cost, c.mana_value, c.type_line, c.oracle_text, \
     c.power, c.toughness, c.colors, c.color_identity, c.finishes, c.frame_effects, \
     c.promo_types, c.prices, c.source_data, c.cached_at, c.created_at, c.updated_at";

const RELEASE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Name matches outrank type line matches, which outrank rules text.
const RANK_EXPR: &str = "bm25(mtg_cards_fts, 10.0, 2.0, 1.0)";

/// SQLite-backed store for sets and cards.
pub struct SqliteCardStore {
    conn: Mutex<Connection>,
}

impl SqliteCardStore {
    /// Create a new SQLite card store, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, MtgError> {
        let conn = Connection::open(path).map_err(|e| MtgError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite card store (useful for testing).
    pub fn in_memory() -> Result<Self, MtgError> {
        let conn = Connection::open_in_memory().map_err(|e| MtgError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), MtgError> {
        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS mtg_sets (
                id TEXT PRIMARY KEY,
                code TEXT NOT NULL,
                name TEXT NOT NULL,
                release_date TEXT,
                set_type TEXT,
                card_count INTEGER,
                icon_uri TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE UNIQUE INDEX IF NOT EXISTS idx_mtg_sets_code ON mtg_sets(code);

            -- seq is the stable rowid the full-text index points at
            CREATE TABLE IF NOT EXISTS mtg_cards (
                seq INTEGER PRIMARY KEY,
                id TEXT NOT NULL UNIQUE,
                mtg_set_id TEXT NOT NULL REFERENCES mtg_sets(id) ON DELETE CASCADE,
                uuid TEXT NOT NULL,
                scryfall_id TEXT,
                name TEXT NOT NULL,
                set_code TEXT NOT NULL,
                collector_number TEXT NOT NULL,
                rarity TEXT,
                mana_cost TEXT,
                mana_value REAL,
                type_line TEXT,
                oracle_text TEXT,
                power TEXT,
                toughness TEXT,
                colors TEXT NOT NULL DEFAULT '[]',
                color_identity TEXT NOT NULL DEFAULT '[]',
                finishes TEXT NOT NULL DEFAULT '[]',
                frame_effects TEXT NOT NULL DEFAULT '[]',
                promo_types TEXT NOT NULL DEFAULT '[]',
                prices TEXT NOT NULL DEFAULT '{}',
                source_data TEXT NOT NULL DEFAULT '{}',
                cached_at TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_mtg_cards_set ON mtg_cards(mtg_set_id);
            CREATE UNIQUE INDEX IF NOT EXISTS idx_mtg_cards_uuid ON mtg_cards(uuid);
            CREATE UNIQUE INDEX IF NOT EXISTS idx_mtg_cards_scryfall_id ON mtg_cards(scryfall_id);
            CREATE INDEX IF NOT EXISTS idx_mtg_cards_name ON mtg_cards(name);
            CREATE UNIQUE INDEX IF NOT EXISTS idx_mtg_cards_set_number
                ON mtg_cards(set_code, collector_number);

            CREATE VIRTUAL TABLE IF NOT EXISTS mtg_cards_fts USING fts5(
                name,
                type_line,
                oracle_text,
                content = 'mtg_cards',
                content_rowid = 'seq',
                tokenize = 'unicode61 remove_diacritics 2'
            );

            CREATE TRIGGER IF NOT EXISTS mtg_cards_fts_insert AFTER INSERT ON mtg_cards BEGIN
                INSERT INTO mtg_cards_fts(rowid, name, type_line, oracle_text)
                VALUES (new.seq, new.name, new.type_line, new.oracle_text);
            END;

            CREATE TRIGGER IF NOT EXISTS mtg_cards_fts_delete AFTER DELETE ON mtg_cards BEGIN
                INSERT INTO mtg_cards_fts(mtg_cards_fts, rowid, name, type_line, oracle_text)
                VALUES ('delete', old.seq, old.name, old.type_line, old.oracle_text);
            END;

            CREATE TRIGGER IF NOT EXISTS mtg_cards_fts_update AFTER UPDATE ON mtg_cards BEGIN
                INSERT INTO mtg_cards_fts(mtg_cards_fts, rowid, name, type_line, oracle_text)
                VALUES ('delete', old.seq, old.name, old.type_line, old.oracle_text);
                INSERT INTO mtg_cards_fts(rowid, name, type_line, oracle_text)
                VALUES (new.seq, new.name, new.type_line, new.oracle_text);
            END;
            "#,
        )
        .map_err(|e| MtgError::Database(e.to_string()))?;

        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, MtgError> {
        self.conn
            .lock()
            .map_err(|e| MtgError::Database(format!("connection lock poisoned: {}", e)))
    }

    fn exists(conn: &Connection, sql: &str, params: &[&dyn ToSql]) -> Result<bool, MtgError> {
        conn.query_row(sql, params, |_| Ok(()))
            .optional()
            .map(|row| row.is_some())
            .map_err(|e| MtgError::Database(e.to_string()))
    }

    fn row_to_set(row: &rusqlite::Row) -> rusqlite::Result<MtgSet> {
        let release_date: Option<String> = row.get(3)?;
        let created_at_str: String = row.get(7)?;
        let updated_at_str: String = row.get(8)?;

        Ok(MtgSet {
            id: row.get(0)?,
            code: row.get(1)?,
            name: row.get(2)?,
            release_date: release_date
                .and_then(|s| NaiveDate::parse_from_str(&s, RELEASE_DATE_FORMAT).ok()),
            set_type: row.get(4)?,
            card_count: row.get(5)?,
            icon_uri: row.get(6)?,
            created_at: parse_timestamp(&created_at_str),
            updated_at: parse_timestamp(&updated_at_str),
        })
    }

    fn row_to_card(row: &rusqlite::Row) -> rusqlite::Result<MtgCard> {
        let cached_at: Option<String> = row.get(21)?;
        let created_at_str: String = row.get(22)?;
        let updated_at_str: String = row.get(23)?;

        Ok(MtgCard {
            id: row.get(0)?,
            mtg_set_id: row.get(1)?,
            uuid: row.get(2)?,
            scryfall_id: row.get(3)?,
            name: row.get(4)?,
            set_code: row.get(5)?,
            collector_number: row.get(6)?,
            rarity: row.get(7)?,
            mana_cost: row.get(8)?,
            mana_value: row.get(9)?,
            type_line: row.get(10)?,
            oracle_text: row.get(11)?,
            power: row.get(12)?,
            toughness: row.get(13)?,
            colors: json_list(row.get(14)?),
            color_identity: json_list(row.get(15)?),
            finishes: json_list(row.get(16)?),
            frame_effects: json_list(row.get(17)?),
            promo_types: json_list(row.get(18)?),
            prices: json_object(row.get(19)?),
            source_data: json_value(row.get(20)?),
            cached_at: cached_at.as_deref().map(parse_timestamp),
            created_at: parse_timestamp(&created_at_str),
            updated_at: parse_timestamp(&updated_at_str),
        })
    }

    fn query_cards(
        conn: &Connection,
        sql: &str,
        params: &[&dyn ToSql],
    ) -> Result<Vec<MtgCard>, MtgError> {
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| MtgError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params, Self::row_to_card)
            .map_err(|e| MtgError::Database(e.to_string()))?;

        let mut cards = Vec::new();
        for row in rows {
            cards.push(row.map_err(|e| MtgError::Database(e.to_string()))?);
        }
        Ok(cards)
    }

    fn fetch_set(conn: &Connection, column: &str, value: &str) -> Result<Option<MtgSet>, MtgError> {
        conn.query_row(
            &format!("SELECT {} FROM mtg_sets WHERE {} = ?", SET_COLUMNS, column),
            params![value],
            Self::row_to_set,
        )
        .optional()
        .map_err(|e| MtgError::Database(e.to_string()))
    }

    fn fetch_card(conn: &Connection, column: &str, value: &str) -> Result<Option<MtgCard>, MtgError> {
        conn.query_row(
            &format!(
                "SELECT {} FROM mtg_cards c WHERE c.{} = ?",
                CARD_COLUMNS, column
            ),
            params![value],
            Self::row_to_card,
        )
        .optional()
        .map_err(|e| MtgError::Database(e.to_string()))
    }

    /// Find the owning set: by id when given, otherwise by set code.
    fn resolve_set_id(conn: &Connection, request: &NewMtgCard) -> Result<Option<String>, MtgError> {
        match request.mtg_set_id.as_deref().filter(|id| !id.is_empty()) {
            Some(id) => Ok(Self::fetch_set(conn, "id", id)?.map(|set| set.id)),
            None if !request.set_code.trim().is_empty() => {
                Ok(Self::fetch_set(conn, "code", &request.set_code)?.map(|set| set.id))
            }
            None => Ok(None),
        }
    }
}

fn json_list(value: Option<String>) -> Vec<String> {
    value
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

fn json_object(value: Option<String>) -> Map<String, Value> {
    value
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

fn json_value(value: Option<String>) -> Value {
    value
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_else(|| Value::Object(Map::new()))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, MtgError> {
    serde_json::to_string(value).map_err(|e| MtgError::Database(e.to_string()))
}

impl CardStore for SqliteCardStore {
    fn create_set(&self, request: NewMtgSet) -> Result<MtgSet, MtgError> {
        let mut errors = request.validate_fields();

        let conn = self.conn()?;

        if !request.code.trim().is_empty()
            && Self::exists(
                &conn,
                "SELECT 1 FROM mtg_sets WHERE code = ?",
                params![request.code],
            )?
        {
            errors.add("code", validation::TAKEN);
        }

        let id = assign_id(request.id);
        if Self::exists(&conn, "SELECT 1 FROM mtg_sets WHERE id = ?", params![id])? {
            errors.add("id", validation::TAKEN);
        }

        errors.into_result().map_err(MtgError::Validation)?;

        let now = Utc::now();
        let set = MtgSet {
            id,
            code: request.code,
            name: request.name,
            release_date: request.release_date,
            set_type: request.set_type,
            card_count: request.card_count,
            icon_uri: request.icon_uri,
            created_at: now,
            updated_at: now,
        };

        conn.execute(
            &format!(
                "INSERT INTO mtg_sets ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
                SET_COLUMNS
            ),
            params![
                &set.id,
                &set.code,
                &set.name,
                set.release_date
                    .map(|d| d.format(RELEASE_DATE_FORMAT).to_string()),
                &set.set_type,
                set.card_count,
                &set.icon_uri,
                now.to_rfc3339(),
                now.to_rfc3339(),
            ],
        )
        .map_err(|e| MtgError::Database(e.to_string()))?;

        debug!(code = %set.code, id = %set.id, "Created set");
        Ok(set)
    }

    fn get_set(&self, id: &str) -> Result<MtgSet, MtgError> {
        let conn = self.conn()?;
        Self::fetch_set(&conn, "id", id)?.ok_or_else(|| MtgError::NotFound(format!("set {}", id)))
    }

    fn get_set_by_code(&self, code: &str) -> Result<Option<MtgSet>, MtgError> {
        let conn = self.conn()?;
        Self::fetch_set(&conn, "code", code)
    }

    fn list_sets(&self) -> Result<Vec<MtgSet>, MtgError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM mtg_sets ORDER BY release_date DESC, code ASC",
                SET_COLUMNS
            ))
            .map_err(|e| MtgError::Database(e.to_string()))?;

        let rows = stmt
            .query_map([], Self::row_to_set)
            .map_err(|e| MtgError::Database(e.to_string()))?;

        let mut sets = Vec::new();
        for row in rows {
            sets.push(row.map_err(|e| MtgError::Database(e.to_string()))?);
        }
        Ok(sets)
    }

    fn delete_set(&self, id: &str) -> Result<(), MtgError> {
        let conn = self.conn()?;

        // Cards go with the set (ON DELETE CASCADE).
        let rows_affected = conn
            .execute("DELETE FROM mtg_sets WHERE id = ?", params![id])
            .map_err(|e| MtgError::Database(e.to_string()))?;

        if rows_affected == 0 {
            return Err(MtgError::NotFound(format!("set {}", id)));
        }

        Ok(())
    }

    fn create_card(&self, mut request: NewMtgCard) -> Result<MtgCard, MtgError> {
        // An empty Scryfall id means the printing has none.
        request.scryfall_id = request.scryfall_id.filter(|id| !id.trim().is_empty());
        let mut errors = request.validate_fields();

        let conn = self.conn()?;

        if !request.uuid.trim().is_empty()
            && Self::exists(
                &conn,
                "SELECT 1 FROM mtg_cards WHERE uuid = ?",
                params![request.uuid],
            )?
        {
            errors.add("uuid", validation::TAKEN);
        }

        if let Some(scryfall_id) = request.scryfall_id.as_deref() {
            if Self::exists(
                &conn,
                "SELECT 1 FROM mtg_cards WHERE scryfall_id = ?",
                params![scryfall_id],
            )? {
                errors.add("scryfall_id", validation::TAKEN);
            }
        }

        if !request.set_code.trim().is_empty()
            && !request.collector_number.trim().is_empty()
            && Self::exists(
                &conn,
                "SELECT 1 FROM mtg_cards WHERE set_code = ? AND collector_number = ?",
                params![request.set_code, request.collector_number],
            )?
        {
            errors.add("collector_number", validation::TAKEN);
        }

        let mtg_set_id = Self::resolve_set_id(&conn, &request)?;
        if mtg_set_id.is_none() {
            errors.add("mtg_set", validation::MUST_EXIST);
        }

        let id = assign_id(request.id);
        if Self::exists(&conn, "SELECT 1 FROM mtg_cards WHERE id = ?", params![id])? {
            errors.add("id", validation::TAKEN);
        }

        errors.into_result().map_err(MtgError::Validation)?;
        let mtg_set_id = mtg_set_id.unwrap_or_default();

        let now = Utc::now();
        let card = MtgCard {
            id,
            mtg_set_id,
            uuid: request.uuid,
            scryfall_id: request.scryfall_id,
            name: request.name,
            set_code: request.set_code,
            collector_number: request.collector_number,
            rarity: request.rarity,
            mana_cost: request.mana_cost,
            mana_value: request.mana_value,
            type_line: request.type_line,
            oracle_text: request.oracle_text,
            power: request.power,
            toughness: request.toughness,
            colors: request.colors,
            color_identity: request.color_identity,
            finishes: request.finishes,
            frame_effects: request.frame_effects,
            promo_types: request.promo_types,
            prices: request.prices,
            source_data: request
                .source_data
                .unwrap_or_else(|| Value::Object(Map::new())),
            cached_at: request.cached_at,
            created_at: now,
            updated_at: now,
        };

        conn.execute(
            "INSERT INTO mtg_cards (id, mtg_set_id, uuid, scryfall_id, name, set_code,
                collector_number, rarity, mana_cost, mana_value, type_line, oracle_text,
                power, toughness, colors, color_identity, finishes, frame_effects,
                promo_types, prices, source_data, cached_at, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                &card.id,
                &card.mtg_set_id,
                &card.uuid,
                &card.scryfall_id,
                &card.name,
                &card.set_code,
                &card.collector_number,
                &card.rarity,
                &card.mana_cost,
                card.mana_value,
                &card.type_line,
                &card.oracle_text,
                &card.power,
                &card.toughness,
                to_json(&card.colors)?,
                to_json(&card.color_identity)?,
                to_json(&card.finishes)?,
                to_json(&card.frame_effects)?,
                to_json(&card.promo_types)?,
                to_json(&card.prices)?,
                to_json(&card.source_data)?,
                card.cached_at.map(|dt| dt.to_rfc3339()),
                now.to_rfc3339(),
                now.to_rfc3339(),
            ],
        )
        .map_err(|e| MtgError::Database(e.to_string()))?;

        debug!(uuid = %card.uuid, set = %card.set_code, "Created card");
        Ok(card)
    }

    fn get_card(&self, id: &str) -> Result<MtgCard, MtgError> {
        let conn = self.conn()?;
        Self::fetch_card(&conn, "id", id)?
            .ok_or_else(|| MtgError::NotFound(format!("card {}", id)))
    }

    fn find_card_by_uuid(&self, uuid: &str) -> Result<Option<MtgCard>, MtgError> {
        let conn = self.conn()?;
        Self::fetch_card(&conn, "uuid", uuid)
    }

    fn cards_in_set(&self, set_id: &str) -> Result<Vec<MtgCard>, MtgError> {
        let conn = self.conn()?;
        Self::query_cards(
            &conn,
            &format!(
                "SELECT {} FROM mtg_cards c WHERE c.mtg_set_id = ?
                 ORDER BY CAST(c.collector_number AS INTEGER), c.collector_number",
                CARD_COLUMNS
            ),
            params![set_id],
        )
    }

    fn delete_card(&self, id: &str) -> Result<(), MtgError> {
        let conn = self.conn()?;

        let rows_affected = conn
            .execute("DELETE FROM mtg_cards WHERE id = ?", params![id])
            .map_err(|e| MtgError::Database(e.to_string()))?;

        if rows_affected == 0 {
            return Err(MtgError::NotFound(format!("card {}", id)));
        }

        Ok(())
    }

    fn search_cards(&self, query: &CardSearchQuery) -> Result<Vec<MtgCard>, MtgError> {
        let Some(expression) = match_expression(&query.query) else {
            return Ok(Vec::new());
        };

        let conn = self.conn()?;
        debug!(%expression, limit = query.effective_limit(), "Searching cards");

        Self::query_cards(
            &conn,
            &format!(
                "SELECT {} FROM mtg_cards_fts
                 JOIN mtg_cards c ON c.seq = mtg_cards_fts.rowid
                 WHERE mtg_cards_fts MATCH ?
                 ORDER BY {}, c.name
                 LIMIT ? OFFSET ?",
                CARD_COLUMNS, RANK_EXPR
            ),
            params![expression, query.effective_limit(), query.offset],
        )
    }

    fn stats(&self) -> Result<CardStats, MtgError> {
        let conn = self.conn()?;

        let total_sets: u64 = conn
            .query_row("SELECT COUNT(*) FROM mtg_sets", [], |row| row.get(0))
            .map_err(|e| MtgError::Database(e.to_string()))?;

        let total_cards: u64 = conn
            .query_row("SELECT COUNT(*) FROM mtg_cards", [], |row| row.get(0))
            .map_err(|e| MtgError::Database(e.to_string()))?;

        Ok(CardStats {
            total_sets,
            total_cards,
        })
    }
}
