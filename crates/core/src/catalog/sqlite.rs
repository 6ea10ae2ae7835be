//! SQLite-backed catalog store implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, TransactionBehavior};
use serde_json::{Map, Value};

use super::{Catalog, CatalogError, CatalogStore, NewCatalog, SourceType};
use crate::validation::assign_id;

const CATALOG_COLUMNS: &str = "id, name, source_type, source_config, created_at, updated_at";

/// SQLite-backed catalog store.
pub struct SqliteCatalogStore {
    conn: Mutex<Connection>,
}

impl SqliteCatalogStore {
    /// Create a new SQLite catalog store, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, CatalogError> {
        let conn = Connection::open(path).map_err(|e| CatalogError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite catalog store (useful for testing).
    pub fn in_memory() -> Result<Self, CatalogError> {
        let conn =
            Connection::open_in_memory().map_err(|e| CatalogError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), CatalogError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS catalogs (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                source_type TEXT NOT NULL,
                source_config TEXT NOT NULL DEFAULT '{}',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_catalogs_source_type ON catalogs(source_type);
            "#,
        )
        .map_err(|e| CatalogError::Database(e.to_string()))?;

        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, CatalogError> {
        self.conn
            .lock()
            .map_err(|e| CatalogError::Database(format!("connection lock poisoned: {}", e)))
    }

    fn row_to_catalog(row: &rusqlite::Row) -> rusqlite::Result<Catalog> {
        let source_type_str: String = row.get(2)?;
        let source_config_json: String = row.get(3)?;
        let created_at_str: String = row.get(4)?;
        let updated_at_str: String = row.get(5)?;

        let source_type = source_type_str.parse::<SourceType>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
        })?;

        // Anything but a JSON object is treated as an empty config.
        let source_config: Map<String, Value> =
            serde_json::from_str(&source_config_json).unwrap_or_default();

        Ok(Catalog {
            id: row.get(0)?,
            name: row.get(1)?,
            source_type,
            source_config,
            created_at: parse_timestamp(&created_at_str),
            updated_at: parse_timestamp(&updated_at_str),
        })
    }

    fn fetch(conn: &Connection, id: &str) -> Result<Catalog, CatalogError> {
        conn.query_row(
            &format!("SELECT {} FROM catalogs WHERE id = ?", CATALOG_COLUMNS),
            params![id],
            Self::row_to_catalog,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => CatalogError::NotFound(id.to_string()),
            _ => CatalogError::Database(e.to_string()),
        })
    }

    fn query_catalogs(
        conn: &Connection,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<Catalog>, CatalogError> {
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params, Self::row_to_catalog)
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        let mut catalogs = Vec::new();
        for row in rows {
            catalogs.push(row.map_err(|e| CatalogError::Database(e.to_string()))?);
        }
        Ok(catalogs)
    }
}

pub(crate) fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

impl CatalogStore for SqliteCatalogStore {
    fn create(&self, request: NewCatalog) -> Result<Catalog, CatalogError> {
        let source_type = request.validate().map_err(CatalogError::Validation)?;

        let conn = self.conn()?;
        let now = Utc::now();
        let catalog = Catalog {
            id: assign_id(request.id),
            name: request.name,
            source_type,
            source_config: request.source_config.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        let source_config_json = serde_json::to_string(&catalog.source_config)
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        conn.execute(
            &format!(
                "INSERT INTO catalogs ({}) VALUES (?, ?, ?, ?, ?, ?)",
                CATALOG_COLUMNS
            ),
            params![
                &catalog.id,
                &catalog.name,
                catalog.source_type.as_str(),
                source_config_json,
                now.to_rfc3339(),
                now.to_rfc3339(),
            ],
        )
        .map_err(|e| CatalogError::Database(e.to_string()))?;

        Ok(catalog)
    }

    fn get(&self, id: &str) -> Result<Catalog, CatalogError> {
        let conn = self.conn()?;
        Self::fetch(&conn, id)
    }

    fn list(&self) -> Result<Vec<Catalog>, CatalogError> {
        let conn = self.conn()?;
        Self::query_catalogs(
            &conn,
            &format!(
                "SELECT {} FROM catalogs ORDER BY created_at ASC, name ASC",
                CATALOG_COLUMNS
            ),
            params![],
        )
    }

    fn find_by_source_type(&self, source_type: SourceType) -> Result<Vec<Catalog>, CatalogError> {
        let conn = self.conn()?;
        Self::query_catalogs(
            &conn,
            &format!(
                "SELECT {} FROM catalogs WHERE source_type = ? ORDER BY created_at ASC, name ASC",
                CATALOG_COLUMNS
            ),
            params![source_type.as_str()],
        )
    }

    fn update_source_config(
        &self,
        id: &str,
        source_config: Map<String, Value>,
    ) -> Result<Catalog, CatalogError> {
        let conn = self.conn()?;
        let now = Utc::now();

        let source_config_json = serde_json::to_string(&source_config)
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        let rows_affected = conn
            .execute(
                "UPDATE catalogs SET source_config = ?, updated_at = ? WHERE id = ?",
                params![source_config_json, now.to_rfc3339(), id],
            )
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        if rows_affected == 0 {
            return Err(CatalogError::NotFound(id.to_string()));
        }

        Self::fetch(&conn, id)
    }

    fn merge_source_config(
        &self,
        id: &str,
        entries: Map<String, Value>,
    ) -> Result<Catalog, CatalogError> {
        let mut conn = self.conn()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        let mut source_config = Self::fetch(&tx, id)?.source_config;
        source_config.extend(entries);

        let source_config_json = serde_json::to_string(&source_config)
            .map_err(|e| CatalogError::Database(e.to_string()))?;
        tx.execute(
            "UPDATE catalogs SET source_config = ?, updated_at = ? WHERE id = ?",
            params![source_config_json, Utc::now().to_rfc3339(), id],
        )
        .map_err(|e| CatalogError::Database(e.to_string()))?;

        let catalog = Self::fetch(&tx, id)?;
        tx.commit()
            .map_err(|e| CatalogError::Database(e.to_string()))?;
        Ok(catalog)
    }

    fn delete(&self, id: &str) -> Result<(), CatalogError> {
        let conn = self.conn()?;

        let rows_affected = conn
            .execute("DELETE FROM catalogs WHERE id = ?", params![id])
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        if rows_affected == 0 {
            return Err(CatalogError::NotFound(id.to_string()));
        }

        Ok(())
    }

    fn count(&self) -> Result<u64, CatalogError> {
        let conn = self.conn()?;
        conn.query_row("SELECT COUNT(*) FROM catalogs", [], |row| row.get(0))
            .map_err(|e| CatalogError::Database(e.to_string()))
    }
}
