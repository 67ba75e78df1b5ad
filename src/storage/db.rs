//! SQLite storage layer for quote-sync
//!
//! The database is a plain key/value table of named slots. Each slot holds
//! a string (usually JSON) and is overwritten wholesale on every write.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

use crate::config::data_dir;

/// Slot holding the JSON array of quotes.
pub const QUOTES_SLOT: &str = "quotes";

/// Slot holding the last selected category filter.
pub const SELECTED_CATEGORY_SLOT: &str = "selectedCategory";

/// Slot holding the summary of the last sync pass.
pub const LAST_SYNC_SLOT: &str = "lastSync";

/// Get the default database path
pub fn default_db_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("quotes.db"))
}

/// Database connection wrapper
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create the database
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open the default database
    pub fn open_default() -> Result<Self> {
        let path = default_db_path()?;
        Self::open(&path)
    }

    /// Open a throwaway in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Run migrations
    fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS slots (
                name TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )?;
        Ok(())
    }

    /// Read a slot, `None` if it was never written
    pub fn get_slot(&self, name: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM slots WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("Failed to read slot '{name}'"))
    }

    /// Overwrite a slot
    pub fn set_slot(&self, name: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                r#"
                INSERT INTO slots (name, value, updated_at)
                VALUES (?1, ?2, datetime('now'))
                ON CONFLICT(name) DO UPDATE SET
                    value = ?2,
                    updated_at = datetime('now')
                "#,
                params![name, value],
            )
            .with_context(|| format!("Failed to write slot '{name}'"))?;
        Ok(())
    }
}
