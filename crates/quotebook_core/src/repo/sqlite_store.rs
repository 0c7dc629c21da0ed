//! Owned SQLite handle implementing every repository contract.

use crate::db::{open_db, open_db_in_memory, DbResult};
use rusqlite::Connection;
use std::path::Path;

/// Durable store backed by one SQLite connection.
///
/// Owns its connection so it can be moved into long-running sync tasks.
pub struct SqliteQuoteStore {
    conn: Connection,
}

impl SqliteQuoteStore {
    /// Opens the database file at `path`, applying migrations.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
