//! Durable key/value preferences (last selected filter and friends).

use crate::repo::quote_repo::RepoResult;
use crate::repo::SqliteQuoteStore;
use rusqlite::{params, OptionalExtension};

/// Preference key holding the last selected category filter.
pub const LAST_FILTER_KEY: &str = "last_filter";
/// Preference key holding the JSON-encoded result of the last sync tick.
pub const LAST_SYNC_STATUS_KEY: &str = "last_sync_status";

/// Repository interface for string preferences.
pub trait PreferenceRepository {
    fn get_preference(&self, key: &str) -> RepoResult<Option<String>>;
    fn set_preference(&self, key: &str, value: &str) -> RepoResult<()>;
    fn remove_preference(&self, key: &str) -> RepoResult<()>;
}

impl PreferenceRepository for SqliteQuoteStore {
    fn get_preference(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .connection()
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_preference(&self, key: &str, value: &str) -> RepoResult<()> {
        self.connection().execute(
            "INSERT INTO preferences (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove_preference(&self, key: &str) -> RepoResult<()> {
        self.connection()
            .execute("DELETE FROM preferences WHERE key = ?1;", [key])?;
        Ok(())
    }
}
