//! Quote repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Keep the ordered quote collection in the `quotes` table.
//! - Provide the atomic "replace by text" primitive used by sync.
//!
//! # Invariants
//! - Insertion order is preserved through the monotonic `position` column.
//! - Read paths reject invalid persisted rows instead of masking them.

use crate::db::DbError;
use crate::model::quote::{Quote, QuoteValidationError};
use crate::repo::SqliteQuoteStore;
use rusqlite::{params, Connection, Row};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for quote and preference persistence.
#[derive(Debug)]
pub enum RepoError {
    Validation(QuoteValidationError),
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<QuoteValidationError> for RepoError {
    fn from(value: QuoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Counts reported by [`QuoteRepository::replace_by_text`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaceOutcome {
    /// Local rows removed because a replacement shares their text.
    pub removed: usize,
    /// Replacement rows appended.
    pub appended: usize,
}

/// Repository interface for the ordered quote collection.
pub trait QuoteRepository {
    fn append(&self, quote: &Quote) -> RepoResult<()>;
    /// Appends all quotes in one transaction.
    fn append_many(&self, quotes: &[Quote]) -> RepoResult<usize>;
    /// Returns every quote in insertion order.
    fn list(&self) -> RepoResult<Vec<Quote>>;
    fn count(&self) -> RepoResult<usize>;
    /// Structural membership check on `(text, category)`.
    fn contains(&self, quote: &Quote) -> RepoResult<bool>;
    /// Removes every row whose text equals a replacement's text, then
    /// appends the replacements, in one transaction.
    fn replace_by_text(&self, replacements: &[Quote]) -> RepoResult<ReplaceOutcome>;
    /// Removes every quote; preferences are untouched.
    fn clear(&self) -> RepoResult<()>;
}

impl QuoteRepository for SqliteQuoteStore {
    fn append(&self, quote: &Quote) -> RepoResult<()> {
        quote.validate()?;
        insert_quote(self.connection(), quote)
    }

    fn append_many(&self, quotes: &[Quote]) -> RepoResult<usize> {
        for quote in quotes {
            quote.validate()?;
        }

        let tx = self.connection().unchecked_transaction()?;
        for quote in quotes {
            insert_quote(&tx, quote)?;
        }
        tx.commit()?;

        Ok(quotes.len())
    }

    fn list(&self) -> RepoResult<Vec<Quote>> {
        let mut stmt = self
            .connection()
            .prepare("SELECT text, category FROM quotes ORDER BY position ASC;")?;
        let mut rows = stmt.query([])?;
        let mut quotes = Vec::new();

        while let Some(row) = rows.next()? {
            quotes.push(parse_quote_row(row)?);
        }

        Ok(quotes)
    }

    fn count(&self) -> RepoResult<usize> {
        let count: i64 = self
            .connection()
            .query_row("SELECT COUNT(*) FROM quotes;", [], |row| row.get(0))?;
        usize::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative quote count `{count}`")))
    }

    fn contains(&self, quote: &Quote) -> RepoResult<bool> {
        let exists: i64 = self.connection().query_row(
            "SELECT EXISTS(
                SELECT 1 FROM quotes WHERE text = ?1 AND category = ?2
            );",
            params![quote.text.as_str(), quote.category.as_str()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn replace_by_text(&self, replacements: &[Quote]) -> RepoResult<ReplaceOutcome> {
        for quote in replacements {
            quote.validate()?;
        }

        let texts: HashSet<&str> = replacements.iter().map(|q| q.text.as_str()).collect();
        let tx = self.connection().unchecked_transaction()?;
        let mut removed = 0;
        for text in texts {
            removed += tx.execute("DELETE FROM quotes WHERE text = ?1;", [text])?;
        }
        for quote in replacements {
            insert_quote(&tx, quote)?;
        }
        tx.commit()?;

        Ok(ReplaceOutcome {
            removed,
            appended: replacements.len(),
        })
    }

    fn clear(&self) -> RepoResult<()> {
        self.connection().execute("DELETE FROM quotes;", [])?;
        Ok(())
    }
}

fn insert_quote(conn: &Connection, quote: &Quote) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO quotes (text, category) VALUES (?1, ?2);",
        params![quote.text.as_str(), quote.category.as_str()],
    )?;
    Ok(())
}

fn parse_quote_row(row: &Row<'_>) -> RepoResult<Quote> {
    let quote = Quote {
        text: row.get("text")?,
        category: row.get("category")?,
    };
    quote
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("{err} in quotes row")))?;
    Ok(quote)
}
