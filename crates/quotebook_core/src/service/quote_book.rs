//! Quote store use-case service.
//!
//! # Responsibility
//! - Own the durable store and expose add/list/filter/import operations.
//! - Apply "server wins" substitutions coming from sync.
//!
//! # Invariants
//! - Every mutation is written through to durable storage before returning.
//! - A rejected input never changes stored state.
//! - Categories are reported in order of first appearance.

use crate::db::DbResult;
use crate::model::filter::CategoryFilter;
use crate::model::quote::{seed_quotes, Quote, QuoteValidationError};
use crate::model::sync_status::SyncStatus;
use crate::repo::preference_repo::{
    PreferenceRepository, LAST_FILTER_KEY, LAST_SYNC_STATUS_KEY,
};
use crate::repo::quote_repo::{QuoteRepository, RepoError, ReplaceOutcome};
use crate::repo::SqliteQuoteStore;
use log::{info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type BookResult<T> = Result<T, BookError>;

/// Service error for quote store operations.
#[derive(Debug)]
pub enum BookError {
    /// Input rejected before reaching storage.
    Validation(QuoteValidationError),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for BookError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BookError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<QuoteValidationError> for BookError {
    fn from(value: QuoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for BookError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

/// Result of a de-duplicating import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Records present in the import payload.
    pub received: usize,
    /// Records appended to the store.
    pub added: usize,
    /// Records skipped because an equal quote already existed.
    pub skipped: usize,
}

/// The quote store: one owner, passed by reference to consumers.
pub struct QuoteBook<S = SqliteQuoteStore> {
    store: S,
}

impl QuoteBook<SqliteQuoteStore> {
    /// Opens the durable store at `path`.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self::new(SqliteQuoteStore::open(path)?))
    }

    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self::new(SqliteQuoteStore::open_in_memory()?))
    }
}

impl<S: QuoteRepository + PreferenceRepository> QuoteBook<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validates and appends one quote from raw form input.
    ///
    /// # Contract
    /// - Text and category are trimmed; a blank category becomes `General`.
    /// - Blank text returns `BookError::Validation` and stores nothing.
    /// - Returns the record exactly as stored.
    pub fn add_quote(&self, text: &str, category: &str) -> BookResult<Quote> {
        let quote = match Quote::new(text, category) {
            Ok(quote) => quote,
            Err(err) => {
                warn!("event=quote_add module=service status=rejected reason={err}");
                return Err(err.into());
            }
        };
        self.store.append(&quote)?;
        info!(
            "event=quote_add module=service status=ok category={}",
            quote.category
        );
        Ok(quote)
    }

    /// All quotes in insertion order.
    pub fn quotes(&self) -> BookResult<Vec<Quote>> {
        Ok(self.store.list()?)
    }

    pub fn len(&self) -> BookResult<usize> {
        Ok(self.store.count()?)
    }

    pub fn is_empty(&self) -> BookResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Inserts the built-in quotes when the store holds nothing.
    ///
    /// Returns the number of quotes inserted (zero when already populated).
    pub fn seed_defaults_if_empty(&self) -> BookResult<usize> {
        if !self.is_empty()? {
            return Ok(0);
        }
        let inserted = self.store.append_many(&seed_quotes())?;
        info!("event=quote_seed module=service status=ok count={inserted}");
        Ok(inserted)
    }

    /// Distinct categories in order of first appearance.
    pub fn categories(&self) -> BookResult<Vec<String>> {
        let mut seen: HashSet<String> = HashSet::new();
        Ok(self
            .store
            .list()?
            .into_iter()
            .map(|quote| quote.category)
            .filter(|category| seen.insert(category.clone()))
            .collect())
    }

    /// Quotes accepted by `filter`, in insertion order.
    pub fn matching(&self, filter: &CategoryFilter) -> BookResult<Vec<Quote>> {
        Ok(self
            .store
            .list()?
            .into_iter()
            .filter(|quote| filter.matches(&quote.category))
            .collect())
    }

    /// Last persisted filter selection; `All` when none was saved.
    pub fn filter(&self) -> BookResult<CategoryFilter> {
        Ok(CategoryFilter::from_stored(
            self.store.get_preference(LAST_FILTER_KEY)?,
        ))
    }

    /// Persists the filter so it survives a restart.
    ///
    /// `All` is stored as the absence of a value.
    pub fn set_filter(&self, filter: &CategoryFilter) -> BookResult<()> {
        match filter.stored_category() {
            Some(category) => self.store.set_preference(LAST_FILTER_KEY, category)?,
            None => self.store.remove_preference(LAST_FILTER_KEY)?,
        }
        info!("event=filter_set module=service status=ok filter={filter}");
        Ok(())
    }

    /// Result of the most recent sync tick from any run; `Idle` if none.
    pub fn last_sync_status(&self) -> BookResult<SyncStatus> {
        match self.store.get_preference(LAST_SYNC_STATUS_KEY)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|err| {
                BookError::Repo(RepoError::InvalidData(format!(
                    "{err} in preferences.{LAST_SYNC_STATUS_KEY}"
                )))
            }),
            None => Ok(SyncStatus::Idle),
        }
    }

    /// Persists a finished tick's status for later runs.
    pub fn record_sync_status(&self, status: &SyncStatus) -> BookResult<()> {
        let raw = serde_json::to_string(status).map_err(|err| {
            BookError::Repo(RepoError::InvalidData(format!(
                "unencodable sync status: {err}"
            )))
        })?;
        self.store.set_preference(LAST_SYNC_STATUS_KEY, &raw)?;
        Ok(())
    }

    /// Appends records not already present by structural equality.
    ///
    /// Duplicates inside `records` are collapsed as well. Records are
    /// normalized first; one invalid record rejects the whole import.
    pub fn import_quotes(&self, records: &[Quote]) -> BookResult<ImportReport> {
        let normalized = records
            .iter()
            .map(Quote::normalized)
            .collect::<Result<Vec<_>, _>>()?;

        let mut known: HashSet<Quote> = self.store.list()?.into_iter().collect();
        let fresh: Vec<Quote> = normalized
            .into_iter()
            .filter(|quote| known.insert(quote.clone()))
            .collect();

        let added = self.store.append_many(&fresh)?;
        let report = ImportReport {
            received: records.len(),
            added,
            skipped: records.len() - added,
        };
        info!(
            "event=quote_import module=service status=ok received={} added={} skipped={}",
            report.received, report.added, report.skipped
        );
        Ok(report)
    }

    /// Replaces local quotes sharing text with `server_quotes`, then
    /// appends the server copies. Server always wins.
    pub fn apply_server_quotes(&self, server_quotes: &[Quote]) -> BookResult<ReplaceOutcome> {
        let normalized = server_quotes
            .iter()
            .map(Quote::normalized)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.store.replace_by_text(&normalized)?)
    }
}
