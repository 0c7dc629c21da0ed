//! Periodic reconciliation with a remote quote source.
//!
//! # Responsibility
//! - Fetch server quotes and apply them with a "server wins" rule.
//! - Publish locally added quotes as an explicit awaited operation.
//! - Drive fixed-interval ticks with an overlap guard.
//!
//! # Invariants
//! - At most one tick is in flight per engine; overlapping ticks are skipped.
//! - A failed tick leaves the store untouched and is not retried until the
//!   next scheduled tick.

use crate::service::quote_book::BookError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod engine;
mod remote;

pub use crate::model::sync_status::SyncStatus;
pub use engine::{
    publish_quote, run_sync_loop, SyncEngine, SyncReport, TickOutcome, MIN_SYNC_PERIOD,
};
pub use remote::{HttpQuoteSource, PayloadMode, PostReceipt, RemoteQuoteSource};

pub type SyncResult<T> = Result<T, SyncError>;

#[derive(Debug)]
pub enum SyncError {
    /// Transport failure (connect, timeout, body decode).
    Http(reqwest::Error),
    /// Server answered with a non-success status.
    Status(u16),
    /// Applying the server quotes to the local store failed.
    Store(BookError),
    /// The store lock was poisoned by a panicking holder.
    StorePoisoned,
}

impl Display for SyncError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(err) => write!(f, "request failed: {err}"),
            Self::Status(code) => write!(f, "server responded with status {code}"),
            Self::Store(err) => write!(f, "local store update failed: {err}"),
            Self::StorePoisoned => write!(f, "local store is unavailable"),
        }
    }
}

impl Error for SyncError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Http(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Status(_) | Self::StorePoisoned => None,
        }
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

impl From<BookError> for SyncError {
    fn from(value: BookError) -> Self {
        Self::Store(value)
    }
}
