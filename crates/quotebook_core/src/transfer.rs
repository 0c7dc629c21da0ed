//! JSON import/export of the quote collection.
//!
//! # Invariants
//! - Export is a pretty-printed array of `{text, category}` objects.
//! - Import parsing either yields every record or fails without side effects.

use crate::model::quote::{Quote, QuoteValidationError};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type TransferResult<T> = Result<T, TransferError>;

#[derive(Debug)]
pub enum TransferError {
    Io(std::io::Error),
    /// Payload is not a JSON array of quote objects.
    Malformed(serde_json::Error),
    /// A record parsed but failed validation.
    InvalidRecord {
        index: usize,
        source: QuoteValidationError,
    },
}

impl Display for TransferError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "quote file unavailable: {err}"),
            Self::Malformed(err) => write!(f, "invalid quote file: {err}"),
            Self::InvalidRecord { index, source } => {
                write!(f, "invalid quote at index {index}: {source}")
            }
        }
    }
}

impl Error for TransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Malformed(err) => Some(err),
            Self::InvalidRecord { source, .. } => Some(source),
        }
    }
}

impl From<std::io::Error> for TransferError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for TransferError {
    fn from(value: serde_json::Error) -> Self {
        Self::Malformed(value)
    }
}

/// Serializes quotes as pretty-printed JSON.
pub fn export_json(quotes: &[Quote]) -> TransferResult<String> {
    Ok(serde_json::to_string_pretty(quotes)?)
}

/// Writes the export document to `path`, replacing any existing file.
pub fn export_to_path(quotes: &[Quote], path: impl AsRef<Path>) -> TransferResult<()> {
    let path = path.as_ref();
    let json = export_json(quotes)?;
    std::fs::write(path, json).inspect_err(|err| {
        error!("event=quote_export module=transfer status=error error={err}");
    })?;
    info!(
        "event=quote_export module=transfer status=ok count={} path={}",
        quotes.len(),
        path.display()
    );
    Ok(())
}

/// Parses an import payload into normalized quotes.
pub fn parse_import(bytes: &[u8]) -> TransferResult<Vec<Quote>> {
    let records: Vec<Quote> = serde_json::from_slice(bytes)?;
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            record
                .normalized()
                .map_err(|source| TransferError::InvalidRecord { index, source })
        })
        .collect()
}

/// Reads and parses an import file.
pub fn import_from_path(path: impl AsRef<Path>) -> TransferResult<Vec<Quote>> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_import(&bytes).inspect_err(|err| {
        error!("event=quote_import module=transfer status=error error={err}");
    })
}
