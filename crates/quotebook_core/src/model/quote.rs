//! Quote domain model.
//!
//! # Responsibility
//! - Define the `{text, category}` record held by the store.
//! - Normalize user input into a valid record.
//!
//! # Invariants
//! - `text` is non-empty after trimming.
//! - Blank categories normalize to [`DEFAULT_CATEGORY`].
//! - `all` (any case) is reserved for "no filter" and is not a category.
//! - Equality is structural; there is no identifier field.

use crate::model::filter::ALL_CATEGORIES;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Category assigned when the caller leaves the category blank.
pub const DEFAULT_CATEGORY: &str = "General";

/// Validation error for quote records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteValidationError {
    /// Quote text is empty or whitespace-only.
    EmptyText,
    /// Category collides with the "no filter" selection.
    ReservedCategory(String),
}

impl Display for QuoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "quote text cannot be empty"),
            Self::ReservedCategory(name) => {
                write!(f, "category `{name}` is reserved for showing all quotes")
            }
        }
    }
}

impl Error for QuoteValidationError {}

/// One quote record.
///
/// Serialized as `{"text": ..., "category": ...}`, which is also the
/// import/export file shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    /// Free-form label; missing values deserialize as empty and are
    /// normalized by [`Quote::normalized`].
    #[serde(default)]
    pub category: String,
}

impl Quote {
    /// Builds a quote from raw input, trimming both fields.
    ///
    /// # Errors
    /// - Returns `EmptyText` when `text` is blank after trimming.
    /// - Returns `ReservedCategory` for `all` in any letter case.
    pub fn new(
        text: impl AsRef<str>,
        category: impl AsRef<str>,
    ) -> Result<Self, QuoteValidationError> {
        Self {
            text: text.as_ref().to_string(),
            category: category.as_ref().to_string(),
        }
        .normalized()
    }

    /// Returns a trimmed copy with the default category applied.
    pub fn normalized(&self) -> Result<Self, QuoteValidationError> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(QuoteValidationError::EmptyText);
        }
        let category = match self.category.trim() {
            "" => DEFAULT_CATEGORY,
            other => other,
        };
        let quote = Self {
            text: text.to_string(),
            category: category.to_string(),
        };
        quote.validate()?;
        Ok(quote)
    }

    /// Checks record invariants without modifying it.
    pub fn validate(&self) -> Result<(), QuoteValidationError> {
        if self.text.trim().is_empty() {
            return Err(QuoteValidationError::EmptyText);
        }
        if self.category.trim().eq_ignore_ascii_case(ALL_CATEGORIES) {
            return Err(QuoteValidationError::ReservedCategory(
                self.category.trim().to_string(),
            ));
        }
        Ok(())
    }
}

/// Quotes a freshly created store starts with.
pub fn seed_quotes() -> Vec<Quote> {
    [
        ("Believe in yourself.", "Motivation"),
        ("Stay curious and keep learning.", "Education"),
        ("Your mental health matters.", "Well-being"),
        ("Code like a girl and lead like a boss!", "Tech"),
    ]
    .into_iter()
    .map(|(text, category)| Quote {
        text: text.to_string(),
        category: category.to_string(),
    })
    .collect()
}
