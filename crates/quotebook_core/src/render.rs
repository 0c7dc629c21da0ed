//! Random quote selection and display formatting.
//!
//! # Invariants
//! - Selection is uniform over quotes accepted by the active filter.
//! - A filter that matches nothing renders the placeholder, never a quote
//!   from another category.

use crate::model::filter::CategoryFilter;
use crate::model::quote::Quote;
use crate::repo::preference_repo::PreferenceRepository;
use crate::repo::quote_repo::QuoteRepository;
use crate::service::quote_book::{BookResult, QuoteBook};
use crate::session::SessionState;
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt::{Display, Formatter};

/// Message shown when no quote matches the filter.
pub const EMPTY_PLACEHOLDER: &str = "No quotes available for this category.";

/// What the display region should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteView {
    Quote(Quote),
    Empty,
}

impl QuoteView {
    pub fn quote(&self) -> Option<&Quote> {
        match self {
            Self::Quote(quote) => Some(quote),
            Self::Empty => None,
        }
    }
}

impl Display for QuoteView {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Quote(quote) => write!(f, "\"{}\"\n- {}", quote.text, quote.category),
            Self::Empty => f.write_str(EMPTY_PLACEHOLDER),
        }
    }
}

/// Picks one quote accepted by `filter`, uniformly at random.
pub fn pick_random<'a, R: Rng + ?Sized>(
    quotes: &'a [Quote],
    filter: &CategoryFilter,
    rng: &mut R,
) -> Option<&'a Quote> {
    let candidates: Vec<&Quote> = quotes
        .iter()
        .filter(|quote| filter.matches(&quote.category))
        .collect();
    candidates.choose(rng).copied()
}

/// Renders a random quote and records it as the session's last shown quote.
pub fn render_with<S, R>(
    book: &QuoteBook<S>,
    session: &mut SessionState,
    filter: &CategoryFilter,
    rng: &mut R,
) -> BookResult<QuoteView>
where
    S: QuoteRepository + PreferenceRepository,
    R: Rng + ?Sized,
{
    let quotes = book.quotes()?;
    let view = match pick_random(&quotes, filter, rng) {
        Some(quote) => {
            session.record_shown(quote);
            QuoteView::Quote(quote.clone())
        }
        None => QuoteView::Empty,
    };
    debug!(
        "event=quote_render module=render status=ok filter={filter} empty={}",
        view.quote().is_none()
    );
    Ok(view)
}

/// [`render_with`] using the thread-local RNG.
pub fn render<S>(
    book: &QuoteBook<S>,
    session: &mut SessionState,
    filter: &CategoryFilter,
) -> BookResult<QuoteView>
where
    S: QuoteRepository + PreferenceRepository,
{
    render_with(book, session, filter, &mut rand::thread_rng())
}
