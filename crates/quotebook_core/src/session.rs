//! Ephemeral per-process session state.
//!
//! Holds what only matters while the front end runs, such as the last
//! quote shown. Nothing here is ever written to durable storage.

use crate::model::quote::Quote;

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    last_shown: Option<Quote>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_shown(&mut self, quote: &Quote) {
        self.last_shown = Some(quote.clone());
    }

    pub fn last_shown(&self) -> Option<&Quote> {
        self.last_shown.as_ref()
    }

    pub fn clear(&mut self) {
        self.last_shown = None;
    }
}
