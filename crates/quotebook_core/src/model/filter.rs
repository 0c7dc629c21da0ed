//! Category filter selection.
//!
//! `all` is reserved (see [`crate::model::quote::Quote::validate`]), so
//! parsing user input can never shadow a real category. In storage the
//! no-filter selection is the absence of a value.

use std::fmt::{Display, Formatter};

/// User-facing name of the "no filter" selection.
pub const ALL_CATEGORIES: &str = "all";

/// Category constraint applied when picking a quote to show.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    /// Parses user input; blank and `all` (any case) mean no filter.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL_CATEGORIES) {
            Self::All
        } else {
            Self::Category(trimmed.to_string())
        }
    }

    /// Rebuilds a filter from its persisted category, if any.
    pub fn from_stored(value: Option<String>) -> Self {
        value.map_or(Self::All, Self::Category)
    }

    /// Category to persist; `None` for no filter.
    pub fn stored_category(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Category(name) => Some(name.as_str()),
        }
    }

    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Category(expected) => expected == category,
        }
    }
}

impl Display for CategoryFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.stored_category().unwrap_or(ALL_CATEGORIES))
    }
}

#[cfg(test)]
mod tests {
    use super::CategoryFilter;

    #[test]
    fn parse_treats_blank_and_all_as_sentinel() {
        assert_eq!(CategoryFilter::parse(""), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse(" ALL "), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::parse(" Tech "),
            CategoryFilter::Category("Tech".to_string())
        );
    }

    #[test]
    fn stored_value_is_always_a_category() {
        assert_eq!(CategoryFilter::from_stored(None), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::from_stored(Some("all".to_string())),
            CategoryFilter::Category("all".to_string())
        );
        assert_eq!(CategoryFilter::All.stored_category(), None);
    }

    #[test]
    fn category_filter_matches_exact_name_only() {
        let filter = CategoryFilter::parse("Tech");
        assert!(filter.matches("Tech"));
        assert!(!filter.matches("tech"));
        assert!(CategoryFilter::All.matches("anything"));
    }
}
