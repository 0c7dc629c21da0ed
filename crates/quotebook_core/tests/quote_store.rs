use quotebook_core::repo::preference_repo::LAST_FILTER_KEY;
use quotebook_core::{
    render, BookError, CategoryFilter, PreferenceRepository, Quote, QuoteBook, QuoteRepository,
    QuoteValidationError, RepoError, SessionState, SqliteQuoteStore,
};

#[test]
fn adding_valid_quote_grows_store_by_one() {
    let book = QuoteBook::open_in_memory().unwrap();
    book.seed_defaults_if_empty().unwrap();
    let before = book.len().unwrap();

    let added = book.add_quote("  Ship it.  ", "Work").unwrap();

    assert_eq!(book.len().unwrap(), before + 1);
    assert_eq!(added, Quote::new("Ship it.", "Work").unwrap());
    assert!(book.store().contains(&added).unwrap());
    assert_eq!(book.quotes().unwrap().last(), Some(&added));
}

#[test]
fn adding_blank_quote_leaves_store_unchanged() {
    let book = QuoteBook::open_in_memory().unwrap();
    book.seed_defaults_if_empty().unwrap();
    let before = book.quotes().unwrap();

    let err = book.add_quote("", "Work").unwrap_err();

    assert!(matches!(err, BookError::Validation(_)));
    assert_eq!(book.quotes().unwrap(), before);
}

#[test]
fn blank_category_defaults_to_general() {
    let book = QuoteBook::open_in_memory().unwrap();
    let added = book.add_quote("No label", " ").unwrap();
    assert_eq!(added.category, "General");
}

#[test]
fn list_preserves_insertion_order() {
    let book = QuoteBook::open_in_memory().unwrap();
    for text in ["c", "a", "b"] {
        book.add_quote(text, "Order").unwrap();
    }
    let texts: Vec<String> = book
        .quotes()
        .unwrap()
        .into_iter()
        .map(|quote| quote.text)
        .collect();
    assert_eq!(texts, ["c", "a", "b"]);
}

#[test]
fn reopening_reproduces_quotes_and_filter() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quotebook.sqlite3");

    let (saved_quotes, saved_filter) = {
        let book = QuoteBook::open(&path).unwrap();
        book.seed_defaults_if_empty().unwrap();
        book.add_quote("Persist me", "Storage").unwrap();
        book.set_filter(&CategoryFilter::parse("Storage")).unwrap();
        (book.quotes().unwrap(), book.filter().unwrap())
    };

    let reopened = QuoteBook::open(&path).unwrap();
    assert_eq!(reopened.seed_defaults_if_empty().unwrap(), 0);
    assert_eq!(reopened.quotes().unwrap(), saved_quotes);
    assert_eq!(reopened.filter().unwrap(), saved_filter);
    assert_eq!(saved_filter, CategoryFilter::Category("Storage".to_string()));
}

#[test]
fn selecting_all_overwrites_previous_filter() {
    let book = QuoteBook::open_in_memory().unwrap();
    book.set_filter(&CategoryFilter::parse("Tech")).unwrap();
    book.set_filter(&CategoryFilter::All).unwrap();
    assert_eq!(book.filter().unwrap(), CategoryFilter::All);
}

#[test]
fn corrupted_row_is_reported_not_masked() {
    let store = SqliteQuoteStore::open_in_memory().unwrap();
    store
        .connection()
        .execute(
            "INSERT INTO quotes (text, category) VALUES ('   ', 'Broken');",
            [],
        )
        .unwrap();

    let err = store.list().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn replace_by_text_is_atomic_on_invalid_input() {
    let store = SqliteQuoteStore::open_in_memory().unwrap();
    store.append(&Quote::new("keep", "A").unwrap()).unwrap();

    let bad = Quote {
        text: String::new(),
        category: "B".to_string(),
    };
    let err = store
        .replace_by_text(&[Quote::new("keep", "Server").unwrap(), bad])
        .unwrap_err();

    assert!(matches!(err, RepoError::Validation(_)));
    assert_eq!(store.list().unwrap(), vec![Quote::new("keep", "A").unwrap()]);
}

#[test]
fn category_named_all_is_rejected_so_filter_stays_exact() {
    let book = QuoteBook::open_in_memory().unwrap();
    book.add_quote("Stay sharp.", "Tech").unwrap();

    let err = book.add_quote("Everything counts.", "All").unwrap_err();
    assert!(matches!(
        err,
        BookError::Validation(QuoteValidationError::ReservedCategory(_))
    ));

    book.set_filter(&CategoryFilter::parse("Tech")).unwrap();
    let mut session = SessionState::new();
    for _ in 0..20 {
        let view = render(&book, &mut session, &book.filter().unwrap()).unwrap();
        assert_eq!(view.quote().unwrap().category, "Tech");
    }
}

#[test]
fn stored_all_like_value_reads_back_as_category() {
    let book = QuoteBook::open_in_memory().unwrap();
    book.store().set_preference(LAST_FILTER_KEY, "ALL").unwrap();
    assert_eq!(
        book.filter().unwrap(),
        CategoryFilter::Category("ALL".to_string())
    );
}

#[test]
fn remove_preference_resets_filter() {
    let book = QuoteBook::open_in_memory().unwrap();
    book.set_filter(&CategoryFilter::parse("Tech")).unwrap();

    book.store().remove_preference(LAST_FILTER_KEY).unwrap();
    book.store().remove_preference("never_set").unwrap();

    assert_eq!(book.filter().unwrap(), CategoryFilter::All);
}

#[test]
fn clear_empties_quotes_but_keeps_preferences() {
    let book = QuoteBook::open_in_memory().unwrap();
    book.seed_defaults_if_empty().unwrap();
    book.set_filter(&CategoryFilter::parse("Tech")).unwrap();

    book.store().clear().unwrap();

    assert!(book.is_empty().unwrap());
    assert_eq!(book.filter().unwrap(), CategoryFilter::parse("Tech"));
    assert_eq!(book.seed_defaults_if_empty().unwrap(), 4);
}
