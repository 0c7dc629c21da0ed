use quotebook_core::{
    export_json, export_to_path, import_from_path, parse_import, Quote, QuoteBook, TransferError,
};

#[test]
fn export_then_import_leaves_store_unchanged() {
    let book = QuoteBook::open_in_memory().unwrap();
    book.seed_defaults_if_empty().unwrap();
    book.add_quote("Round trip", "Files").unwrap();
    let before = book.quotes().unwrap();

    let json = export_json(&before).unwrap();
    let report = book.import_quotes(&parse_import(json.as_bytes()).unwrap()).unwrap();

    assert_eq!(report.received, before.len());
    assert_eq!(report.added, 0);
    assert_eq!(report.skipped, before.len());
    assert_eq!(book.quotes().unwrap(), before);
}

#[test]
fn import_appends_only_new_records() {
    let book = QuoteBook::open_in_memory().unwrap();
    book.add_quote("Existing", "A").unwrap();

    let records = parse_import(
        br#"[
            {"text": "Existing", "category": "A"},
            {"text": "Existing", "category": "B"},
            {"text": "Brand new", "category": "A"}
        ]"#,
    )
    .unwrap();
    let report = book.import_quotes(&records).unwrap();

    assert_eq!(report.added, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(
        book.quotes().unwrap(),
        vec![
            Quote::new("Existing", "A").unwrap(),
            Quote::new("Existing", "B").unwrap(),
            Quote::new("Brand new", "A").unwrap(),
        ]
    );
}

#[test]
fn file_round_trip_into_fresh_store_reproduces_contents() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("quotes.json");

    let source = QuoteBook::open_in_memory().unwrap();
    source.seed_defaults_if_empty().unwrap();
    export_to_path(&source.quotes().unwrap(), &file).unwrap();

    let target = QuoteBook::open_in_memory().unwrap();
    target
        .import_quotes(&import_from_path(&file).unwrap())
        .unwrap();

    assert_eq!(target.quotes().unwrap(), source.quotes().unwrap());
}

#[test]
fn malformed_file_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("broken.json");
    std::fs::write(&file, "not json at all").unwrap();

    let book = QuoteBook::open_in_memory().unwrap();
    book.seed_defaults_if_empty().unwrap();
    let before = book.quotes().unwrap();

    let err = import_from_path(&file).unwrap_err();
    assert!(matches!(err, TransferError::Malformed(_)));
    assert_eq!(book.quotes().unwrap(), before);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = import_from_path(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, TransferError::Io(_)));
}
