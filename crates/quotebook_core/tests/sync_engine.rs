use async_trait::async_trait;
use quotebook_core::sync::SyncResult;
use quotebook_core::{
    publish_quote, run_sync_loop, PostReceipt, Quote, QuoteBook,
    RemoteQuoteSource, SyncEngine, SyncError, SyncStatus, TickOutcome,
};
use quotebook_core::sync::MIN_SYNC_PERIOD;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

struct MockRemote {
    quotes: Vec<Quote>,
    fail: bool,
    delay: Duration,
    fetches: AtomicUsize,
    posted: Mutex<Vec<Quote>>,
}

impl MockRemote {
    fn serving(quotes: Vec<Quote>) -> Self {
        Self {
            quotes,
            fail: false,
            delay: Duration::ZERO,
            fetches: AtomicUsize::new(0),
            posted: Mutex::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::serving(Vec::new())
        }
    }
}

#[async_trait]
impl RemoteQuoteSource for MockRemote {
    async fn fetch_server_quotes(&self) -> SyncResult<Vec<Quote>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail {
            return Err(SyncError::Status(503));
        }
        Ok(self.quotes.clone())
    }

    async fn post_quote(&self, quote: &Quote) -> SyncResult<PostReceipt> {
        if self.fail {
            return Err(SyncError::Status(500));
        }
        self.posted.lock().unwrap().push(quote.clone());
        Ok(PostReceipt {
            status: 201,
            remote_id: Some(101),
        })
    }
}

fn server_quotes() -> Vec<Quote> {
    vec![
        Quote::new("Believe in yourself.", "Inspiration").unwrap(),
        Quote::new("Progress, not perfection.", "Motivation").unwrap(),
    ]
}

fn seeded_book() -> Arc<Mutex<QuoteBook>> {
    let book = QuoteBook::open_in_memory().unwrap();
    book.seed_defaults_if_empty().unwrap();
    Arc::new(Mutex::new(book))
}

#[tokio::test]
async fn tick_applies_server_wins_rule() {
    let book = seeded_book();
    let engine = SyncEngine::new(book.clone(), Arc::new(MockRemote::serving(server_quotes())));

    let outcome = engine.tick().await.unwrap();

    let TickOutcome::Applied(report) = outcome else {
        panic!("tick should apply");
    };
    assert_eq!(report.added, 2);
    assert_eq!(report.replaced, 1);

    let quotes = book.lock().unwrap().quotes().unwrap();
    let server = server_quotes();
    let server_texts: HashSet<&str> = server.iter().map(|q| q.text.as_str()).collect();
    let sharing_text: Vec<&Quote> = quotes
        .iter()
        .filter(|quote| server_texts.contains(quote.text.as_str()))
        .collect();
    assert_eq!(sharing_text, server.iter().collect::<Vec<_>>());
    assert!(!quotes.contains(&Quote::new("Believe in yourself.", "Motivation").unwrap()));
    assert_eq!(quotes.len(), 5);
    assert!(matches!(
        engine.status(),
        SyncStatus::Synced {
            added: 2,
            replaced: 1,
            ..
        }
    ));
}

#[tokio::test]
async fn repeated_ticks_do_not_accumulate_server_copies() {
    let book = seeded_book();
    let engine = SyncEngine::new(book.clone(), Arc::new(MockRemote::serving(server_quotes())));

    engine.tick().await.unwrap();
    engine.tick().await.unwrap();

    assert_eq!(book.lock().unwrap().len().unwrap(), 5);
}

#[tokio::test]
async fn failed_fetch_sets_error_and_keeps_store() {
    let book = seeded_book();
    let before = book.lock().unwrap().quotes().unwrap();
    let engine = SyncEngine::new(book.clone(), Arc::new(MockRemote::failing()));

    let err = engine.tick().await.unwrap_err();

    assert!(matches!(err, SyncError::Status(503)));
    assert_eq!(book.lock().unwrap().quotes().unwrap(), before);
    match engine.status() {
        SyncStatus::Error { message, .. } => assert!(message.contains("503")),
        other => panic!("unexpected status: {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn overlapping_tick_is_skipped() {
    let remote = Arc::new(MockRemote {
        delay: Duration::from_secs(5),
        ..MockRemote::serving(server_quotes())
    });
    let engine = SyncEngine::new(seeded_book(), remote.clone());

    let (first, second) = tokio::join!(engine.tick(), engine.tick());

    assert!(matches!(first.unwrap(), TickOutcome::Applied(_)));
    assert_eq!(second.unwrap(), TickOutcome::Skipped);
    assert_eq!(remote.fetches.load(Ordering::SeqCst), 1);

    // The guard is released once the first tick finishes.
    assert!(matches!(engine.tick().await.unwrap(), TickOutcome::Applied(_)));
}

#[tokio::test(start_paused = true)]
async fn loop_ticks_at_start_and_every_period_until_shutdown() {
    let remote = Arc::new(MockRemote::serving(server_quotes()));
    let engine = Arc::new(SyncEngine::new(seeded_book(), remote.clone()));
    let mut observed = Vec::new();

    let ticks = run_sync_loop(
        engine.clone(),
        Duration::from_secs(60),
        tokio::time::sleep(Duration::from_secs(150)),
        |result| observed.push(result.is_ok()),
    )
    .await;

    assert_eq!(ticks, 3);
    assert_eq!(observed, [true, true, true]);
    assert_eq!(remote.fetches.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn loop_keeps_running_after_failed_tick() {
    let engine = Arc::new(SyncEngine::new(seeded_book(), Arc::new(MockRemote::failing())));
    let mut failures = 0;

    let ticks = run_sync_loop(
        engine.clone(),
        Duration::from_secs(60),
        tokio::time::sleep(Duration::from_secs(90)),
        |result| {
            if result.is_err() {
                failures += 1;
            }
        },
    )
    .await;

    assert_eq!(ticks, 2);
    assert_eq!(failures, 2);
}

#[tokio::test]
async fn publish_reports_receipt_without_touching_store() {
    let book = seeded_book();
    let remote = Arc::new(MockRemote::serving(Vec::new()));
    let engine = SyncEngine::new(book.clone(), remote.clone());
    let quote = book.lock().unwrap().add_quote("Posted", "Net").unwrap();
    let before = book.lock().unwrap().quotes().unwrap();

    let receipt = engine.post_quote(&quote).await.unwrap();

    assert_eq!(receipt.status, 201);
    assert_eq!(receipt.remote_id, Some(101));
    assert_eq!(remote.posted.lock().unwrap().as_slice(), [quote]);
    assert_eq!(book.lock().unwrap().quotes().unwrap(), before);
}

#[tokio::test]
async fn publish_failure_is_returned() {
    let err = publish_quote(&MockRemote::failing(), &Quote::new("x", "y").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::Status(500)));
}

#[tokio::test]
async fn tick_result_outlives_the_engine() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quotebook.sqlite3");
    {
        let book = QuoteBook::open(&path).unwrap();
        book.seed_defaults_if_empty().unwrap();
        let engine = SyncEngine::new(
            Arc::new(Mutex::new(book)),
            Arc::new(MockRemote::serving(server_quotes())),
        );
        engine.tick().await.unwrap();
    }

    let reopened = QuoteBook::open(&path).unwrap();
    assert!(matches!(
        reopened.last_sync_status().unwrap(),
        SyncStatus::Synced {
            added: 2,
            replaced: 1,
            ..
        }
    ));
}

#[tokio::test]
async fn failed_tick_is_persisted_as_error() {
    let book = seeded_book();
    let engine = SyncEngine::new(book.clone(), Arc::new(MockRemote::failing()));
    assert_eq!(book.lock().unwrap().last_sync_status().unwrap(), SyncStatus::Idle);

    engine.tick().await.unwrap_err();

    let stored = book.lock().unwrap().last_sync_status().unwrap();
    assert_eq!(stored, engine.status());
    assert!(matches!(stored, SyncStatus::Error { .. }));
}

#[tokio::test(start_paused = true)]
async fn zero_period_is_raised_to_minimum() {
    let engine = Arc::new(SyncEngine::new(
        seeded_book(),
        Arc::new(MockRemote::serving(server_quotes())),
    ));

    let ticks = run_sync_loop(
        engine,
        Duration::ZERO,
        tokio::time::sleep(MIN_SYNC_PERIOD * 2 + MIN_SYNC_PERIOD / 2),
        |_| {},
    )
    .await;

    assert_eq!(ticks, 3);
}
