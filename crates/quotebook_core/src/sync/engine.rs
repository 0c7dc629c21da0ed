//! Sync tick execution, status tracking and the interval loop.

use super::remote::{PostReceipt, RemoteQuoteSource};
use super::{SyncError, SyncResult};
use crate::model::quote::Quote;
use crate::model::sync_status::SyncStatus;
use crate::repo::preference_repo::PreferenceRepository;
use crate::repo::quote_repo::QuoteRepository;
use crate::service::quote_book::QuoteBook;
use log::{error, info, warn};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

/// Counts from one applied tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub added: usize,
    pub replaced: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Another tick was still in flight.
    Skipped,
    Applied(SyncReport),
}

/// Reconciles one quote book against one remote source.
pub struct SyncEngine<S> {
    book: Arc<Mutex<QuoteBook<S>>>,
    remote: Arc<dyn RemoteQuoteSource>,
    in_flight: AtomicBool,
    status: Mutex<SyncStatus>,
}

struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<S> SyncEngine<S>
where
    S: QuoteRepository + PreferenceRepository + Send,
{
    pub fn new(book: Arc<Mutex<QuoteBook<S>>>, remote: Arc<dyn RemoteQuoteSource>) -> Self {
        Self {
            book,
            remote,
            in_flight: AtomicBool::new(false),
            status: Mutex::new(SyncStatus::Idle),
        }
    }

    /// Shared handle to the book this engine writes into.
    pub fn book(&self) -> &Arc<Mutex<QuoteBook<S>>> {
        &self.book
    }

    pub fn status(&self) -> SyncStatus {
        self.status_guard().clone()
    }

    /// Runs one sync tick.
    ///
    /// # Contract
    /// - Returns `TickOutcome::Skipped` without side effects while another
    ///   tick on this engine is in flight.
    /// - On success every local quote sharing text with a server quote has
    ///   been replaced by the server copy.
    /// - On failure the status becomes `Error` and the store is unchanged.
    /// - The final status is also persisted for later runs.
    pub async fn tick(&self) -> SyncResult<TickOutcome> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("event=sync_tick module=sync status=skipped reason=in_flight");
            return Ok(TickOutcome::Skipped);
        }
        let _guard = InFlight(&self.in_flight);

        let tick_id = Uuid::new_v4();
        let started_at = Instant::now();
        self.set_status(SyncStatus::Syncing);
        info!("event=sync_tick module=sync status=start tick_id={tick_id}");

        match self.reconcile().await {
            Ok(report) => {
                self.finish(SyncStatus::Synced {
                    at_epoch_ms: now_epoch_ms(),
                    added: report.added,
                    replaced: report.replaced,
                });
                info!(
                    "event=sync_tick module=sync status=ok tick_id={tick_id} duration_ms={} added={} replaced={}",
                    started_at.elapsed().as_millis(),
                    report.added,
                    report.replaced
                );
                Ok(TickOutcome::Applied(report))
            }
            Err(err) => {
                self.finish(SyncStatus::Error {
                    at_epoch_ms: now_epoch_ms(),
                    message: err.to_string(),
                });
                error!(
                    "event=sync_tick module=sync status=error tick_id={tick_id} duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                Err(err)
            }
        }
    }

    async fn reconcile(&self) -> SyncResult<SyncReport> {
        let server_quotes = self.remote.fetch_server_quotes().await?;
        let book = self.book.lock().map_err(|_| SyncError::StorePoisoned)?;
        let outcome = book.apply_server_quotes(&server_quotes)?;
        Ok(SyncReport {
            added: outcome.appended,
            replaced: outcome.removed,
        })
    }

    /// Publishes a quote through this engine's remote source.
    pub async fn post_quote(&self, quote: &Quote) -> SyncResult<PostReceipt> {
        publish_quote(self.remote.as_ref(), quote).await
    }

    fn finish(&self, status: SyncStatus) {
        let persisted = match self.book.lock() {
            Ok(book) => book.record_sync_status(&status).map_err(|err| err.to_string()),
            Err(_) => Err(SyncError::StorePoisoned.to_string()),
        };
        if let Err(err) = persisted {
            warn!("event=sync_status_save module=sync status=error error={err}");
        }
        self.set_status(status);
    }

    fn set_status(&self, status: SyncStatus) {
        *self.status_guard() = status;
    }

    fn status_guard(&self) -> MutexGuard<'_, SyncStatus> {
        self.status
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Publishes one quote and logs the completion or failure.
pub async fn publish_quote(
    remote: &dyn RemoteQuoteSource,
    quote: &Quote,
) -> SyncResult<PostReceipt> {
    match remote.post_quote(quote).await {
        Ok(receipt) => {
            info!(
                "event=quote_post module=sync status=ok http_status={} remote_id={:?}",
                receipt.status, receipt.remote_id
            );
            Ok(receipt)
        }
        Err(err) => {
            warn!("event=quote_post module=sync status=error error={err}");
            Err(err)
        }
    }
}

/// Shortest accepted loop period; shorter values are raised to it.
pub const MIN_SYNC_PERIOD: Duration = Duration::from_secs(1);

/// Ticks `engine` immediately and then every `period` until `shutdown`
/// resolves. Missed ticks are skipped rather than bunched up.
///
/// `on_tick` observes each tick result. Returns the number of ticks run.
pub async fn run_sync_loop<S, F, C>(
    engine: Arc<SyncEngine<S>>,
    period: Duration,
    shutdown: F,
    mut on_tick: C,
) -> usize
where
    S: QuoteRepository + PreferenceRepository + Send,
    F: Future<Output = ()>,
    C: FnMut(&SyncResult<TickOutcome>),
{
    let period = period.max(MIN_SYNC_PERIOD);
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    info!(
        "event=sync_loop module=sync status=start period_ms={}",
        period.as_millis()
    );
    let mut ticks = 0;
    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                let result = engine.tick().await;
                ticks += 1;
                on_tick(&result);
            }
        }
    }
    info!("event=sync_loop module=sync status=stopped ticks={ticks}");
    ticks
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
