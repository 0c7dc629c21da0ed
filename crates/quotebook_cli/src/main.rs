//! `quotebook` command-line front end.
//!
//! # Responsibility
//! - Map each user interaction (show, add, filter, import/export, sync) to
//!   one core call.
//! - Print user-facing results; diagnostics go to the core log.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use quotebook_core::config::QuotebookConfig;
use quotebook_core::{
    export_to_path, import_from_path, init_logging, publish_quote, render, run_sync_loop,
    BookError, CategoryFilter, HttpQuoteSource, QuoteBook, SessionState, SqliteQuoteStore,
    SyncEngine, SyncStatus, TickOutcome,
};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "quotebook", version)]
#[command(about = "Random quotes with categories, import/export and server sync", long_about = None)]
struct Args {
    /// Config file (overrides QUOTEBOOK_CONFIG).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database file (overrides the config file).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Log level (overrides the config file).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show a random quote, honoring the saved filter unless one is given.
    Show {
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Add a quote.
    Add {
        text: String,
        #[arg(short, long, default_value = "")]
        category: String,
        /// Also publish the quote to the sync endpoint.
        #[arg(long)]
        post: bool,
    },
    /// List quotes, optionally only one category.
    List {
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List known categories.
    Categories,
    /// Show or set the saved filter (`all` clears it).
    Filter { name: Option<String> },
    /// Export all quotes to a JSON file.
    Export { path: PathBuf },
    /// Import quotes from a JSON file, skipping ones already present.
    Import { path: PathBuf },
    /// Run one sync tick.
    Sync,
    /// Show the outcome of the most recent sync.
    Status,
    /// Sync on an interval until interrupted or `--duration` elapses.
    Watch {
        /// Seconds to run; 0 runs until Ctrl-C.
        #[arg(short, long, default_value = "0")]
        duration: u64,
        /// Tick interval in seconds (overrides the config file).
        #[arg(short, long)]
        interval: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => QuotebookConfig::load_from(path)?,
        None => QuotebookConfig::load()?,
    };
    if let Some(db) = args.db.clone() {
        config.storage.db_path = db;
    }
    if let Some(level) = args.log_level.clone() {
        config.logging.level = level;
    }

    if let Err(err) = init_logging(&config.logging.level, &config.logging.dir) {
        eprintln!("logging disabled: {err}");
    }

    let book = QuoteBook::open(&config.storage.db_path).with_context(|| {
        format!(
            "failed to open quote store at {}",
            config.storage.db_path.display()
        )
    })?;
    book.seed_defaults_if_empty()?;

    run(args.command, book, &config).await
}

async fn run(command: Command, book: QuoteBook, config: &QuotebookConfig) -> Result<()> {
    let mut session = SessionState::new();
    match command {
        Command::Show { category } => {
            let filter = match category {
                Some(name) => CategoryFilter::parse(&name),
                None => book.filter()?,
            };
            println!("{}", render(&book, &mut session, &filter)?);
        }
        Command::Add {
            text,
            category,
            post,
        } => {
            let quote = match book.add_quote(&text, &category) {
                Ok(quote) => quote,
                Err(BookError::Validation(err)) => bail!("please enter a quote: {err}"),
                Err(err) => return Err(err.into()),
            };
            println!("Quote added successfully!");
            println!("{}", render(&book, &mut session, &book.filter()?)?);

            if post || config.sync.post_on_add {
                let source = HttpQuoteSource::from_config(&config.sync)?;
                match publish_quote(&source, &quote).await {
                    Ok(receipt) => println!("Posted to server (status {}).", receipt.status),
                    Err(err) => println!("Saved locally; posting failed: {err}"),
                }
            }
        }
        Command::List { category } => {
            let filter = category
                .map(|name| CategoryFilter::parse(&name))
                .unwrap_or_default();
            for quote in book.matching(&filter)? {
                println!("[{}] {}", quote.category, quote.text);
            }
        }
        Command::Categories => {
            let active = book.filter()?;
            for category in book.categories()? {
                let marker = if active.matches(&category) && active != CategoryFilter::All {
                    "*"
                } else {
                    " "
                };
                println!("{marker} {category}");
            }
        }
        Command::Filter { name } => {
            if let Some(name) = name {
                book.set_filter(&CategoryFilter::parse(&name))?;
            }
            println!("filter: {}", book.filter()?);
        }
        Command::Export { path } => {
            let quotes = book.quotes()?;
            export_to_path(&quotes, &path)?;
            println!("Exported {} quotes to {}.", quotes.len(), path.display());
        }
        Command::Import { path } => {
            let records = import_from_path(&path)
                .with_context(|| format!("failed to import {}", path.display()))?;
            let report = book.import_quotes(&records)?;
            println!(
                "Quotes imported successfully! {} added, {} already present.",
                report.added, report.skipped
            );
        }
        Command::Sync => {
            let engine = build_engine(book, config)?;
            let result = engine.tick().await;
            println!("{}", engine.status());
            if let Err(err) = result {
                warn!("event=cli_sync module=cli status=error error={err}");
            }
        }
        Command::Status => {
            println!("{}", book.last_sync_status()?);
        }
        Command::Watch { duration, interval } => {
            let period = Duration::from_secs(interval.unwrap_or(config.sync.interval_secs));
            let engine = Arc::new(build_engine(book, config)?);
            let filter = lock_book(&engine)?.filter()?;
            let shutdown = async move {
                if duration == 0 {
                    let _ = tokio::signal::ctrl_c().await;
                } else {
                    tokio::time::sleep(Duration::from_secs(duration)).await;
                }
            };

            let view_engine = engine.clone();
            let ticks = run_sync_loop(engine, period, shutdown, |result| {
                println!("{}", view_engine.status());
                if matches!(result, Ok(TickOutcome::Applied(_))) {
                    match lock_book(&view_engine)
                        .and_then(|book| Ok(render(&*book, &mut session, &filter)?))
                    {
                        Ok(view) => println!("{view}"),
                        Err(err) => warn!("event=cli_render module=cli status=error error={err}"),
                    }
                }
            })
            .await;
            info!("event=cli_watch module=cli status=stopped ticks={ticks}");
            if let SyncStatus::Error { message, .. } = view_engine.status() {
                println!("last sync failed: {message}");
            }
        }
    }
    Ok(())
}

fn build_engine(
    book: QuoteBook,
    config: &QuotebookConfig,
) -> Result<SyncEngine<SqliteQuoteStore>> {
    let source = HttpQuoteSource::from_config(&config.sync)?;
    Ok(SyncEngine::new(Arc::new(Mutex::new(book)), Arc::new(source)))
}

fn lock_book(
    engine: &SyncEngine<SqliteQuoteStore>,
) -> Result<MutexGuard<'_, QuoteBook>> {
    engine
        .book()
        .lock()
        .map_err(|_| anyhow::anyhow!("quote store lock poisoned"))
}
