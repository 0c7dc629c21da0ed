//! Core domain logic for Quotebook.
//! This crate is the single source of truth for quote invariants, storage
//! and sync behavior; front ends only wire user input to it.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod render;
pub mod repo;
pub mod service;
pub mod session;
pub mod sync;
pub mod transfer;

pub use config::{ConfigError, QuotebookConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::filter::CategoryFilter;
pub use model::quote::{Quote, QuoteValidationError, DEFAULT_CATEGORY};
pub use render::{render, render_with, QuoteView, EMPTY_PLACEHOLDER};
pub use repo::preference_repo::PreferenceRepository;
pub use repo::quote_repo::{QuoteRepository, RepoError, RepoResult};
pub use repo::SqliteQuoteStore;
pub use service::quote_book::{BookError, BookResult, ImportReport, QuoteBook};
pub use session::SessionState;
pub use sync::{
    publish_quote, run_sync_loop, HttpQuoteSource, PostReceipt, RemoteQuoteSource, SyncEngine,
    SyncError, SyncStatus, TickOutcome,
};
pub use transfer::{export_json, export_to_path, import_from_path, parse_import, TransferError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
