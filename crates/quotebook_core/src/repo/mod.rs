//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define data access contracts for quotes and preferences.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Write paths validate quotes before any SQL mutation.
//! - Multi-row writes are atomic: all rows land or none do.

pub mod preference_repo;
pub mod quote_repo;
mod sqlite_store;

pub use sqlite_store::SqliteQuoteStore;
