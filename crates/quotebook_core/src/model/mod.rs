//! Domain model for the quote store.
//!
//! # Responsibility
//! - Define the canonical quote record and filter selection shared by every
//!   layer of core.
//!
//! # Invariants
//! - A quote has no identity beyond its `(text, category)` pair.
//! - Quote text is never empty once a record passes validation.

pub mod filter;
pub mod quote;
pub mod sync_status;
