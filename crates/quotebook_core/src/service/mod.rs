//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the operations a front end needs.
//! - Keep CLI and sync layers decoupled from storage details.

pub mod quote_book;
