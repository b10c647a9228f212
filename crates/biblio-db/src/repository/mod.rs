//! # Repository Module
//!
//! Database repository implementations for Biblio.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Records vs Repositories                              │
//! │                                                                         │
//! │  Member / Book (biblio-core)       MemberRepository / BookRepository   │
//! │  ───────────────────────────       ─────────────────────────────────   │
//! │  plain loaded records              keyed lookups across all rows       │
//! │  full_name(), loan_state()         register(), add(), remove(), ...    │
//! │  no storage access                 all SQL lives here                  │
//! │                                                                         │
//! │  Console command                                                       │
//! │       │  db.books().loan_state_of(id)                                  │
//! │       ▼                                                                 │
//! │  BookRepository ──SQL──► SQLite                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`MemberRepository`](member::MemberRepository) - Member registry
//! - [`BookRepository`](book::BookRepository) - Book catalog and loan state
//!
//! Borrow/return live in [`crate::lending`], since they span the catalog and
//! the per-identity loan count.

pub mod book;
pub mod member;
