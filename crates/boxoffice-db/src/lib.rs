//! # boxoffice-db: Database Layer for Boxoffice
//!
//! This crate provides database access for the ticketing backend.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Boxoffice Data Flow                               │
//! │                                                                         │
//! │  HTTP handler (create_order, validate_ticket)                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   boxoffice-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │  (event.rs,   │    │  (embedded)  │  │   │
//! │  │   │               │    │   ticket.rs,  │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│   order.rs)   │    │ 001_init.sql │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (WAL mode)                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency Contract
//!
//! All cross-request mutual exclusion lives in two single-row conditional
//! UPDATE statements:
//!
//! - [`repository::event::EventRepository::reserve_tickets`]:
//!   decrement-if-at-least on `events.available_tickets`
//! - [`repository::ticket::TicketRepository::mark_used`]:
//!   compare-false-and-set on `tickets.used`
//!
//! SQLite executes each UPDATE atomically, so racing callers linearize at
//! the storage layer. No in-process locks exist anywhere in this crate.
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (event, ticket, order)

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::event::EventRepository;
pub use repository::order::OrderRepository;
pub use repository::ticket::TicketRepository;
