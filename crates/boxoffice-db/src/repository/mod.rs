//! # Repository Module
//!
//! Database repository implementations for Boxoffice.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Service layer                                                         │
//! │       │                                                                 │
//! │       │  db.events().reserve_tickets(&event_id, 3)                     │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  EventRepository                                                       │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── insert(&self, event)                                              │
//! │  ├── reserve_tickets(&self, id, quantity)                              │
//! │  └── release_tickets(&self, id, quantity)                              │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • SQL is isolated in one place                                        │
//! │  • The two atomic conditional updates have exactly one home each       │
//! │  • Easy to test against an in-memory database                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`event::EventRepository`] - Event rows + the inventory ledger
//! - [`ticket::TicketRepository`] - Ticket rows + one-way redemption
//! - [`order::OrderRepository`] - Write-once order records

pub mod event;
pub mod order;
pub mod ticket;
