//! # boxoffice-core: Pure Business Logic for Boxoffice
//!
//! This crate is the **heart** of the ticketing backend. It contains the
//! domain model and business rules as pure code with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Boxoffice Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Clients (web storefront, gate scanner)         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP                                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/gate-api                                │   │
//! │  │    create_event, create_order, validate_ticket                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ boxoffice-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐      ┌───────────┐      ┌───────────┐          │   │
//! │  │   │   types   │      │   error   │      │ validation│          │   │
//! │  │   │   Event   │      │ Validation│      │   rules   │          │   │
//! │  │   │  Ticket   │      │   Error   │      │  checks   │          │   │
//! │  │   │   Order   │      └───────────┘      └───────────┘          │   │
//! │  │   └───────────┘                                                 │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 boxoffice-db (Database Layer)                   │   │
//! │  │        SQLite queries, migrations, conditional updates          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Event, Ticket, Order, Principal, etc.)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: Ticket prices are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use boxoffice_core::Ticket` instead of
// `use boxoffice_core::types::Ticket`

pub use error::ValidationError;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum tickets that can be purchased in a single order
///
/// ## Business Reason
/// Prevents a single order from draining an event's inventory and keeps
/// the per-order ticket minting fan-out bounded. Can be made configurable
/// per-event in future versions.
pub const MAX_TICKETS_PER_ORDER: i64 = 25;

/// Maximum length of free-text event fields (title, location)
pub const MAX_EVENT_TEXT_LEN: usize = 200;
