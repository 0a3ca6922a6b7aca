//! # Boxoffice Gate API
//!
//! HTTP server for ticket purchases and gate check-in.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Gate API Services                               │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  EventService  │  │  OrderService  │  │  RedemptionService         ││
//! │  │                │  │                │  │                            ││
//! │  │ • create_event │  │ • create_order │  │ • redeem                   ││
//! │  │ • get_event    │  │ • get_order    │  │                            ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                      Infrastructure                               │  │
//! │  │                                                                   │  │
//! │  │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────────────┐│  │
//! │  │  │   SQLite     │  │ AuthVerifier │  │  TicketTokenCodec        ││  │
//! │  │  │              │  │              │  │                          ││  │
//! │  │  │ events       │  │ bearer JWT → │  │ signs/verifies the QR    ││  │
//! │  │  │ tickets      │  │ Principal    │  │ redemption tokens        ││  │
//! │  │  │ orders       │  │              │  │                          ││  │
//! │  │  └──────────────┘  └──────────────┘  └──────────────────────────┘│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `HTTP_PORT` - HTTP server port (default: 8080)
//! - `DATABASE_PATH` - SQLite file path (default: ./boxoffice.db)
//! - `JWT_SECRET` - Secret verifying identity-provider bearer tokens
//! - `TICKET_SECRET` - Secret signing ticket redemption tokens

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod services;
pub mod token;

// Re-exports
pub use config::ApiConfig;
pub use error::ApiError;

use auth::AuthVerifier;
use boxoffice_db::Database;
use services::{EventService, OrderService, RedemptionService};

/// Shared application state.
pub struct AppState {
    pub db: Database,
    pub config: ApiConfig,
    pub auth: AuthVerifier,
    pub events: EventService,
    pub orders: OrderService,
    pub redemptions: RedemptionService,
}
