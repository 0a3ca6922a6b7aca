//! # Event Repository
//!
//! Database operations for events, including the inventory ledger.
//!
//! ## Inventory Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Inventory Lifecycle                                 │
//! │                                                                         │
//! │  1. CREATE                                                             │
//! │     └── insert() → available_tickets = total_tickets                   │
//! │                                                                         │
//! │  2. RESERVE (the hot path)                                             │
//! │     └── reserve_tickets(id, q)                                         │
//! │         UPDATE ... SET available = available - q                       │
//! │         WHERE available >= q          ← precondition in the WHERE      │
//! │                                                                         │
//! │  3. RELEASE (order-saga compensation only)                             │
//! │     └── release_tickets(id, q), clamped to total_tickets               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why the WHERE-clause precondition
//! ```text
//! ❌ WRONG: read count, check in Rust, write count back
//!    Two racing purchases both read available=1 and both "win".
//!
//! ✅ CORRECT: single conditional UPDATE
//!    UPDATE events SET available_tickets = available_tickets - 3
//!    WHERE event_id = ? AND available_tickets >= 3
//!
//!    SQLite applies the statement atomically; concurrent reservations
//!    linearize here and the successful subset can never exceed the
//!    original count.
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use boxoffice_core::Event;

/// Repository for event database operations.
///
/// Owns the `available_tickets` counter: reservation and release are the
/// only code paths in the system that mutate it.
#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: SqlitePool,
}

impl EventRepository {
    /// Creates a new EventRepository.
    pub fn new(pool: SqlitePool) -> Self {
        EventRepository { pool }
    }

    /// Gets an event by ID.
    pub async fn get_by_id(&self, event_id: &str) -> DbResult<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            SELECT
                event_id, title, description, starts_at, location,
                price_cents, total_tickets, available_tickets,
                featured, image_url, created_at, updated_at
            FROM events
            WHERE event_id = ?1
            "#,
        )
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Inserts a new event.
    ///
    /// The caller is responsible for having set
    /// `available_tickets = total_tickets`; the schema CHECK rejects
    /// anything outside `0 <= available <= total`.
    pub async fn insert(&self, event: &Event) -> DbResult<()> {
        debug!(event_id = %event.event_id, title = %event.title, "Inserting event");

        sqlx::query(
            r#"
            INSERT INTO events (
                event_id, title, description, starts_at, location,
                price_cents, total_tickets, available_tickets,
                featured, image_url, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&event.event_id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.starts_at)
        .bind(&event.location)
        .bind(event.price_cents)
        .bind(event.total_tickets)
        .bind(event.available_tickets)
        .bind(event.featured)
        .bind(&event.image_url)
        .bind(event.created_at)
        .bind(event.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Atomically reserves `quantity` tickets for an event.
    ///
    /// This is the sole oversell-prevention boundary: the availability
    /// check and the decrement happen in one UPDATE statement, so any
    /// number of racing callers observe a consistent total order.
    ///
    /// ## Returns
    /// * `Ok(Some(remaining))` - reserved; `remaining` is the new
    ///   available count
    /// * `Ok(None)` - insufficient availability; nothing was decremented.
    ///   This is a routine outcome, not a failure of the storage layer.
    /// * `Err(DbError::NotFound)` - no such event
    pub async fn reserve_tickets(&self, event_id: &str, quantity: i64) -> DbResult<Option<i64>> {
        let now = Utc::now();

        let remaining: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE events
            SET available_tickets = available_tickets - ?2,
                updated_at = ?3
            WHERE event_id = ?1 AND available_tickets >= ?2
            RETURNING available_tickets
            "#,
        )
        .bind(event_id)
        .bind(quantity)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        match remaining {
            Some(remaining) => {
                debug!(event_id, quantity, remaining, "Reserved tickets");
                Ok(Some(remaining))
            }
            None => {
                // Distinguish "sold out / not enough" from "no such event"
                if self.exists(event_id).await? {
                    debug!(event_id, quantity, "Reservation rejected: insufficient tickets");
                    Ok(None)
                } else {
                    Err(DbError::not_found("Event", event_id))
                }
            }
        }
    }

    /// Returns reserved tickets to the pool (order-saga compensation).
    ///
    /// Clamped so availability never exceeds the event's capacity, which
    /// keeps the schema invariant intact even if a compensation is
    /// retried.
    ///
    /// Not exposed through any public API: there is no cancel/refund
    /// flow, only the issuing saga's failure path calls this.
    pub async fn release_tickets(&self, event_id: &str, quantity: i64) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE events
            SET available_tickets = MIN(total_tickets, available_tickets + ?2),
                updated_at = ?3
            WHERE event_id = ?1
            "#,
        )
        .bind(event_id)
        .bind(quantity)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Event", event_id));
        }

        debug!(event_id, quantity, "Released reserved tickets");
        Ok(())
    }

    async fn exists(&self, event_id: &str) -> DbResult<bool> {
        let row: Option<i64> = sqlx::query_scalar("SELECT 1 FROM events WHERE event_id = ?1")
            .bind(event_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
