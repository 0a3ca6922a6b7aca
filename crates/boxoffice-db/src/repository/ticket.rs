//! # Ticket Repository
//!
//! Database operations for tickets and their redemption state.
//!
//! ## Ticket Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Ticket Lifecycle                                  │
//! │                                                                         │
//! │  1. MINT (during order issuing)                                        │
//! │     └── insert() → Ticket { order_id: "", used: false }                │
//! │                                                                         │
//! │  2. LINK (after the order row is durable)                              │
//! │     └── link_order() → order_id set exactly once                       │
//! │                                                                         │
//! │  3. REDEEM (at the gate)                                               │
//! │     └── mark_used()                                                    │
//! │         UPDATE ... SET used = 1                                        │
//! │         WHERE ticket_id = ? AND used = 0   ← one winner, ever          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `mark_used` is the redemption counterpart of the inventory ledger's
//! conditional decrement: the false→true transition is guarded inside a
//! single UPDATE, so among any number of concurrent redemptions of the
//! same ticket exactly one succeeds and the rest observe `Ok(None)`.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use boxoffice_core::Ticket;

/// Repository for ticket database operations.
///
/// Owns the `used` flag: `mark_used` is the only code path in the system
/// that sets it, and it can never unset it.
#[derive(Debug, Clone)]
pub struct TicketRepository {
    pool: SqlitePool,
}

impl TicketRepository {
    /// Creates a new TicketRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TicketRepository { pool }
    }

    /// Inserts a freshly minted ticket.
    ///
    /// ## Errors
    /// * `DbError::UniqueViolation` - a ticket with this id already exists
    /// * `DbError::ForeignKeyViolation` - the referenced event is gone
    pub async fn insert(&self, ticket: &Ticket) -> DbResult<()> {
        debug!(ticket_id = %ticket.ticket_id, event_id = %ticket.event_id, "Inserting ticket");

        sqlx::query(
            r#"
            INSERT INTO tickets (
                ticket_id, event_id, order_id, user_id,
                attendee_email, redemption_token, used, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&ticket.ticket_id)
        .bind(&ticket.event_id)
        .bind(&ticket.order_id)
        .bind(&ticket.user_id)
        .bind(&ticket.attendee_email)
        .bind(&ticket.redemption_token)
        .bind(ticket.used)
        .bind(ticket.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a ticket by ID.
    pub async fn get_by_id(&self, ticket_id: &str) -> DbResult<Option<Ticket>> {
        let ticket = sqlx::query_as::<_, Ticket>(
            r#"
            SELECT
                ticket_id, event_id, order_id, user_id,
                attendee_email, redemption_token, used, created_at
            FROM tickets
            WHERE ticket_id = ?1
            "#,
        )
        .bind(ticket_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(ticket)
    }

    /// Gets all tickets belonging to an order, oldest first.
    pub async fn get_by_order(&self, order_id: &str) -> DbResult<Vec<Ticket>> {
        let tickets = sqlx::query_as::<_, Ticket>(
            r#"
            SELECT
                ticket_id, event_id, order_id, user_id,
                attendee_email, redemption_token, used, created_at
            FROM tickets
            WHERE order_id = ?1
            ORDER BY created_at
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tickets)
    }

    /// Links a ticket to its owning order (second phase of two-phase
    /// creation).
    ///
    /// Unconditional set: always succeeds if the ticket row exists.
    pub async fn link_order(&self, ticket_id: &str, order_id: &str) -> DbResult<()> {
        let result = sqlx::query("UPDATE tickets SET order_id = ?2 WHERE ticket_id = ?1")
            .bind(ticket_id)
            .bind(order_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Ticket", ticket_id));
        }

        Ok(())
    }

    /// Atomically transitions a ticket from unused to used.
    ///
    /// The precondition (`used = 0`) lives in the WHERE clause of a
    /// single UPDATE, so exactly one of any number of concurrent callers
    /// wins the transition; the flag never reverts.
    ///
    /// ## Returns
    /// * `Ok(Some(ticket))` - this caller won; the returned row reflects
    ///   the redeemed state
    /// * `Ok(None)` - the ticket was already redeemed. Routine outcome,
    ///   not a storage failure.
    /// * `Err(DbError::NotFound)` - no such ticket
    pub async fn mark_used(&self, ticket_id: &str) -> DbResult<Option<Ticket>> {
        let ticket = sqlx::query_as::<_, Ticket>(
            r#"
            UPDATE tickets
            SET used = 1
            WHERE ticket_id = ?1 AND used = 0
            RETURNING
                ticket_id, event_id, order_id, user_id,
                attendee_email, redemption_token, used, created_at
            "#,
        )
        .bind(ticket_id)
        .fetch_optional(&self.pool)
        .await?;

        match ticket {
            Some(ticket) => {
                debug!(ticket_id, "Ticket redeemed");
                Ok(Some(ticket))
            }
            None => {
                if self.exists(ticket_id).await? {
                    debug!(ticket_id, "Redemption rejected: already used");
                    Ok(None)
                } else {
                    Err(DbError::not_found("Ticket", ticket_id))
                }
            }
        }
    }

    /// Deletes a ticket row.
    ///
    /// Only the order saga's compensation path uses this, to take back
    /// tickets minted for an order that never became durable. Issued
    /// tickets are never deleted through any public operation.
    pub async fn delete(&self, ticket_id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM tickets WHERE ticket_id = ?1")
            .bind(ticket_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Ticket", ticket_id));
        }

        debug!(ticket_id, "Ticket deleted (saga compensation)");
        Ok(())
    }

    async fn exists(&self, ticket_id: &str) -> DbResult<bool> {
        let row: Option<i64> = sqlx::query_scalar("SELECT 1 FROM tickets WHERE ticket_id = ?1")
            .bind(ticket_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use boxoffice_core::Event;
    use chrono::Utc;
    use uuid::Uuid;

    async fn test_db_with_event() -> (Database, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();
        let event = Event {
            event_id: Uuid::new_v4().to_string(),
            title: "Launch Party".to_string(),
            description: "Doors at 8".to_string(),
            starts_at: now,
            location: "Warehouse 12".to_string(),
            price_cents: 1500,
            total_tickets: 100,
            available_tickets: 100,
            featured: true,
            image_url: None,
            created_at: now,
            updated_at: now,
        };
        db.events().insert(&event).await.unwrap();
        (db, event.event_id)
    }

    fn sample_ticket(event_id: &str) -> Ticket {
        Ticket {
            ticket_id: Uuid::new_v4().to_string(),
            event_id: event_id.to_string(),
            order_id: String::new(),
            user_id: "user-1".to_string(),
            attendee_email: "alice@example.com".to_string(),
            redemption_token: "signed-token".to_string(),
            used: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let (db, event_id) = test_db_with_event().await;
        let ticket = sample_ticket(&event_id);

        db.tickets().insert(&ticket).await.unwrap();

        let loaded = db.tickets().get_by_id(&ticket.ticket_id).await.unwrap().unwrap();
        assert_eq!(loaded.event_id, event_id);
        assert!(!loaded.used);
        assert!(!loaded.is_linked());
    }

    #[tokio::test]
    async fn test_duplicate_ticket_id_is_conflict() {
        let (db, event_id) = test_db_with_event().await;
        let ticket = sample_ticket(&event_id);

        db.tickets().insert(&ticket).await.unwrap();
        let err = db.tickets().insert(&ticket).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_link_order() {
        let (db, event_id) = test_db_with_event().await;
        let ticket = sample_ticket(&event_id);
        db.tickets().insert(&ticket).await.unwrap();

        db.tickets().link_order(&ticket.ticket_id, "order-7").await.unwrap();

        let loaded = db.tickets().get_by_id(&ticket.ticket_id).await.unwrap().unwrap();
        assert_eq!(loaded.order_id, "order-7");

        let by_order = db.tickets().get_by_order("order-7").await.unwrap();
        assert_eq!(by_order.len(), 1);
    }

    #[tokio::test]
    async fn test_link_missing_ticket_is_not_found() {
        let (db, _event_id) = test_db_with_event().await;
        let err = db.tickets().link_order("no-such-ticket", "order-7").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_mark_used_exactly_once() {
        let (db, event_id) = test_db_with_event().await;
        let ticket = sample_ticket(&event_id);
        db.tickets().insert(&ticket).await.unwrap();

        let won = db.tickets().mark_used(&ticket.ticket_id).await.unwrap();
        assert!(won.is_some());
        assert!(won.unwrap().used);

        // Second attempt observes the already-redeemed outcome
        let second = db.tickets().mark_used(&ticket.ticket_id).await.unwrap();
        assert!(second.is_none());

        // And the flag never reverts
        let loaded = db.tickets().get_by_id(&ticket.ticket_id).await.unwrap().unwrap();
        assert!(loaded.used);
    }

    #[tokio::test]
    async fn test_mark_used_missing_ticket_is_not_found() {
        let (db, _event_id) = test_db_with_event().await;
        let err = db.tickets().mark_used("no-such-ticket").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_concurrent_redemptions_have_one_winner() {
        let (db, event_id) = test_db_with_event().await;
        let ticket = sample_ticket(&event_id);
        db.tickets().insert(&ticket).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..6 {
            let tickets = db.tickets();
            let ticket_id = ticket.ticket_id.clone();
            handles.push(tokio::spawn(async move {
                tickets.mark_used(&ticket_id).await.unwrap()
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap().is_some() {
                winners += 1;
            }
        }

        assert_eq!(winners, 1);
    }

    #[tokio::test]
    async fn test_delete_for_compensation() {
        let (db, event_id) = test_db_with_event().await;
        let ticket = sample_ticket(&event_id);
        db.tickets().insert(&ticket).await.unwrap();

        db.tickets().delete(&ticket.ticket_id).await.unwrap();
        assert!(db.tickets().get_by_id(&ticket.ticket_id).await.unwrap().is_none());

        let err = db.tickets().delete(&ticket.ticket_id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
