//! # Order Repository
//!
//! Database operations for write-once order records.
//!
//! Orders freeze the outcome of a purchase: which tickets were minted,
//! for whom, for which event. They are inserted exactly once by the order
//! service after all tickets exist, and never updated.
//!
//! The `ticket_ids` column stores the ordered id list as a JSON array,
//! frozen at creation. (The tickets table carries an `order_id` back-link
//! for by-order queries; the JSON column preserves the purchase order.)

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use boxoffice_core::Order;

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

/// Raw row shape; `ticket_ids` is decoded from JSON into the domain type.
#[derive(sqlx::FromRow)]
struct OrderRow {
    order_id: String,
    user_id: String,
    attendee_email: String,
    event_id: String,
    ticket_ids: String,
    created_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self) -> DbResult<Order> {
        let ticket_ids: Vec<String> = serde_json::from_str(&self.ticket_ids)
            .map_err(|e| DbError::corrupt("Order", &self.order_id, e.to_string()))?;

        Ok(Order {
            order_id: self.order_id,
            user_id: self.user_id,
            attendee_email: self.attendee_email,
            event_id: self.event_id,
            ticket_ids,
            created_at: self.created_at,
        })
    }
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Inserts a completed order.
    ///
    /// ## Errors
    /// * `DbError::UniqueViolation` - an order with this id already exists
    pub async fn insert(&self, order: &Order) -> DbResult<()> {
        debug!(
            order_id = %order.order_id,
            event_id = %order.event_id,
            quantity = order.quantity(),
            "Inserting order"
        );

        let ticket_ids = serde_json::to_string(&order.ticket_ids)
            .map_err(|e| DbError::Internal(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO orders (
                order_id, user_id, attendee_email, event_id, ticket_ids, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&order.order_id)
        .bind(&order.user_id)
        .bind(&order.attendee_email)
        .bind(&order.event_id)
        .bind(&ticket_ids)
        .bind(order.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets an order by ID.
    pub async fn get_by_id(&self, order_id: &str) -> DbResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT order_id, user_id, attendee_email, event_id, ticket_ids, created_at
            FROM orders
            WHERE order_id = ?1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(OrderRow::into_order).transpose()
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
    use uuid::Uuid;

    async fn test_db_with_event() -> (Database, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();
        let event = Event {
            event_id: Uuid::new_v4().to_string(),
            title: "Jazz Night".to_string(),
            description: "Quartet".to_string(),
            starts_at: now,
            location: "Blue Room".to_string(),
            price_cents: 3000,
            total_tickets: 40,
            available_tickets: 40,
            featured: false,
            image_url: None,
            created_at: now,
            updated_at: now,
        };
        db.events().insert(&event).await.unwrap();
        (db, event.event_id)
    }

    #[tokio::test]
    async fn test_insert_and_get_preserves_ticket_order() {
        let (db, event_id) = test_db_with_event().await;

        let order = Order {
            order_id: Uuid::new_v4().to_string(),
            user_id: "user-1".to_string(),
            attendee_email: "alice@example.com".to_string(),
            event_id,
            ticket_ids: vec!["t-b".to_string(), "t-a".to_string(), "t-c".to_string()],
            created_at: Utc::now(),
        };

        db.orders().insert(&order).await.unwrap();

        let loaded = db.orders().get_by_id(&order.order_id).await.unwrap().unwrap();
        assert_eq!(loaded.ticket_ids, vec!["t-b", "t-a", "t-c"]);
        assert_eq!(loaded.quantity(), 3);
        assert_eq!(loaded.user_id, "user-1");
    }

    #[tokio::test]
    async fn test_get_missing_order() {
        let (db, _event_id) = test_db_with_event().await;
        assert!(db.orders().get_by_id("no-such-order").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_order_id_is_conflict() {
        let (db, event_id) = test_db_with_event().await;

        let order = Order {
            order_id: Uuid::new_v4().to_string(),
            user_id: "user-1".to_string(),
            attendee_email: "alice@example.com".to_string(),
            event_id,
            ticket_ids: vec!["t-1".to_string()],
            created_at: Utc::now(),
        };

        db.orders().insert(&order).await.unwrap();
        let err = db.orders().insert(&order).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }
}
