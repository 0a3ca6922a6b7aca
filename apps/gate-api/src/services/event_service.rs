//! Event catalog service.
//!
//! Creation and single-record reads. Availability starts equal to
//! capacity and is owned by the reservation path from then on; nothing in
//! this module touches it again.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use boxoffice_core::validation::{
    validate_event_text, validate_id, validate_price_cents, validate_total_tickets,
};
use boxoffice_core::{Event, Principal};
use boxoffice_db::Database;

use crate::error::{ApiError, ApiResult};

/// Input for creating an event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    /// When the event takes place
    pub date: DateTime<Utc>,
    pub location: String,
    pub price_cents: i64,
    pub total_tickets: i64,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Event catalog operations.
#[derive(Clone)]
pub struct EventService {
    db: Database,
}

impl EventService {
    pub fn new(db: Database) -> Self {
        EventService { db }
    }

    /// Creates an event with its full inventory available.
    ///
    /// Requires an admin or staff principal.
    pub async fn create_event(&self, principal: &Principal, input: NewEvent) -> ApiResult<Event> {
        if !principal.can_manage_events() {
            return Err(ApiError::Forbidden(
                "Only admin or staff can create events".to_string(),
            ));
        }

        validate_event_text("title", &input.title)?;
        validate_event_text("location", &input.location)?;
        validate_price_cents(input.price_cents)?;
        validate_total_tickets(input.total_tickets)?;

        let now = Utc::now();
        let event = Event {
            event_id: Uuid::new_v4().to_string(),
            title: input.title.trim().to_string(),
            description: input.description,
            starts_at: input.date,
            location: input.location.trim().to_string(),
            price_cents: input.price_cents,
            total_tickets: input.total_tickets,
            // Capacity is fully available at creation; only reservations
            // move this from here on
            available_tickets: input.total_tickets,
            featured: input.featured,
            image_url: input.image_url,
            created_at: now,
            updated_at: now,
        };

        self.db.events().insert(&event).await?;

        info!(
            event_id = %event.event_id,
            title = %event.title,
            total_tickets = event.total_tickets,
            "Event created"
        );

        Ok(event)
    }

    /// Fetches one event by id. Public: the storefront shows events to
    /// anonymous visitors.
    pub async fn get_event(&self, event_id: &str) -> ApiResult<Event> {
        validate_id("eventId", event_id)?;

        self.db
            .events()
            .get_by_id(event_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Event not found: {}", event_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boxoffice_core::Role;
    use boxoffice_db::DbConfig;

    fn principal(role: Role) -> Principal {
        Principal {
            user_id: "user-1".to_string(),
            email: "ops@example.com".to_string(),
            role,
        }
    }

    fn new_event(total: i64) -> NewEvent {
        NewEvent {
            title: "Open Air Cinema".to_string(),
            description: "Bring a blanket".to_string(),
            date: Utc::now(),
            location: "Riverside Park".to_string(),
            price_cents: 1200,
            total_tickets: total,
            featured: false,
            image_url: None,
        }
    }

    async fn service() -> EventService {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        EventService::new(db)
    }

    #[tokio::test]
    async fn test_create_starts_fully_available() {
        let svc = service().await;
        let event = svc
            .create_event(&principal(Role::Admin), new_event(120))
            .await
            .unwrap();

        assert_eq!(event.total_tickets, 120);
        assert_eq!(event.available_tickets, 120);

        let loaded = svc.get_event(&event.event_id).await.unwrap();
        assert_eq!(loaded.available_tickets, 120);
    }

    #[tokio::test]
    async fn test_customer_cannot_create() {
        let svc = service().await;
        let err = svc
            .create_event(&principal(Role::Customer), new_event(10))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_invalid_input_rejected() {
        let svc = service().await;

        let mut bad = new_event(10);
        bad.title = "  ".to_string();
        assert!(matches!(
            svc.create_event(&principal(Role::Staff), bad).await.unwrap_err(),
            ApiError::Validation(_)
        ));

        let mut bad = new_event(0);
        bad.total_tickets = 0;
        assert!(matches!(
            svc.create_event(&principal(Role::Staff), bad).await.unwrap_err(),
            ApiError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn test_get_missing_event() {
        let svc = service().await;
        let err = svc.get_event("no-such-event").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
