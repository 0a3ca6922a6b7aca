//! Order issuing service.
//!
//! ## Purchase Saga
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      create_order Saga                                  │
//! │                                                                         │
//! │  1. RESERVE                                                            │
//! │     └── events.reserve_tickets(event_id, q)                            │
//! │         insufficient → abort, no side effects                          │
//! │                                                                         │
//! │  2. MINT q TICKETS                    ─┐                               │
//! │     └── token = codec.encode(...)      │ failure → compensate:         │
//! │     └── tickets.insert(order_id: "")   │   delete minted tickets,      │
//! │                                        │   release reservation         │
//! │  3. CREATE ORDER (join point)          │                               │
//! │     └── orders.insert(ticket_ids)     ─┘                               │
//! │                                                                         │
//! │  4. LINK TICKETS (concurrent fan-out, joined before returning)         │
//! │     └── tickets.link_order(ticket_id, order_id)                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Steps 2-4 are individually durable writes, not one transaction. The
//! compensation path (step 2/3 failure) is best-effort: its own failures
//! are logged and the original error is returned either way. Once the
//! order row is durable (after step 3) there is no compensation - a
//! linking failure is an internal error against an otherwise complete
//! purchase.

use chrono::Utc;
use futures::future::try_join_all;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use boxoffice_core::validation::{validate_id, validate_quantity};
use boxoffice_core::{Event, Order, Principal, Ticket};
use boxoffice_db::Database;

use crate::error::{ApiError, ApiResult};
use crate::token::{TicketClaims, TicketTokenCodec};

/// An order populated with its event and tickets, for the owner's view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    pub order: Order,
    pub event: Event,
    pub tickets: Vec<Ticket>,
}

/// Purchase orchestration.
#[derive(Clone)]
pub struct OrderService {
    db: Database,
    codec: TicketTokenCodec,
}

impl OrderService {
    pub fn new(db: Database, codec: TicketTokenCodec) -> Self {
        OrderService { db, codec }
    }

    /// Purchases `quantity` tickets for an event.
    ///
    /// Requires a customer principal. On success the returned order
    /// references `quantity` freshly minted tickets, each carrying a
    /// signed redemption token and linked back to the order.
    ///
    /// ## Errors
    /// * `Forbidden` - principal is not a customer
    /// * `Validation` - quantity out of range or missing event id
    /// * `NotFound` - no such event
    /// * `InsufficientTickets` - not enough availability; no side effects
    pub async fn create_order(
        &self,
        principal: &Principal,
        event_id: &str,
        quantity: i64,
    ) -> ApiResult<Order> {
        if !principal.can_purchase() {
            return Err(ApiError::Forbidden(
                "Only customers can create orders".to_string(),
            ));
        }

        validate_id("eventId", event_id)?;
        validate_quantity(quantity)?;

        // Step 1: the only oversell check in the system. Losing the race
        // here means losing it at the storage layer's linearization point.
        let Some(remaining) = self.db.events().reserve_tickets(event_id, quantity).await? else {
            return Err(ApiError::InsufficientTickets {
                event_id: event_id.to_string(),
                requested: quantity,
            });
        };
        debug!(event_id, quantity, remaining, "Inventory reserved");

        // Step 2: mint tickets against the reservation. Unlinked until
        // the order row exists.
        let mut tickets: Vec<Ticket> = Vec::with_capacity(quantity as usize);
        for _ in 0..quantity {
            match self.mint_ticket(principal, event_id).await {
                Ok(ticket) => tickets.push(ticket),
                Err(err) => {
                    self.compensate(event_id, quantity, &tickets).await;
                    return Err(err);
                }
            }
        }

        // Step 3: the order record freezes the ticket id list.
        let order = Order {
            order_id: Uuid::new_v4().to_string(),
            user_id: principal.user_id.clone(),
            attendee_email: principal.email.clone(),
            event_id: event_id.to_string(),
            ticket_ids: tickets.iter().map(|t| t.ticket_id.clone()).collect(),
            created_at: Utc::now(),
        };

        if let Err(err) = self.db.orders().insert(&order).await {
            self.compensate(event_id, quantity, &tickets).await;
            return Err(err.into());
        }

        // Step 4: back-link every ticket. Unconditional updates; fanned
        // out concurrently and joined before we return.
        let links = order.ticket_ids.iter().map(|ticket_id| {
            let repo = self.db.tickets();
            let ticket_id = ticket_id.clone();
            let order_id = order.order_id.clone();
            async move { repo.link_order(&ticket_id, &order_id).await }
        });
        try_join_all(links).await.map_err(|e| {
            // The order is durable; tickets just lost their back-link
            ApiError::Internal(format!(
                "Order {} created but ticket linking failed: {}",
                order.order_id, e
            ))
        })?;

        info!(
            order_id = %order.order_id,
            event_id,
            quantity,
            user_id = %principal.user_id,
            "Order created"
        );

        Ok(order)
    }

    /// Fetches one order with its event and tickets.
    ///
    /// Scoped to the owner: anyone else observes `NotFound` rather than
    /// learning the order exists.
    pub async fn get_order(&self, principal: &Principal, order_id: &str) -> ApiResult<OrderDetails> {
        validate_id("orderId", order_id)?;

        let order = self
            .db
            .orders()
            .get_by_id(order_id)
            .await?
            .filter(|order| order.user_id == principal.user_id)
            .ok_or_else(|| ApiError::NotFound(format!("Order not found: {}", order_id)))?;

        let event = self
            .db
            .events()
            .get_by_id(&order.event_id)
            .await?
            .ok_or_else(|| {
                ApiError::NotFound(format!("Event tied to order not found: {}", order.event_id))
            })?;

        let tickets = self.db.tickets().get_by_order(order_id).await?;

        Ok(OrderDetails {
            order,
            event,
            tickets,
        })
    }

    async fn mint_ticket(&self, principal: &Principal, event_id: &str) -> ApiResult<Ticket> {
        let ticket_id = Uuid::new_v4().to_string();

        let token = self.codec.encode(&TicketClaims {
            ticket_id: ticket_id.clone(),
            event_id: event_id.to_string(),
            user_id: principal.user_id.clone(),
            attendee_email: principal.email.clone(),
        })?;

        let ticket = Ticket {
            ticket_id,
            event_id: event_id.to_string(),
            // Linked after the order row is durable (two-phase creation)
            order_id: String::new(),
            user_id: principal.user_id.clone(),
            attendee_email: principal.email.clone(),
            redemption_token: token,
            used: false,
            created_at: Utc::now(),
        };

        self.db.tickets().insert(&ticket).await?;
        Ok(ticket)
    }

    /// Best-effort rollback after a failure between reservation and a
    /// durable order: take back whatever was minted, then return the
    /// reserved quantity to the pool. Compensation failures are logged
    /// and never mask the original error.
    async fn compensate(&self, event_id: &str, quantity: i64, minted: &[Ticket]) {
        warn!(
            event_id,
            quantity,
            minted = minted.len(),
            "Order issuing failed; compensating"
        );

        for ticket in minted {
            if let Err(e) = self.db.tickets().delete(&ticket.ticket_id).await {
                warn!(ticket_id = %ticket.ticket_id, error = %e, "Failed to delete minted ticket");
            }
        }

        if let Err(e) = self.db.events().release_tickets(event_id, quantity).await {
            warn!(event_id, error = %e, "Failed to release reservation");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boxoffice_core::Role;
    use boxoffice_db::DbConfig;

    fn customer() -> Principal {
        Principal {
            user_id: "user-1".to_string(),
            email: "alice@example.com".to_string(),
            role: Role::Customer,
        }
    }

    async fn setup(total: i64) -> (OrderService, Database, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();
        let event = Event {
            event_id: Uuid::new_v4().to_string(),
            title: "Symphony".to_string(),
            description: "Season opener".to_string(),
            starts_at: now,
            location: "Concert Hall".to_string(),
            price_cents: 5000,
            total_tickets: total,
            available_tickets: total,
            featured: false,
            image_url: None,
            created_at: now,
            updated_at: now,
        };
        db.events().insert(&event).await.unwrap();

        let svc = OrderService::new(db.clone(), TicketTokenCodec::new("test-ticket-secret"));
        (svc, db, event.event_id)
    }

    #[tokio::test]
    async fn test_purchase_mints_and_links_tickets() {
        let (svc, db, event_id) = setup(10).await;

        let order = svc.create_order(&customer(), &event_id, 3).await.unwrap();
        assert_eq!(order.quantity(), 3);

        // Inventory moved
        let event = db.events().get_by_id(&event_id).await.unwrap().unwrap();
        assert_eq!(event.available_tickets, 7);

        // Every ticket is unused and linked back to the order
        for ticket_id in &order.ticket_ids {
            let ticket = db.tickets().get_by_id(ticket_id).await.unwrap().unwrap();
            assert!(!ticket.used);
            assert_eq!(ticket.order_id, order.order_id);
            assert_eq!(ticket.attendee_email, "alice@example.com");
            assert!(!ticket.redemption_token.is_empty());
        }

        // The order record froze the same ids
        let stored = db.orders().get_by_id(&order.order_id).await.unwrap().unwrap();
        assert_eq!(stored.ticket_ids, order.ticket_ids);
    }

    #[tokio::test]
    async fn test_insufficient_inventory_has_no_side_effects() {
        let (svc, db, event_id) = setup(2).await;

        let err = svc.create_order(&customer(), &event_id, 3).await.unwrap_err();
        assert!(matches!(err, ApiError::InsufficientTickets { .. }));

        let event = db.events().get_by_id(&event_id).await.unwrap().unwrap();
        assert_eq!(event.available_tickets, 2);

        // No tickets or orders appeared
        let tickets = db.tickets().get_by_order("").await.unwrap();
        assert!(tickets.is_empty());
    }

    #[tokio::test]
    async fn test_only_customers_can_purchase() {
        let (svc, _db, event_id) = setup(10).await;

        let staff = Principal {
            role: Role::Staff,
            ..customer()
        };
        let err = svc.create_order(&staff, &event_id, 1).await.unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_quantity_validation() {
        let (svc, _db, event_id) = setup(10).await;

        for bad in [0, -1, 26] {
            let err = svc.create_order(&customer(), &event_id, bad).await.unwrap_err();
            assert!(matches!(err, ApiError::Validation(_)), "quantity {}", bad);
        }
    }

    #[tokio::test]
    async fn test_missing_event_is_not_found() {
        let (svc, _db, _event_id) = setup(10).await;
        let err = svc.create_order(&customer(), "no-such-event", 1).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_concurrent_purchases_never_oversell() {
        let (svc, db, event_id) = setup(10).await;

        // 8 racing buyers of 2 tickets each want 16 > 10
        let mut handles = Vec::new();
        for i in 0..8 {
            let svc = svc.clone();
            let event_id = event_id.clone();
            let buyer = Principal {
                user_id: format!("user-{}", i),
                email: format!("buyer{}@example.com", i),
                role: Role::Customer,
            };
            handles.push(tokio::spawn(async move {
                svc.create_order(&buyer, &event_id, 2).await
            }));
        }

        let mut sold = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(order) => sold += order.quantity(),
                Err(err) => assert!(matches!(err, ApiError::InsufficientTickets { .. })),
            }
        }

        assert!(sold <= 10);
        let event = db.events().get_by_id(&event_id).await.unwrap().unwrap();
        assert_eq!(event.available_tickets, 10 - sold);
    }

    #[tokio::test]
    async fn test_owner_reads_order_details() {
        let (svc, _db, event_id) = setup(10).await;
        let order = svc.create_order(&customer(), &event_id, 2).await.unwrap();

        let details = svc.get_order(&customer(), &order.order_id).await.unwrap();
        assert_eq!(details.order.order_id, order.order_id);
        assert_eq!(details.event.event_id, event_id);
        assert_eq!(details.tickets.len(), 2);
    }

    #[tokio::test]
    async fn test_other_users_cannot_read_order() {
        let (svc, _db, event_id) = setup(10).await;
        let order = svc.create_order(&customer(), &event_id, 1).await.unwrap();

        let stranger = Principal {
            user_id: "user-2".to_string(),
            email: "mallory@example.com".to_string(),
            role: Role::Customer,
        };
        let err = svc.get_order(&stranger, &order.order_id).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
