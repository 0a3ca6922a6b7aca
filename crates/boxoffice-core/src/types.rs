//! # Domain Types
//!
//! Core domain types used throughout Boxoffice.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Event       │   │     Ticket      │   │     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  event_id       │   │  ticket_id      │   │  order_id       │       │
//! │  │  total_tickets  │   │  event_id (FK)  │   │  user_id        │       │
//! │  │  available_     │   │  order_id (FK)  │   │  event_id (FK)  │       │
//! │  │    tickets      │   │  used (1-way)   │   │  ticket_ids     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Role       │   │   Principal     │   │  TicketStatus   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Admin          │   │  user_id        │   │  Issued         │       │
//! │  │  Staff          │   │  email          │   │  Redeemed       │       │
//! │  │  Customer       │   │  role           │   │  (terminal)     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership of Mutable Fields
//! - `Event.available_tickets` is mutated only by the event repository's
//!   conditional decrement (and the saga's compensating release).
//! - `Ticket.used` is mutated only by the ticket repository's conditional
//!   one-way transition.
//! - `Ticket.order_id` starts empty and is set exactly once when the
//!   owning order is persisted (two-phase creation).
//! - `Order` is write-once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Role & Principal
// =============================================================================

/// Role carried by a verified caller.
///
/// The identity provider authenticates users; this backend only consumes
/// the resulting role for authorization decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Back-office operator: manages events, can work the gate.
    Admin,
    /// Gate staff: scans and redeems tickets at entry.
    Staff,
    /// Ticket buyer.
    Customer,
}

/// A verified caller identity.
///
/// Produced by the authentication boundary from a bearer token; everything
/// below that boundary trusts these fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub user_id: String,
    pub email: String,
    pub role: Role,
}

impl Principal {
    /// Only customers may purchase tickets.
    #[inline]
    pub fn can_purchase(&self) -> bool {
        self.role == Role::Customer
    }

    /// Only admins and gate staff may redeem tickets.
    #[inline]
    pub fn can_redeem(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Staff)
    }

    /// Only admins and gate staff may manage the event catalog.
    #[inline]
    pub fn can_manage_events(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Staff)
    }
}

// =============================================================================
// Event
// =============================================================================

/// An event with a finite ticket inventory.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Unique identifier (UUID v4).
    pub event_id: String,

    /// Display title shown on the storefront and tickets.
    pub title: String,

    /// Long-form description.
    pub description: String,

    /// When the event takes place.
    #[ts(as = "String")]
    pub starts_at: DateTime<Utc>,

    /// Venue / address text.
    pub location: String,

    /// Ticket price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Capacity at creation time. Immutable afterwards.
    pub total_tickets: i64,

    /// Remaining sellable tickets. 0 <= available <= total.
    ///
    /// Only the repository's conditional decrement (reservation) and the
    /// order saga's compensating release touch this field.
    pub available_tickets: i64,

    /// Highlighted on the storefront.
    pub featured: bool,

    /// Poster image URL, if one was uploaded.
    pub image_url: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Checks whether `quantity` tickets could currently be reserved.
    ///
    /// ## Advisory Only
    /// The authoritative check is the storage-level conditional decrement;
    /// this helper exists for display logic and early rejection. A `true`
    /// here can still lose the race at reservation time.
    pub fn has_capacity(&self, quantity: i64) -> bool {
        self.available_tickets >= quantity
    }

    /// True once every ticket has been reserved.
    #[inline]
    pub fn is_sold_out(&self) -> bool {
        self.available_tickets == 0
    }
}

// =============================================================================
// Ticket Status
// =============================================================================

/// Lifecycle of a ticket.
///
/// ```text
/// Issued ──redeem──► Redeemed   (terminal)
/// ```
///
/// The transition is guarded by the storage layer's conditional update on
/// the `used` flag; exactly one concurrent redeem wins, the rest observe
/// an already-redeemed outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Minted and unredeemed; valid at the gate.
    Issued,
    /// Consumed at the gate. Never reverts.
    Redeemed,
}

// =============================================================================
// Ticket
// =============================================================================

/// A single admission ticket tied to an order.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// Unique identifier (UUID v4).
    pub ticket_id: String,

    /// Event this ticket admits to.
    pub event_id: String,

    /// Owning order. Empty string until the order is persisted and the
    /// ticket is linked, then immutable (two-phase creation).
    pub order_id: String,

    /// Purchasing user.
    pub user_id: String,

    /// Email the ticket was issued to.
    pub attendee_email: String,

    /// Opaque signed token presented at the gate (rendered as a QR code
    /// by the frontend). Binds ticket, event and purchaser.
    pub redemption_token: String,

    /// Redemption flag. false -> true at most once, never back.
    pub used: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Ticket {
    /// Current lifecycle state, derived from the `used` flag.
    #[inline]
    pub fn status(&self) -> TicketStatus {
        if self.used {
            TicketStatus::Redeemed
        } else {
            TicketStatus::Issued
        }
    }

    /// True once the ticket is linked to its owning order.
    #[inline]
    pub fn is_linked(&self) -> bool {
        !self.order_id.is_empty()
    }
}

// =============================================================================
// Order
// =============================================================================

/// A completed ticket purchase.
///
/// Created once by the order service after inventory has been reserved and
/// all tickets minted; never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique identifier (UUID v4).
    pub order_id: String,

    /// Purchasing user.
    pub user_id: String,

    /// Email the order confirmation goes to.
    pub attendee_email: String,

    /// Event the tickets admit to.
    pub event_id: String,

    /// Ids of the minted tickets. Length equals the purchased quantity.
    pub ticket_ids: Vec<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Number of tickets purchased in this order.
    #[inline]
    pub fn quantity(&self) -> i64 {
        self.ticket_ids.len() as i64
    }
}

// =============================================================================
// Redemption Result
// =============================================================================

/// What the gate scanner gets back after a successful redemption.
///
/// Deliberately excludes the raw redemption token and internal fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RedemptionResult {
    pub ticket_id: String,
    pub event_id: String,
    pub attendee_email: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(used: bool, order_id: &str) -> Ticket {
        Ticket {
            ticket_id: "t-1".to_string(),
            event_id: "e-1".to_string(),
            order_id: order_id.to_string(),
            user_id: "u-1".to_string(),
            attendee_email: "a@example.com".to_string(),
            redemption_token: "tok".to_string(),
            used,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_role_permissions() {
        let admin = Principal {
            user_id: "u-1".to_string(),
            email: "a@example.com".to_string(),
            role: Role::Admin,
        };
        let staff = Principal {
            role: Role::Staff,
            ..admin.clone()
        };
        let customer = Principal {
            role: Role::Customer,
            ..admin.clone()
        };

        assert!(customer.can_purchase());
        assert!(!admin.can_purchase());
        assert!(!staff.can_purchase());

        assert!(admin.can_redeem());
        assert!(staff.can_redeem());
        assert!(!customer.can_redeem());

        assert!(admin.can_manage_events());
        assert!(!customer.can_manage_events());
    }

    #[test]
    fn test_event_capacity_helpers() {
        let now = Utc::now();
        let mut event = Event {
            event_id: "e-1".to_string(),
            title: "Quiz Night".to_string(),
            description: "Teams of four".to_string(),
            starts_at: now,
            location: "Back Room".to_string(),
            price_cents: 0,
            total_tickets: 5,
            available_tickets: 5,
            featured: false,
            image_url: None,
            created_at: now,
            updated_at: now,
        };

        assert!(event.has_capacity(5));
        assert!(!event.has_capacity(6));
        assert!(!event.is_sold_out());

        event.available_tickets = 0;
        assert!(!event.has_capacity(1));
        assert!(event.is_sold_out());
    }

    #[test]
    fn test_ticket_status_from_used_flag() {
        assert_eq!(ticket(false, "").status(), TicketStatus::Issued);
        assert_eq!(ticket(true, "o-1").status(), TicketStatus::Redeemed);
    }

    #[test]
    fn test_ticket_linking_state() {
        assert!(!ticket(false, "").is_linked());
        assert!(ticket(false, "o-1").is_linked());
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Staff).unwrap(), "\"staff\"");
        assert_eq!(
            serde_json::from_str::<Role>("\"customer\"").unwrap(),
            Role::Customer
        );
    }
}
