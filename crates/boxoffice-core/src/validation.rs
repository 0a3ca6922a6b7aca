//! # Validation Module
//!
//! Input validation utilities for Boxoffice.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (TypeScript)                                        │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: gate-api handlers (Rust)                                     │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  ├── CHECK (available_tickets BETWEEN 0 AND total_tickets)             │
//! │  └── UNIQUE / foreign key constraints                                  │
//! │                                                                         │
//! │  Defense in depth: Multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::{MAX_EVENT_TEXT_LEN, MAX_TICKETS_PER_ORDER};

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a purchase quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_TICKETS_PER_ORDER (25)
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if quantity > MAX_TICKETS_PER_ORDER {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_TICKETS_PER_ORDER,
        });
    }

    Ok(())
}

/// Validates an event's capacity at creation time.
///
/// ## Rules
/// - Must be positive; an event with zero capacity cannot be created
///   (availability starts equal to capacity and only ever decreases)
pub fn validate_total_tickets(total: i64) -> ValidationResult<()> {
    if total <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "totalTickets".to_string(),
        });
    }

    Ok(())
}

/// Validates a ticket price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free events)
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a free-text event field (title, location).
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most MAX_EVENT_TEXT_LEN characters
pub fn validate_event_text(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.len() > MAX_EVENT_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_EVENT_TEXT_LEN,
        });
    }

    Ok(())
}

/// Validates an opaque record identifier.
///
/// ## Rules
/// - Must not be empty after trimming
///
/// Existence is checked at the storage layer; this only rejects requests
/// that could never match a record.
pub fn validate_id(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates an attendee email.
///
/// ## Rules
/// - Must not be empty
/// - Must contain exactly one '@' with text on both sides
///
/// Deliverability is the mail collaborator's problem; this catches
/// obviously broken input before a ticket is minted against it.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@domain".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(25).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
        assert!(validate_quantity(26).is_err());
    }

    #[test]
    fn test_validate_total_tickets() {
        assert!(validate_total_tickets(1).is_ok());
        assert!(validate_total_tickets(50_000).is_ok());

        assert!(validate_total_tickets(0).is_err());
        assert!(validate_total_tickets(-1).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok()); // free event
        assert!(validate_price_cents(4999).is_ok());
        assert!(validate_price_cents(-100).is_err());
    }

    #[test]
    fn test_validate_event_text() {
        assert!(validate_event_text("title", "Rust Meetup").is_ok());
        assert!(validate_event_text("title", "").is_err());
        assert!(validate_event_text("title", "   ").is_err());
        assert!(validate_event_text("title", &"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_id() {
        assert!(validate_id("eventId", "550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_id("eventId", "").is_err());
        assert!(validate_id("eventId", "  ").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("alice@example.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("alice@").is_err());
    }
}
