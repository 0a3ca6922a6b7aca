//! Gate check-in service.
//!
//! ## Redemption Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      redeem Pipeline                                    │
//! │                                                                         │
//! │  scanned token                                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. codec.decode()        forged/tampered → invalid_ticket             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2. tickets.get_by_id()   never issued    → not_found                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  3. gate match            other event     → wrong_event (no write)     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  4. tickets.mark_used()   lost the race   → already_redeemed           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  RedemptionResult { ticket_id, event_id, attendee_email }              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Steps 1-3 never write; the single state change lives in step 4's
//! conditional update, which is what makes redemption exactly-once under
//! concurrent scans of the same code.

use tracing::{debug, info};

use boxoffice_core::validation::validate_id;
use boxoffice_core::{Principal, RedemptionResult};
use boxoffice_db::Database;

use crate::error::{ApiError, ApiResult};
use crate::token::TicketTokenCodec;

/// Ticket check-in orchestration.
#[derive(Clone)]
pub struct RedemptionService {
    db: Database,
    codec: TicketTokenCodec,
}

impl RedemptionService {
    pub fn new(db: Database, codec: TicketTokenCodec) -> Self {
        RedemptionService { db, codec }
    }

    /// Redeems a presented token at the gate of `expected_event_id`.
    ///
    /// Requires an admin or staff principal. Succeeds at most once per
    /// ticket, ever.
    ///
    /// ## Errors
    /// * `Forbidden` - principal may not work the gate
    /// * `InvalidTicket` - token forged, tampered, or malformed
    /// * `NotFound` - token decoded but no such ticket was ever issued
    /// * `WrongEvent` - valid ticket, wrong gate; ticket left untouched
    /// * `AlreadyRedeemed` - this ticket's transition already happened
    pub async fn redeem(
        &self,
        principal: &Principal,
        token: &str,
        expected_event_id: &str,
    ) -> ApiResult<RedemptionResult> {
        if !principal.can_redeem() {
            return Err(ApiError::Forbidden(
                "Only staff or admin can validate tickets".to_string(),
            ));
        }

        validate_id("eventId", expected_event_id)?;
        if token.trim().is_empty() {
            return Err(ApiError::Validation("token is required".to_string()));
        }

        // Step 1: signature check before any storage access
        let claims = self.codec.decode(token)?;

        // Step 2: the token is honest, but was the ticket ever issued?
        let ticket = self
            .db
            .tickets()
            .get_by_id(&claims.ticket_id)
            .await?
            .ok_or_else(|| {
                ApiError::NotFound(format!("Ticket not found: {}", claims.ticket_id))
            })?;

        // Step 3: right gate? Checked against the stored row, not the
        // token payload, so a stale token cannot vouch for itself.
        if ticket.event_id != expected_event_id {
            debug!(
                ticket_id = %ticket.ticket_id,
                ticket_event = %ticket.event_id,
                gate_event = %expected_event_id,
                "Ticket presented at wrong gate"
            );
            return Err(ApiError::WrongEvent {
                ticket_id: ticket.ticket_id,
            });
        }

        // Step 4: the one-way transition. Exactly one concurrent scan wins.
        let Some(_) = self.db.tickets().mark_used(&ticket.ticket_id).await? else {
            return Err(ApiError::AlreadyRedeemed {
                ticket_id: ticket.ticket_id,
            });
        };

        info!(
            ticket_id = %ticket.ticket_id,
            event_id = %ticket.event_id,
            checked_in_by = %principal.user_id,
            "Ticket redeemed"
        );

        Ok(RedemptionResult {
            ticket_id: ticket.ticket_id,
            event_id: ticket.event_id,
            attendee_email: ticket.attendee_email,
        })
    }
}
