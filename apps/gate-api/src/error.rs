//! Error types for the Gate API.
//!
//! One tagged taxonomy for everything a handler can produce. Components
//! below this layer return their own typed errors (`ValidationError`,
//! `DbError`); the conversions here decide which transport class each one
//! belongs to, and [`ApiError::into_response`] is the single place where a
//! tag becomes an HTTP status.
//!
//! Routine precondition misses (insufficient inventory, ticket already
//! redeemed, wrong gate) are 4xx-class outcomes, deliberately distinct
//! from `Internal` (5xx): a sold-out event is business as usual, a lost
//! database is not.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use boxoffice_core::ValidationError;
use boxoffice_db::DbError;

/// Gate API errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed or missing input.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Bearer token missing, malformed, or not verifiable.
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Caller is authenticated but the role does not permit the action.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Event, ticket, or order absent.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Reservation precondition failed: not enough tickets left.
    #[error("Not enough tickets available for event {event_id} (requested {requested})")]
    InsufficientTickets { event_id: String, requested: i64 },

    /// Duplicate identifier on create.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Redemption precondition failed: this ticket was already used.
    #[error("Ticket {ticket_id} has already been redeemed")]
    AlreadyRedeemed { ticket_id: String },

    /// Token verified but the ticket belongs to a different event than
    /// the gate it was presented at.
    #[error("Ticket {ticket_id} is not valid for this event")]
    WrongEvent { ticket_id: String },

    /// Redemption token forged, malformed, or signed with the wrong
    /// algorithm/secret.
    #[error("Invalid ticket: {0}")]
    InvalidTicket(String),

    /// Storage or other unexpected failure. Full context is logged
    /// server-side; the caller sees a generic message.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            DbError::UniqueViolation { .. } => ApiError::Conflict(err.to_string()),
            // Everything else is a storage-layer failure the caller
            // cannot act on
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl ApiError {
    /// Machine-readable error code for the JSON body.
    fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::AuthFailed(_) => "auth_failed",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::NotFound(_) => "not_found",
            ApiError::InsufficientTickets { .. } => "insufficient_tickets",
            ApiError::Conflict(_) => "conflict",
            ApiError::AlreadyRedeemed { .. } => "already_redeemed",
            ApiError::WrongEvent { .. } => "wrong_event",
            ApiError::InvalidTicket(_) => "invalid_ticket",
            ApiError::Internal(_) => "internal_error",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::AuthFailed(_) | ApiError::InvalidTicket(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InsufficientTickets { .. }
            | ApiError::Conflict(_)
            | ApiError::AlreadyRedeemed { .. } => StatusCode::CONFLICT,
            ApiError::WrongEvent { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Log internals with full context, respond with a generic message
        let message = if let ApiError::Internal(ref detail) = self {
            error!(detail = %detail, "internal error");
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        (
            status,
            Json(json!({
                "error": self.code(),
                "message": message,
            })),
        )
            .into_response()
    }
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
