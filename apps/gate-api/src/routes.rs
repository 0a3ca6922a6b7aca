//! HTTP route layer.
//!
//! Handlers are deliberately thin: extract input, authenticate the
//! bearer header, call one service method, translate the tagged result.
//! No business rule lives here - [`crate::error::ApiError`]'s
//! `IntoResponse` impl is the single place where tags become statuses.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;

use boxoffice_core::{Event, Order, RedemptionResult};

use crate::error::ApiResult;
use crate::services::{NewEvent, OrderDetails};
use crate::AppState;

// =============================================================================
// Request / Response DTOs
// =============================================================================

/// Body of POST /orders.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub event_id: String,
    pub number_of_tickets: i64,
}

/// Body of POST /tickets/validate.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateTicketRequest {
    /// The scanned QR payload: the ticket's signed redemption token.
    pub qr_code_data: String,
    /// The event this gate admits to.
    pub event_id: String,
}

/// Response of POST /tickets/validate.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateTicketResponse {
    pub valid: bool,
    pub ticket: RedemptionResult,
}

// =============================================================================
// Router
// =============================================================================

/// Builds the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/events", post(create_event))
        .route("/events/:id", get(get_event))
        .route("/orders", post(create_order))
        .route("/orders/:id", get(get_order))
        .route("/tickets/validate", post(validate_ticket))
        .with_state(state)
}

// =============================================================================
// Handlers
// =============================================================================

async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<serde_json::Value>) {
    if state.db.health_check().await {
        (StatusCode::OK, Json(json!({ "status": "ok" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "degraded" })),
        )
    }
}

async fn create_event(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<NewEvent>,
) -> ApiResult<(StatusCode, Json<Event>)> {
    let principal = state.auth.principal_from_headers(&headers)?;
    let event = state.events.create_event(&principal, body).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
) -> ApiResult<Json<Event>> {
    let event = state.events.get_event(&event_id).await?;
    Ok(Json(event))
}

async fn create_order(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<CreateOrderRequest>,
) -> ApiResult<(StatusCode, Json<Order>)> {
    let principal = state.auth.principal_from_headers(&headers)?;
    let order = state
        .orders
        .create_order(&principal, &body.event_id, body.number_of_tickets)
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

async fn get_order(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(order_id): Path<String>,
) -> ApiResult<Json<OrderDetails>> {
    let principal = state.auth.principal_from_headers(&headers)?;
    let details = state.orders.get_order(&principal, &order_id).await?;
    Ok(Json(details))
}

async fn validate_ticket(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<ValidateTicketRequest>,
) -> ApiResult<Json<ValidateTicketResponse>> {
    let principal = state.auth.principal_from_headers(&headers)?;
    let ticket = state
        .redemptions
        .redeem(&principal, &body.qr_code_data, &body.event_id)
        .await?;

    Ok(Json(ValidateTicketResponse {
        valid: true,
        ticket,
    }))
}
