use axum::{body::Bytes, extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use std::sync::Arc;

use crate::database::repositories::OrderRepository;
use crate::models::Order;

use super::errors::ApiError;
use super::responses::*;
use super::validation::validate_order_request;

/// Shared application state
pub type AppState = Arc<dyn OrderRepository>;

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Create a new trade order
///
/// The body is taken as raw bytes so that decode failures and field
/// violations both produce the validation error envelope.
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    tag = "orders",
    request_body = OrderRequest,
    responses(
        (status = 201, description = "Order created", body = Order),
        (status = 400, description = "Validation failed", body = ValidationErrorResponse),
        (status = 500, description = "Server error", body = ErrorResponse)
    )
)]
pub async fn create_order(
    State(repository): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let new_order = validate_order_request(&body)?;

    let order = repository
        .create(new_order)
        .await
        .map_err(ApiError::CreateFailed)?;

    tracing::info!(
        "Order {} created: {} {} {} @ {}",
        order.id,
        order.order_type,
        order.quantity,
        order.symbol,
        order.price
    );

    Ok((StatusCode::CREATED, Json(order)))
}

/// Get all trade orders, newest first
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    tag = "orders",
    responses(
        (status = 200, description = "All orders", body = Vec<Order>),
        (status = 500, description = "Server error", body = ErrorResponse)
    )
)]
pub async fn list_orders(State(repository): State<AppState>) -> Result<Json<Vec<Order>>, ApiError> {
    repository
        .list()
        .await
        .map(Json)
        .map_err(ApiError::FetchFailed)
}
