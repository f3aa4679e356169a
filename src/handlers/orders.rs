//! Order HTTP handlers (public keyed API).
//!
//! This module implements the order endpoints:
//! - POST /api/v1/orders - Place an order
//! - GET /api/v1/orders - List recent orders
//! - GET /api/v1/orders/:id - Get order details
//! - PATCH /api/v1/orders/:id/status - Move an order through the kitchen flow
//!
//! Every route requires a validated API key (injected by the key
//! middleware) and the matching permission string.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::order::{
        CreateOrderRequest, OrderResponse, OrderSummaryResponse, UpdateOrderStatusRequest,
    },
    services::{api_keys::ValidatedKey, orders},
    state::AppState,
};

/// Query parameters for order listing.
#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
    /// Optional status filter, e.g. `?status=preparing`
    pub status: Option<String>,
}

/// Place a new order.
///
/// # Endpoint
///
/// `POST /api/v1/orders`
///
/// # Permission
///
/// `orders:create`
///
/// # Request Body
///
/// ```json
/// {
///   "table_number": "7",
///   "items": [
///     { "menu_item_id": "550e8400-...", "quantity": 2 }
///   ]
/// }
/// ```
///
/// # Response (201 Created)
///
/// The order as priced by the server: subtotal, tax, and total are
/// computed from stored menu prices and the restaurant's tax rate,
/// never taken from the request.
///
/// ```json
/// {
///   "id": "770e8400-...",
///   "order_number": 42,
///   "items": [
///     { "menu_item_id": "550e8400-...", "item_name": "Chicken Karahi", "unit_price_cents": 650, "quantity": 2 }
///   ],
///   "subtotal_cents": 1300,
///   "tax_cents": 208,
///   "total_cents": 1508,
///   "status": "pending"
/// }
/// ```
pub async fn create_order(
    State(state): State<AppState>,
    Extension(key): Extension<ValidatedKey>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse, AppError> {
    key.require("orders:create")?;

    let order = orders::create_order(&state.pool, key.restaurant_id, request).await?;

    Ok((StatusCode::CREATED, Json(OrderResponse::from(order))))
}

/// Get a specific order by ID.
///
/// # Endpoint
///
/// `GET /api/v1/orders/:id`
///
/// # Permission
///
/// `orders:read`
///
/// # Response
///
/// - **Success (200 OK)**: order with its lines
/// - **Error (404)**: order not found or belongs to another restaurant
///   (indistinguishable on purpose, to prevent order enumeration)
pub async fn get_order(
    State(state): State<AppState>,
    Extension(key): Extension<ValidatedKey>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<OrderResponse>, AppError> {
    key.require("orders:read")?;

    let order = orders::get_order(&state.pool, key.restaurant_id, order_id).await?;

    Ok(Json(order.into()))
}

/// List the restaurant's most recent orders.
///
/// # Endpoint
///
/// `GET /api/v1/orders?status=preparing`
///
/// # Permission
///
/// `orders:read`
///
/// # Response
///
/// Up to 50 order summaries (no lines), newest first, optionally filtered
/// by status.
pub async fn list_orders(
    State(state): State<AppState>,
    Extension(key): Extension<ValidatedKey>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<Vec<OrderSummaryResponse>>, AppError> {
    key.require("orders:read")?;

    let orders = orders::list_orders(&state.pool, key.restaurant_id, query.status).await?;

    Ok(Json(orders.into_iter().map(Into::into).collect()))
}

/// Update an order's status.
///
/// # Endpoint
///
/// `PATCH /api/v1/orders/:id/status`
///
/// # Permission
///
/// `orders:update`
///
/// # Request Body
///
/// ```json
/// { "status": "confirmed" }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: the updated order summary
/// - **Error (422)**: transition not allowed from the current status
/// - **Error (404)**: order not found for this restaurant
pub async fn update_order_status(
    State(state): State<AppState>,
    Extension(key): Extension<ValidatedKey>,
    Path(order_id): Path<Uuid>,
    Json(request): Json<UpdateOrderStatusRequest>,
) -> Result<Json<OrderSummaryResponse>, AppError> {
    key.require("orders:update")?;

    let order =
        orders::update_status(&state.pool, key.restaurant_id, order_id, &request.status).await?;

    Ok(Json(order.into()))
}
