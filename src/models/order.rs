//! Order data models and API request/response types.
//!
//! This module defines:
//! - `Order` / `OrderItem`: database entities
//! - `CreateOrderRequest`: request body for placing orders
//! - `OrderResponse`: response body returned to clients
//!
//! All money fields are integer cents. Totals are derived by the pricing
//! service from stored menu prices, never taken from the client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents an order record from the database.
///
/// # Database Table
///
/// Maps to the `orders` table. Each order:
/// - Belongs to one restaurant (queries always filter by `restaurant_id`)
/// - Carries derived totals (subtotal, tax, total)
/// - Tracks a status through the kitchen flow
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Order {
    /// Unique identifier for this order
    pub id: Uuid,

    /// Restaurant this order was placed with
    pub restaurant_id: Uuid,

    /// Human-facing per-restaurant serial ("order #42")
    pub order_number: i64,

    /// Table for dine-in orders, free-form ("12", "patio 3")
    pub table_number: Option<String>,

    /// Customer name for pickup orders
    pub customer_name: Option<String>,

    /// Sum of line unit price x quantity, in cents
    pub subtotal_cents: i64,

    /// round(subtotal x tax rate / 100), in cents
    pub tax_cents: i64,

    /// subtotal + tax, in cents
    pub total_cents: i64,

    /// Lifecycle status
    ///
    /// - "pending": placed, awaiting confirmation
    /// - "confirmed": accepted by the restaurant
    /// - "preparing": in the kitchen
    /// - "ready": ready for pickup/serving
    /// - "delivered": handed over (terminal)
    /// - "cancelled": abandoned (terminal)
    pub status: String,

    /// When the order was placed
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last status change
    pub updated_at: DateTime<Utc>,
}

/// One line of an order.
///
/// # Database Table
///
/// Maps to the `order_items` table. `item_name` and `unit_price_cents` are
/// snapshots taken at ordering time, so later menu edits never rewrite
/// order history.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub menu_item_id: Uuid,
    pub item_name: String,
    pub unit_price_cents: i64,
    pub quantity: i32,
}

/// An order together with its lines, as loaded by the order service.
#[derive(Debug, Clone)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Request body for placing an order.
///
/// # JSON Example
///
/// ```json
/// {
///   "table_number": "7",
///   "items": [
///     { "menu_item_id": "550e8400-e29b-41d4-a716-446655440000", "quantity": 2 },
///     { "menu_item_id": "660e8400-e29b-41d4-a716-446655440001", "quantity": 1 }
///   ]
/// }
/// ```
///
/// # Validation
///
/// - `items`: required, at least one line
/// - `quantity`: clamped to [1, 99]
/// - Prices are intentionally absent: the server prices from stored data
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    /// Table for dine-in orders
    pub table_number: Option<String>,

    /// Customer name for pickup orders
    pub customer_name: Option<String>,

    /// Ordered lines
    pub items: Vec<OrderLineRequest>,
}

/// One requested line: which item and how many.
#[derive(Debug, Deserialize)]
pub struct OrderLineRequest {
    pub menu_item_id: Uuid,
    pub quantity: i32,
}

/// Request body for updating an order's status.
#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

/// Response returned for order operations.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": "770e8400-e29b-41d4-a716-446655440002",
///   "order_number": 42,
///   "table_number": "7",
///   "items": [
///     { "menu_item_id": "...", "item_name": "Chicken Karahi", "unit_price_cents": 650, "quantity": 2 }
///   ],
///   "subtotal_cents": 1300,
///   "tax_cents": 208,
///   "total_cents": 1508,
///   "status": "pending",
///   "created_at": "2026-08-24T12:00:00Z"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: Uuid,
    pub order_number: i64,
    pub table_number: Option<String>,
    pub customer_name: Option<String>,
    pub items: Vec<OrderLineResponse>,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One order line as returned to clients.
#[derive(Debug, Serialize)]
pub struct OrderLineResponse {
    pub menu_item_id: Uuid,
    pub item_name: String,
    pub unit_price_cents: i64,
    pub quantity: i32,
}

impl From<OrderItem> for OrderLineResponse {
    fn from(item: OrderItem) -> Self {
        Self {
            menu_item_id: item.menu_item_id,
            item_name: item.item_name,
            unit_price_cents: item.unit_price_cents,
            quantity: item.quantity,
        }
    }
}

/// Convert an order with its lines into the API response shape.
///
/// Removes the internal `restaurant_id` (the key already scopes requests).
impl From<OrderWithItems> for OrderResponse {
    fn from(full: OrderWithItems) -> Self {
        let OrderWithItems { order, items } = full;
        Self {
            id: order.id,
            order_number: order.order_number,
            table_number: order.table_number,
            customer_name: order.customer_name,
            items: items.into_iter().map(Into::into).collect(),
            subtotal_cents: order.subtotal_cents,
            tax_cents: order.tax_cents,
            total_cents: order.total_cents,
            status: order.status,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

/// Compact order summary for list endpoints (no lines).
#[derive(Debug, Serialize)]
pub struct OrderSummaryResponse {
    pub id: Uuid,
    pub order_number: i64,
    pub table_number: Option<String>,
    pub customer_name: Option<String>,
    pub total_cents: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<Order> for OrderSummaryResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            order_number: order.order_number,
            table_number: order.table_number,
            customer_name: order.customer_name,
            total_cents: order.total_cents,
            status: order.status,
            created_at: order.created_at,
        }
    }
}
