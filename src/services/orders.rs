//! Order service - Core business logic for placing and tracking orders.
//!
//! This service handles:
//! - Menu item validation (existence, tenancy, availability)
//! - Server-side pricing from stored prices and the restaurant tax rate
//! - Atomic order + order-line inserts
//! - Status transition enforcement
//!
//! # Atomicity Guarantees
//!
//! An order and its lines are written within one PostgreSQL transaction.
//! The database ensures all-or-nothing execution.

use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        menu_item::MenuItem,
        order::{CreateOrderRequest, Order, OrderItem, OrderWithItems},
    },
    services::pricing::{self, PricedLine},
};

/// Most orders returned by a single list call.
const LIST_LIMIT: i64 = 50;

/// Order lifecycle states, stored as lowercase strings.
pub const ORDER_STATUSES: [&str; 6] = [
    "pending",
    "confirmed",
    "preparing",
    "ready",
    "delivered",
    "cancelled",
];

/// Whether an order may move from one status to another.
///
/// The forward flow is pending → confirmed → preparing → ready → delivered,
/// one step at a time. Cancellation is allowed from any non-terminal state.
/// `delivered` and `cancelled` are terminal.
pub fn transition_allowed(from: &str, to: &str) -> bool {
    match (from, to) {
        ("pending", "confirmed")
        | ("confirmed", "preparing")
        | ("preparing", "ready")
        | ("ready", "delivered") => true,
        (from, "cancelled") => from != "delivered" && from != "cancelled",
        _ => false,
    }
}

/// Place a new order for a restaurant.
///
/// # Process
///
/// 1. Validate the request shape (at least one line, known items)
/// 2. Fetch the restaurant's tax rate and the referenced menu items
/// 3. Clamp quantities and price the order server-side; client-supplied
///    prices are never trusted
/// 4. Insert the order and its lines in one database transaction
///
/// # Errors
///
/// - `InvalidRequest`: empty item list
/// - `MenuItemUnavailable`: an item is unknown, off-menu, or belongs to a
///   different restaurant
/// - `Database`: database error occurred
pub async fn create_order(
    pool: &DbPool,
    restaurant_id: Uuid,
    request: CreateOrderRequest,
) -> Result<OrderWithItems, AppError> {
    if request.items.is_empty() {
        return Err(AppError::InvalidRequest(
            "Order must contain at least one item".to_string(),
        ));
    }

    // Tax rate comes from the restaurant record, never the request
    let tax_rate_percent: f64 = sqlx::query_scalar(
        "SELECT tax_rate_percent FROM restaurants WHERE id = $1 AND is_active = true",
    )
    .bind(restaurant_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::InvalidRequest("Unknown restaurant".to_string()))?;

    // Fetch every referenced menu item in one query, scoped to the tenant
    let item_ids: Vec<Uuid> = request.items.iter().map(|line| line.menu_item_id).collect();
    let menu_items = sqlx::query_as::<_, MenuItem>(
        r#"
        SELECT * FROM menu_items
        WHERE restaurant_id = $1 AND id = ANY($2) AND is_available = true
        "#,
    )
    .bind(restaurant_id)
    .bind(&item_ids)
    .fetch_all(pool)
    .await?;

    let by_id: HashMap<Uuid, &MenuItem> =
        menu_items.iter().map(|item| (item.id, item)).collect();

    // Every requested line must resolve to a live menu item
    let mut lines = Vec::with_capacity(request.items.len());
    for line in &request.items {
        let item = by_id
            .get(&line.menu_item_id)
            .ok_or_else(|| AppError::MenuItemUnavailable(line.menu_item_id.to_string()))?;
        lines.push((*item, pricing::clamp_quantity(line.quantity)));
    }

    // Price from stored unit prices and clamped quantities
    let priced: Vec<PricedLine> = lines
        .iter()
        .map(|(item, quantity)| PricedLine {
            unit_price_cents: item.price_cents,
            quantity: *quantity,
        })
        .collect();
    let totals = pricing::price_order(&priced, tax_rate_percent);

    // Start db transaction: order header and lines commit together
    let mut tx = pool.begin().await?;

    // Lock the restaurant row so concurrent orders allocate distinct
    // numbers; without it two transactions read the same MAX and one
    // dies on the (restaurant_id, order_number) unique constraint
    sqlx::query("SELECT 1 FROM restaurants WHERE id = $1 FOR UPDATE")
        .bind(restaurant_id)
        .execute(&mut *tx)
        .await?;

    // Per-restaurant human-facing order number
    let order_number: i64 = sqlx::query_scalar(
        "SELECT COALESCE(MAX(order_number), 0) + 1 FROM orders WHERE restaurant_id = $1",
    )
    .bind(restaurant_id)
    .fetch_one(&mut *tx)
    .await?;

    let order = sqlx::query_as::<_, Order>(
        r#"
        INSERT INTO orders (
            restaurant_id,
            order_number,
            table_number,
            customer_name,
            subtotal_cents,
            tax_cents,
            total_cents,
            status
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending')
        RETURNING *
        "#,
    )
    .bind(restaurant_id)
    .bind(order_number)
    .bind(&request.table_number)
    .bind(&request.customer_name)
    .bind(totals.subtotal_cents)
    .bind(totals.tax_cents)
    .bind(totals.total_cents)
    .fetch_one(&mut *tx)
    .await?;

    // Snapshot name and price per line so later menu edits don't rewrite
    // order history
    let mut items = Vec::with_capacity(lines.len());
    for (menu_item, quantity) in lines {
        let item = sqlx::query_as::<_, OrderItem>(
            r#"
            INSERT INTO order_items (order_id, menu_item_id, item_name, unit_price_cents, quantity)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(order.id)
        .bind(menu_item.id)
        .bind(&menu_item.name)
        .bind(menu_item.price_cents)
        .bind(quantity)
        .fetch_one(&mut *tx)
        .await?;
        items.push(item);
    }

    // Commit all changes atomically
    tx.commit().await?;

    tracing::info!(
        order_id = %order.id,
        restaurant_id = %restaurant_id,
        total_cents = totals.total_cents,
        "Order placed"
    );

    Ok(OrderWithItems { order, items })
}

/// Fetch one order with its lines, scoped to a restaurant.
///
/// Returns `OrderNotFound` when the order doesn't exist OR belongs to a
/// different restaurant, so key holders can't probe other tenants' orders.
pub async fn get_order(
    pool: &DbPool,
    restaurant_id: Uuid,
    order_id: Uuid,
) -> Result<OrderWithItems, AppError> {
    let order = sqlx::query_as::<_, Order>(
        "SELECT * FROM orders WHERE id = $1 AND restaurant_id = $2",
    )
    .bind(order_id)
    .bind(restaurant_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::OrderNotFound)?;

    let items = sqlx::query_as::<_, OrderItem>(
        "SELECT * FROM order_items WHERE order_id = $1 ORDER BY item_name",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;

    Ok(OrderWithItems { order, items })
}

/// List a restaurant's most recent orders, optionally filtered by status.
pub async fn list_orders(
    pool: &DbPool,
    restaurant_id: Uuid,
    status: Option<String>,
) -> Result<Vec<Order>, AppError> {
    if let Some(ref status) = status {
        if !ORDER_STATUSES.contains(&status.as_str()) {
            return Err(AppError::InvalidRequest(format!(
                "Unknown status: {status}"
            )));
        }
    }

    let orders = sqlx::query_as::<_, Order>(
        r#"
        SELECT * FROM orders
        WHERE restaurant_id = $1 AND ($2::text IS NULL OR status = $2)
        ORDER BY created_at DESC
        LIMIT $3
        "#,
    )
    .bind(restaurant_id)
    .bind(status)
    .bind(LIST_LIMIT)
    .fetch_all(pool)
    .await?;

    Ok(orders)
}

/// Move an order to a new status, enforcing the transition flow.
///
/// # Process
///
/// 1. Lock the order row and read its current status
/// 2. Reject transitions outside the allowed flow
/// 3. Update status and `updated_at`
///
/// The row lock prevents two concurrent updates from both passing the
/// transition check.
pub async fn update_status(
    pool: &DbPool,
    restaurant_id: Uuid,
    order_id: Uuid,
    new_status: &str,
) -> Result<Order, AppError> {
    if !ORDER_STATUSES.contains(&new_status) {
        return Err(AppError::InvalidRequest(format!(
            "Unknown status: {new_status}"
        )));
    }

    let mut tx = pool.begin().await?;

    // Lock the order while we check the transition
    let current: String = sqlx::query_scalar(
        "SELECT status FROM orders WHERE id = $1 AND restaurant_id = $2 FOR UPDATE",
    )
    .bind(order_id)
    .bind(restaurant_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(AppError::OrderNotFound)?;

    if !transition_allowed(&current, new_status) {
        tx.rollback().await?;
        return Err(AppError::InvalidStatusTransition);
    }

    let order = sqlx::query_as::<_, Order>(
        r#"
        UPDATE orders
        SET status = $1, updated_at = NOW()
        WHERE id = $2
        RETURNING *
        "#,
    )
    .bind(new_status)
    .bind(order_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(order_id = %order_id, from = %current, to = %new_status, "Order status updated");

    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_flow_moves_one_step_at_a_time() {
        assert!(transition_allowed("pending", "confirmed"));
        assert!(transition_allowed("confirmed", "preparing"));
        assert!(transition_allowed("preparing", "ready"));
        assert!(transition_allowed("ready", "delivered"));

        // No skipping
        assert!(!transition_allowed("pending", "preparing"));
        assert!(!transition_allowed("pending", "delivered"));
        assert!(!transition_allowed("confirmed", "ready"));

        // No going backwards
        assert!(!transition_allowed("ready", "preparing"));
        assert!(!transition_allowed("delivered", "pending"));
    }

    #[test]
    fn cancellation_allowed_from_non_terminal_states() {
        for from in ["pending", "confirmed", "preparing", "ready"] {
            assert!(transition_allowed(from, "cancelled"), "from {from}");
        }

        assert!(!transition_allowed("delivered", "cancelled"));
        assert!(!transition_allowed("cancelled", "cancelled"));
    }

    #[test]
    fn terminal_states_admit_nothing() {
        for to in ORDER_STATUSES {
            assert!(!transition_allowed("delivered", to), "delivered -> {to}");
            assert!(!transition_allowed("cancelled", to), "cancelled -> {to}");
        }
    }

    #[test]
    fn self_transitions_are_rejected() {
        for status in ORDER_STATUSES {
            assert!(!transition_allowed(status, status), "{status} -> {status}");
        }
    }
}
