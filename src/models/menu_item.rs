//! Menu item data models.
//!
//! Menu items carry the unit prices the order pricer works from. Prices
//! are stored as integer cents to avoid floating-point errors: 650 cents,
//! never 6.50.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Represents a menu item record from the database.
///
/// # Database Table
///
/// Maps to the `menu_items` table. Each item belongs to one restaurant;
/// menu queries always filter by `restaurant_id`.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct MenuItem {
    /// Unique identifier for this menu item
    pub id: Uuid,

    /// Restaurant this item belongs to
    pub restaurant_id: Uuid,

    /// Display name, e.g. "Chicken Karahi"
    pub name: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Unit price in cents
    pub price_cents: i64,

    /// Optional grouping, e.g. "Mains", "Drinks"
    pub category: Option<String>,

    /// Whether the item can currently be ordered.
    ///
    /// Unavailable items stay on record (order lines snapshot their name
    /// and price) but are rejected in new orders.
    pub is_available: bool,

    /// Timestamp when the item was created
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last edit
    pub updated_at: DateTime<Utc>,
}

/// Response body for menu endpoints.
///
/// Drops the internal `restaurant_id` (the key already scopes the request)
/// and the timestamps integrators don't need.
#[derive(Debug, Serialize)]
pub struct MenuItemResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub category: Option<String>,
}

impl From<MenuItem> for MenuItemResponse {
    fn from(item: MenuItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            price_cents: item.price_cents,
            category: item.category,
        }
    }
}
