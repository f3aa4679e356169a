//! Menu HTTP handlers (public keyed API).
//!
//! - GET /api/v1/menu - List the restaurant's available menu items

use axum::{Extension, Json, extract::State};

use crate::{
    error::AppError,
    models::menu_item::{MenuItem, MenuItemResponse},
    services::api_keys::ValidatedKey,
    state::AppState,
};

/// List available menu items for the key's restaurant.
///
/// # Endpoint
///
/// `GET /api/v1/menu`
///
/// # Permission
///
/// `menu:read`
///
/// # Response (200 OK)
///
/// ```json
/// [
///   {
///     "id": "550e8400-e29b-41d4-a716-446655440000",
///     "name": "Chicken Karahi",
///     "description": "Half kg, bone-in",
///     "price_cents": 650,
///     "category": "Mains"
///   }
/// ]
/// ```
///
/// Unavailable items are excluded: integrators only see what can
/// currently be ordered.
pub async fn list_menu(
    State(state): State<AppState>,
    Extension(key): Extension<ValidatedKey>,
) -> Result<Json<Vec<MenuItemResponse>>, AppError> {
    key.require("menu:read")?;

    let items = sqlx::query_as::<_, MenuItem>(
        r#"
        SELECT * FROM menu_items
        WHERE restaurant_id = $1 AND is_available = true
        ORDER BY category NULLS LAST, name
        "#,
    )
    .bind(key.restaurant_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(items.into_iter().map(Into::into).collect()))
}
