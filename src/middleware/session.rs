//! Staff session authentication middleware.
//!
//! Protects management routes (API key administration) with the
//! HMAC-signed bearer tokens issued at PIN login.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{error::AppError, models::staff::StaffMember, state::AppState};

/// Authentication context attached to staff-authenticated requests.
///
/// This struct is inserted into the request's extension map and can be
/// extracted by route handlers to know who made the request.
#[derive(Debug, Clone)]
pub struct StaffContext {
    pub staff_id: Uuid,

    /// Restaurant the staff member belongs to.
    ///
    /// Management queries always filter by this, so one restaurant's
    /// owner can never touch another's keys.
    pub restaurant_id: Uuid,

    /// Role string: "owner", "manager", or "kitchen"
    pub role: String,
}

impl StaffContext {
    /// Require the owner role, for key-management routes.
    pub fn require_owner(&self) -> Result<(), AppError> {
        if self.role == "owner" {
            Ok(())
        } else {
            Err(AppError::MissingPermission("owner role".to_string()))
        }
    }
}

/// Staff session middleware function.
///
/// # Flow
///
/// 1. Extract `Authorization: Bearer <token>` header
/// 2. Verify the HMAC signature and expiry (no database involved)
/// 3. Confirm the staff member still exists and is active
/// 4. Inject `StaffContext`, call the next handler
///
/// Step 3 means deactivating a staff member revokes their outstanding
/// tokens immediately, not at expiry.
pub async fn staff_session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Step 1: extract the bearer token
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::InvalidSession)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AppError::InvalidSession)?;

    // Step 2: signature + expiry
    let claims = state.sessions.verify(token)?;

    // Step 3: the staff member must still be active
    let staff = sqlx::query_as::<_, StaffMember>(
        "SELECT * FROM staff_members WHERE id = $1 AND is_active = true",
    )
    .bind(claims.staff_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AppError::InvalidSession)?;

    // Step 4: hand the context to the route handlers
    request.extensions_mut().insert(StaffContext {
        staff_id: staff.id,
        restaurant_id: staff.restaurant_id,
        role: staff.role,
    });

    Ok(next.run(request).await)
}
