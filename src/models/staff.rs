//! Staff member models for PIN authentication.
//!
//! Staff log in with short numeric PINs. PINs are stored in the database
//! as SHA-256 hashes, never in plaintext.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a staff member record from the database.
///
/// # Database Table
///
/// Maps to the `staff_members` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StaffMember {
    /// Unique identifier for this staff member
    pub id: Uuid,

    /// Restaurant this staff member works at
    pub restaurant_id: Uuid,

    /// Display name
    pub name: String,

    /// Role: "owner", "manager", or "kitchen".
    ///
    /// Key management requires "owner".
    pub role: String,

    /// SHA-256 hash of the login PIN (64 hex characters)
    pub pin_hash: String,

    /// Whether this staff member can currently log in
    pub is_active: bool,

    /// Timestamp when the record was created
    pub created_at: DateTime<Utc>,
}

/// Request body for staff PIN login.
///
/// # JSON Example
///
/// ```json
/// {
///   "restaurant_id": "550e8400-e29b-41d4-a716-446655440000",
///   "pin": "4821"
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct StaffLoginRequest {
    pub restaurant_id: Uuid,
    pub pin: String,
}

/// Response body for a successful staff login.
#[derive(Debug, Serialize)]
pub struct StaffLoginResponse {
    /// Signed bearer token for subsequent requests
    pub token: String,

    pub staff_id: Uuid,
    pub name: String,
    pub role: String,

    /// When the token stops being accepted
    pub expires_at: DateTime<Utc>,
}
